use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{
    models::{
        AuthConfig, Config, ConfigMetadata, CorsConfig, DEFAULT_ADMIN_ROLE_ID, DEFAULT_HISTORY_LIMIT,
        DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS, DEFAULT_NOTIFICATION_TIMEOUT, DEFAULT_PER_PAGE,
        DEFAULT_PORT, DEFAULT_SUPERADMIN_ROLE_ID, DatabaseConfig, HistoryConfig, ListingConfig,
        LocaleConfig, NotificationConfig, ServerConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("bookwell.toml"),
        PathBuf::from("config/bookwell.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Use these values instead of reading `.env` and the process environment.
    pub env: Option<EnvConfig>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.options.env = Some(env);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env_config, env_file_loaded) = match &self.options.env {
            Some(env) => (env.clone(), false),
            None => {
                let loaded = self.load_env_file()?;
                (EnvConfig::gather(), loaded)
            }
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) =
            compose_config(file_config, env_config, config_path, env_file_loaded)?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        match result {
            Ok(()) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // An explicitly named file must exist; defaults are probed.
        let path = match self
            .options
            .config_path
            .as_ref()
            .or(env_config.config_path.as_ref())
        {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigLoadError::MissingConfig {
                        path: explicit.clone(),
                    });
                }
                explicit.clone()
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        let contents = fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No bookwell.toml detected; using environment variables and defaults",
            "Pass --config or set BOOKWELL_CONFIG_PATH to load a configuration file",
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        auth: file_auth,
        listing: file_listing,
        history: file_history,
        locale: file_locale,
        notifications: file_notifications,
        cors: file_cors,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let database = DatabaseConfig {
        url: env
            .database_url
            .or(file_database.url)
            .filter(|url| !url.trim().is_empty()),
        max_connections: env
            .database_max_connections
            .or(file_database.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
    };

    let auth = AuthConfig {
        admin_role_id: env
            .admin_role_id
            .or(file_auth.admin_role_id)
            .unwrap_or(DEFAULT_ADMIN_ROLE_ID),
        superadmin_role_id: env
            .superadmin_role_id
            .or(file_auth.superadmin_role_id)
            .unwrap_or(DEFAULT_SUPERADMIN_ROLE_ID),
    };

    let listing = ListingConfig {
        restrict_target_to_self: env
            .restrict_target_to_self
            .or(file_listing.restrict_target_to_self)
            .unwrap_or(false),
        default_per_page: env
            .default_per_page
            .or(file_listing.default_per_page)
            .unwrap_or(DEFAULT_PER_PAGE),
    };

    let history = HistoryConfig {
        limit: env
            .history_limit
            .or(file_history.limit)
            .unwrap_or(DEFAULT_HISTORY_LIMIT),
    };

    let locale = LocaleConfig {
        catalog_path: env.catalog_path.or(file_locale.catalog_path),
    };

    let notifications = NotificationConfig {
        push_webhook_url: parse_webhook(
            "push_webhook_url",
            env.push_webhook_url.or(file_notifications.push_webhook_url),
        )?,
        sms_webhook_url: parse_webhook(
            "sms_webhook_url",
            env.sms_webhook_url.or(file_notifications.sms_webhook_url),
        )?,
        timeout: parse_timeout(env.notification_timeout.or(file_notifications.timeout))?,
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_default(),
    };

    let config = Config {
        server,
        database,
        auth,
        listing,
        history,
        locale,
        notifications,
        cors,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    warnings.extend(validation::apply_guard_rails(&config)?);

    Ok((config, warnings))
}

fn parse_webhook(field: &'static str, raw: Option<String>) -> Result<Option<Url>, ConfigLoadError> {
    raw.map(|raw| {
        Url::parse(raw.trim()).map_err(|source| ConfigLoadError::InvalidWebhookUrl { field, source })
    })
    .transpose()
}

fn parse_timeout(raw: Option<String>) -> Result<Duration, ConfigLoadError> {
    match raw {
        Some(raw) => humantime::parse_duration(raw.trim())
            .map_err(|source| ConfigLoadError::InvalidTimeout { value: raw, source }),
        None => Ok(DEFAULT_NOTIFICATION_TIMEOUT),
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid notifications.{field}")]
    InvalidWebhookUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid notification timeout '{value}'")]
    InvalidTimeout {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
