use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub listing: FileListingConfig,
    #[serde(default)]
    pub history: FileHistoryConfig,
    #[serde(default)]
    pub locale: FileLocaleConfig,
    #[serde(default)]
    pub notifications: FileNotificationConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileDatabaseConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileAuthConfig {
    pub admin_role_id: Option<i32>,
    pub superadmin_role_id: Option<i32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileListingConfig {
    pub restrict_target_to_self: Option<bool>,
    pub default_per_page: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileHistoryConfig {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileLocaleConfig {
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileNotificationConfig {
    pub push_webhook_url: Option<String>,
    pub sms_webhook_url: Option<String>,
    /// Human readable duration such as `5s` or `1500ms`.
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileCorsConfig {
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub admin_role_id: Option<i32>,
    pub superadmin_role_id: Option<i32>,
    pub restrict_target_to_self: Option<bool>,
    pub default_per_page: Option<u32>,
    pub history_limit: Option<i64>,
    pub catalog_path: Option<PathBuf>,
    pub push_webhook_url: Option<String>,
    pub sms_webhook_url: Option<String>,
    pub notification_timeout: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl EnvConfig {
    /// Read the process environment.
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            config_path: var("BOOKWELL_CONFIG_PATH").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: parse_var(&var, "SERVER_PORT"),
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_var(&var, "DATABASE_MAX_CONNECTIONS"),
            admin_role_id: parse_var(&var, "ADMIN_ROLE_ID"),
            superadmin_role_id: parse_var(&var, "SUPERADMIN_ROLE_ID"),
            restrict_target_to_self: var("LISTING_RESTRICT_TARGET_TO_SELF")
                .as_deref()
                .and_then(parse_bool),
            default_per_page: parse_var(&var, "LISTING_DEFAULT_PER_PAGE"),
            history_limit: parse_var(&var, "HISTORY_LIMIT"),
            catalog_path: var("MESSAGE_CATALOG_PATH").map(PathBuf::from),
            push_webhook_url: var("PUSH_WEBHOOK_URL"),
            sms_webhook_url: var("SMS_WEBHOOK_URL"),
            notification_timeout: var("NOTIFICATION_TIMEOUT"),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS").map(|raw| split_csv(&raw)),
        }
    }
}

fn parse_var<T, F>(var: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(name).and_then(|raw| raw.trim().parse().ok())
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
