use thiserror::Error;

use super::models::{Config, MAX_PER_PAGE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("server port must not be 0")]
    EphemeralPort,
    #[error("database.max_connections must be greater than 0")]
    NoConnections,
    #[error("listing.default_per_page must be between 1 and {MAX_PER_PAGE}, got {0}")]
    PerPageOutOfRange(u32),
    #[error("history.limit must be greater than 0, got {0}")]
    HistoryLimit(i64),
    #[error("notification timeout must be greater than 0")]
    ZeroTimeout,
    #[error("admin and super-admin role ids must differ (both {0})")]
    RoleIdCollision(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.server.port == 0 {
        return Err(ConfigGuardRailError::EphemeralPort);
    }
    if config.database.max_connections == 0 {
        return Err(ConfigGuardRailError::NoConnections);
    }

    let per_page = config.listing.default_per_page;
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(ConfigGuardRailError::PerPageOutOfRange(per_page));
    }
    if config.history.limit <= 0 {
        return Err(ConfigGuardRailError::HistoryLimit(config.history.limit));
    }
    if config.notifications.timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroTimeout);
    }
    if config.auth.admin_role_id == config.auth.superadmin_role_id {
        return Err(ConfigGuardRailError::RoleIdCollision(config.auth.admin_role_id));
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "DATABASE_URL not configured; only --in-memory runs are possible",
            "Set DATABASE_URL or add a [database] url to the config file",
        );
    }

    if !config.notifications.has_webhooks() {
        warnings.push(
            "No notification webhooks configured; resend requests will only be logged",
        );
    }

    if config.cors.is_wildcard_included() {
        warnings.push("CORS allows any origin");
    }

    Ok(warnings)
}
