use std::sync::Arc;

use anyhow::{Context, bail};
use bookwell_config::Config;
use bookwell_core::application::AppUnitOfWorkBuilder;
use bookwell_core::domain::UserId;
use bookwell_core::i18n::MessageCatalog;
use bookwell_core::infrastructure::memory::InMemoryStore;
use bookwell_core::infrastructure::notify::{LogTransport, WebhookEndpoints, WebhookTransport};
use bookwell_core::infrastructure::postgres::PostgresDatabase;
use bookwell_core::ports::NotificationTransport;
use tracing::info;

use super::app_state::{AppState, RuntimeSettings};

/// Bearer token seeded into the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevToken {
    pub token: String,
    pub user_id: UserId,
    pub user_type: i32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DevTokenError {
    #[error("dev token entry must be token:user_id:user_type, got {0:?}")]
    Shape(String),
    #[error("dev token entry {0:?} has an empty token")]
    EmptyToken(String),
    #[error("invalid user id in dev token {0:?}")]
    UserId(String),
    #[error("invalid user type in dev token {0:?}")]
    UserType(String),
}

/// Parse `token:user_id:user_type` entries separated by commas.
pub fn parse_dev_tokens(raw: &str) -> Result<Vec<DevToken>, DevTokenError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.split(':');
            let (Some(token), Some(user_id), Some(user_type), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(DevTokenError::Shape(entry.to_string()));
            };
            if token.is_empty() {
                return Err(DevTokenError::EmptyToken(entry.to_string()));
            }
            Ok(DevToken {
                token: token.to_string(),
                user_id: UserId(
                    user_id
                        .parse()
                        .map_err(|_| DevTokenError::UserId(entry.to_string()))?,
                ),
                user_type: user_type
                    .parse()
                    .map_err(|_| DevTokenError::UserType(entry.to_string()))?,
            })
        })
        .collect()
}

/// How jobs and callers are persisted for this process.
#[derive(Debug)]
pub enum StorageMode {
    InMemory { tokens: Vec<DevToken> },
    Postgres,
}

pub fn notification_transport(config: &Config) -> anyhow::Result<Arc<dyn NotificationTransport>> {
    let notifications = &config.notifications;
    if !notifications.has_webhooks() {
        return Ok(Arc::new(LogTransport));
    }

    let endpoints = WebhookEndpoints {
        push: notifications.push_webhook_url.clone(),
        sms: notifications.sms_webhook_url.clone(),
    };
    let transport = WebhookTransport::new(endpoints, notifications.timeout)
        .context("failed to build webhook transport")?;
    Ok(Arc::new(transport))
}

pub fn message_catalog(config: &Config) -> anyhow::Result<MessageCatalog> {
    match &config.locale.catalog_path {
        Some(path) => MessageCatalog::load(path)
            .with_context(|| format!("failed to load message catalog {}", path.display())),
        None => Ok(MessageCatalog::new()),
    }
}

pub async fn connect_postgres(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let Some(url) = config.database.url.as_deref() else {
        bail!("DATABASE_URL is not configured; set it or run with --in-memory");
    };
    PostgresDatabase::new(url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")
}

pub async fn build_state(config: &Config, storage: StorageMode) -> anyhow::Result<AppState> {
    let catalog = message_catalog(config)?;
    let transport = notification_transport(config)?;
    let builder = AppUnitOfWorkBuilder::new().with_notifications(transport);

    let builder = match storage {
        StorageMode::InMemory { tokens } => {
            let store = Arc::new(InMemoryStore::new());
            for DevToken {
                token,
                user_id,
                user_type,
            } in &tokens
            {
                store.register_token(token, *user_id, *user_type).await;
            }
            info!(tokens = tokens.len(), "using in-memory storage");
            builder.with_memory(store)
        }
        StorageMode::Postgres => {
            let db = connect_postgres(config).await?;
            db.migrate().await.context("failed to apply migrations")?;
            info!("connected to PostgreSQL");
            builder.with_postgres(&db)
        }
    };

    let unit_of_work = builder.build().map_err(anyhow::Error::msg)?;
    Ok(AppState::new(
        unit_of_work,
        RuntimeSettings::from(config),
        catalog,
    ))
}
