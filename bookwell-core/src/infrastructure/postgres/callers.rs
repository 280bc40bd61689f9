use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::{CallerRecord, UserId};
use crate::error::Result;
use crate::ports::CallerDirectory;
use crate::ports::callers::hash_token;

/// Resolves bearer tokens against the `api_tokens` table.
#[derive(Clone, Debug)]
pub struct PostgresCallerDirectory {
    pool: PgPool,
}

impl PostgresCallerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CallerDirectory for PostgresCallerDirectory {
    async fn caller_for_token(&self, token: &str) -> Result<Option<CallerRecord>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.user_type
            FROM api_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
              AND (t.expires_at IS NULL OR t.expires_at > NOW())
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(CallerRecord {
                user_id: UserId(row.try_get("id")?),
                user_type: row.try_get("user_type")?,
            })
        })
        .transpose()
    }
}
