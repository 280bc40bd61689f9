use async_trait::async_trait;

use crate::domain::CallerRecord;
use crate::error::Result;

/// Resolves bearer tokens to caller identities.
#[async_trait]
pub trait CallerDirectory: Send + Sync {
    async fn caller_for_token(&self, token: &str) -> Result<Option<CallerRecord>>;
}

/// Tokens are stored as lowercase hex SHA-256 digests, never in clear text.
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
