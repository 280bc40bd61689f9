use async_trait::async_trait;

use crate::domain::Notification;
use crate::error::Result;

/// Channel-keyed notification delivery. Implementations own retries and
/// delivery failures; `send` only reports whether the hand-off was accepted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}
