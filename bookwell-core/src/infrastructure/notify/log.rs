use async_trait::async_trait;
use tracing::info;

use crate::domain::Notification;
use crate::error::Result;
use crate::ports::NotificationTransport;

/// Accepts every notification and writes it to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn send(&self, notification: &Notification) -> Result<()> {
        info!(
            job_id = %notification.job_id,
            translator_id = %notification.translator_id,
            channel = %notification.channel,
            requested_by = %notification.requested_by,
            "notification handed off"
        );
        Ok(())
    }
}
