use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{Channel, Notification};
use crate::error::{BookingError, Result};
use crate::ports::NotificationTransport;

use super::LogTransport;

/// Per-channel webhook targets. A channel without a URL is only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookEndpoints {
    pub push: Option<Url>,
    pub sms: Option<Url>,
}

impl WebhookEndpoints {
    pub fn for_channel(&self, channel: Channel) -> Option<&Url> {
        match channel {
            Channel::Push => self.push.as_ref(),
            Channel::Sms => self.sms.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.push.is_none() && self.sms.is_none()
    }
}

/// Posts notifications as JSON to the configured channel endpoint.
#[derive(Debug, Clone)]
pub struct WebhookTransport {
    client: reqwest::Client,
    endpoints: WebhookEndpoints,
    fallback: LogTransport,
}

impl WebhookTransport {
    pub fn new(endpoints: WebhookEndpoints, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BookingError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoints,
            fallback: LogTransport,
        })
    }

    pub fn endpoints(&self) -> &WebhookEndpoints {
        &self.endpoints
    }
}

#[async_trait]
impl NotificationTransport for WebhookTransport {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let Some(url) = self.endpoints.for_channel(notification.channel) else {
            debug!(channel = %notification.channel, "no webhook for channel, logging instead");
            return self.fallback.send(notification).await;
        };

        let response = self
            .client
            .post(url.clone())
            .json(notification)
            .send()
            .await
            .map_err(|e| BookingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                job_id = %notification.job_id,
                channel = %notification.channel,
                %status,
                "webhook rejected notification"
            );
            return Err(BookingError::Transport(format!(
                "{} endpoint answered {status}",
                notification.channel
            )));
        }

        debug!(job_id = %notification.job_id, channel = %notification.channel, "webhook accepted notification");
        Ok(())
    }
}
