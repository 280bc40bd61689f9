//! Notification transports.
//!
//! `LogTransport` records hand-offs through `tracing` and is used when no
//! webhook endpoints are configured. `WebhookTransport` posts the
//! notification to a channel-specific HTTP endpoint and logs channels that
//! have none.

mod log;
mod webhook;

pub use log::LogTransport;
pub use webhook::{WebhookEndpoints, WebhookTransport};
