use serde::{Deserialize, Serialize};
use std::fmt;

use super::caller::UserId;
use super::job::JobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Push,
    Sms,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Push => "push",
            Channel::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to notify a job's translator over one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub job_id: JobId,
    pub translator_id: UserId,
    pub channel: Channel,
    pub requested_by: UserId,
}

/// Hand-off acknowledgement. Not a delivery receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub channel: Channel,
}

impl Ack {
    pub fn text(self) -> &'static str {
        match self.channel {
            Channel::Push => "Push sent",
            Channel::Sms => "SMS sent",
        }
    }
}
