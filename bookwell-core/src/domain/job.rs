use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::caller::UserId;

pub const DEFAULT_JOB_STATUS: &str = "pending";

/// Positive integer identifier of a job.
///
/// The only ways to obtain one are [`JobId::new`] and [`JobId::parse`], both of
/// which reject zero, negative and malformed values, so anything holding a
/// `JobId` is safe to hand to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(i64);

impl JobId {
    pub fn new(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// Parse an untrusted path segment. Surrounding whitespace, signs and any
    /// non-digit characters are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse::<i64>().ok().and_then(Self::new)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: JobId,
    pub user_id: UserId,
    pub translator_id: Option<UserId>,
    pub from_language_id: Option<i64>,
    pub due: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub immediate: bool,
    pub customer_phone_type: bool,
    pub customer_physical_type: bool,
    pub status: String,
    pub flagged: bool,
    pub manually_handled: bool,
    pub by_admin: bool,
    pub admin_comments: Option<String>,
    pub session_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Build a fresh job from a booking payload. Used by adapters that assign
    /// ids themselves.
    pub fn from_payload(id: JobId, payload: &BookingPayload, now: DateTime<Utc>) -> Self {
        let mut job = Self {
            id,
            user_id: payload.user_id,
            translator_id: None,
            from_language_id: None,
            due: None,
            duration: None,
            immediate: false,
            customer_phone_type: false,
            customer_physical_type: false,
            status: String::new(),
            flagged: false,
            manually_handled: false,
            by_admin: false,
            admin_comments: None,
            session_time: None,
            created_at: now,
            updated_at: now,
        };
        job.apply_payload(payload, now);
        job
    }

    /// Overwrite every booking field with the payload's values.
    pub fn apply_payload(&mut self, payload: &BookingPayload, now: DateTime<Utc>) {
        self.user_id = payload.user_id;
        self.translator_id = payload.translator_id;
        self.from_language_id = payload.from_language_id;
        self.due = payload.due;
        self.duration = payload.duration;
        self.immediate = payload.immediate;
        self.customer_phone_type = payload.customer_phone_type;
        self.customer_physical_type = payload.customer_physical_type;
        self.status = payload.status_or_default().to_string();
        self.flagged = payload.flagged;
        self.manually_handled = payload.manually_handled;
        self.by_admin = payload.by_admin;
        self.admin_comments = payload.admin_comments.clone();
        self.session_time = payload.session_time.clone();
        self.updated_at = now;
    }

    pub fn involves(&self, user: UserId) -> bool {
        self.user_id == user || self.translator_id == Some(user)
    }
}

/// Validated create/update body for a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub user_id: UserId,
    #[serde(default)]
    pub translator_id: Option<UserId>,
    #[serde(default)]
    pub from_language_id: Option<i64>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub immediate: bool,
    #[serde(default)]
    pub customer_phone_type: bool,
    #[serde(default)]
    pub customer_physical_type: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub manually_handled: bool,
    #[serde(default)]
    pub by_admin: bool,
    #[serde(default)]
    pub admin_comments: Option<String>,
    #[serde(default)]
    pub session_time: Option<String>,
}

impl BookingPayload {
    pub fn status_or_default(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_JOB_STATUS)
    }
}

/// Query-string filter accepted by the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Which rows a listing query may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobScope {
    /// Jobs where the user is the customer or the assigned translator.
    Involving(UserId),
    All,
}

/// Fully shaped listing query handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub scope: JobScope,
    pub status: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl JobQuery {
    pub fn matches(&self, job: &Job) -> bool {
        let in_scope = match self.scope {
            JobScope::Involving(user) => job.involves(user),
            JobScope::All => true,
        };
        in_scope
            && self
                .status
                .as_deref()
                .is_none_or(|status| job.status == status)
    }
}
