use serde::{Deserialize, Deserializer, Serialize};

use super::job::JobId;

/// Telemetry record attached one-to-one to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distance {
    pub job_id: JobId,
    pub distance: Option<String>,
    pub time: Option<String>,
}

impl Distance {
    pub fn empty(job_id: JobId) -> Self {
        Self {
            job_id,
            distance: None,
            time: None,
        }
    }
}

/// Inbound "distance feed" body.
///
/// Every field except `jobid` is optional and a `null` value counts as absent.
/// The wire names (`admincomment`, `session`) are kept as clients send them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DistanceFeed {
    pub jobid: i64,
    #[serde(default, deserialize_with = "measurement")]
    pub distance: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub time: Option<String>,
    #[serde(default)]
    pub admincomment: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub flagged: Option<bool>,
    #[serde(default)]
    pub manually_handled: Option<bool>,
    #[serde(default)]
    pub by_admin: Option<bool>,
}

/// Telemetry values arrive as text or bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Measurement {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

/// Normalizes a string or numeric measurement to the stored text form.
fn measurement<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Measurement>::deserialize(deserializer)?.map(|value| match value {
            Measurement::Text(text) => text,
            Measurement::Integer(n) => n.to_string(),
            Measurement::Decimal(n) => n.to_string(),
        }),
    )
}

impl DistanceFeed {
    pub fn telemetry_patch(&self) -> TelemetryPatch {
        TelemetryPatch {
            distance: self.distance.clone(),
            time: self.time.clone(),
        }
    }

    pub fn admin_patch(&self) -> AdminPatch {
        AdminPatch {
            admin_comments: self.admincomment.clone(),
            flagged: self.flagged,
            session_time: self.session.clone(),
            manually_handled: self.manually_handled,
            by_admin: self.by_admin,
        }
    }
}

/// Present-only changes to a [`Distance`] row. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryPatch {
    pub distance: Option<String>,
    pub time: Option<String>,
}

impl TelemetryPatch {
    pub fn is_empty(&self) -> bool {
        self.distance.is_none() && self.time.is_none()
    }

    pub fn apply_to(&self, record: &mut Distance) {
        if let Some(distance) = &self.distance {
            record.distance = Some(distance.clone());
        }
        if let Some(time) = &self.time {
            record.time = Some(time.clone());
        }
    }
}

/// Present-only changes to the administrative columns of a single job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPatch {
    pub admin_comments: Option<String>,
    pub flagged: Option<bool>,
    pub session_time: Option<String>,
    pub manually_handled: Option<bool>,
    pub by_admin: Option<bool>,
}

impl AdminPatch {
    pub fn is_empty(&self) -> bool {
        self.admin_comments.is_none()
            && self.flagged.is_none()
            && self.session_time.is_none()
            && self.manually_handled.is_none()
            && self.by_admin.is_none()
    }

    pub fn apply_to(&self, job: &mut super::job::Job) {
        if let Some(comments) = &self.admin_comments {
            job.admin_comments = Some(comments.clone());
        }
        if let Some(flagged) = self.flagged {
            job.flagged = flagged;
        }
        if let Some(session_time) = &self.session_time {
            job.session_time = Some(session_time.clone());
        }
        if let Some(manually_handled) = self.manually_handled {
            job.manually_handled = manually_handled;
        }
        if let Some(by_admin) = self.by_admin {
            job.by_admin = by_admin;
        }
    }
}
