use chrono::{DateTime, Utc};
use serde::Serialize;

use super::caller::UserId;
use super::job::{Job, JobId};

/// How the caller is attached to a job in their history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Customer,
    Translator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub job_id: JobId,
    pub relation: Relation,
    pub status: String,
    pub due: Option<DateTime<Utc>>,
    pub session_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Project a job from the point of view of `user`. Returns `None` when the
    /// user is not involved in the job.
    pub fn project(job: &Job, user: UserId) -> Option<Self> {
        let relation = if job.user_id == user {
            Relation::Customer
        } else if job.translator_id == Some(user) {
            Relation::Translator
        } else {
            return None;
        };

        Some(Self {
            job_id: job.id,
            relation,
            status: job.status.clone(),
            due: job.due,
            session_time: job.session_time.clone(),
            created_at: job.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub user_id: UserId,
    pub entries: Vec<HistoryEntry>,
}
