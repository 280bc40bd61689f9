use std::{any::type_name_of_val, fmt, sync::Arc};

use tracing::error;

use crate::application::outcome::Outcome;
use crate::domain::{Caller, HistoryView};
use crate::ports::JobRepository;

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Caller-scoped history. There is deliberately no way to ask for another
/// user's history through this service.
#[derive(Clone)]
pub struct HistoryService {
    jobs: Arc<dyn JobRepository>,
    limit: i64,
}

impl fmt::Debug for HistoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryService")
            .field("jobs", &type_name_of_val(self.jobs.as_ref()))
            .field("limit", &self.limit)
            .finish()
    }
}

impl HistoryService {
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self {
            jobs,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub async fn get_history(&self, caller: &Caller) -> Outcome<HistoryView> {
        match self.jobs.history_for(caller.id, self.limit).await {
            Ok(entries) => Outcome::Done(HistoryView {
                user_id: caller.id,
                entries,
            }),
            Err(err) => {
                error!(caller_id = %caller.id, error = %err, "history lookup failed");
                Outcome::fault(err)
            }
        }
    }
}
