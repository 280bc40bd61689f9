use std::{any::type_name_of_val, fmt, sync::Arc};

use tracing::{info, warn};

use crate::application::outcome::Outcome;
use crate::domain::{BookingPayload, Job, JobId};
use crate::ports::JobRepository;

/// Explicit result of a create/update write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleResult {
    Saved(Job),
    Failed { reason: String },
}

impl LifecycleResult {
    pub fn is_saved(&self) -> bool {
        matches!(self, LifecycleResult::Saved(_))
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            LifecycleResult::Saved(job) => Some(job),
            LifecycleResult::Failed { .. } => None,
        }
    }
}

/// Persists validated booking payloads.
///
/// Repository errors are part of the business result here: a write that could
/// not be completed is `Failed`, never a fault.
#[derive(Clone)]
pub struct BookingLifecycleService {
    jobs: Arc<dyn JobRepository>,
}

impl fmt::Debug for BookingLifecycleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingLifecycleService")
            .field("jobs", &type_name_of_val(self.jobs.as_ref()))
            .finish()
    }
}

impl BookingLifecycleService {
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self { jobs }
    }

    pub async fn create(&self, payload: &BookingPayload) -> Outcome<LifecycleResult> {
        let result = match self.jobs.insert_job(payload).await {
            Ok(job) => {
                info!(job_id = %job.id, user_id = %job.user_id, "booking created");
                LifecycleResult::Saved(job)
            }
            Err(err) => {
                warn!(user_id = %payload.user_id, error = %err, "failed to create booking");
                LifecycleResult::Failed {
                    reason: err.to_string(),
                }
            }
        };
        Outcome::Done(result)
    }

    pub async fn update(&self, raw_id: &str, payload: &BookingPayload) -> Outcome<LifecycleResult> {
        let Some(id) = JobId::parse(raw_id) else {
            return Outcome::Done(LifecycleResult::Failed {
                reason: format!("invalid job id {raw_id:?}"),
            });
        };

        let result = match self.jobs.update_job(id, payload).await {
            Ok(Some(job)) => {
                info!(job_id = %id, "booking updated");
                LifecycleResult::Saved(job)
            }
            Ok(None) => {
                warn!(job_id = %id, "update requested for missing booking");
                LifecycleResult::Failed {
                    reason: format!("job {id} does not exist"),
                }
            }
            Err(err) => {
                warn!(job_id = %id, error = %err, "failed to update booking");
                LifecycleResult::Failed {
                    reason: err.to_string(),
                }
            }
        };
        Outcome::Done(result)
    }
}
