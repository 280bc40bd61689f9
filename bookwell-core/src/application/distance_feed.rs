use std::{any::type_name_of_val, fmt, sync::Arc};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::application::outcome::Outcome;
use crate::domain::{AdminPatch, DistanceFeed, JobId, TelemetryPatch};
use crate::error::Result;
use crate::ports::JobRepository;

/// Rows written per update group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AffectedCounts {
    pub telemetry: u64,
    pub administrative: u64,
}

impl AffectedCounts {
    pub fn total(&self) -> u64 {
        self.telemetry + self.administrative
    }
}

/// Merges present-only feed fields into a job and its distance record.
#[derive(Clone)]
pub struct DistanceFeedService {
    jobs: Arc<dyn JobRepository>,
}

impl fmt::Debug for DistanceFeedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceFeedService")
            .field("jobs", &type_name_of_val(self.jobs.as_ref()))
            .finish()
    }
}

impl DistanceFeedService {
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self { jobs }
    }

    pub async fn apply_feed(&self, feed: &DistanceFeed) -> Outcome<AffectedCounts> {
        let Some(job_id) = JobId::new(feed.jobid) else {
            return Outcome::NotFound;
        };

        let telemetry = feed.telemetry_patch();
        let admin = feed.admin_patch();

        // The groups write disjoint rows, so they can run side by side.
        let result = tokio::try_join!(
            self.apply_telemetry(job_id, &telemetry),
            self.apply_admin(job_id, &admin),
        );

        match result {
            Ok((telemetry, administrative)) => {
                let counts = AffectedCounts {
                    telemetry,
                    administrative,
                };
                info!(
                    job_id = %job_id,
                    telemetry_rows = counts.telemetry,
                    admin_rows = counts.administrative,
                    "distance feed applied"
                );
                Outcome::Done(counts)
            }
            Err(err) => {
                error!(job_id = %job_id, error = %err, "distance feed failed");
                Outcome::fault(err)
            }
        }
    }

    async fn apply_telemetry(&self, job_id: JobId, patch: &TelemetryPatch) -> Result<u64> {
        if patch.is_empty() {
            debug!(job_id = %job_id, "no telemetry fields present");
            return Ok(0);
        }
        self.jobs.apply_telemetry(job_id, patch).await
    }

    async fn apply_admin(&self, job_id: JobId, patch: &AdminPatch) -> Result<u64> {
        if patch.is_empty() {
            debug!(job_id = %job_id, "no administrative fields present");
            return Ok(0);
        }
        self.jobs.apply_admin(job_id, patch).await
    }
}
