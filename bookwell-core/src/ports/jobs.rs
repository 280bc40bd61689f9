use async_trait::async_trait;

use crate::domain::{
    AdminPatch, BookingPayload, Distance, HistoryEntry, Job, JobId, JobQuery, TelemetryPatch,
    UserId,
};
use crate::error::Result;

// Job and distance persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a job together with its empty distance record.
    async fn insert_job(&self, payload: &BookingPayload) -> Result<Job>;
    /// Overwrite a job's booking fields. `None` when the job does not exist.
    async fn update_job(&self, id: JobId, payload: &BookingPayload) -> Result<Option<Job>>;
    async fn find_job(&self, id: JobId) -> Result<Option<Job>>;
    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>>;

    async fn find_distance(&self, job_id: JobId) -> Result<Option<Distance>>;
    /// Write the present telemetry columns on the job's distance record.
    /// Returns the number of rows touched.
    async fn apply_telemetry(&self, job_id: JobId, patch: &TelemetryPatch) -> Result<u64>;
    /// Write the present administrative columns on exactly one job.
    /// Returns the number of rows touched.
    async fn apply_admin(&self, job_id: JobId, patch: &AdminPatch) -> Result<u64>;

    async fn history_for(&self, user: UserId, limit: i64) -> Result<Vec<HistoryEntry>>;
}
