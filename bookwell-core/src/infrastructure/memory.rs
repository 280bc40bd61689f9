use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    AdminPatch, BookingPayload, CallerRecord, Distance, HistoryEntry, Job, JobId, JobQuery,
    TelemetryPatch, UserId,
};
use crate::error::{BookingError, Result};
use crate::ports::callers::hash_token;
use crate::ports::{CallerDirectory, JobRepository};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    jobs: BTreeMap<JobId, Job>,
    distances: HashMap<JobId, Distance>,
    tokens: HashMap<String, CallerRecord>,
}

/// Process-local store used by `--in-memory` runs and by tests.
///
/// Behaves like the Postgres adapter: one distance row per job created with the
/// job, sparse patches touch only the targeted row, and every mutating call is
/// counted in [`InMemoryStore::writes`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bearer token for a user.
    pub async fn register_token(&self, token: &str, user_id: UserId, user_type: i32) {
        let mut tables = self.tables.write().await;
        tables
            .tokens
            .insert(hash_token(token), CallerRecord { user_id, user_type });
    }

    /// Number of mutating repository calls that changed at least one row.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn distance_count(&self, job_id: JobId) -> usize {
        let tables = self.tables.read().await;
        usize::from(tables.distances.contains_key(&job_id))
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn insert_job(&self, payload: &BookingPayload) -> Result<Job> {
        let mut tables = self.tables.write().await;
        tables.next_id += 1;
        let id = JobId::new(tables.next_id)
            .ok_or_else(|| BookingError::Internal("job id sequence overflowed".into()))?;

        let job = Job::from_payload(id, payload, Utc::now());
        tables.jobs.insert(id, job.clone());
        tables.distances.insert(id, Distance::empty(id));
        self.record_write();

        debug!(job_id = %id, "inserted job in memory");
        Ok(job)
    }

    async fn update_job(&self, id: JobId, payload: &BookingPayload) -> Result<Option<Job>> {
        let mut tables = self.tables.write().await;
        let Some(job) = tables.jobs.get_mut(&id) else {
            return Ok(None);
        };
        job.apply_payload(payload, Utc::now());
        let updated = job.clone();
        self.record_write();
        Ok(Some(updated))
    }

    async fn find_job(&self, id: JobId) -> Result<Option<Job>> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        // Newest first, matching the SQL adapter's ORDER BY created_at DESC, id DESC.
        Ok(tables
            .jobs
            .values()
            .rev()
            .filter(|job| query.matches(job))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_distance(&self, job_id: JobId) -> Result<Option<Distance>> {
        Ok(self.tables.read().await.distances.get(&job_id).cloned())
    }

    async fn apply_telemetry(&self, job_id: JobId, patch: &TelemetryPatch) -> Result<u64> {
        if patch.is_empty() {
            return Ok(0);
        }
        let mut tables = self.tables.write().await;
        let Some(record) = tables.distances.get_mut(&job_id) else {
            return Ok(0);
        };
        patch.apply_to(record);
        self.record_write();
        Ok(1)
    }

    async fn apply_admin(&self, job_id: JobId, patch: &AdminPatch) -> Result<u64> {
        if patch.is_empty() {
            return Ok(0);
        }
        let mut tables = self.tables.write().await;
        let Some(job) = tables.jobs.get_mut(&job_id) else {
            return Ok(0);
        };
        patch.apply_to(job);
        job.updated_at = Utc::now();
        self.record_write();
        Ok(1)
    }

    async fn history_for(&self, user: UserId, limit: i64) -> Result<Vec<HistoryEntry>> {
        let tables = self.tables.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(tables
            .jobs
            .values()
            .rev()
            .filter_map(|job| HistoryEntry::project(job, user))
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl CallerDirectory for InMemoryStore {
    async fn caller_for_token(&self, token: &str) -> Result<Option<CallerRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.get(&hash_token(token)).copied())
    }
}
