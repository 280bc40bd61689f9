use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::postgres::{
    PostgresCallerDirectory, PostgresDatabase, PostgresJobRepository,
};
use crate::ports::{CallerDirectory, JobRepository, NotificationTransport};

/// Aggregates the collaborator ports used by the application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub jobs: Arc<dyn JobRepository>,
    pub callers: Arc<dyn CallerDirectory>,
    pub notifications: Arc<dyn NotificationTransport>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("jobs", &type_name_of_val(self.jobs.as_ref()))
            .field("callers", &type_name_of_val(self.callers.as_ref()))
            .field(
                "notifications",
                &type_name_of_val(self.notifications.as_ref()),
            )
            .finish()
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    jobs: Option<Arc<dyn JobRepository>>,
    callers: Option<Arc<dyn CallerDirectory>>,
    notifications: Option<Arc<dyn NotificationTransport>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("jobs", &self.jobs.is_some())
            .field("callers", &self.callers.is_some())
            .field("notifications", &self.notifications.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(mut self, repo: Arc<dyn JobRepository>) -> Self {
        self.jobs = Some(repo);
        self
    }

    pub fn with_callers(mut self, directory: Arc<dyn CallerDirectory>) -> Self {
        self.callers = Some(directory);
        self
    }

    pub fn with_notifications(mut self, transport: Arc<dyn NotificationTransport>) -> Self {
        self.notifications = Some(transport);
        self
    }

    /// Populate the builder with Postgres-backed adapters.
    pub fn with_postgres(mut self, db: &PostgresDatabase) -> Self {
        let pool = db.pool().clone();
        self.jobs = Some(Arc::new(PostgresJobRepository::new(pool.clone())));
        self.callers = Some(Arc::new(PostgresCallerDirectory::new(pool)));
        self
    }

    /// Populate the builder with one shared in-memory store.
    pub fn with_memory(mut self, store: Arc<InMemoryStore>) -> Self {
        self.jobs = Some(store.clone());
        self.callers = Some(store);
        self
    }

    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            jobs: self
                .jobs
                .ok_or_else(|| "missing JobRepository".to_string())?,
            callers: self
                .callers
                .ok_or_else(|| "missing CallerDirectory".to_string())?,
            notifications: self
                .notifications
                .ok_or_else(|| "missing NotificationTransport".to_string())?,
        })
    }
}
