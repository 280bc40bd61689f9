use std::{any::type_name_of_val, fmt, sync::Arc};

use tracing::{debug, error};

use crate::application::authorization::{ListingPolicy, select_listing};
use crate::application::outcome::Outcome;
use crate::domain::{Caller, Job, JobFilter, JobId};
use crate::ports::JobRepository;

/// Single-job lookup and authorized listing.
#[derive(Clone)]
pub struct JobAccessService {
    jobs: Arc<dyn JobRepository>,
    policy: ListingPolicy,
}

impl fmt::Debug for JobAccessService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobAccessService")
            .field("jobs", &type_name_of_val(self.jobs.as_ref()))
            .field("policy", &self.policy)
            .finish()
    }
}

impl JobAccessService {
    pub fn new(jobs: Arc<dyn JobRepository>, policy: ListingPolicy) -> Self {
        Self { jobs, policy }
    }

    /// Look up a job by an untrusted id. Malformed ids are reported as
    /// not found without touching the repository.
    pub async fn get_job(&self, raw_id: &str) -> Outcome<Job> {
        let Some(id) = JobId::parse(raw_id) else {
            debug!(raw_id, "rejected malformed job id");
            return Outcome::NotFound;
        };

        let outcome = Outcome::from_lookup(self.jobs.find_job(id).await);
        if let Outcome::Fault(message) = &outcome {
            error!(job_id = %id, error = %message, "job lookup failed");
        }
        outcome
    }

    /// List the jobs the caller is permitted to see.
    pub async fn list_jobs(&self, caller: &Caller, filter: &JobFilter) -> Outcome<Vec<Job>> {
        let scope = select_listing(caller, filter, &self.policy);
        let Some(query) = scope.into_query(filter, &self.policy) else {
            debug!(caller_id = %caller.id, "listing produced no result");
            return Outcome::Empty;
        };

        match self.jobs.list_jobs(&query).await {
            Ok(jobs) => Outcome::Done(jobs),
            Err(err) => {
                error!(caller_id = %caller.id, error = %err, "job listing failed");
                Outcome::fault(err)
            }
        }
    }
}
