use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::domain::{
    AdminPatch, BookingPayload, Distance, HistoryEntry, Job, JobId, JobQuery, JobScope,
    TelemetryPatch, UserId,
};
use crate::error::{BookingError, Result};
use crate::ports::JobRepository;

const JOB_COLUMNS: &str = r#"
    id, user_id, translator_id, from_language_id, due, duration, immediate,
    customer_phone_type, customer_physical_type, status, flagged, manually_handled,
    by_admin, admin_comments, session_time, created_at, updated_at
"#;

#[derive(Debug, FromRow)]
struct JobRow {
    id: i64,
    user_id: i64,
    translator_id: Option<i64>,
    from_language_id: Option<i64>,
    due: Option<DateTime<Utc>>,
    duration: Option<i32>,
    immediate: bool,
    customer_phone_type: bool,
    customer_physical_type: bool,
    status: String,
    flagged: bool,
    manually_handled: bool,
    by_admin: bool,
    admin_comments: Option<String>,
    session_time: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = BookingError;

    fn try_from(row: JobRow) -> Result<Self> {
        let id = JobId::new(row.id)
            .ok_or_else(|| BookingError::Internal(format!("invalid job id in row: {}", row.id)))?;
        Ok(Job {
            id,
            user_id: UserId(row.user_id),
            translator_id: row.translator_id.map(UserId),
            from_language_id: row.from_language_id,
            due: row.due,
            duration: row.duration,
            immediate: row.immediate,
            customer_phone_type: row.customer_phone_type,
            customer_physical_type: row.customer_physical_type,
            status: row.status,
            flagged: row.flagged,
            manually_handled: row.manually_handled,
            by_admin: row.by_admin,
            admin_comments: row.admin_comments,
            session_time: row.session_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct DistanceRow {
    distance: Option<String>,
    time: Option<String>,
}

/// PostgreSQL-backed implementation of the `JobRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn insert_job(&self, payload: &BookingPayload) -> Result<Job> {
        let mut tx = self.pool().begin().await?;

        let sql = format!(
            r#"
            INSERT INTO jobs (
                user_id, translator_id, from_language_id, due, duration, immediate,
                customer_phone_type, customer_physical_type, status, flagged,
                manually_handled, by_admin, admin_comments, session_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {JOB_COLUMNS}
            "#
        );
        let row: JobRow = sqlx::query_as(&sql)
            .bind(payload.user_id.get())
            .bind(payload.translator_id.map(UserId::get))
            .bind(payload.from_language_id)
            .bind(payload.due)
            .bind(payload.duration)
            .bind(payload.immediate)
            .bind(payload.customer_phone_type)
            .bind(payload.customer_physical_type)
            .bind(payload.status_or_default())
            .bind(payload.flagged)
            .bind(payload.manually_handled)
            .bind(payload.by_admin)
            .bind(payload.admin_comments.as_deref())
            .bind(payload.session_time.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_foreign_key_violation() => BookingError::Conflict(
                    "Referenced customer or translator does not exist".to_string(),
                ),
                _ => BookingError::Database(e),
            })?;

        sqlx::query("INSERT INTO distances (job_id) VALUES ($1)")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let job = Job::try_from(row)?;
        info!(job_id = %job.id, "created job");
        Ok(job)
    }

    async fn update_job(&self, id: JobId, payload: &BookingPayload) -> Result<Option<Job>> {
        let sql = format!(
            r#"
            UPDATE jobs
            SET user_id = $2, translator_id = $3, from_language_id = $4, due = $5,
                duration = $6, immediate = $7, customer_phone_type = $8,
                customer_physical_type = $9, status = $10, flagged = $11,
                manually_handled = $12, by_admin = $13, admin_comments = $14,
                session_time = $15, updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        );
        let row: Option<JobRow> = sqlx::query_as(&sql)
            .bind(id.get())
            .bind(payload.user_id.get())
            .bind(payload.translator_id.map(UserId::get))
            .bind(payload.from_language_id)
            .bind(payload.due)
            .bind(payload.duration)
            .bind(payload.immediate)
            .bind(payload.customer_phone_type)
            .bind(payload.customer_physical_type)
            .bind(payload.status_or_default())
            .bind(payload.flagged)
            .bind(payload.manually_handled)
            .bind(payload.by_admin)
            .bind(payload.admin_comments.as_deref())
            .bind(payload.session_time.as_deref())
            .fetch_optional(self.pool())
            .await?;

        row.map(Job::try_from).transpose()
    }

    async fn find_job(&self, id: JobId) -> Result<Option<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let row: Option<JobRow> = sqlx::query_as(&sql)
            .bind(id.get())
            .fetch_optional(self.pool())
            .await?;

        row.map(Job::try_from).transpose()
    }

    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE TRUE"));

        if let JobScope::Involving(user) = query.scope {
            qb.push(" AND (user_id = ");
            qb.push_bind(user.get());
            qb.push(" OR translator_id = ");
            qb.push_bind(user.get());
            qb.push(")");
        }
        if let Some(status) = &query.status {
            qb.push(" AND status = ");
            qb.push_bind(status.clone());
        }
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(query.limit);
        qb.push(" OFFSET ");
        qb.push_bind(query.offset);

        let rows: Vec<JobRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await?;

        debug!(count = rows.len(), "listed jobs");
        rows.into_iter().map(Job::try_from).collect()
    }

    async fn find_distance(&self, job_id: JobId) -> Result<Option<Distance>> {
        let row: Option<DistanceRow> =
            sqlx::query_as("SELECT distance, time FROM distances WHERE job_id = $1")
                .bind(job_id.get())
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(|r| Distance {
            job_id,
            distance: r.distance,
            time: r.time,
        }))
    }

    async fn apply_telemetry(&self, job_id: JobId, patch: &TelemetryPatch) -> Result<u64> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE distances SET ");
        let mut set = qb.separated(", ");
        if let Some(distance) = &patch.distance {
            set.push("distance = ");
            set.push_bind_unseparated(distance.clone());
        }
        if let Some(time) = &patch.time {
            set.push("time = ");
            set.push_bind_unseparated(time.clone());
        }
        qb.push(" WHERE job_id = ");
        qb.push_bind(job_id.get());

        let result = qb
            .build()
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn apply_admin(&self, job_id: JobId, patch: &AdminPatch) -> Result<u64> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE jobs SET ");
        let mut set = qb.separated(", ");
        if let Some(comments) = &patch.admin_comments {
            set.push("admin_comments = ");
            set.push_bind_unseparated(comments.clone());
        }
        if let Some(flagged) = patch.flagged {
            set.push("flagged = ");
            set.push_bind_unseparated(flagged);
        }
        if let Some(session_time) = &patch.session_time {
            set.push("session_time = ");
            set.push_bind_unseparated(session_time.clone());
        }
        if let Some(manually_handled) = patch.manually_handled {
            set.push("manually_handled = ");
            set.push_bind_unseparated(manually_handled);
        }
        if let Some(by_admin) = patch.by_admin {
            set.push("by_admin = ");
            set.push_bind_unseparated(by_admin);
        }
        set.push("updated_at = NOW()");
        // Always scoped to one row.
        qb.push(" WHERE id = ");
        qb.push_bind(job_id.get());

        let result = qb
            .build()
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn history_for(&self, user: UserId, limit: i64) -> Result<Vec<HistoryEntry>> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE user_id = $1 OR translator_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#
        );
        let rows: Vec<JobRow> = sqlx::query_as(&sql)
            .bind(user.get())
            .bind(limit)
            .fetch_all(self.pool())
            .await?;

        let jobs = rows
            .into_iter()
            .map(Job::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(jobs
            .iter()
            .filter_map(|job| HistoryEntry::project(job, user))
            .collect())
    }
}
