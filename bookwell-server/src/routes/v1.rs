use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::auth_middleware,
    handlers::{feed, history, jobs, notifications},
};

pub const JOBS: &str = "/jobs";
pub const JOB_ITEM: &str = "/jobs/{id}";
pub const HISTORY: &str = "/jobs/history";
pub const DISTANCE_FEED: &str = "/jobs/distance-feed";
pub const RESEND_PUSH: &str = "/jobs/resend-notifications";
pub const RESEND_SMS: &str = "/jobs/resend-sms-notifications";

/// Create all v1 API routes. Every route requires a bearer token.
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            JOBS,
            get(jobs::list_jobs_handler).post(jobs::create_job_handler),
        )
        .route(HISTORY, get(history::history_handler))
        .route(
            JOB_ITEM,
            get(jobs::get_job_handler).put(jobs::update_job_handler),
        )
        .route(DISTANCE_FEED, post(feed::distance_feed_handler))
        .route(RESEND_PUSH, post(notifications::resend_push_handler))
        .route(RESEND_SMS, post(notifications::resend_sms_handler))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
