use axum::{Extension, Json, extract::State};
use bookwell_core::domain::{Caller, DistanceFeed};
use bookwell_core::i18n::ids;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{self, Shape};
use crate::extract::ApiJson;
use crate::infra::{app_state::AppState, errors::AppResult};
use crate::validation::validate_feed;

const FEED: Shape = Shape::bare()
    .on_done(ids::FEED_UPDATED)
    .on_not_found(ids::JOB_NOT_FOUND);

pub async fn distance_feed_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(feed): ApiJson<DistanceFeed>,
) -> AppResult<Json<Value>> {
    validate_feed(&feed)?;
    debug!(caller_id = %caller.id, job_id = feed.jobid, "applying distance feed");
    let outcome = state.services.feed.apply_feed(&feed).await;
    Ok(Json(envelope::render(outcome, &FEED, state.catalog())))
}
