use axum::{
    Extension, Json,
    extract::{Path, State},
};
use bookwell_core::domain::{BookingPayload, Caller};
use bookwell_core::i18n::ids;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{self, Shape};
use crate::extract::{ApiJson, ApiQuery};
use crate::infra::{app_state::AppState, errors::AppResult};
use crate::validation::{ListingParams, parse_listing, validate_booking};

const LIST: Shape = Shape::keyed("results");
const SHOW: Shape = Shape::keyed("job")
    .on_done(ids::JOB_FOUND)
    .on_not_found(ids::JOB_NOT_FOUND);
const STORE: Shape = Shape::keyed("booking")
    .on_done(ids::BOOKING_SAVED)
    .on_empty(ids::BOOKING_SAVE_FAILED);
const UPDATE: Shape = Shape::keyed("booking")
    .on_done(ids::BOOKING_UPDATED)
    .on_empty(ids::BOOKING_UPDATE_FAILED);

pub async fn list_jobs_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiQuery(params): ApiQuery<ListingParams>,
) -> AppResult<Json<Value>> {
    let filter = parse_listing(&params, &caller)?;
    debug!(caller_id = %caller.id, ?filter, "listing jobs");
    let outcome = state.services.access.list_jobs(&caller, &filter).await;
    Ok(Json(envelope::render(outcome, &LIST, state.catalog())))
}

/// The id is taken as a raw path segment; parsing happens in the service.
pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Value> {
    let outcome = state.services.access.get_job(&id).await;
    Json(envelope::render(outcome, &SHOW, state.catalog()))
}

pub async fn create_job_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(payload): ApiJson<BookingPayload>,
) -> AppResult<Json<Value>> {
    validate_booking(&payload)?;
    debug!(caller_id = %caller.id, "creating booking");
    let outcome = state.services.lifecycle.create(&payload).await;
    Ok(Json(envelope::render_lifecycle(outcome, &STORE, state.catalog())))
}

pub async fn update_job_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BookingPayload>,
) -> AppResult<Json<Value>> {
    validate_booking(&payload)?;
    debug!(caller_id = %caller.id, job_id = %id, "updating booking");
    let outcome = state.services.lifecycle.update(&id, &payload).await;
    Ok(Json(envelope::render_lifecycle(outcome, &UPDATE, state.catalog())))
}
