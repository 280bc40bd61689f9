use axum::{Extension, Json, extract::State};
use bookwell_core::domain::{Caller, Channel};
use bookwell_core::i18n::ids;
use serde::Deserialize;
use serde_json::Value;

use crate::envelope::{self, Shape};
use crate::extract::ApiJson;
use crate::infra::app_state::AppState;

const RESEND: Shape = Shape::keyed("success")
    .on_not_found(ids::JOB_NOT_FOUND)
    .on_empty(ids::NO_TRANSLATOR);

#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    pub jobid: i64,
}

pub async fn resend_push_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(request): ApiJson<ResendRequest>,
) -> Json<Value> {
    resend(&state, &caller, request.jobid, Channel::Push).await
}

pub async fn resend_sms_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(request): ApiJson<ResendRequest>,
) -> Json<Value> {
    resend(&state, &caller, request.jobid, Channel::Sms).await
}

async fn resend(state: &AppState, caller: &Caller, job_id: i64, channel: Channel) -> Json<Value> {
    let outcome = state
        .services
        .dispatcher
        .dispatch(caller, job_id, channel)
        .await
        .map(|ack| ack.text());
    Json(envelope::render(outcome, &RESEND, state.catalog()))
}
