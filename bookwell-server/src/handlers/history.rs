use axum::{Extension, Json, extract::State};
use bookwell_core::domain::Caller;
use bookwell_core::i18n::ids;
use serde_json::Value;

use crate::envelope::{self, Shape};
use crate::infra::app_state::AppState;

const HISTORY: Shape = Shape::keyed("history").on_done(ids::HISTORY_FOUND);

/// History is always the authenticated caller's own.
pub async fn history_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Json<Value> {
    let outcome = state.services.history.get_history(&caller).await;
    Json(envelope::render(outcome, &HISTORY, state.catalog()))
}
