use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};

use crate::infra::{app_state::AppState, errors::AppError};

/// Resolve the bearer token into a `Caller` stored in request extensions.
/// Missing or unknown tokens are rejected before any handler runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

    let record = state
        .unit_of_work
        .callers
        .caller_for_token(token)
        .await
        .map_err(|err| {
            error!(error = %err, "caller lookup failed");
            AppError::from(err)
        })?;

    let Some(record) = record else {
        debug!("rejected unknown bearer token");
        return Err(AppError::unauthorized("Invalid or expired token"));
    };

    let caller = record.into_caller(state.roles());
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Option<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
