//! HTTP surface for bookwell.
//!
//! Requests under `/api/v1/jobs` are authenticated by [`auth::auth_middleware`],
//! validated in [`validation`], handed to the core services held by
//! [`AppState`], and answered through [`envelope`].

pub mod auth;
pub mod envelope;
pub mod extract;
pub mod handlers;
pub mod infra;
pub mod routes;
pub mod validation;

use axum::{Router, http::HeaderValue, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use infra::app_state::AppState;

/// Build the CORS layer. An empty list or `*` allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .merge(routes::create_api_router(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
