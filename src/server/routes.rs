//! Router composition

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// One route per generation endpoint plus `/health`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/generate-leap-of-faith",
            post(handlers::leap_of_faith).options(handlers::preflight),
        )
        .route(
            "/generate-mom-test",
            post(handlers::mom_test).options(handlers::preflight),
        )
        .route(
            "/generate-business-image",
            post(handlers::business_image).options(handlers::preflight),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
