//! Route definitions for the Fleetdesk HTTP API.
//!
//! All routes are mounted under `/api`. The backoffice surface uses
//! bearer tokens; the driver surface uses signed requests and never
//! touches the token path.

use axum::{
    Router,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use fleetdesk_core::config::app::CorsConfig;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(driver_routes(state.clone()))
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, forced login, logout, refresh, permissions.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/login/force", post(handlers::auth::login_force))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/token/refresh", post(handlers::auth::refresh))
        .route("/auth/permissions", get(handlers::auth::permissions))
}

/// Signed driver endpoints, gated by signature verification.
fn driver_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/driver/profile", get(handlers::driver::profile))
        .route("/driver/location", post(handlers::driver::report_location))
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::signature::verify_signature,
        ))
}

/// Liveness endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
