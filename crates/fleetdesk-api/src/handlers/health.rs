//! Health check handler.

use axum::Json;
use axum::extract::State;

use fleetdesk_core::error::AppError;
use fleetdesk_core::traits::cache::CacheProvider;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let cache = match state.cache.health_check().await {
        Ok(true) => "ok",
        _ => "degraded",
    };

    let database = match &state.db {
        Some(db) => match db.health_check().await {
            Ok(true) => "ok",
            _ => "degraded",
        },
        None => "skipped",
    };

    let status = if cache == "ok" && database != "degraded" {
        "ok"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        cache: cache.to_string(),
    }))
}
