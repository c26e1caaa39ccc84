//! Handlers for the signed driver surface.
//!
//! Requests reaching these handlers have already passed signature
//! verification; the middleware injects the verified identity.

use axum::Extension;
use axum::Json;
use axum::extract::State;
use serde_json::Value;
use tracing::info;

use fleetdesk_core::error::AppError;

use crate::dto::response::{ApiResponse, DriverProfileResponse, MessageResponse};
use crate::middleware::DriverIdentity;
use crate::state::AppState;

/// GET /api/driver/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(driver): Extension<DriverIdentity>,
) -> Result<Json<ApiResponse<DriverProfileResponse>>, AppError> {
    let account = state
        .directory
        .find_by_id(driver.account_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

    Ok(Json(ApiResponse::ok(DriverProfileResponse {
        id: account.id,
        username: account.username,
        display_name: account.display_name,
        status: account.status.to_string(),
    })))
}

/// POST /api/driver/location
pub async fn report_location(
    Extension(driver): Extension<DriverIdentity>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let lat = coordinate(&body, "lat");
    let lng = coordinate(&body, "lng");

    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(AppError::validation("lat and lng are required"));
    };

    info!(
        account_id = driver.account_id,
        %lat, %lng, "Driver location reported"
    );

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Location recorded".to_string(),
    })))
}

/// Reads a coordinate that clients send either as a string or a bare
/// number; both forms canonicalize identically for signing.
fn coordinate(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
