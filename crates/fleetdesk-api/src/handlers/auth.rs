//! Auth handlers — login, forced login, logout, refresh, permissions.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::Validate;

use fleetdesk_auth::session::LoginOutcome;
use fleetdesk_core::error::{AppError, ErrorKind};

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{
    AccountResponse, ApiResponse, ConflictResponse, LoginResponse, MenuResponse, MessageResponse,
    PermissionsResponse, RoleResponse, TokenResponse,
};
use crate::extractors::{AuthSession, ClientOrigin};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: State<AppState>,
    origin: ClientOrigin,
    req: Json<LoginRequest>,
) -> Result<Response, AppError> {
    login_inner(state, origin, req, false).await
}

/// POST /api/auth/login/force
pub async fn login_force(
    state: State<AppState>,
    origin: ClientOrigin,
    req: Json<LoginRequest>,
) -> Result<Response, AppError> {
    login_inner(state, origin, req, true).await
}

async fn login_inner(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    Json(req): Json<LoginRequest>,
    force: bool,
) -> Result<Response, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let outcome = state
        .session_manager
        .login(&req.username, &req.password, &origin, force)
        .await?;

    match outcome {
        LoginOutcome::Success(result) => {
            let body = LoginResponse {
                tokens: TokenResponse {
                    access_token: result.tokens.access_token,
                    refresh_token: result.tokens.refresh_token,
                    access_expires_at: result.tokens.access_expires_at,
                    refresh_expires_at: result.tokens.refresh_expires_at,
                    expires_in_seconds: result.tokens.expires_in_seconds,
                },
                account: AccountResponse::from_account(&result.account, &result.role_codes),
            };
            Ok(Json(ApiResponse::ok(body)).into_response())
        }
        LoginOutcome::Conflict { conflicting_origin } => Ok((
            StatusCode::CONFLICT,
            Json(ConflictResponse::new(conflicting_origin)),
        )
            .into_response()),
    }
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.session_manager.logout(&auth.0).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// POST /api/auth/token/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    let tokens = state.session_manager.refresh(&req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        access_expires_at: tokens.access_expires_at,
        refresh_expires_at: tokens.refresh_expires_at,
        expires_in_seconds: tokens.expires_in_seconds,
    })))
}

/// GET /api/auth/permissions
pub async fn permissions(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<ApiResponse<PermissionsResponse>>, AppError> {
    let resolved = state
        .permission_resolver
        .resolve(auth.sub)
        .await
        .map_err(|e| {
            // A valid token for a vanished account is an authentication
            // anomaly, not a routine 404.
            if e.kind == ErrorKind::NotFound {
                AppError::unauthorized("Account no longer exists")
            } else {
                e
            }
        })?;

    let mut permissions: Vec<String> = resolved.permission_codes.iter().cloned().collect();
    permissions.sort();

    Ok(Json(ApiResponse::ok(PermissionsResponse {
        has_role: resolved.has_role,
        roles: resolved.roles.iter().map(RoleResponse::from).collect(),
        permissions,
        menus: resolved
            .accessible_menus
            .iter()
            .copied()
            .map(MenuResponse::from)
            .collect(),
    })))
}
