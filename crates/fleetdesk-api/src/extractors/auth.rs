//! `AuthSession` extractor — pulls the bearer token from the
//! Authorization header, validates it, and injects the claims.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use fleetdesk_auth::token::Claims;
use fleetdesk_core::error::AppError;

use crate::state::AppState;

/// Validated access-token claims available in handlers.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Claims);

impl std::ops::Deref for AuthSession {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let claims = state.token_decoder.verify_access(token).await?;

        Ok(AuthSession(claims))
    }
}
