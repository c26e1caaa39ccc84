//! Claims payload embedded in access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fleetdesk_entity::role::ADMIN_ROLE_CODE;

/// Claims payload carried by every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the account ID.
    pub sub: i64,
    /// Display name at the time of issuance.
    pub name: String,
    /// Role-code snapshot at the time of issuance.
    pub roles: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID for revocation tracking.
    pub jti: Uuid,
    /// Token kind: "access" or "refresh".
    pub kind: TokenKind,
}

/// Distinguishes access tokens from refresh tokens so the two can never
/// be cross-used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived access token for API requests.
    Access,
    /// Long-lived refresh token exchanged for a new pair.
    Refresh,
}

impl Claims {
    /// Returns the account ID from the subject claim.
    pub fn account_id(&self) -> i64 {
        self.sub
    }

    /// Whether the role snapshot includes the administrator role.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|code| code == ADMIN_ROLE_CODE)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Returns the remaining TTL in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}
