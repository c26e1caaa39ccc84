//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetdesk_entity::account::Account;
use fleetdesk_entity::permission::Permission;
use fleetdesk_entity::role::Role;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Issued token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// Seconds until the access token expires.
    pub expires_in_seconds: i64,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenResponse,
    /// The authenticated account.
    pub account: AccountResponse,
}

/// Account summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Status.
    pub status: String,
    /// Assigned role codes.
    pub roles: Vec<String>,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl AccountResponse {
    /// Builds the response view of an account with its role codes.
    pub fn from_account(account: &Account, role_codes: &[String]) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            display_name: account.display_name.clone(),
            status: account.status.to_string(),
            roles: role_codes.to_vec(),
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        }
    }
}

/// Conflict response for a login blocked by an active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Origin address of the session blocking this login.
    pub conflicting_origin: String,
}

impl ConflictResponse {
    /// Builds the standard session-conflict body.
    pub fn new(conflicting_origin: String) -> Self {
        Self {
            error: "SESSION_CONFLICT".to_string(),
            message: format!(
                "An active session exists from {conflicting_origin}. \
                 Use forced login to take over."
            ),
            conflicting_origin,
        }
    }
}

/// Resolved permission view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsResponse {
    /// Whether the account holds any role.
    pub has_role: bool,
    /// Assigned roles.
    pub roles: Vec<RoleResponse>,
    /// Granted permission codes.
    pub permissions: Vec<String>,
    /// Accessible menus in display order.
    pub menus: Vec<MenuResponse>,
}

/// Role summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    /// Role ID.
    pub id: i64,
    /// Role code.
    pub code: String,
    /// Display name.
    pub name: String,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            code: role.code.clone(),
            name: role.name.clone(),
        }
    }
}

/// Menu entry for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResponse {
    /// Permission code.
    pub code: String,
    /// Display path.
    pub path: String,
    /// Display title.
    pub title: String,
    /// Navigation order.
    pub display_order: u32,
}

impl From<&'static Permission> for MenuResponse {
    fn from(menu: &'static Permission) -> Self {
        Self {
            code: menu.code.to_string(),
            path: menu.path.unwrap_or_default().to_string(),
            title: menu.title.to_string(),
            display_order: menu.display_order,
        }
    }
}

/// Driver profile as seen through the signed surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverProfileResponse {
    /// Account ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Status.
    pub status: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Database status.
    pub database: String,
    /// Cache status.
    pub cache: String,
}
