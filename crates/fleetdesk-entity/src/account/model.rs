//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::AccountStatus;

/// A backoffice account protected by the session subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Argon2 credential hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Account status.
    pub status: AccountStatus,
    /// Origin address of the currently valid login, if any.
    pub session_origin: Option<String>,
    /// Access token of the currently valid login, if any.
    pub session_token: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Returns the current session pointer, if a session is recorded.
    ///
    /// Both columns are written together; a row with only one of them set
    /// is treated as having no session.
    pub fn session_pointer(&self) -> Option<SessionPointer> {
        match (&self.session_origin, &self.session_token) {
            (Some(origin), Some(token)) => Some(SessionPointer {
                origin: origin.clone(),
                token: token.clone(),
            }),
            _ => None,
        }
    }

    /// Display name, falling back to the username.
    pub fn display_name_or_username(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// The single currently-valid login recorded for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPointer {
    /// Network origin (source IP) the session was started from.
    pub origin: String,
    /// Access token issued to that session.
    pub token: String,
}
