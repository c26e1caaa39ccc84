//! Role entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reserved role code with universal access.
///
/// Role management (external to this core) must refuse to rename or
/// delete roles carrying this code; permission resolution relies on the
/// code-equality contract.
pub const ADMIN_ROLE_CODE: &str = "admin";

/// A named role grouping a set of permission codes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: i64,
    /// Stable role code (e.g. `"admin"`, `"dispatcher"`).
    pub code: String,
    /// Display name.
    pub name: String,
    /// System-protected roles cannot be renamed or deleted.
    pub protected: bool,
}

impl Role {
    /// Whether this role carries the reserved administrator code.
    pub fn is_admin(&self) -> bool {
        self.code == ADMIN_ROLE_CODE
    }
}
