//! Account directory trait — the narrow interface through which the
//! security core reaches the account/role persistence it does not own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fleetdesk_entity::account::{Account, SessionPointer};
use fleetdesk_entity::role::Role;

use crate::result::AppResult;

/// Account and role lookups plus session-pointer persistence.
///
/// Implemented by the PostgreSQL repository in production and by
/// in-memory fixtures in tests. Everything beyond these operations
/// (account CRUD, role management, soft deletion) is outside the
/// security core's scope.
#[async_trait]
pub trait AccountDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find an account by login name.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Find an account by primary key.
    async fn find_by_id(&self, account_id: i64) -> AppResult<Option<Account>>;

    /// Load the roles assigned to an account.
    async fn roles_for_account(&self, account_id: i64) -> AppResult<Vec<Role>>;

    /// Load the union of permission codes granted to the given roles.
    async fn permission_codes_for_roles(&self, role_ids: &[i64]) -> AppResult<Vec<String>>;

    /// Read the account's current session pointer.
    async fn session_pointer(&self, account_id: i64) -> AppResult<Option<SessionPointer>>;

    /// Overwrite the account's session pointer with a new login.
    async fn persist_session_pointer(
        &self,
        account_id: i64,
        origin: &str,
        token: &str,
    ) -> AppResult<()>;

    /// Clear the account's session pointer on logout.
    async fn clear_session_pointer(&self, account_id: i64) -> AppResult<()>;

    /// Record a successful login time.
    async fn touch_last_login(&self, account_id: i64, at: DateTime<Utc>) -> AppResult<()>;
}
