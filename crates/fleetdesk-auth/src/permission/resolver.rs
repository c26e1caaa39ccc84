//! Role-to-permission resolution with the administrator override.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::error;

use fleetdesk_core::error::AppError;
use fleetdesk_core::traits::directory::AccountDirectory;
use fleetdesk_entity::permission::Permission;
use fleetdesk_entity::role::Role;

use super::catalog;

/// The resolved permission view for one account.
#[derive(Debug, Clone)]
pub struct ResolvedPermissions {
    /// Whether the account holds any role at all.
    pub has_role: bool,
    /// The account's roles.
    pub roles: Vec<Role>,
    /// Union of granted permission codes (the full catalog for admins).
    pub permission_codes: HashSet<String>,
    /// Accessible menu entries in display order.
    pub accessible_menus: Vec<&'static Permission>,
    /// Whether the administrator override applies.
    pub is_admin: bool,
}

impl ResolvedPermissions {
    /// Whether the account may open the given display path.
    ///
    /// The home path is accessible unconditionally; administrators
    /// bypass the grant check entirely.
    pub fn can_access_path(&self, path: &str) -> bool {
        if path == catalog::HOME_PATH {
            return true;
        }
        if self.is_admin {
            return true;
        }
        catalog::menu_for_path(path)
            .is_some_and(|menu| self.permission_codes.contains(menu.code))
    }

    /// Whether the account may perform the given action.
    pub fn can_perform_action(&self, action_code: &str) -> bool {
        self.is_admin || self.permission_codes.contains(action_code)
    }
}

/// Resolves an account's roles into its permission view.
#[derive(Clone)]
pub struct PermissionResolver {
    /// Role and grant persistence.
    directory: Arc<dyn AccountDirectory>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a new resolver.
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self { directory }
    }

    /// Resolves the full permission view for an account.
    ///
    /// An unknown account is an authentication-layer anomaly and fails
    /// with `NotFound`, never a silent empty-permission result.
    pub async fn resolve(&self, account_id: i64) -> Result<ResolvedPermissions, AppError> {
        if self.directory.find_by_id(account_id).await?.is_none() {
            error!(account_id, "Permission resolution for unknown account");
            return Err(AppError::not_found(format!(
                "Account {account_id} not found"
            )));
        }

        let roles = self.directory.roles_for_account(account_id).await?;
        let has_role = !roles.is_empty();
        let is_admin = roles.iter().any(Role::is_admin);

        let (permission_codes, accessible_menus) = if is_admin {
            // Explicit override: the whole catalog, every menu.
            let codes = catalog::all()
                .iter()
                .map(|p| p.code.to_string())
                .collect::<HashSet<String>>();
            (codes, catalog::menus())
        } else {
            let role_ids: Vec<i64> = roles.iter().map(|r| r.id).collect();
            let codes: HashSet<String> = self
                .directory
                .permission_codes_for_roles(&role_ids)
                .await?
                .into_iter()
                .collect();

            let menus = catalog::menus()
                .into_iter()
                .filter(|m| m.code == catalog::HOME_MENU_CODE || codes.contains(m.code))
                .collect();
            (codes, menus)
        };

        Ok(ResolvedPermissions {
            has_role,
            roles,
            permission_codes,
            accessible_menus,
            is_admin,
        })
    }

    /// Resolves and answers a path-access question in one call.
    pub async fn can_access_path(&self, account_id: i64, path: &str) -> Result<bool, AppError> {
        Ok(self.resolve(account_id).await?.can_access_path(path))
    }

    /// Resolves and answers an action question in one call.
    pub async fn can_perform_action(
        &self,
        account_id: i64,
        action_code: &str,
    ) -> Result<bool, AppError> {
        Ok(self
            .resolve(account_id)
            .await?
            .can_perform_action(action_code))
    }
}
