//! Login, logout, and refresh token flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use fleetdesk_core::error::AppError;
use fleetdesk_core::traits::directory::AccountDirectory;
use fleetdesk_entity::account::Account;

use crate::password::PasswordHasher;
use crate::token::encoder::TokenPair;
use crate::token::{Claims, TokenDecoder, TokenEncoder};

use super::conflict::SessionConflictService;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Issued token pair.
    pub tokens: TokenPair,
    /// The authenticated account.
    pub account: Account,
    /// Role-code snapshot embedded in the tokens.
    pub role_codes: Vec<String>,
}

/// Outcome of a login attempt.
///
/// A conflict is not an operational error: it is surfaced distinctly so
/// the client can offer the forced-login affordance.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Credentials accepted, session recorded, tokens issued.
    Success(LoginResult),
    /// An active session from another origin exists and was left intact.
    Conflict {
        /// Origin of the session blocking this login.
        conflicting_origin: String,
    },
}

/// Orchestrates the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// Account and role persistence.
    directory: Arc<dyn AccountDirectory>,
    /// Token issuance.
    encoder: Arc<TokenEncoder>,
    /// Token validation and revocation.
    decoder: Arc<TokenDecoder>,
    /// Single-active-session enforcement.
    conflicts: Arc<SessionConflictService>,
    /// Credential verification.
    hasher: Arc<PasswordHasher>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        encoder: Arc<TokenEncoder>,
        decoder: Arc<TokenDecoder>,
        conflicts: Arc<SessionConflictService>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            directory,
            encoder,
            decoder,
            conflicts,
            hasher,
        }
    }

    /// The conflict service backing this manager.
    pub fn conflicts(&self) -> &SessionConflictService {
        &self.conflicts
    }

    /// Performs the complete login flow:
    ///
    /// 1. Verify credentials and account status
    /// 2. Load roles
    /// 3. Under the per-account lock: resolve session conflict
    ///    (abort with `Conflict`, or evict when `force` is set)
    /// 4. Issue the token pair and record the new session pointer
    ///
    /// The lock is held from the conflict check until the pointer is
    /// recorded, so concurrent logins for one account serialize.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        origin: &str,
        force: bool,
    ) -> Result<LoginOutcome, AppError> {
        let account = self
            .directory
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        if !account.status.can_login() {
            return Err(AppError::forbidden(
                "Account is deactivated. Contact an administrator.",
            ));
        }

        let password_valid = self
            .hasher
            .verify_password(password, &account.password_hash)?;
        if !password_valid {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        let roles = self.directory.roles_for_account(account.id).await?;
        let role_codes: Vec<String> = roles.iter().map(|r| r.code.clone()).collect();

        let lock = self.conflicts.account_lock(account.id);
        let _guard = lock.lock().await;

        if force {
            self.conflicts.force_takeover(account.id).await?;
        } else {
            let check = self.conflicts.check_conflict(account.id, origin).await?;
            if check.has_conflict {
                let conflicting_origin = check.conflicting_origin.unwrap_or_default();
                return Ok(LoginOutcome::Conflict { conflicting_origin });
            }
        }

        let tokens = self
            .encoder
            .issue(account.id, account.display_name_or_username(), &role_codes)?;

        self.conflicts
            .record_session(account.id, origin, &tokens.access_token)
            .await?;

        drop(_guard);

        self.directory
            .touch_last_login(account.id, Utc::now())
            .await?;

        info!(
            account_id = account.id,
            username = %account.username,
            origin,
            forced = force,
            "Login successful"
        );

        Ok(LoginOutcome::Success(LoginResult {
            tokens,
            account,
            role_codes,
        }))
    }

    /// Revokes the presented access token and clears the session pointer.
    pub async fn logout(&self, claims: &Claims) -> Result<(), AppError> {
        self.decoder.revoke_claims(claims).await?;
        self.conflicts.clear_session(claims.sub).await?;

        info!(account_id = claims.sub, "Logout completed");
        Ok(())
    }

    /// Exchanges a valid refresh token for a fresh pair.
    ///
    /// The consumed refresh token is revoked before the new pair is
    /// issued, so a stolen refresh token is useless after legitimate
    /// rotation.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decoder.verify_refresh(refresh_token).await?;

        // Roles may have changed since issuance; reload from the source.
        let account = self
            .directory
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account not found"))?;

        if !account.status.can_login() {
            return Err(AppError::forbidden(
                "Account is deactivated. Contact an administrator.",
            ));
        }

        let roles = self.directory.roles_for_account(account.id).await?;
        let role_codes: Vec<String> = roles.iter().map(|r| r.code.clone()).collect();

        self.decoder.revoke_claims(&claims).await?;

        let tokens = self
            .encoder
            .issue(account.id, account.display_name_or_username(), &role_codes)?;

        info!(account_id = account.id, "Token refreshed");
        Ok(tokens)
    }
}
