//! Session conflict detection and forced takeover.
//!
//! Each account has at most one valid login, recorded as an
//! (origin, token) pointer on the account row. A login from a different
//! origin while a session is active is a conflict; the caller decides
//! whether to abort or force a takeover. The check is advisory, the
//! takeover explicit, so a stale device can be reclaimed without ever
//! hijacking a session silently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use fleetdesk_core::result::AppResult;
use fleetdesk_core::traits::directory::AccountDirectory;

use crate::token::TokenDecoder;

/// Result of an advisory conflict check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCheck {
    /// Whether an active session from a different origin exists.
    pub has_conflict: bool,
    /// The origin of the conflicting session, when one exists.
    pub conflicting_origin: Option<String>,
}

impl ConflictCheck {
    fn none() -> Self {
        Self {
            has_conflict: false,
            conflicting_origin: None,
        }
    }

    fn against(origin: String) -> Self {
        Self {
            has_conflict: true,
            conflicting_origin: Some(origin),
        }
    }
}

/// Tracks the single currently-valid login per account.
#[derive(Clone)]
pub struct SessionConflictService {
    /// Account and session-pointer persistence.
    directory: Arc<dyn AccountDirectory>,
    /// Token decoder, used to revoke evicted tokens.
    decoder: Arc<TokenDecoder>,
    /// Per-account locks serializing the conflict-check-then-record window.
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for SessionConflictService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConflictService")
            .field("locks", &self.locks.len())
            .finish()
    }
}

impl SessionConflictService {
    /// Creates a new conflict service.
    pub fn new(directory: Arc<dyn AccountDirectory>, decoder: Arc<TokenDecoder>) -> Self {
        Self {
            directory,
            decoder,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Returns the lock serializing login attempts for one account.
    ///
    /// Concurrent logins for the same account must not both win the
    /// no-conflict path; the caller holds this lock from the conflict
    /// check until the new session is recorded.
    pub fn account_lock(&self, account_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(account_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Compares the stored session origin against the presented one.
    ///
    /// No recorded session, or a matching origin, means no conflict.
    pub async fn check_conflict(&self, account_id: i64, origin: &str) -> AppResult<ConflictCheck> {
        match self.directory.session_pointer(account_id).await? {
            Some(pointer) if pointer.origin != origin => {
                warn!(
                    account_id,
                    presented_origin = origin,
                    active_origin = %pointer.origin,
                    "Login conflict detected"
                );
                Ok(ConflictCheck::against(pointer.origin))
            }
            _ => Ok(ConflictCheck::none()),
        }
    }

    /// Evicts the account's current session by revoking its token.
    ///
    /// The caller proceeds to record the new session afterwards. A
    /// malformed or absent stored token leaves nothing to revoke.
    pub async fn force_takeover(&self, account_id: i64) -> AppResult<()> {
        if let Some(pointer) = self.directory.session_pointer(account_id).await? {
            match self.decoder.revoke(&pointer.token).await {
                Ok(()) => {
                    info!(
                        account_id,
                        evicted_origin = %pointer.origin,
                        "Forced session takeover"
                    );
                }
                Err(e) => {
                    warn!(
                        account_id,
                        error = %e,
                        "Stored session token could not be revoked during takeover"
                    );
                }
            }
        }
        Ok(())
    }

    /// Unconditionally records the new session pointer.
    ///
    /// Called only after a conflict has been resolved (forced or absent).
    pub async fn record_session(
        &self,
        account_id: i64,
        origin: &str,
        token: &str,
    ) -> AppResult<()> {
        self.directory
            .persist_session_pointer(account_id, origin, token)
            .await
    }

    /// Clears the session pointer on logout.
    pub async fn clear_session(&self, account_id: i64) -> AppResult<()> {
        self.directory.clear_session_pointer(account_id).await
    }
}
