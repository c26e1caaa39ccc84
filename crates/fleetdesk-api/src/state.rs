//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use fleetdesk_auth::password::PasswordHasher;
use fleetdesk_auth::permission::PermissionResolver;
use fleetdesk_auth::session::{SessionConflictService, SessionManager};
use fleetdesk_auth::signature::{NonceStore, SignatureVerifier};
use fleetdesk_auth::token::{TokenDecoder, TokenEncoder};
use fleetdesk_cache::provider::CacheManager;
use fleetdesk_core::config::AppConfig;
use fleetdesk_core::traits::directory::AccountDirectory;
use fleetdesk_database::DatabasePool;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool; absent when running against in-memory fixtures.
    pub db: Option<DatabasePool>,
    /// Cache manager (in-memory or Redis).
    pub cache: Arc<CacheManager>,
    /// Account and role persistence.
    pub directory: Arc<dyn AccountDirectory>,
    /// Token issuance.
    pub token_encoder: Arc<TokenEncoder>,
    /// Token validation and revocation.
    pub token_decoder: Arc<TokenDecoder>,
    /// Session lifecycle orchestration.
    pub session_manager: Arc<SessionManager>,
    /// Signed driver-request verification.
    pub signature_verifier: Arc<SignatureVerifier>,
    /// Role-to-permission resolution.
    pub permission_resolver: Arc<PermissionResolver>,
}

impl AppState {
    /// Wires the full state graph from its leaf dependencies.
    pub fn build(
        config: Arc<AppConfig>,
        db: Option<DatabasePool>,
        cache: Arc<CacheManager>,
        directory: Arc<dyn AccountDirectory>,
    ) -> Self {
        let token_encoder = Arc::new(TokenEncoder::new(&config.auth));
        let token_decoder = Arc::new(TokenDecoder::new(&config.auth, cache.clone()));
        let conflicts = Arc::new(SessionConflictService::new(
            directory.clone(),
            token_decoder.clone(),
        ));
        let session_manager = Arc::new(SessionManager::new(
            directory.clone(),
            token_encoder.clone(),
            token_decoder.clone(),
            conflicts,
            Arc::new(PasswordHasher::new()),
        ));
        let signature_verifier = Arc::new(SignatureVerifier::new(
            &config.signature,
            NonceStore::new(),
        ));
        let permission_resolver = Arc::new(PermissionResolver::new(directory.clone()));

        Self {
            config,
            db,
            cache,
            directory,
            token_encoder,
            token_decoder,
            session_manager,
            signature_verifier,
            permission_resolver,
        }
    }
}
