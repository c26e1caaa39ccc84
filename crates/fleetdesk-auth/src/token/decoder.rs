//! Session token validation and revocation.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::info;

use fleetdesk_cache::keys;
use fleetdesk_cache::provider::CacheManager;
use fleetdesk_core::config::auth::AuthConfig;
use fleetdesk_core::error::AppError;
use fleetdesk_core::traits::cache::CacheProvider;

use super::claims::{Claims, TokenKind};

/// Minimum revocation TTL so an almost-expired token cannot slip through
/// on clock skew.
const MIN_REVOCATION_TTL_SECONDS: u64 = 60;

/// Validates session tokens and manages the revocation store.
#[derive(Clone)]
pub struct TokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration for live tokens.
    validation: Validation,
    /// Lenient validation used when revoking a possibly expired token.
    lenient_validation: Validation,
    /// Cache manager backing the revocation store.
    cache: Arc<CacheManager>,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, cache: Arc<CacheManager>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        let mut lenient_validation = validation.clone();
        lenient_validation.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            lenient_validation,
            cache,
        }
    }

    /// Decodes and validates an access token.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Expiration
    /// 3. Token kind is Access
    /// 4. Token is not revoked
    pub async fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_live(token)?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::unauthorized(
                "Invalid token kind: expected access token",
            ));
        }

        self.check_revoked(&claims).await?;

        Ok(claims)
    }

    /// Decodes and validates a refresh token.
    pub async fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_live(token)?;

        if claims.kind != TokenKind::Refresh {
            return Err(AppError::unauthorized(
                "Invalid token kind: expected refresh token",
            ));
        }

        self.check_revoked(&claims).await?;

        Ok(claims)
    }

    /// Revokes a token by string, tolerating tokens already past expiry.
    ///
    /// Idempotent. Used by forced takeover, where the stored token may
    /// have expired naturally since it was recorded.
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.lenient_validation)
            .map_err(|e| AppError::unauthorized(format!("Cannot revoke malformed token: {e}")))?;

        self.revoke_claims(&token_data.claims).await
    }

    /// Revokes a token by its already-verified claims.
    ///
    /// The revocation entry's TTL equals the token's remaining validity,
    /// so the store is self-limiting.
    pub async fn revoke_claims(&self, claims: &Claims) -> Result<(), AppError> {
        let key = keys::token_revoked(claims.jti);
        let ttl_seconds = claims
            .remaining_ttl_seconds()
            .max(MIN_REVOCATION_TTL_SECONDS);

        self.cache
            .set(&key, "revoked", Duration::from_secs(ttl_seconds))
            .await?;

        info!(
            account_id = claims.sub,
            jti = %claims.jti,
            ttl_seconds,
            "Token revoked"
        );
        Ok(())
    }

    /// Internal decode with full validation but no kind checking.
    fn decode_live(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Rejects tokens present in the revocation store.
    ///
    /// A cache failure propagates rather than passing the token, so an
    /// outage can never un-revoke a token.
    async fn check_revoked(&self, claims: &Claims) -> Result<(), AppError> {
        let key = keys::token_revoked(claims.jti);
        if self.cache.exists(&key).await? {
            return Err(AppError::unauthorized("Token has been revoked"));
        }
        Ok(())
    }
}
