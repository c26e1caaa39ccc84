//! Signature verification with timestamp window and replay protection.

use chrono::Utc;
use serde_json::{Map, Value};
use subtle::ConstantTimeEq;
use tracing::warn;

use fleetdesk_core::config::signature::SignatureConfig;

use super::canonical;
use super::keys;
use super::nonce::NonceStore;

/// Why a signed request was rejected.
///
/// Every variant surfaces to the client as Unauthorized; the distinct
/// reasons exist for audit logging and client debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRejection {
    /// `timestamp`, `nonce`, or `signature` absent or unparseable.
    MissingParameters,
    /// Timestamp outside the validity window in either direction.
    Expired,
    /// Nonce shorter than the configured minimum.
    NonceTooShort,
    /// Nonce already consumed within the validity window.
    Replay,
    /// Recomputed signature differs from the presented one.
    Mismatch,
}

impl SignatureRejection {
    /// Human-readable reason returned to the client.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingParameters => "missing parameters",
            Self::Expired => "expired",
            Self::NonceTooShort => "nonce too short",
            Self::Replay => "replay",
            Self::Mismatch => "signature mismatch",
        }
    }
}

impl std::fmt::Display for SignatureRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// Verifies signed driver-client requests.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    /// Service-wide base secret for key derivation.
    base_secret: String,
    /// Validity window in seconds, both directions.
    validity_window_seconds: i64,
    /// Minimum nonce length.
    nonce_min_length: usize,
    /// Replay-prevention store.
    nonces: NonceStore,
}

impl SignatureVerifier {
    /// Creates a verifier from configuration with a shared nonce store.
    pub fn new(config: &SignatureConfig, nonces: NonceStore) -> Self {
        Self {
            base_secret: config.base_secret.clone(),
            validity_window_seconds: config.validity_window_seconds,
            nonce_min_length: config.nonce_min_length,
            nonces,
        }
    }

    /// The nonce store backing this verifier (shared with the sweeper).
    pub fn nonce_store(&self) -> &NonceStore {
        &self.nonces
    }

    /// Derives the signing key for a driver account.
    pub fn derived_key(&self, account_id: i64) -> String {
        keys::derive_key(&self.base_secret, account_id)
    }

    /// Validates a signed request's merged parameter set.
    ///
    /// The nonce is recorded only after the signature checks out, so a
    /// forged request cannot burn a legitimate client's nonce; the
    /// record itself is an atomic insert-if-absent, so two concurrent
    /// requests with the same nonce cannot both pass.
    pub fn verify(
        &self,
        account_id: i64,
        params: &Map<String, Value>,
    ) -> Result<(), SignatureRejection> {
        let timestamp = param_string(params, "timestamp")
            .and_then(|s| s.parse::<i64>().ok());
        let nonce = param_string(params, "nonce");
        let signature = param_string(params, "signature");

        let (Some(timestamp), Some(nonce), Some(signature)) = (timestamp, nonce, signature)
        else {
            return Err(self.reject(account_id, SignatureRejection::MissingParameters));
        };

        // Saturating arithmetic: a client-supplied timestamp can be any
        // i64, and an out-of-range value must land in Expired rather
        // than overflow.
        let now = Utc::now().timestamp();
        let skew = now.saturating_sub(timestamp).saturating_abs();
        if skew > self.validity_window_seconds {
            return Err(self.reject(account_id, SignatureRejection::Expired));
        }

        if nonce.len() < self.nonce_min_length {
            return Err(self.reject(account_id, SignatureRejection::NonceTooShort));
        }

        if self.nonces.contains(&nonce) {
            return Err(self.reject(account_id, SignatureRejection::Replay));
        }

        let key = self.derived_key(account_id);
        let expected = keys::sign(&key, &canonical::canonicalize(params));

        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(self.reject(account_id, SignatureRejection::Mismatch));
        }

        // Lost the race against a concurrent request with the same nonce.
        if !self.nonces.try_record(&nonce) {
            return Err(self.reject(account_id, SignatureRejection::Replay));
        }

        Ok(())
    }

    fn reject(&self, account_id: i64, rejection: SignatureRejection) -> SignatureRejection {
        warn!(account_id, reason = rejection.reason(), "Signature rejected");
        rejection
    }
}

/// Reads a parameter as a string; numbers are accepted and rendered.
fn param_string(params: &Map<String, Value>, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
