//! Per-account key derivation and MAC computation.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Derives the signing key for a driver account.
///
/// `HMAC-SHA256(base_secret, "user_" + account_id)`, lowercase hex. Pure
/// function with no I/O; keys are recomputed on every use and never
/// stored.
pub fn derive_key(base_secret: &str, account_id: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(base_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("user_{account_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Signs a canonicalized payload with a derived key, returning the
/// lowercase hex digest.
pub fn sign(derived_key: &str, canonical: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(derived_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
