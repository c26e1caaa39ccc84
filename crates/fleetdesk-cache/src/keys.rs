//! Cache key builders for all Fleetdesk cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

/// Prefix applied to all Fleetdesk cache keys.
const PREFIX: &str = "fleetdesk";

/// Cache key marking a token id as revoked.
pub fn token_revoked(jti: Uuid) -> String {
    format!("{PREFIX}:token:revoked:{jti}")
}
