//! Single-use nonce tracking for replay prevention.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// Concurrent store of recently seen nonces with first-seen timestamps.
///
/// Process-local. A multi-instance deployment must front this surface
/// with a shared store; within one process the map gives the atomic
/// check-and-record the replay contract requires.
#[derive(Debug, Clone, Default)]
pub struct NonceStore {
    /// nonce -> unix seconds when first seen.
    entries: Arc<DashMap<String, i64>>,
}

impl NonceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the nonce has already been consumed.
    pub fn contains(&self, nonce: &str) -> bool {
        self.entries.contains_key(nonce)
    }

    /// Records a nonce if and only if it has not been seen before.
    ///
    /// Returns `false` when the nonce already exists. The check and the
    /// insert are a single atomic operation, so two concurrent requests
    /// presenting the same nonce cannot both succeed.
    pub fn try_record(&self, nonce: &str) -> bool {
        match self.entries.entry(nonce.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Utc::now().timestamp());
                true
            }
        }
    }

    /// Removes entries older than `max_age_seconds`, returning the count.
    ///
    /// Iterates the concurrent map shard by shard; verification is never
    /// paused while a sweep runs.
    pub fn sweep(&self, max_age_seconds: i64) -> usize {
        let cutoff = Utc::now().timestamp() - max_age_seconds;
        let before = self.entries.len();
        self.entries.retain(|_, first_seen| *first_seen >= cutoff);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "Swept stale nonces");
        }
        removed
    }

    /// Number of tracked nonces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert_with_timestamp(&self, nonce: &str, first_seen: i64) {
        self.entries.insert(nonce.to_string(), first_seen);
    }
}
