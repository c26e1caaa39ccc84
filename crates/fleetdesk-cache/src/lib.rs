//! Cache backends for Fleetdesk.
//!
//! The revocation store and other cached state reach the backend through
//! [`provider::CacheManager`], so a horizontally scaled deployment can
//! swap the in-memory provider for Redis without touching calling code.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
