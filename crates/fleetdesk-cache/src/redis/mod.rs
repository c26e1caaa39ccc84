//! Redis cache backend.
//!
//! Required for multi-instance deployments where token revocation must
//! be visible across processes.

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisCacheProvider;
