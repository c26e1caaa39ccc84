//! # fleetdesk-worker
//!
//! Periodic maintenance for the security core. The only recurring task
//! is the nonce sweep: revocation entries carry their own cache TTL and
//! expire without help.

pub mod scheduler;

pub use scheduler::MaintenanceScheduler;
