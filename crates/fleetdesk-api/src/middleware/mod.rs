//! Request middleware.

pub mod logging;
pub mod signature;

pub use signature::DriverIdentity;
