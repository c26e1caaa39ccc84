//! Concrete repository implementations.

pub mod account;
