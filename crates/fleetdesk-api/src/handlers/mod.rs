//! HTTP handlers.

pub mod auth;
pub mod driver;
pub mod health;
