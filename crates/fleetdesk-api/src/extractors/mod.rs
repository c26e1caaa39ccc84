//! Request extractors.

pub mod auth;
pub mod origin;

pub use auth::AuthSession;
pub use origin::ClientOrigin;
