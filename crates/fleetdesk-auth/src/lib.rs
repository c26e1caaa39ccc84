//! # fleetdesk-auth
//!
//! The security core of the Fleetdesk platform: token issuance and
//! revocation, single-active-session enforcement, signed driver-client
//! requests, and role-based permission resolution.
//!
//! ## Modules
//!
//! - `token` — session token creation, validation, and revocation
//! - `password` — Argon2id credential hashing
//! - `session` — session conflict detection and login/logout/refresh flows
//! - `signature` — HMAC request signing for the driver client surface
//! - `permission` — static permission catalog and resolution

pub mod password;
pub mod permission;
pub mod session;
pub mod signature;
pub mod token;

pub use password::PasswordHasher;
pub use permission::{PermissionResolver, ResolvedPermissions};
pub use session::{ConflictCheck, SessionConflictService, SessionManager};
pub use signature::{NonceStore, SignatureVerifier};
pub use token::{Claims, TokenDecoder, TokenEncoder, TokenKind, TokenPair};
