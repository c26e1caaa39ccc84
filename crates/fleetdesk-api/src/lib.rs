//! # fleetdesk-api
//!
//! The HTTP layer: routes, middleware, handlers, and DTOs. Business
//! decisions live in `fleetdesk-auth`; this crate translates between
//! HTTP and the security core.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
