//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl lives in `fleetdesk-core` alongside `AppError`
//! (the orphan rule forbids implementing it here); this module re-exports
//! the response body type for API consumers.

pub use fleetdesk_core::error::ApiErrorResponse;
