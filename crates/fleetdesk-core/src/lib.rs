//! Core building blocks shared by every Fleetdesk crate: the unified
//! error type, configuration schemas, and the seam traits behind which
//! the cache and the account directory live.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
