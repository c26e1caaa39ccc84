//! Single-active-session enforcement and login/logout/refresh flows.

pub mod conflict;
pub mod manager;

pub use conflict::{ConflictCheck, SessionConflictService};
pub use manager::{LoginOutcome, LoginResult, SessionManager};
