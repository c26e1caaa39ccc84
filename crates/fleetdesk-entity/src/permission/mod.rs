//! Permission catalog types.

pub mod model;

pub use model::{Permission, PermissionKind};
