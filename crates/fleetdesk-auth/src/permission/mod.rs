//! Static permission catalog and role-based permission resolution.

pub mod catalog;
pub mod resolver;

pub use resolver::{PermissionResolver, ResolvedPermissions};
