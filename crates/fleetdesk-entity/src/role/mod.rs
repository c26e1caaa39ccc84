//! Role entity.

pub mod model;

pub use model::{ADMIN_ROLE_CODE, Role};
