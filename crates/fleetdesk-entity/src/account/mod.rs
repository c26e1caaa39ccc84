//! Account entity.

pub mod model;
pub mod status;

pub use model::{Account, SessionPointer};
pub use status::AccountStatus;
