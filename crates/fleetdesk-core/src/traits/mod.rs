//! Seam traits implemented by the infrastructure crates.

pub mod cache;
pub mod directory;

pub use cache::CacheProvider;
pub use directory::AccountDirectory;
