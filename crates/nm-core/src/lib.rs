//! nmedia/crates/nm-core/src/lib.rs
//!
//! Domain models and the repository port shared by every nmedia crate.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
