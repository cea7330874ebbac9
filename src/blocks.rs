//! Contact form blocks module.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "blocks")]
//! use formation::blocks::{ContactFormBlocks, MemoryOptionStore};
//! ```

#[cfg(feature = "blocks")]
pub use formation_blocks::*;
