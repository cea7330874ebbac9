//! Settings module.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "conf")]
//! use formation::conf::Settings;
//! ```

#[cfg(feature = "conf")]
pub use formation_conf::*;
