//! Field rendering module.
//!
//! This module provides access to field names and descriptors, the field,
//! section and listbox renderer, script registration and the upload action.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "forms")]
//! use formation::forms::{FieldConfig, Renderer, SectionConfig};
//! # #[cfg(feature = "forms")]
//! use formation::forms::names::format_id;
//! ```

#[cfg(feature = "forms")]
pub use formation_forms::*;
