//! # Formation
//!
//! Form-field rendering for CMS themes.
//!
//! Formation reads declarative field descriptions, merges them with documented
//! defaults and with submitted or stored data, and emits the HTML of inputs,
//! file uploads, rich text editors and repeatable ("multi") field groups. A
//! contact form block adapter builds on the same renderer.
//!
//! ## Feature Flags
//!
//! - `minimal` - Settings and field rendering
//! - `full` (default) - Everything, including the contact form blocks
//!
//! ### Fine-grained Control
//!
//! - `conf` - [`Settings`] loaded from TOML
//! - `forms` - Names, descriptors, renderer, assets and uploads
//! - `blocks` - Contact form blocks and the preview endpoint
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "forms")]
//! # {
//! use formation::prelude::*;
//! use serde_json::json;
//!
//! let renderer = Renderer::new(Settings::new("acme"));
//! let section = SectionDescriptor::parse(&json!({
//!     "name": "links",
//!     "multi": true,
//!     "data": {"links": [{"url": "https://a.test"}]},
//!     "fields": [{"name": "links[%i][url]", "label": "URL"}]
//! }))
//! .unwrap();
//!
//! let mut ctx = renderer.context();
//! let html = renderer.render_section(&section, &mut ctx);
//!
//! assert!(html.contains("value=\"https://a.test\""));
//! assert!(ctx.payload().template("links").is_some());
//! # }
//! ```

#[cfg(feature = "blocks")]
pub mod blocks;
#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "forms")]
pub mod forms;

// Re-export settings from dedicated crate
#[cfg(feature = "conf")]
pub use formation_conf::{Settings, SettingsError, SettingsResult, StyleClasses};

// Re-export rendering types
#[cfg(feature = "forms")]
pub use formation_forms::{
	DescriptorError, FieldConfig, FieldDescriptor, FieldKind, RenderContext, RenderPosition,
	Renderer, SectionConfig, SectionDescriptor, UploadAction,
};

// Re-export block types
#[cfg(feature = "blocks")]
pub use formation_blocks::{BlockError, ContactFormBlocks, MemoryOptionStore, OptionStore};

/// Commonly used types
pub mod prelude {
	#[cfg(feature = "conf")]
	pub use crate::{Settings, StyleClasses};

	#[cfg(feature = "forms")]
	pub use crate::{
		FieldConfig, FieldDescriptor, FieldKind, RenderContext, RenderPosition, Renderer,
		SectionConfig, SectionDescriptor,
	};

	#[cfg(feature = "blocks")]
	pub use crate::{ContactFormBlocks, MemoryOptionStore, OptionStore};
}
