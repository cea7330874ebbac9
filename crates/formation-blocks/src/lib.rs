//! Contact form blocks for Formation
//!
//! Translates contact form block attributes into field descriptors, renders
//! them with the Formation field renderer and records form recipients in a
//! site [`OptionStore`]. A preview endpoint renders single field blocks for
//! the block editor.

pub mod assoc;
pub mod contact_form;
pub mod options;
pub mod preview;

pub use assoc::{AssocOrder, parse_assoc_str};
pub use contact_form::{
	BlockError, BlockResult, ContactFormAttributes, ContactFormBlocks, ContactFormFieldAttributes,
	FormRecipient,
};
pub use options::{MemoryOptionStore, OptionStore};
pub use preview::PreviewQuery;
