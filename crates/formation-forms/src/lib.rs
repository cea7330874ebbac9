//! Field rendering for Formation
//!
//! This crate provides:
//! - Field name utilities (top-level names, repeat placeholders, ids, data paths)
//! - Descriptors merged over documented defaults and parsed into typed configuration
//! - HTML rendering of fields, sections, repeatable multi groups and listboxes
//! - The localize payload handed to the client script
//! - Script/style registration and the nonce-checked file upload action

pub mod assets;
pub mod bound_field;
pub mod context;
pub mod descriptor;
pub mod escaping;
pub mod field;
pub mod listbox;
pub mod multi;
pub mod names;
pub mod nonce;
pub mod renderer;
pub mod rich_text;
pub mod section;
pub mod upload;

pub use assets::{AssetLoader, AssetRegistry, ScriptDataSink, register_field_assets};
pub use bound_field::BoundField;
pub use context::{FileRegistration, LocalizePayload, RenderContext, RenderPosition};
pub use descriptor::{
	DescriptorError, DescriptorKind, DescriptorResult, FieldDescriptor, SectionDescriptor, deep_merge,
	merge_defaults,
};
pub use field::{
	Attributes, Choice, FieldConfig, FieldKind, FileType, LabelPosition, RichTextOptions, Visibility,
};
pub use listbox::ListboxOption;
pub use multi::filter_multi_fields;
pub use names::{format_id, index_name, resolve_path, top_level_name};
pub use nonce::NonceManager;
pub use renderer::Renderer;
pub use rich_text::{RichTextEditor, RichTextRequest, TextareaEditor};
pub use section::{Node, SectionConfig};
pub use upload::{
	FileUploadProcessor, StoredFile, UploadAction, UploadError, UploadRequest, UploadResult,
	UploadTarget, UploadedFile,
};
