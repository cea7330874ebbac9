//! Rich text editor capability
//!
//! Rich text fields are rendered by a host-provided WYSIWYG component. The
//! renderer only prepares a [`RichTextRequest`] and embeds whatever markup the
//! editor returns.

use crate::escaping::{escape_attribute, escape_html};
use crate::field::RichTextOptions;

/// Everything an editor needs to embed itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextRequest {
	/// Bracket-free id (editors commonly reject brackets in ids)
	pub id: String,
	/// Name of the submitted textarea
	pub name: String,
	/// Initial content with entities decoded
	pub content: String,
	/// Classes for the editor's textarea
	pub editor_class: String,
	pub options: RichTextOptions,
}

/// Host WYSIWYG component
pub trait RichTextEditor: Send + Sync {
	fn render(&self, request: &RichTextRequest) -> String;
}

/// Editor used when the host provides none: a plain textarea carrying the
/// editor options as data attributes for a client-side enhancement.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextareaEditor;

impl RichTextEditor for TextareaEditor {
	fn render(&self, request: &RichTextRequest) -> String {
		let options = &request.options;
		format!(
			"<textarea name=\"{}\" id=\"{}\" class=\"{}\" rows=\"{}\" data-toolbar=\"{}\" data-wpautop=\"{}\" data-p-tags=\"{}\" data-quicktags=\"{}\">{}</textarea>",
			escape_attribute(&request.name),
			escape_attribute(&request.id),
			escape_attribute(&request.editor_class),
			options.rows,
			escape_attribute(&options.toolbar),
			options.wpautop,
			options.p_tags,
			options.quicktags,
			escape_html(&request.content),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_textarea_editor() {
		let request = RichTextRequest {
			id: "bio".to_string(),
			name: "bio".to_string(),
			content: "<p>Hi</p>".to_string(),
			editor_class: "o-field__richtext js-input".to_string(),
			options: RichTextOptions::default(),
		};

		let html = TextareaEditor.render(&request);

		assert!(html.starts_with("<textarea name=\"bio\" id=\"bio\""));
		assert!(html.contains("rows=\"4\""));
		assert!(html.contains("data-p-tags=\"true\""));
		assert!(html.contains("&lt;p&gt;Hi&lt;/p&gt;</textarea>"));
	}
}
