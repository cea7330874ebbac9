//! Per-request render state
//!
//! A [`RenderContext`] is created for one render pass. It records whether the
//! markup targets an admin screen and accumulates the [`LocalizePayload`]:
//! the hidden multi templates and file field registrations the client script
//! needs to wire up the rendered fields.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Where a field instance sits inside its section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderPosition {
	/// Row of the multi group
	pub index: usize,
	/// Rendering the hidden clone template (placeholders kept verbatim)
	pub copy: bool,
	/// Field belongs to a multi group
	pub multi: bool,
}

impl RenderPosition {
	/// A field outside any multi group
	pub fn single() -> Self {
		Self::default()
	}

	/// Row `index` of a multi group
	pub fn row(index: usize) -> Self {
		Self {
			index,
			copy: false,
			multi: true,
		}
	}

	/// The clone template of a multi group
	pub fn template() -> Self {
		Self {
			index: 0,
			copy: true,
			multi: true,
		}
	}
}

/// A file field the client script has to initialize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRegistration {
	pub id: String,
	pub file_type: String,
}

/// Side-channel data handed to the field script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizePayload {
	/// Clone template markup keyed by top-level name
	pub multi: BTreeMap<String, String>,
	pub files: Vec<FileRegistration>,
}

impl LocalizePayload {
	/// Store the clone template of a multi group, returning the template it
	/// replaced. Storing identical markup again is not a replacement.
	pub fn store_template(&mut self, name: impl Into<String>, markup: String) -> Option<String> {
		let name = name.into();
		if self.multi.get(&name) == Some(&markup) {
			return None;
		}
		self.multi.insert(name, markup)
	}

	pub fn template(&self, name: &str) -> Option<&str> {
		self.multi.get(name).map(String::as_str)
	}

	pub fn register_file(&mut self, id: impl Into<String>, file_type: impl Into<String>) {
		self.files.push(FileRegistration {
			id: id.into(),
			file_type: file_type.into(),
		});
	}

	pub fn is_empty(&self) -> bool {
		self.multi.is_empty() && self.files.is_empty()
	}

	pub fn to_value(&self) -> Value {
		serde_json::json!({
			"multi": self.multi,
			"files": self.files,
		})
	}
}

/// State of one render pass
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
	admin: bool,
	payload: LocalizePayload,
}

impl RenderContext {
	pub fn new(admin: bool) -> Self {
		Self {
			admin,
			payload: LocalizePayload::default(),
		}
	}

	pub fn public() -> Self {
		Self::new(false)
	}

	pub fn admin() -> Self {
		Self::new(true)
	}

	pub fn is_admin(&self) -> bool {
		self.admin
	}

	pub fn payload(&self) -> &LocalizePayload {
		&self.payload
	}

	pub fn payload_mut(&mut self) -> &mut LocalizePayload {
		&mut self.payload
	}

	pub fn into_payload(self) -> LocalizePayload {
		self.payload
	}

	/// Start a new pass with an empty payload
	pub fn reset(&mut self) {
		self.payload = LocalizePayload::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_store_template_returns_replaced() {
		let mut payload = LocalizePayload::default();

		assert_eq!(payload.store_template("links", "<a>".to_string()), None);
		assert_eq!(
			payload.store_template("links", "<b>".to_string()),
			Some("<a>".to_string())
		);
		assert_eq!(payload.template("links"), Some("<b>"));
	}

	#[rstest]
	fn test_storing_same_template_is_not_a_replacement() {
		let mut payload = LocalizePayload::default();
		payload.store_template("links", "<a>".to_string());

		assert_eq!(payload.store_template("links", "<a>".to_string()), None);
		assert_eq!(payload.multi.len(), 1);
	}

	#[rstest]
	fn test_payload_value() {
		let mut payload = LocalizePayload::default();
		payload.register_file("logo", "image");

		assert_eq!(
			payload.to_value(),
			json!({"multi": {}, "files": [{"id": "logo", "file_type": "image"}]})
		);
	}

	#[rstest]
	fn test_reset_clears_payload() {
		let mut ctx = RenderContext::admin();
		ctx.payload_mut().register_file("a", "file");
		ctx.reset();

		assert!(ctx.is_admin());
		assert!(ctx.payload().is_empty());
	}
}
