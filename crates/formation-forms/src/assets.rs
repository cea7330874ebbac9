//! Script and style registration
//!
//! The renderer never prints `<script>` tags itself. It hands the field
//! assets and the localized data to an [`AssetLoader`] / [`ScriptDataSink`]
//! owned by the host. [`AssetRegistry`] is an in-memory implementation of
//! both that can print the collected tags.

use crate::descriptor::deep_merge;
use crate::escaping::escape_attribute;
use crate::nonce::NonceManager;
use formation_conf::Settings;
use parking_lot::Mutex;
use serde_json::{Value, json};

/// Receives localized data objects for the client script
pub trait ScriptDataSink: Send + Sync {
	/// Add data under a global object name. With `merge` the data is deep
	/// merged into what is already stored, otherwise it replaces it.
	fn add_script_data(&self, object_name: &str, data: Value, merge: bool);
}

/// Registers and enqueues stylesheets and scripts
pub trait AssetLoader: ScriptDataSink {
	fn enqueue_style(&self, handle: &str, src: &str);
	fn register_script(&self, handle: &str, src: &str, in_footer: bool);
	fn localize_script(&self, handle: &str, object_name: &str, data: Value);
	fn enqueue_script(&self, handle: &str);
}

/// Handle of the field stylesheet
pub fn style_handle(settings: &Settings) -> String {
	format!("{}-field-styles", settings.namespace)
}

/// Handle of the field script
pub fn script_handle(settings: &Settings) -> String {
	format!("{}-field-script", settings.namespace)
}

/// Name of the upload nonce (also the nonce action)
pub fn upload_nonce_name(settings: &Settings) -> String {
	format!("{}_upload_file_nonce", settings.namespace)
}

/// Enqueue the field stylesheet and script, exposing the upload nonce to the script.
pub fn register_field_assets(loader: &dyn AssetLoader, settings: &Settings, nonces: &NonceManager) {
	let handle = script_handle(settings);
	let nonce_name = upload_nonce_name(settings);

	loader.enqueue_style(&style_handle(settings), &settings.asset_url("css/field.css"));
	loader.register_script(&handle, &settings.asset_url("js/field.js"), true);
	loader.localize_script(
		&handle,
		&settings.namespace,
		json!({ nonce_name.clone(): nonces.create(&nonce_name) }),
	);
	loader.enqueue_script(&handle);

	tracing::debug!(handle = %handle, "Registered field assets");
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptAsset {
	pub handle: String,
	pub src: String,
	pub in_footer: bool,
	pub enqueued: bool,
	/// Localized objects printed before the script
	pub localized: Vec<(String, Value)>,
}

#[derive(Debug, Default)]
struct AssetState {
	styles: Vec<(String, String)>,
	scripts: Vec<ScriptAsset>,
	script_data: Vec<(String, Value)>,
}

/// In-memory asset loader
#[derive(Debug, Default)]
pub struct AssetRegistry {
	state: Mutex<AssetState>,
}

impl AssetRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn styles(&self) -> Vec<(String, String)> {
		self.state.lock().styles.clone()
	}

	pub fn scripts(&self) -> Vec<ScriptAsset> {
		self.state.lock().scripts.clone()
	}

	pub fn script(&self, handle: &str) -> Option<ScriptAsset> {
		self.state
			.lock()
			.scripts
			.iter()
			.find(|script| script.handle == handle)
			.cloned()
	}

	/// Data added under `object_name` through [`ScriptDataSink`]
	pub fn script_data(&self, object_name: &str) -> Option<Value> {
		self.state
			.lock()
			.script_data
			.iter()
			.find(|(name, _)| name == object_name)
			.map(|(_, data)| data.clone())
	}

	/// Render `<link>` tags for the enqueued stylesheets.
	///
	/// # Examples
	///
	/// ```
	/// use formation_forms::assets::{AssetLoader, AssetRegistry};
	///
	/// let registry = AssetRegistry::new();
	/// registry.enqueue_style("frm-field-styles", "/static/field.css");
	///
	/// let html = registry.render_styles();
	/// assert!(html.contains("href=\"/static/field.css\""));
	/// ```
	pub fn render_styles(&self) -> String {
		let state = self.state.lock();
		let mut html = String::new();
		for (handle, src) in &state.styles {
			html.push_str(&format!(
				"<link rel=\"stylesheet\" id=\"{}-css\" href=\"{}\" />\n",
				escape_attribute(handle),
				escape_attribute(src)
			));
		}
		html
	}

	/// Render the localized data and `<script>` tags of the enqueued scripts
	/// placed in the footer (`in_footer == true`) or the head.
	pub fn render_scripts(&self, in_footer: bool) -> String {
		let state = self.state.lock();
		let mut html = String::new();

		if in_footer {
			for (name, data) in &state.script_data {
				html.push_str(&inline_object(name, data));
			}
		}

		for script in state
			.scripts
			.iter()
			.filter(|script| script.enqueued && script.in_footer == in_footer)
		{
			for (name, data) in &script.localized {
				html.push_str(&inline_object(name, data));
			}
			html.push_str(&format!(
				"<script id=\"{}-js\" src=\"{}\"></script>\n",
				escape_attribute(&script.handle),
				escape_attribute(&script.src)
			));
		}
		html
	}
}

fn inline_object(name: &str, data: &Value) -> String {
	let json = data.to_string().replace("</", "<\\/");
	format!("<script>var {} = {};</script>\n", name, json)
}

impl ScriptDataSink for AssetRegistry {
	fn add_script_data(&self, object_name: &str, data: Value, merge: bool) {
		let mut state = self.state.lock();
		match state.script_data.iter().position(|(name, _)| name == object_name) {
			Some(index) => {
				let existing = &mut state.script_data[index].1;
				*existing = if merge { deep_merge(existing, &data) } else { data };
			}
			None => state.script_data.push((object_name.to_string(), data)),
		}
	}
}

impl AssetLoader for AssetRegistry {
	fn enqueue_style(&self, handle: &str, src: &str) {
		let mut state = self.state.lock();
		if !state.styles.iter().any(|(existing, _)| existing == handle) {
			state.styles.push((handle.to_string(), src.to_string()));
		}
	}

	fn register_script(&self, handle: &str, src: &str, in_footer: bool) {
		let mut state = self.state.lock();
		if state.scripts.iter().any(|script| script.handle == handle) {
			return;
		}
		state.scripts.push(ScriptAsset {
			handle: handle.to_string(),
			src: src.to_string(),
			in_footer,
			enqueued: false,
			localized: Vec::new(),
		});
	}

	fn localize_script(&self, handle: &str, object_name: &str, data: Value) {
		let mut state = self.state.lock();
		match state.scripts.iter_mut().find(|script| script.handle == handle) {
			Some(script) => script.localized.push((object_name.to_string(), data)),
			None => tracing::warn!(handle, "Cannot localize unregistered script"),
		}
	}

	fn enqueue_script(&self, handle: &str) {
		let mut state = self.state.lock();
		match state.scripts.iter_mut().find(|script| script.handle == handle) {
			Some(script) => script.enqueued = true,
			None => tracing::warn!(handle, "Cannot enqueue unregistered script"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_register_field_assets() {
		let mut settings = Settings::new("acme");
		settings.theme_uri = "https://site.test/theme".to_string();
		settings.asset_path = "/assets/".to_string();
		let nonces = NonceManager::new("secret");
		let registry = AssetRegistry::new();

		register_field_assets(&registry, &settings, &nonces);

		assert_eq!(
			registry.styles(),
			vec![(
				"acme-field-styles".to_string(),
				"https://site.test/theme/assets/css/field.css".to_string()
			)]
		);

		let script = registry.script("acme-field-script").unwrap();
		assert!(script.enqueued);
		assert!(script.in_footer);
		assert_eq!(script.src, "https://site.test/theme/assets/js/field.js");

		let (object, data) = &script.localized[0];
		assert_eq!(object, "acme");
		let nonce = data["acme_upload_file_nonce"].as_str().unwrap();
		assert!(nonces.verify("acme_upload_file_nonce", nonce));
	}

	#[rstest]
	fn test_script_data_merge_is_idempotent() {
		let registry = AssetRegistry::new();
		let data = json!({"multi": {"links": "<div></div>"}, "files": []});

		registry.add_script_data("frm", data.clone(), true);
		registry.add_script_data("frm", data.clone(), true);

		assert_eq!(registry.script_data("frm"), Some(data));
	}

	#[rstest]
	fn test_script_data_merge_keeps_other_keys() {
		let registry = AssetRegistry::new();

		registry.add_script_data("frm", json!({"multi": {"a": "1"}}), true);
		registry.add_script_data("frm", json!({"multi": {"b": "2"}}), true);
		assert_eq!(
			registry.script_data("frm"),
			Some(json!({"multi": {"a": "1", "b": "2"}}))
		);

		registry.add_script_data("frm", json!({"x": 1}), false);
		assert_eq!(registry.script_data("frm"), Some(json!({"x": 1})));
	}

	#[rstest]
	fn test_render_scripts_escapes_closing_tags() {
		let registry = AssetRegistry::new();
		registry.register_script("frm-field-script", "/field.js", true);
		registry.enqueue_script("frm-field-script");
		registry.add_script_data("frm", json!({"multi": {"a": "</script>"}}), true);

		let html = registry.render_scripts(true);

		assert!(html.contains("<\\/script>"));
		assert!(html.contains("<script id=\"frm-field-script-js\" src=\"/field.js\"></script>"));
		assert!(registry.render_scripts(false).is_empty());
	}

	#[rstest]
	fn test_unregistered_script_is_ignored() {
		let registry = AssetRegistry::new();
		registry.enqueue_script("missing");
		registry.localize_script("missing", "frm", json!({}));

		assert!(registry.scripts().is_empty());
	}
}
