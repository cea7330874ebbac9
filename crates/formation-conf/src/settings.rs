//! Renderer settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default location of the field assets relative to the theme root.
pub const DEFAULT_ASSET_PATH: &str = "/vendor/alanizcreative/wp-theme-formation/src/common/assets/public/";

/// Default namespace for handles, option keys and nonce names.
pub const DEFAULT_NAMESPACE: &str = "frm";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Invalid settings: {0}")]
	Parse(#[from] toml::de::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Context-wide classes appended to public (non-admin) field markup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleClasses {
	/// Appended to every control (`<input>`, `<select>`, ...)
	pub input: String,
	/// Appended to every field wrapper
	pub field: String,
	/// Appended to every label text element
	pub label: String,
}

/// Dimensions of an icon in the sprite sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
	pub w: u32,
	pub h: u32,
}

/// Main settings structure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Prefix for script handles, localized objects, option keys and field names
	pub namespace: String,

	/// Whether markup is rendered for an admin screen
	pub admin: bool,

	/// Base URL of the active theme
	pub theme_uri: String,

	/// Path of the field assets below `theme_uri`
	pub asset_path: String,

	/// Directory uploaded files are written to
	pub uploads_dir: PathBuf,

	/// Public URL of `uploads_dir`
	pub uploads_url: String,

	/// Key used to sign upload nonces (SECURITY WARNING: keep secret in production!)
	pub nonce_secret: String,

	/// Public context classes
	pub classes: StyleClasses,

	/// Sprite registry keyed by icon name
	pub sprites: HashMap<String, Sprite>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			namespace: DEFAULT_NAMESPACE.to_string(),
			admin: false,
			theme_uri: String::new(),
			asset_path: DEFAULT_ASSET_PATH.to_string(),
			uploads_dir: PathBuf::from("uploads"),
			uploads_url: "/uploads".to_string(),
			nonce_secret: String::new(),
			classes: StyleClasses::default(),
			sprites: HashMap::new(),
		}
	}
}

impl Settings {
	/// Create settings with the given namespace and every other value defaulted
	///
	/// # Examples
	///
	/// ```
	/// use formation_conf::Settings;
	///
	/// let settings = Settings::new("acme");
	/// assert_eq!(settings.namespace, "acme");
	/// assert!(!settings.admin);
	/// ```
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			..Self::default()
		}
	}

	/// Parse settings from a TOML document. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> SettingsResult<Self> {
		let settings: Self = toml::from_str(source)?;
		tracing::debug!(namespace = %settings.namespace, "Loaded formation settings");
		Ok(settings)
	}

	/// Read and parse a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}

	pub fn with_admin(mut self, admin: bool) -> Self {
		self.admin = admin;
		self
	}

	pub fn with_classes(mut self, classes: StyleClasses) -> Self {
		self.classes = classes;
		self
	}

	pub fn with_sprite(mut self, name: impl Into<String>, w: u32, h: u32) -> Self {
		self.sprites.insert(name.into(), Sprite { w, h });
		self
	}

	pub fn with_nonce_secret(mut self, secret: impl Into<String>) -> Self {
		self.nonce_secret = secret.into();
		self
	}

	pub fn sprite(&self, name: &str) -> Option<&Sprite> {
		self.sprites.get(name)
	}

	/// Prefix `value` with the namespace and an underscore
	///
	/// # Examples
	///
	/// ```
	/// use formation_conf::Settings;
	///
	/// assert_eq!(Settings::new("acme").namespaced("email"), "acme_email");
	/// ```
	pub fn namespaced(&self, value: &str) -> String {
		format!("{}_{}", self.namespace, value)
	}

	/// URL of an asset below the theme's field asset directory
	pub fn asset_url(&self, relative: &str) -> String {
		format!("{}{}{}", self.theme_uri, self.asset_path, relative)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = Settings::default();
		assert_eq!(settings.namespace, "frm");
		assert_eq!(settings.asset_path, DEFAULT_ASSET_PATH);
		assert!(settings.sprites.is_empty());
	}

	#[rstest]
	fn test_partial_toml_keeps_defaults() {
		let settings = Settings::from_toml_str("admin = true").unwrap();
		assert!(settings.admin);
		assert_eq!(settings.namespace, "frm");
		assert_eq!(settings.classes, StyleClasses::default());
	}

	#[rstest]
	fn test_invalid_toml() {
		let result = Settings::from_toml_str("admin = \"yes\"");
		assert!(matches!(result, Err(SettingsError::Parse(_))));
	}

	#[rstest]
	#[case("field.css", "https://site.test/theme/assets/field.css")]
	#[case("js/field.js", "https://site.test/theme/assets/js/field.js")]
	fn test_asset_url(#[case] relative: &str, #[case] expected: &str) {
		let mut settings = Settings::default();
		settings.theme_uri = "https://site.test/theme".to_string();
		settings.asset_path = "/assets/".to_string();
		assert_eq!(settings.asset_url(relative), expected);
	}
}
