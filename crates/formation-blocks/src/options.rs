//! Site option storage

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Option key of the site administrator's email
pub const ADMIN_EMAIL: &str = "admin_email";

/// Option key of the site name
pub const BLOG_NAME: &str = "blogname";

/// Persistent key/value site options
pub trait OptionStore: Send + Sync {
	fn get(&self, key: &str) -> Option<Value>;

	/// Store `value` under `key`, replacing any previous value
	fn set(&self, key: &str, value: Value);

	/// String option, empty when absent or not a string
	fn get_str(&self, key: &str) -> String {
		match self.get(key) {
			Some(Value::String(text)) => text,
			_ => String::new(),
		}
	}
}

/// In-memory option store
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
	options: RwLock<HashMap<String, Value>>,
}

impl MemoryOptionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store seeded with the site name and administrator email
	///
	/// # Examples
	///
	/// ```
	/// use formation_blocks::{MemoryOptionStore, OptionStore};
	///
	/// let store = MemoryOptionStore::with_site("Acme", "admin@acme.test");
	/// assert_eq!(store.get_str("blogname"), "Acme");
	/// assert_eq!(store.get_str("missing"), "");
	/// ```
	pub fn with_site(name: &str, admin_email: &str) -> Self {
		let store = Self::new();
		store.set(BLOG_NAME, Value::String(name.to_string()));
		store.set(ADMIN_EMAIL, Value::String(admin_email.to_string()));
		store
	}

	pub fn len(&self) -> usize {
		self.options.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.options.read().is_empty()
	}
}

impl OptionStore for MemoryOptionStore {
	fn get(&self, key: &str) -> Option<Value> {
		self.options.read().get(key).cloned()
	}

	fn set(&self, key: &str, value: Value) {
		self.options.write().insert(key.to_string(), value);
	}
}
