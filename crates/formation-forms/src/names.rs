//! Field name parsing
//!
//! Field names are bracketed paths such as `links[%i][url]`. The leading part
//! before any bracket is the *top-level name*; `%i` is the repeat placeholder
//! substituted with the row index of a multi group; `[]` is an append marker
//! that is ignored when resolving values.
//!
//! [`FieldName`] tokenizes a name once so that placeholder substitution and
//! value resolution share the same view of its segments.

use serde_json::Value;
use std::fmt;

/// Repeat placeholder token
pub const INDEX_PLACEHOLDER: &str = "%i";

/// One bracketed part of a field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// `[key]`
	Key(String),
	/// `[%i]`
	Placeholder,
	/// `[]`
	Append,
	/// Text that is not a complete bracket group, kept verbatim
	Raw(String),
}

/// A tokenized field name
///
/// # Examples
///
/// ```
/// use formation_forms::names::{FieldName, Segment};
///
/// let name = FieldName::parse("links[%i][url]");
/// assert_eq!(name.base(), "links");
/// assert_eq!(name.segments()[0], Segment::Placeholder);
/// assert_eq!(name.with_index(2).to_string(), "links[2][url]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
	base: String,
	segments: Vec<Segment>,
}

impl FieldName {
	pub fn parse(name: &str) -> Self {
		let (base, mut rest) = match name.find('[') {
			Some(pos) => name.split_at(pos),
			None => (name, ""),
		};

		let mut segments = Vec::new();
		while !rest.is_empty() {
			if let Some(inner) = rest.strip_prefix('[') {
				match inner.find(']') {
					Some(end) => {
						let key = &inner[..end];
						segments.push(match key {
							"" => Segment::Append,
							INDEX_PLACEHOLDER => Segment::Placeholder,
							_ => Segment::Key(key.to_string()),
						});
						rest = &inner[end + 1..];
					}
					None => {
						segments.push(Segment::Raw(rest.to_string()));
						rest = "";
					}
				}
			} else {
				let end = rest.find('[').unwrap_or(rest.len());
				segments.push(Segment::Raw(rest[..end].to_string()));
				rest = &rest[end..];
			}
		}

		Self {
			base: base.to_string(),
			segments,
		}
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	pub fn has_placeholder(&self) -> bool {
		self.base.contains(INDEX_PLACEHOLDER)
			|| self.segments.iter().any(|segment| match segment {
				Segment::Placeholder => true,
				Segment::Key(text) | Segment::Raw(text) => text.contains(INDEX_PLACEHOLDER),
				Segment::Append => false,
			})
	}

	/// Replace every placeholder occurrence with `index`.
	pub fn with_index(&self, index: usize) -> Self {
		let index = index.to_string();
		let replace = |text: &str| text.replace(INDEX_PLACEHOLDER, &index);

		Self {
			base: replace(&self.base),
			segments: self
				.segments
				.iter()
				.map(|segment| match segment {
					Segment::Placeholder => Segment::Key(index.clone()),
					Segment::Key(text) => Segment::Key(replace(text)),
					Segment::Raw(text) => Segment::Raw(replace(text)),
					Segment::Append => Segment::Append,
				})
				.collect(),
		}
	}

	/// Keys used to walk nested data. Dots split keys further, append markers
	/// are skipped.
	pub fn path(&self) -> Vec<&str> {
		let mut path: Vec<&str> = self.base.split('.').collect();
		for segment in &self.segments {
			match segment {
				Segment::Key(key) => path.extend(key.split('.')),
				Segment::Placeholder => path.push(INDEX_PLACEHOLDER),
				Segment::Append => {}
				Segment::Raw(text) => {
					let trimmed = text.trim_start_matches('[').trim_end_matches(']');
					if !trimmed.is_empty() {
						path.extend(trimmed.split('.'));
					}
				}
			}
		}
		path
	}
}

impl fmt::Display for FieldName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.base)?;
		for segment in &self.segments {
			match segment {
				Segment::Key(key) => write!(f, "[{}]", key)?,
				Segment::Placeholder => write!(f, "[{}]", INDEX_PLACEHOLDER)?,
				Segment::Append => f.write_str("[]")?,
				Segment::Raw(text) => f.write_str(text)?,
			}
		}
		Ok(())
	}
}

/// Name without keys or indexes
///
/// # Examples
///
/// ```
/// use formation_forms::names::top_level_name;
///
/// assert_eq!(top_level_name("links[%i][url]"), "links");
/// assert_eq!(top_level_name("tags[]"), "tags");
/// assert_eq!(top_level_name("email"), "email");
/// ```
pub fn top_level_name(name: &str) -> &str {
	match name.find('[') {
		Some(pos) => &name[..pos],
		None => name,
	}
}

/// Replace the `%i` placeholder with an actual index
///
/// # Examples
///
/// ```
/// use formation_forms::names::index_name;
///
/// assert_eq!(index_name("a[%i][b]", 3), "a[3][b]");
/// assert_eq!(index_name("a[b]", 3), "a[b]");
/// ```
pub fn index_name(name: &str, index: usize) -> String {
	FieldName::parse(name).with_index(index).to_string()
}

/// Turn a bracketed name into an identifier usable as an HTML `id`.
///
/// Opening brackets and whitespace become underscores, closing brackets are
/// dropped and trailing underscores trimmed.
///
/// # Examples
///
/// ```
/// use formation_forms::names::format_id;
///
/// assert_eq!(format_id("a[3][b]"), "a_3_b");
/// assert_eq!(format_id("tags[]"), "tags");
/// assert_eq!(format_id("a"), "a");
/// ```
pub fn format_id(name: &str) -> String {
	let mut id = String::with_capacity(name.len());
	for ch in name.chars() {
		match ch {
			']' => {}
			'[' => id.push('_'),
			c if c.is_whitespace() => id.push('_'),
			c => id.push(c),
		}
	}
	id.trim_end_matches('_').to_string()
}

/// Look up a bracketed or dotted path in nested data.
///
/// Returns `None` when `key` is empty, a segment is missing or the value is
/// `null`.
///
/// # Examples
///
/// ```
/// use formation_forms::names::resolve_path;
/// use serde_json::json;
///
/// let data = json!({"links": [{"url": "https://a.test"}]});
/// assert_eq!(resolve_path(&data, "links[0][url]"), Some(&json!("https://a.test")));
/// assert_eq!(resolve_path(&data, "links.0.url"), Some(&json!("https://a.test")));
/// assert_eq!(resolve_path(&data, "links[1][url]"), None);
/// assert_eq!(resolve_path(&data, ""), None);
/// ```
pub fn resolve_path<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
	if key.is_empty() {
		return None;
	}

	let name = FieldName::parse(key);
	let mut value = data;
	for segment in name.path() {
		value = match value {
			Value::Object(map) => map.get(segment)?,
			Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}

	if value.is_null() { None } else { Some(value) }
}
