//! Typed field configuration

use crate::escaping::escape_attribute;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default rich text toolbar
pub const DEFAULT_TOOLBAR: &str = "bold,italic,separator,bullist,numlist,blockquote,separator,link";

/// A value/label pair of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
	pub value: String,
	pub label: String,
}

impl Choice {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
	#[default]
	File,
	Image,
}

impl FileType {
	pub fn as_str(&self) -> &'static str {
		match self {
			FileType::File => "file",
			FileType::Image => "image",
		}
	}

	/// Capitalized form used in button text
	pub fn title(&self) -> &'static str {
		match self {
			FileType::File => "File",
			FileType::Image => "Image",
		}
	}
}

/// Options handed to the rich text editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextOptions {
	pub rows: u32,
	pub quicktags: bool,
	pub wpautop: bool,
	/// Wrap content in paragraphs. When `false` the editor must not force a root block.
	pub p_tags: bool,
	pub toolbar: String,
}

impl Default for RichTextOptions {
	fn default() -> Self {
		Self {
			rows: 4,
			quicktags: false,
			wpautop: false,
			p_tags: true,
			toolbar: DEFAULT_TOOLBAR.to_string(),
		}
	}
}

/// The closed set of renderable field kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	Text,
	Email,
	Number,
	/// Value of the field is the option value, checked when data matches it
	Checkbox,
	/// Value of the field is the option value, checked when data matches it
	Radio,
	Textarea,
	Select { options: Vec<Choice> },
	File { file_type: FileType, accept: String },
	RichText(RichTextOptions),
}

impl FieldKind {
	/// Type name used in markup (`type` attribute and `o-field__{type}` class)
	pub fn type_name(&self) -> &'static str {
		match self {
			FieldKind::Text => "text",
			FieldKind::Email => "email",
			FieldKind::Number => "number",
			FieldKind::Checkbox => "checkbox",
			FieldKind::Radio => "radio",
			FieldKind::Textarea => "textarea",
			FieldKind::Select { .. } => "select",
			FieldKind::File { .. } => "file",
			FieldKind::RichText(_) => "richtext",
		}
	}

	pub fn is_choice(&self) -> bool {
		matches!(self, FieldKind::Checkbox | FieldKind::Radio)
	}
}

impl fmt::Display for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.type_name())
	}
}

/// When the field wrapper starts out hidden
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
	#[default]
	Visible,
	/// Hidden until the field has a value
	HiddenIfEmpty,
	AlwaysHidden,
}

/// Placement of the label text relative to the control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelPosition {
	#[default]
	Above,
	Below,
}

/// Ordered HTML attribute map
///
/// # Examples
///
/// ```
/// use formation_forms::field::Attributes;
///
/// let mut attrs = Attributes::new();
/// attrs.insert("rows", "8");
/// attrs.insert("data-label", "Say \"hi\"");
/// attrs.insert("rows", "10");
///
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs.to_html(), r#"rows="10" data-label="Say &quot;hi&quot;""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Insert or replace an attribute, keeping its original position on replace.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();
		match self.0.iter_mut().find(|(existing, _)| *existing == name) {
			Some(entry) => entry.1 = value,
			None => self.0.push((name, value)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|(existing, _)| existing == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether the attributes mark the field as required for assistive tech
	pub fn is_required(&self) -> bool {
		self.get("aria-required") == Some("true")
	}

	/// Serialize as space separated `name="value"` pairs
	pub fn to_html(&self) -> String {
		self.0
			.iter()
			.map(|(name, value)| format!("{}=\"{}\"", escape_attribute(name), escape_attribute(value)))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attrs = Attributes::new();
		for (name, value) in iter {
			attrs.insert(name, value);
		}
		attrs
	}
}

/// Configuration of a single field
///
/// `label`, `before` and `after` are trusted markup and emitted verbatim;
/// values coming from data are always escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConfig {
	/// Bracketed path, may contain the `%i` repeat placeholder
	pub name: Option<String>,
	pub kind: FieldKind,
	pub label: Option<String>,
	pub label_hidden: bool,
	pub label_position: LabelPosition,
	/// Extra classes on the field wrapper
	pub field_class: String,
	/// Extra classes on the control
	pub class: String,
	pub attrs: Attributes,
	pub required: bool,
	pub placeholder: String,
	/// Static value. Overrides data for inputs, is the option value for checkboxes and radios.
	pub value: String,
	pub visibility: Visibility,
	pub before: String,
	pub after: String,
}

impl FieldConfig {
	/// Create a field of the given kind with every other option defaulted
	///
	/// # Examples
	///
	/// ```
	/// use formation_forms::field::{FieldConfig, FieldKind};
	///
	/// let field = FieldConfig::new("email", FieldKind::Email).required();
	/// assert_eq!(field.name.as_deref(), Some("email"));
	/// assert!(field.required);
	/// ```
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: Some(name.into()),
			..Self::unnamed(kind)
		}
	}

	/// A field that does not round-trip data (e.g. a decorative input)
	pub fn unnamed(kind: FieldKind) -> Self {
		Self {
			name: None,
			kind,
			label: None,
			label_hidden: false,
			label_position: LabelPosition::Above,
			field_class: String::new(),
			class: String::new(),
			attrs: Attributes::new(),
			required: false,
			placeholder: String::new(),
			value: String::new(),
			visibility: Visibility::Visible,
			before: String::new(),
			after: String::new(),
		}
	}

	pub fn text(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Text)
	}

	pub fn select(name: impl Into<String>, options: Vec<Choice>) -> Self {
		Self::new(name, FieldKind::Select { options })
	}

	pub fn file(name: impl Into<String>, file_type: FileType) -> Self {
		Self::new(
			name,
			FieldKind::File {
				file_type,
				accept: String::new(),
			},
		)
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn hide_label(mut self) -> Self {
		self.label_hidden = true;
		self
	}

	pub fn with_label_position(mut self, position: LabelPosition) -> Self {
		self.label_position = position;
		self
	}

	pub fn with_field_class(mut self, class: impl Into<String>) -> Self {
		self.field_class = class.into();
		self
	}

	pub fn with_class(mut self, class: impl Into<String>) -> Self {
		self.class = class.into();
		self
	}

	pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.insert(name, value);
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = placeholder.into();
		self
	}

	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = value.into();
		self
	}

	pub fn with_visibility(mut self, visibility: Visibility) -> Self {
		self.visibility = visibility;
		self
	}

	pub fn with_before(mut self, html: impl Into<String>) -> Self {
		self.before = html.into();
		self
	}

	pub fn with_after(mut self, html: impl Into<String>) -> Self {
		self.after = html.into();
		self
	}

	pub fn name(&self) -> &str {
		self.name.as_deref().unwrap_or_default()
	}

	/// Label text to render, if any
	pub fn visible_label(&self) -> Option<&str> {
		match &self.label {
			Some(label) if !label.is_empty() && !self.label_hidden => Some(label),
			_ => None,
		}
	}

	/// Attributes as rendered: `required` implies `aria-required="true"`
	pub fn effective_attrs(&self) -> Attributes {
		let mut attrs = self.attrs.clone();
		if self.required && !attrs.contains("aria-required") {
			attrs.insert("aria-required", "true");
		}
		attrs
	}
}
