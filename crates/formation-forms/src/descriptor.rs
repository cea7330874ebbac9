//! Loose field descriptors and default merging
//!
//! Descriptors are the key/value form of field and section configuration as
//! it arrives from block attributes, JSON or hand-written `json!` literals.
//! A descriptor is first deep-merged over the documented defaults of its
//! kind, then deserialized with unknown keys rejected, and finally converted
//! into the typed [`FieldConfig`] / [`SectionConfig`].
//!
//! ```
//! use formation_forms::descriptor::SectionDescriptor;
//! use formation_forms::field::FieldKind;
//! use formation_forms::section::Node;
//! use serde_json::json;
//!
//! let section = SectionDescriptor::parse(&json!({
//!     "name": "links",
//!     "multi": true,
//!     "fields": [
//!         {"name": "links[%i][url]", "type": "email", "label": "URL"}
//!     ]
//! })).unwrap();
//!
//! assert!(section.multi);
//! match &section.nodes[0] {
//!     Node::Field(field) => assert_eq!(field.kind, FieldKind::Email),
//!     Node::Section(_) => unreachable!(),
//! }
//! ```

use crate::field::{
	Attributes, Choice, DEFAULT_TOOLBAR, FieldConfig, FieldKind, FileType, LabelPosition,
	RichTextOptions, Visibility,
};
use crate::section::{Node, SectionConfig};
use serde::Deserialize;
use serde_json::{Map, Value, json};

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
	#[error("Unknown field type: {0}")]
	UnknownType(String),
	#[error("Expected an object descriptor, found {0}")]
	NotAnObject(String),
	#[error("Invalid descriptor: {0}")]
	Invalid(#[from] serde_json::Error),
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Which default record a descriptor is merged against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
	Render,
	Field,
}

/// Keys that belong to the section (render) record rather than to a field
const RENDER_ONLY_KEYS: [&str; 3] = ["fields", "data", "multi"];

/// Documented defaults of a descriptor kind
pub fn defaults(kind: DescriptorKind) -> Value {
	match kind {
		DescriptorKind::Render => json!({
			"name": "",
			"label": null,
			"fields": [],
			"data": null,
			"multi": false,
		}),
		DescriptorKind::Field => json!({
			"name": null,
			"type": "text",
			"label": null,
			"label_hidden": false,
			"label_after": false,
			"attr": {},
			"field_class": "",
			"class": "",
			"placeholder": "",
			"options": [],
			"required": false,
			"hidden": false,
			"before": "",
			"after": "",
			"value": "",
			"file_type": "file",
			"accept": "",
			"rows": 4,
			"quicktags": false,
			"wpautop": false,
			"p_tags": true,
			"toolbar": DEFAULT_TOOLBAR,
		}),
	}
}

/// Recursively replace values of `base` with those of `overlay`.
///
/// Objects merge key by key and arrays merge index by index; any other
/// combination takes the overlay value. Keys only present in `base` survive.
///
/// # Examples
///
/// ```
/// use formation_forms::descriptor::deep_merge;
/// use serde_json::json;
///
/// let base = json!({"attr": {"rows": 4, "class": "a"}, "list": [1, 2, 3]});
/// let merged = deep_merge(&base, &json!({"attr": {"rows": 8}, "list": [9]}));
///
/// assert_eq!(merged, json!({"attr": {"rows": 8, "class": "a"}, "list": [9, 2, 3]}));
/// ```
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
	match (base, overlay) {
		(Value::Object(base), Value::Object(overlay)) => {
			let mut merged = base.clone();
			for (key, value) in overlay {
				let next = match base.get(key) {
					Some(existing) => deep_merge(existing, value),
					None => value.clone(),
				};
				merged.insert(key.clone(), next);
			}
			Value::Object(merged)
		}
		(Value::Array(base), Value::Array(overlay)) => {
			let mut merged = base.clone();
			for (index, value) in overlay.iter().enumerate() {
				match merged.get_mut(index) {
					Some(existing) => *existing = deep_merge(existing, value),
					None => merged.push(value.clone()),
				}
			}
			Value::Array(merged)
		}
		(_, overlay) => overlay.clone(),
	}
}

/// Merge a partial descriptor over the defaults of `kind`
///
/// # Examples
///
/// ```
/// use formation_forms::descriptor::{DescriptorKind, defaults, merge_defaults};
/// use serde_json::json;
///
/// assert_eq!(merge_defaults(DescriptorKind::Field, &json!({})), defaults(DescriptorKind::Field));
/// assert_eq!(merge_defaults(DescriptorKind::Field, &json!({"type": "email"}))["type"], "email");
/// ```
pub fn merge_defaults(kind: DescriptorKind, partial: &Value) -> Value {
	deep_merge(&defaults(kind), partial)
}

/// Field descriptor with every key present
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
	pub name: Value,
	#[serde(rename = "type")]
	pub field_type: String,
	pub label: Value,
	pub label_hidden: bool,
	pub label_after: bool,
	pub attr: Value,
	pub field_class: String,
	pub class: String,
	pub placeholder: String,
	pub options: Value,
	pub required: bool,
	pub hidden: Value,
	pub before: String,
	pub after: String,
	pub value: Value,
	pub file_type: FileType,
	pub accept: String,
	pub rows: u32,
	pub quicktags: bool,
	pub wpautop: bool,
	pub p_tags: bool,
	pub toolbar: String,
}

impl FieldDescriptor {
	/// Merge `partial` over the field defaults and deserialize it
	pub fn from_value(partial: &Value) -> DescriptorResult<Self> {
		ensure_object(partial)?;
		let merged = merge_defaults(DescriptorKind::Field, partial);
		Ok(serde_json::from_value(merged)?)
	}

	/// Parse straight into a typed field
	pub fn parse(partial: &Value) -> DescriptorResult<FieldConfig> {
		Self::from_value(partial)?.into_config()
	}

	pub fn into_config(self) -> DescriptorResult<FieldConfig> {
		let kind = match self.field_type.as_str() {
			"text" => FieldKind::Text,
			"email" => FieldKind::Email,
			"number" => FieldKind::Number,
			"checkbox" => FieldKind::Checkbox,
			"radio" => FieldKind::Radio,
			"textarea" => FieldKind::Textarea,
			"select" => FieldKind::Select {
				options: parse_options(&self.options),
			},
			"file" => FieldKind::File {
				file_type: self.file_type,
				accept: self.accept,
			},
			"richtext" => FieldKind::RichText(RichTextOptions {
				rows: self.rows,
				quicktags: self.quicktags,
				wpautop: self.wpautop,
				p_tags: self.p_tags,
				toolbar: self.toolbar,
			}),
			other => return Err(DescriptorError::UnknownType(other.to_string())),
		};

		Ok(FieldConfig {
			name: value_text(&self.name),
			kind,
			label: value_text(&self.label),
			label_hidden: self.label_hidden,
			label_position: if self.label_after {
				LabelPosition::Below
			} else {
				LabelPosition::Above
			},
			field_class: self.field_class,
			class: self.class,
			attrs: parse_attributes(&self.attr),
			required: self.required,
			placeholder: self.placeholder,
			value: value_text(&self.value).unwrap_or_default(),
			visibility: parse_visibility(&self.hidden),
			before: self.before,
			after: self.after,
		})
	}
}

/// Section descriptor with every key present
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDescriptor {
	pub name: String,
	pub label: Value,
	pub fields: Vec<Value>,
	pub data: Value,
	pub multi: bool,
}

impl SectionDescriptor {
	/// Parse a section descriptor into a typed section.
	///
	/// A descriptor without `fields` is itself a single field: its render keys
	/// (`data`, `multi`) configure the section and the rest describes the field.
	/// Entries of `fields` that carry their own `fields` are nested sections.
	pub fn parse(partial: &Value) -> DescriptorResult<SectionConfig> {
		let object = ensure_object(partial)?;

		let has_fields = matches!(object.get("fields"), Some(Value::Array(fields)) if !fields.is_empty());
		if has_fields {
			let merged = merge_defaults(DescriptorKind::Render, partial);
			let descriptor: Self = serde_json::from_value(merged)?;
			return descriptor.into_config();
		}

		let mut render = Map::new();
		let mut field = Map::new();
		for (key, value) in object {
			if RENDER_ONLY_KEYS.contains(&key.as_str()) {
				render.insert(key.clone(), value.clone());
			} else {
				field.insert(key.clone(), value.clone());
			}
		}
		if let Some(name) = field.get("name").and_then(Value::as_str) {
			render.insert("name".to_string(), Value::String(name.to_string()));
		}
		render.remove("fields");

		let merged = merge_defaults(DescriptorKind::Render, &Value::Object(render));
		let descriptor: Self = serde_json::from_value(merged)?;
		let field = FieldDescriptor::parse(&Value::Object(field))?;

		Ok(SectionConfig {
			name: descriptor.name,
			label: None,
			multi: descriptor.multi,
			data: descriptor.data,
			nodes: vec![Node::Field(field)],
		})
	}

	pub fn into_config(self) -> DescriptorResult<SectionConfig> {
		let nodes = self
			.fields
			.iter()
			.map(|entry| {
				if entry.get("fields").is_some() {
					Self::parse(entry).map(Node::Section)
				} else {
					FieldDescriptor::parse(entry).map(Node::Field)
				}
			})
			.collect::<DescriptorResult<Vec<_>>>()?;

		Ok(SectionConfig {
			name: self.name,
			label: value_text(&self.label),
			multi: self.multi,
			data: self.data,
			nodes,
		})
	}
}

fn ensure_object(value: &Value) -> DescriptorResult<&Map<String, Value>> {
	value
		.as_object()
		.ok_or_else(|| DescriptorError::NotAnObject(kind_of(value).to_string()))
}

fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Text form of a scalar descriptor value. `false`, `null`, empty strings and
/// nested values count as absent.
pub fn value_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) if !text.is_empty() => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(true) => Some("1".to_string()),
		_ => None,
	}
}

/// Options as value/label pairs.
///
/// Accepts a `{value: label}` object, a list of `{value, label}` records, a
/// list of single-entry `{value: label}` objects or a list of scalars.
/// Anything else yields no options.
pub fn parse_options(options: &Value) -> Vec<Choice> {
	let label_of = |value: &Value| value_text(value).unwrap_or_default();

	match options {
		Value::Object(map) => map
			.iter()
			.map(|(value, label)| Choice::new(value.clone(), label_of(label)))
			.collect(),
		Value::Array(items) => items
			.iter()
			.flat_map(|item| match item {
				Value::Object(record) if record.contains_key("value") => {
					let value = label_of(&record["value"]);
					let label = record.get("label").map(label_of).unwrap_or_else(|| value.clone());
					vec![Choice::new(value, label)]
				}
				Value::Object(map) => map
					.iter()
					.map(|(value, label)| Choice::new(value.clone(), label_of(label)))
					.collect(),
				Value::String(_) | Value::Number(_) => {
					let text = label_of(item);
					vec![Choice::new(text.clone(), text)]
				}
				_ => Vec::new(),
			})
			.collect(),
		_ => Vec::new(),
	}
}

/// Attribute map from an object. Booleans render as `"true"`/`"false"`.
pub fn parse_attributes(attr: &Value) -> Attributes {
	let Value::Object(map) = attr else {
		return Attributes::new();
	};

	map.iter()
		.filter_map(|(name, value)| {
			let text = match value {
				Value::String(text) => text.clone(),
				Value::Number(number) => number.to_string(),
				Value::Bool(flag) => flag.to_string(),
				_ => return None,
			};
			Some((name.clone(), text))
		})
		.collect()
}

/// Visibility from the loose `hidden` key
pub fn parse_visibility(hidden: &Value) -> Visibility {
	match hidden {
		Value::Null | Value::Bool(false) => Visibility::Visible,
		Value::Bool(true) => Visibility::HiddenIfEmpty,
		Value::Number(number) if number.as_f64() == Some(0.0) => Visibility::Visible,
		Value::Number(_) => Visibility::HiddenIfEmpty,
		Value::String(text) if text.is_empty() => Visibility::Visible,
		Value::String(text) if text == "always" => Visibility::AlwaysHidden,
		Value::String(text) => {
			tracing::warn!(
				hidden = %text,
				"Unrecognized `hidden` value treated as hidden-if-empty; use `\"always\"` to force hidden"
			);
			Visibility::HiddenIfEmpty
		}
		Value::Array(_) | Value::Object(_) => Visibility::Visible,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(DescriptorKind::Render)]
	#[case(DescriptorKind::Field)]
	fn test_merge_empty_is_defaults(#[case] kind: DescriptorKind) {
		assert_eq!(merge_defaults(kind, &json!({})), defaults(kind));
	}

	#[rstest]
	fn test_nested_attr_override_keeps_default_keys() {
		let base = deep_merge(
			&defaults(DescriptorKind::Field),
			&json!({"attr": {"rows": 8, "data-kind": "note"}}),
		);

		let merged = deep_merge(&base, &json!({"attr": {"x": 1}}));

		assert_eq!(merged["attr"], json!({"rows": 8, "data-kind": "note", "x": 1}));
		assert_eq!(merged["type"], "text");
	}

	#[rstest]
	fn test_scalar_overlay_replaces_structure() {
		assert_eq!(deep_merge(&json!({"a": 1}), &json!("x")), json!("x"));
		assert_eq!(deep_merge(&json!([1, 2]), &json!({"a": 1})), json!({"a": 1}));
	}

	#[rstest]
	fn test_field_descriptor_defaults() {
		let field = FieldDescriptor::parse(&json!({"name": "title"})).unwrap();

		assert_eq!(field.name.as_deref(), Some("title"));
		assert_eq!(field.kind, FieldKind::Text);
		assert_eq!(field.label, None);
		assert_eq!(field.visibility, Visibility::Visible);
	}

	#[rstest]
	fn test_field_descriptor_false_label_is_absent() {
		let field = FieldDescriptor::parse(&json!({"name": "a", "label": false})).unwrap();
		assert_eq!(field.label, None);
	}

	#[rstest]
	fn test_unknown_key_is_rejected() {
		let result = FieldDescriptor::parse(&json!({"name": "a", "lable": "Typo"}));
		assert!(matches!(result, Err(DescriptorError::Invalid(_))));
	}

	#[rstest]
	fn test_unknown_type_is_rejected() {
		let result = FieldDescriptor::parse(&json!({"name": "a", "type": "color"}));
		assert!(matches!(result, Err(DescriptorError::UnknownType(t)) if t == "color"));
	}

	#[rstest]
	fn test_non_object_is_rejected() {
		let result = FieldDescriptor::parse(&json!(["a"]));
		assert!(matches!(result, Err(DescriptorError::NotAnObject(_))));
	}

	#[rstest]
	fn test_richtext_and_file_options() {
		let rich = FieldDescriptor::parse(&json!({"name": "bio", "type": "richtext", "rows": 10, "p_tags": false})).unwrap();
		match rich.kind {
			FieldKind::RichText(options) => {
				assert_eq!(options.rows, 10);
				assert!(!options.p_tags);
				assert_eq!(options.toolbar, DEFAULT_TOOLBAR);
			}
			other => panic!("unexpected kind {other}"),
		}

		let file = FieldDescriptor::parse(&json!({"name": "logo", "type": "file", "file_type": "image", "accept": "image/*"})).unwrap();
		assert_eq!(
			file.kind,
			FieldKind::File {
				file_type: FileType::Image,
				accept: "image/*".to_string()
			}
		);
	}

	#[rstest]
	#[case(json!({"1": "One", "2": "Two"}))]
	#[case(json!([{"1": "One"}, {"2": "Two"}]))]
	#[case(json!([{"value": 1, "label": "One"}, {"value": "2", "label": "Two"}]))]
	fn test_parse_options_shapes(#[case] options: Value) {
		assert_eq!(
			parse_options(&options),
			vec![Choice::new("1", "One"), Choice::new("2", "Two")]
		);
	}

	#[rstest]
	#[case(json!("nope"))]
	#[case(json!(null))]
	#[case(json!([]))]
	#[case(json!([null, true]))]
	fn test_malformed_options_are_empty(#[case] options: Value) {
		assert!(parse_options(&options).is_empty());
	}

	#[rstest]
	fn test_parse_attributes() {
		let attrs = parse_attributes(&json!({"aria-required": true, "rows": 8, "data-x": "y", "skip": null}));

		assert_eq!(attrs.get("aria-required"), Some("true"));
		assert_eq!(attrs.get("rows"), Some("8"));
		assert_eq!(attrs.get("data-x"), Some("y"));
		assert!(!attrs.contains("skip"));
		assert!(parse_attributes(&json!([])).is_empty());
	}

	#[rstest]
	#[case(json!(false), Visibility::Visible)]
	#[case(json!(true), Visibility::HiddenIfEmpty)]
	#[case(json!("always"), Visibility::AlwaysHidden)]
	#[case(json!("100"), Visibility::HiddenIfEmpty)]
	#[case(json!(""), Visibility::Visible)]
	#[case(json!(0), Visibility::Visible)]
	fn test_parse_visibility(#[case] hidden: Value, #[case] expected: Visibility) {
		assert_eq!(parse_visibility(&hidden), expected);
	}

	#[rstest]
	fn test_section_without_fields_is_a_single_field() {
		let section = SectionDescriptor::parse(&json!({
			"name": "user[email]",
			"type": "email",
			"label": "Email",
			"data": {"user": {"email": "a@b.com"}}
		}))
		.unwrap();

		assert_eq!(section.name, "user[email]");
		assert_eq!(section.label, None);
		assert!(!section.multi);
		assert_eq!(section.data, json!({"user": {"email": "a@b.com"}}));
		assert_eq!(section.nodes.len(), 1);
		match &section.nodes[0] {
			Node::Field(field) => assert_eq!(field.label.as_deref(), Some("Email")),
			Node::Section(_) => panic!("expected a field"),
		}
	}

	#[rstest]
	fn test_nested_sections() {
		let section = SectionDescriptor::parse(&json!({
			"name": "profile",
			"label": "Profile",
			"fields": [
				{"name": "profile[name]"},
				{"name": "profile[links]", "multi": true, "fields": [{"name": "profile[links][%i]"}]}
			]
		}))
		.unwrap();

		assert_eq!(section.label.as_deref(), Some("Profile"));
		assert!(matches!(section.nodes[0], Node::Field(_)));
		match &section.nodes[1] {
			Node::Section(nested) => {
				assert!(nested.multi);
				assert_eq!(nested.name, "profile[links]");
				assert_eq!(nested.nodes.len(), 1);
			}
			Node::Field(_) => panic!("expected a nested section"),
		}
	}

	#[rstest]
	fn test_section_rejects_field_keys_next_to_fields() {
		let result = SectionDescriptor::parse(&json!({
			"name": "a",
			"type": "email",
			"fields": [{"name": "a"}]
		}));
		assert!(matches!(result, Err(DescriptorError::Invalid(_))));
	}
}
