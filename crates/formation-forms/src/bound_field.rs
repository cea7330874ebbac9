use crate::context::RenderPosition;
use crate::field::{FieldConfig, Visibility};
use crate::names::{FieldName, format_id, resolve_path};
use serde_json::Value;

/// BoundField represents a field bound to render data at a position of its section
pub struct BoundField<'a> {
	field: &'a FieldConfig,
	data: &'a Value,
	position: RenderPosition,
}

impl<'a> BoundField<'a> {
	/// Bind a field to data
	///
	/// # Examples
	///
	/// ```
	/// use formation_forms::{BoundField, FieldConfig, RenderPosition};
	/// use serde_json::json;
	///
	/// let field = FieldConfig::text("user[name]");
	/// let data = json!({"user": {"name": "Ada"}});
	///
	/// let bound = BoundField::new(&field, &data, RenderPosition::single());
	/// assert_eq!(bound.html_name(), "user[name]");
	/// assert_eq!(bound.value(), "Ada");
	/// ```
	pub fn new(field: &'a FieldConfig, data: &'a Value, position: RenderPosition) -> Self {
		Self {
			field,
			data,
			position,
		}
	}

	pub fn field(&self) -> &FieldConfig {
		self.field
	}

	pub fn position(&self) -> RenderPosition {
		self.position
	}

	/// The configured name, placeholders untouched
	pub fn template_name(&self) -> &str {
		self.field.name()
	}

	/// Get the HTML name attribute (index substituted inside multi rows)
	///
	/// # Examples
	///
	/// ```
	/// use formation_forms::{BoundField, FieldConfig, RenderPosition};
	/// use serde_json::Value;
	///
	/// let field = FieldConfig::text("links[%i][url]");
	///
	/// let row = BoundField::new(&field, &Value::Null, RenderPosition::row(2));
	/// assert_eq!(row.html_name(), "links[2][url]");
	///
	/// let template = BoundField::new(&field, &Value::Null, RenderPosition::template());
	/// assert_eq!(template.html_name(), "links[%i][url]");
	/// ```
	pub fn html_name(&self) -> String {
		if self.position.multi && !self.position.copy {
			FieldName::parse(self.template_name())
				.with_index(self.position.index)
				.to_string()
		} else {
			self.template_name().to_string()
		}
	}

	/// Get the HTML id attribute
	pub fn id_for_label(&self) -> String {
		format_id(&self.html_name())
	}

	/// Value found in data for this field, ignoring the static value
	pub fn data_value(&self) -> Option<&'a Value> {
		match self.data {
			Value::Object(_) | Value::Array(_) => resolve_path(self.data, &self.html_name()),
			Value::Null => None,
			scalar => Some(scalar),
		}
	}

	/// Value to render: a non-empty static value wins over data
	pub fn value(&self) -> String {
		if !self.field.value.is_empty() {
			return self.field.value.clone();
		}
		self.data_value().map(value_to_text).unwrap_or_default()
	}

	/// Checkboxes and radios are checked when data holds their option value
	///
	/// # Examples
	///
	/// ```
	/// use formation_forms::{BoundField, FieldConfig, FieldKind, RenderPosition};
	/// use serde_json::json;
	///
	/// let field = FieldConfig::new("newsletter", FieldKind::Checkbox).with_value("yes");
	///
	/// let data = json!({"newsletter": "yes"});
	/// assert!(BoundField::new(&field, &data, RenderPosition::single()).is_checked());
	///
	/// let data = json!({"newsletter": "no"});
	/// assert!(!BoundField::new(&field, &data, RenderPosition::single()).is_checked());
	/// ```
	pub fn is_checked(&self) -> bool {
		self.field.kind.is_choice()
			&& self
				.data_value()
				.map(|value| value_to_text(value) == self.field.value)
				.unwrap_or(false)
	}

	/// Whether the wrapper starts out hidden
	pub fn is_hidden(&self) -> bool {
		match self.field.visibility {
			Visibility::Visible => false,
			Visibility::HiddenIfEmpty => self.value().is_empty(),
			Visibility::AlwaysHidden => true,
		}
	}

	pub fn is_required(&self) -> bool {
		self.field.effective_attrs().is_required()
	}
}

/// Text form of a data value. Structured values have no text form.
pub fn value_to_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Number(number) => number.to_string(),
		Value::Bool(true) => "1".to_string(),
		Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldKind;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_bound_field_basic() {
		let field = FieldConfig::text("user[email]");
		let data = json!({"user": {"email": "a@b.com"}});

		let bound = BoundField::new(&field, &data, RenderPosition::single());

		assert_eq!(bound.html_name(), "user[email]");
		assert_eq!(bound.id_for_label(), "user_email");
		assert_eq!(bound.value(), "a@b.com");
		assert!(!bound.is_hidden());
	}

	#[rstest]
	fn test_static_value_wins() {
		let field = FieldConfig::text("title").with_value("Fixed");
		let data = json!({"title": "From data"});

		let bound = BoundField::new(&field, &data, RenderPosition::single());
		assert_eq!(bound.value(), "Fixed");
	}

	#[rstest]
	fn test_scalar_data_is_the_value() {
		let field = FieldConfig::text("anything");
		let data = json!(42);

		let bound = BoundField::new(&field, &data, RenderPosition::single());
		assert_eq!(bound.value(), "42");
	}

	#[rstest]
	fn test_row_resolves_indexed_value() {
		let field = FieldConfig::text("items[%i][v]");
		let data = json!({"items": [{"v": 1}, {"v": 2}]});

		let bound = BoundField::new(&field, &data, RenderPosition::row(1));

		assert_eq!(bound.id_for_label(), "items_1_v");
		assert_eq!(bound.value(), "2");
	}

	#[rstest]
	#[case("yes", true)]
	#[case("no", false)]
	fn test_checkbox_checked(#[case] stored: &str, #[case] expected: bool) {
		let field = FieldConfig::new("agree", FieldKind::Radio).with_value("yes");
		let data = json!({"agree": stored});

		let bound = BoundField::new(&field, &data, RenderPosition::single());
		assert_eq!(bound.is_checked(), expected);
	}

	#[rstest]
	fn test_absent_data_never_checks() {
		let field = FieldConfig::new("agree", FieldKind::Checkbox);
		let data = json!({});

		assert!(!BoundField::new(&field, &data, RenderPosition::single()).is_checked());
	}

	#[rstest]
	#[case(Visibility::HiddenIfEmpty, json!({}), true)]
	#[case(Visibility::HiddenIfEmpty, json!({"a": "x"}), false)]
	#[case(Visibility::AlwaysHidden, json!({"a": "x"}), true)]
	#[case(Visibility::Visible, json!({}), false)]
	fn test_visibility(#[case] visibility: Visibility, #[case] data: Value, #[case] hidden: bool) {
		let field = FieldConfig::text("a").with_visibility(visibility);
		let bound = BoundField::new(&field, &data, RenderPosition::single());

		assert_eq!(bound.is_hidden(), hidden);
	}
}
