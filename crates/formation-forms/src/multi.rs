//! Multi (repeatable) field groups

use serde_json::Value;

/// Button appending a row to a multi group
pub const MULTI_ADD_BUTTON: &str = concat!(
	"<button type=\"button\" class=\"o-multi__button --add\" data-type=\"add\">",
	"<span class=\"u-visually-hidden\">Add Input</span>",
	"<span class=\"dashicons dashicons-plus o-multi__icon\"></span>",
	"</button>"
);

/// Button removing a row of a multi group
pub const MULTI_REMOVE_BUTTON: &str = concat!(
	"<button type=\"button\" class=\"o-multi__button --remove\" data-type=\"remove\">",
	"<span class=\"u-visually-hidden\">Remove Input</span>",
	"<span class=\"dashicons dashicons-minus o-multi__icon\"></span>",
	"</button>"
);

/// Number of rows to render for a multi group named `top`
///
/// The rows stored under `data[top]` when that is a list, otherwise the rows of
/// `data` itself when it is a list. Always at least one.
pub fn repeat_count(top: &str, data: &Value) -> usize {
	let rows = match data.get(top) {
		Some(Value::Array(rows)) => rows.len(),
		_ => match data {
			Value::Array(rows) => rows.len(),
			_ => 0,
		},
	};
	rows.max(1)
}

/// Drop incomplete rows from submitted multi group data.
///
/// Every list or map entry that is itself a map is removed when any of the
/// `required` keys holds an empty value (`null`, `false`, `0`, `""`, `"0"`,
/// an empty list or map). Nested groups are filtered the same way. Lists are
/// compacted, so row indexes shift down.
///
/// # Examples
///
/// ```
/// use formation_forms::multi::filter_multi_fields;
/// use serde_json::json;
///
/// let mut links = json!([
///     {"url": "https://a.test", "label": "A"},
///     {"url": "", "label": "Empty"},
/// ]);
/// filter_multi_fields(&mut links, &["url"]);
///
/// assert_eq!(links, json!([{"url": "https://a.test", "label": "A"}]));
/// ```
pub fn filter_multi_fields(value: &mut Value, required: &[&str]) {
	let incomplete = |entry: &Value| match entry {
		Value::Object(fields) => fields
			.iter()
			.any(|(key, value)| required.contains(&key.as_str()) && is_empty(value)),
		_ => false,
	};

	match value {
		Value::Array(rows) => {
			rows.retain(|row| !incomplete(row));
			for row in rows.iter_mut() {
				filter_multi_fields(row, required);
			}
		}
		Value::Object(entries) => {
			entries.retain(|_, entry| !incomplete(entry));
			for (_, entry) in entries.iter_mut() {
				filter_multi_fields(entry, required);
			}
		}
		_ => {}
	}
}

fn is_empty(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::Number(number) => number.as_f64() == Some(0.0),
		Value::String(text) => text.is_empty() || text == "0",
		Value::Array(items) => items.is_empty(),
		Value::Object(fields) => fields.is_empty(),
	}
}
