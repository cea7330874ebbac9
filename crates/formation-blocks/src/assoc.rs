//! Key/value lists typed into block settings
//!
//! Editors enter attributes and options one per line as `left : right`.
//! Lines without the ` : ` separator are skipped.

use serde_json::{Map, Value, json};

/// Separator between the two sides of a line
pub const ASSOC_SEPARATOR: &str = " : ";

/// Which side of a line becomes the key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssocOrder {
	/// `key : value`
	#[default]
	KeyValue,
	/// `value : key`
	ValueKey,
}

/// Parse `left : right` lines.
///
/// With `indexed` the result is a list of `{"label": left, "value": right}`
/// records in input order. Otherwise it is an object keyed per `order`, where
/// a repeated key keeps its first position and takes the last value.
///
/// # Examples
///
/// ```
/// use formation_blocks::assoc::{AssocOrder, parse_assoc_str};
/// use serde_json::json;
///
/// let attr = parse_assoc_str("rows : 4\nmaxlength : 20", AssocOrder::KeyValue, false);
/// assert_eq!(attr, json!({"rows": "4", "maxlength": "20"}));
///
/// let options = parse_assoc_str("One : 1\nTwo : 2", AssocOrder::ValueKey, false);
/// assert_eq!(options, json!({"1": "One", "2": "Two"}));
///
/// let options = parse_assoc_str("One : 1", AssocOrder::KeyValue, true);
/// assert_eq!(options, json!([{"label": "One", "value": "1"}]));
/// ```
pub fn parse_assoc_str(input: &str, order: AssocOrder, indexed: bool) -> Value {
	let pairs = input.lines().filter_map(|line| {
		let mut parts = line.split(ASSOC_SEPARATOR);
		match (parts.next(), parts.next()) {
			(Some(left), Some(right)) => Some((left, right)),
			_ => None,
		}
	});

	if indexed {
		return Value::Array(
			pairs
				.map(|(left, right)| json!({"label": left, "value": right}))
				.collect(),
		);
	}

	let mut map = Map::new();
	for (left, right) in pairs {
		let (key, value) = match order {
			AssocOrder::KeyValue => (left, right),
			AssocOrder::ValueKey => (right, left),
		};
		map.insert(key.to_string(), Value::String(value.to_string()));
	}
	Value::Object(map)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("")]
	#[case("no separator")]
	#[case("tight:colon")]
	fn test_no_pairs(#[case] input: &str) {
		assert_eq!(parse_assoc_str(input, AssocOrder::KeyValue, false), json!({}));
		assert_eq!(parse_assoc_str(input, AssocOrder::KeyValue, true), json!([]));
	}

	#[rstest]
	fn test_windows_line_endings() {
		assert_eq!(
			parse_assoc_str("a : 1\r\nb : 2\r\n", AssocOrder::KeyValue, false),
			json!({"a": "1", "b": "2"})
		);
	}

	#[rstest]
	fn test_extra_separators_are_ignored() {
		assert_eq!(
			parse_assoc_str("a : 1 : 2", AssocOrder::KeyValue, false),
			json!({"a": "1"})
		);
	}

	#[rstest]
	fn test_repeated_key_takes_last_value() {
		let parsed = parse_assoc_str("a : 1\nb : 2\na : 3", AssocOrder::KeyValue, false);

		let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
		assert_eq!(keys, ["a", "b"]);
		assert_eq!(parsed["a"], "3");
	}
}
