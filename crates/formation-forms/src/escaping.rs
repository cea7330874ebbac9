//! HTML escaping for rendered markup

/// Escape HTML special characters for text content.
///
/// # Examples
///
/// ```
/// use formation_forms::escaping::escape_html;
///
/// let escaped = escape_html("<script>alert('xss')</script>");
/// assert_eq!(escaped, "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	let mut output = String::with_capacity(input.len());
	for ch in input.chars() {
		match ch {
			'&' => output.push_str("&amp;"),
			'<' => output.push_str("&lt;"),
			'>' => output.push_str("&gt;"),
			'"' => output.push_str("&quot;"),
			'\'' => output.push_str("&#x27;"),
			_ => output.push(ch),
		}
	}
	output
}

/// Escape a value for use inside a quoted attribute.
///
/// Newlines are encoded as well so multi-line values survive attribute
/// normalization.
///
/// # Examples
///
/// ```
/// use formation_forms::escaping::escape_attribute;
///
/// let escaped = escape_attribute(r#"value" onload="alert(1)"#);
/// assert_eq!(escaped, "value&quot; onload=&quot;alert(1)&quot;");
/// ```
pub fn escape_attribute(input: &str) -> String {
	let mut output = String::with_capacity(input.len());
	for ch in input.chars() {
		match ch {
			'&' => output.push_str("&amp;"),
			'<' => output.push_str("&lt;"),
			'>' => output.push_str("&gt;"),
			'"' => output.push_str("&quot;"),
			'\'' => output.push_str("&#x27;"),
			'\n' => output.push_str("&#10;"),
			'\r' => output.push_str("&#13;"),
			_ => output.push(ch),
		}
	}
	output
}

/// Decode named and numeric character references so stored rich text can
/// be handed to an editor verbatim. Unknown references are left as is.
///
/// # Examples
///
/// ```
/// use formation_forms::escaping::decode_entities;
///
/// assert_eq!(decode_entities("&lt;p&gt;Tom &amp; Jerry&#039;s&lt;/p&gt;"), "<p>Tom & Jerry's</p>");
/// ```
pub fn decode_entities(input: &str) -> String {
	html_escape::decode_html_entities(input).into_owned()
}
