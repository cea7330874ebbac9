//! Field preview endpoint used by the block editor

use crate::contact_form::{BlockResult, ContactFormBlocks, ContactFormFieldAttributes};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Response, StatusCode};
use serde::Deserialize;

/// Query parameters of a preview request. Absent parameters keep the block defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewQuery {
	#[serde(rename = "type")]
	pub field_type: Option<String>,
	pub name: Option<String>,
	pub label: Option<String>,
	pub placeholder: Option<String>,
	/// `"true"` enables, any other value disables
	pub required: Option<String>,
	pub attr: Option<String>,
	pub options: Option<String>,
	pub width: Option<String>,
}

impl PreviewQuery {
	pub fn parse(query: &str) -> BlockResult<Self> {
		Ok(serde_urlencoded::from_str(query)?)
	}

	pub fn into_attributes(self) -> ContactFormFieldAttributes {
		let defaults = ContactFormFieldAttributes::default();
		ContactFormFieldAttributes {
			field_type: self.field_type.unwrap_or(defaults.field_type),
			name: self.name.unwrap_or(defaults.name),
			label: self.label.unwrap_or(defaults.label),
			placeholder: self.placeholder.unwrap_or(defaults.placeholder),
			required: self.required.is_some_and(|required| required == "true"),
			attr: self.attr.unwrap_or(defaults.attr),
			options: self.options.unwrap_or(defaults.options),
			width: self.width.unwrap_or(defaults.width),
			..defaults
		}
	}
}

impl ContactFormBlocks {
	/// Render a field block from a urlencoded query string.
	///
	/// Responds `200 text/html` with the field markup, or `400 text/plain`
	/// when the query or the field description is invalid.
	///
	/// # Examples
	///
	/// ```
	/// use formation_blocks::{ContactFormBlocks, MemoryOptionStore};
	/// use formation_conf::Settings;
	/// use formation_forms::Renderer;
	/// use std::sync::Arc;
	///
	/// let blocks = ContactFormBlocks::new(
	///     Renderer::new(Settings::new("frm")),
	///     Arc::new(MemoryOptionStore::new()),
	/// );
	///
	/// let response = blocks.preview_contact_form("type=email&name=email&required=true");
	/// assert_eq!(response.status(), 200);
	/// ```
	pub fn preview_contact_form(&self, query: &str) -> Response<Bytes> {
		let result = PreviewQuery::parse(query)
			.and_then(|query| self.render_contact_form_field(&query.into_attributes()));

		match result {
			Ok(html) => response(StatusCode::OK, "text/html; charset=utf-8", html),
			Err(error) => {
				tracing::debug!(error = %error, "Rejected contact form preview");
				response(StatusCode::BAD_REQUEST, "text/plain; charset=utf-8", error.to_string())
			}
		}
	}
}

fn response(status: StatusCode, content_type: &'static str, body: String) -> Response<Bytes> {
	let mut response = Response::new(Bytes::from(body));
	*response.status_mut() = status;
	response
		.headers_mut()
		.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
	response
}
