//! Contact form blocks
//!
//! Block attributes are translated into field descriptors and rendered with
//! the shared [`Renderer`]. The form block also records where submissions of
//! the form are sent, keyed by the form id.

use crate::assoc::{AssocOrder, parse_assoc_str};
use crate::options::{ADMIN_EMAIL, BLOG_NAME, OptionStore};
use formation_forms::escaping::{escape_attribute, escape_html};
use formation_forms::{DescriptorError, FieldDescriptor, Node, Renderer, SectionConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Longest form id kept in the option key
pub const MAX_FORM_ID_LEN: usize = 40;

#[derive(Debug, Error)]
pub enum BlockError {
	#[error("Invalid preview query: {0}")]
	InvalidQuery(#[from] serde_urlencoded::de::Error),
	#[error("Invalid block attributes: {0}")]
	InvalidAttributes(#[from] serde_json::Error),
	#[error(transparent)]
	Descriptor(#[from] DescriptorError),
}

pub type BlockResult<T> = Result<T, BlockError>;

/// Attributes of the contact form block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFormAttributes {
	pub id: String,
	/// Recipient, the site administrator when empty
	pub email: String,
	/// Mail subject, `"{site name} Contact Form"` when empty
	pub subject: String,
	pub submit_label: String,
}

impl Default for ContactFormAttributes {
	fn default() -> Self {
		Self {
			id: String::new(),
			email: String::new(),
			subject: String::new(),
			submit_label: "Submit".to_string(),
		}
	}
}

/// Attributes of a contact form field block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFormFieldAttributes {
	#[serde(rename = "type")]
	pub field_type: String,
	/// Name without the namespace prefix
	pub name: String,
	pub label: String,
	pub placeholder: String,
	pub required: bool,
	/// `name : value` lines
	pub attr: String,
	/// `label : value` lines
	pub options: String,
	/// Layout width class suffix (`l-{width}`)
	pub width: String,
	pub value: String,
	pub label_after: bool,
	pub padding_small: bool,
	/// Label of the field in the notification email
	pub email_label: String,
}

impl Default for ContactFormFieldAttributes {
	fn default() -> Self {
		Self {
			field_type: "text".to_string(),
			name: String::new(),
			label: String::new(),
			placeholder: String::new(),
			required: false,
			attr: String::new(),
			options: String::new(),
			width: "100".to_string(),
			value: String::new(),
			label_after: false,
			padding_small: false,
			email_label: String::new(),
		}
	}
}

/// Where submissions of a form are delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecipient {
	pub email: String,
	pub subject: String,
}

/// Renders the contact form family of blocks
#[derive(Clone)]
pub struct ContactFormBlocks {
	renderer: Renderer,
	options: Arc<dyn OptionStore>,
}

impl ContactFormBlocks {
	pub fn new(renderer: Renderer, options: Arc<dyn OptionStore>) -> Self {
		Self { renderer, options }
	}

	pub fn renderer(&self) -> &Renderer {
		&self.renderer
	}

	fn namespace(&self) -> &str {
		&self.renderer.settings().namespace
	}

	/// Option key holding the recipient of form `id`
	pub fn recipient_key(&self, id: &str) -> String {
		format!("{}_form_{}", self.namespace(), id)
	}

	/// Recipient stored for form `id`
	pub fn recipient(&self, id: &str) -> Option<FormRecipient> {
		self.options
			.get(&self.recipient_key(id))
			.and_then(|value| serde_json::from_value(value).ok())
	}

	/// Render the form around the already rendered field blocks in `content`.
	///
	/// When the form has an id its recipient is persisted under
	/// `{namespace}_form_{id}` (ids are cut to [`MAX_FORM_ID_LEN`] characters).
	pub fn render_contact_form(&self, attrs: &ContactFormAttributes, content: &str) -> String {
		let email = if attrs.email.is_empty() {
			self.options.get_str(ADMIN_EMAIL)
		} else {
			attrs.email.clone()
		};
		let subject = if attrs.subject.is_empty() {
			format!("{} Contact Form", self.options.get_str(BLOG_NAME))
		} else {
			attrs.subject.clone()
		};

		let id: String = attrs.id.chars().take(MAX_FORM_ID_LEN).collect();
		if !id.is_empty() {
			let key = self.recipient_key(&id);
			self.options.set(&key, json!({"email": email, "subject": subject}));
			tracing::info!(key = %key, "Stored contact form recipient");
		}

		self.render_form(&id, content, &attrs.submit_label)
	}

	fn render_form(&self, id: &str, fields: &str, submit_label: &str) -> String {
		let ns = self.namespace();
		let settings = self.renderer.settings();
		let icon = |name: &str| {
			settings
				.sprite(name)
				.map(|sprite| {
					format!(
						"<svg class=\"o-form__icon u-flex-shrink-0\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\"><use xlink:href=\"#sprite-{name}\" /></svg>",
						w = sprite.w,
						h = sprite.h,
						name = name,
					)
				})
				.unwrap_or_default()
		};

		let mut html = format!(
			"<form class=\"o-form js-{ns}-form\" id=\"{ns}-form-{id}\" data-id=\"{id}\" data-type=\"contact\" novalidate>",
			ns = escape_attribute(ns),
			id = escape_attribute(id),
		);
		html.push_str(&format!("<div class=\"o-form__fields l-flex --wrap\">{}</div>", fields));
		html.push_str(&format!(
			"<div class=\"o-form__submit\"><button class=\"o-form__button js-submit\" type=\"submit\"><span class=\"o-loader\"></span><span>{}</span></button></div>",
			escape_html(submit_label)
		));
		html.push_str("<div class=\"o-form__result\" role=\"alert\" aria-live=\"assertive\">");
		for (state, sprite) in [("error", "Error"), ("success", "Success")] {
			html.push_str(&format!(
				"<div class=\"o-form__{state} l-flex --align-center\" style=\"display: none;\">{icon}<div class=\"o-form__message\"></div></div>",
				state = state,
				icon = icon(sprite),
			));
		}
		html.push_str("</div></form>");
		html
	}

	pub fn render_contact_form_group(&self, content: &str) -> String {
		format!("<div class=\"o-field-group l-100\">{}</div>", content)
	}

	pub fn render_contact_form_group_top(&self, content: &str) -> String {
		format!("<div class=\"o-field-group__top\">{}</div>", content)
	}

	pub fn render_contact_form_group_bottom(&self, content: &str) -> String {
		format!("<div class=\"o-field-group__bottom l-flex --wrap\">{}</div>", content)
	}

	/// Render one field block.
	///
	/// Radio and checkbox fields expand into one input per option; a radio
	/// field without options renders nothing.
	pub fn render_contact_form_field(&self, attrs: &ContactFormFieldAttributes) -> BlockResult<String> {
		let section = self.field_section(attrs)?;
		if section.nodes.is_empty() {
			return Ok(String::new());
		}
		let mut ctx = self.renderer.context();
		Ok(self.renderer.render_section(&section, &mut ctx))
	}

	/// Block attributes given as JSON, e.g. straight from parsed block markup
	pub fn render_contact_form_field_value(&self, attrs: Value) -> BlockResult<String> {
		let attrs: ContactFormFieldAttributes = serde_json::from_value(attrs)?;
		self.render_contact_form_field(&attrs)
	}

	fn field_section(&self, attrs: &ContactFormFieldAttributes) -> BlockResult<SectionConfig> {
		let name = self.renderer.settings().namespaced(&attrs.name);
		let field_type = attrs.field_type.as_str();
		let choice = matches!(field_type, "radio" | "checkbox");

		let mut field_class = format!("l-{}", attrs.width);
		if attrs.label_after {
			field_class.push_str(" --l-after");
		}
		if attrs.padding_small {
			field_class.push_str(" --p-sm");
		}

		let mut attr = match parse_assoc_str(&attrs.attr, AssocOrder::KeyValue, false) {
			Value::Object(map) => map,
			_ => Map::new(),
		};
		if attrs.required {
			attr.insert("aria-required".to_string(), json!("true"));
		}
		if field_type == "textarea" && !attr.contains_key("rows") {
			attr.insert("rows".to_string(), json!("8"));
		}
		if !attrs.email_label.is_empty() {
			attr.insert("data-email-label".to_string(), json!(attrs.email_label));
		}

		let options = if field_type == "select" {
			parse_assoc_str(&attrs.options, AssocOrder::ValueKey, false)
		} else {
			parse_assoc_str(&attrs.options, AssocOrder::KeyValue, true)
		};

		let mut field = json!({
			"name": name,
			"label": attrs.label,
			"type": attrs.field_type,
			"placeholder": attrs.placeholder,
			"field_class": field_class,
			"value": attrs.value,
			"attr": attr,
		});
		if field_type == "select" {
			field["options"] = options.clone();
		}
		if choice {
			field["class"] = json!("u-hide-input");
		}

		let mut section = SectionConfig::new("");
		let choices = options.as_array().filter(|choices| choice && !choices.is_empty());

		match choices {
			Some(choices) => {
				for option in choices {
					let mut entry = field.clone();
					entry["label"] = option["label"].clone();
					entry["value"] = option["value"].clone();
					section.nodes.push(Node::Field(FieldDescriptor::parse(&entry)?));
				}
				// The block value preselects the matching option
				if !attrs.value.is_empty() {
					section.data = json!({ name: attrs.value });
				}
			}
			None if field_type == "radio" => {
				tracing::debug!(name = %name, "Radio field without options renders nothing");
			}
			None => section.nodes.push(Node::Field(FieldDescriptor::parse(&field)?)),
		}

		Ok(section)
	}
}

impl std::fmt::Debug for ContactFormBlocks {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContactFormBlocks")
			.field("renderer", &self.renderer)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::MemoryOptionStore;
	use formation_conf::Settings;
	use rstest::{fixture, rstest};

	#[fixture]
	fn store() -> Arc<MemoryOptionStore> {
		Arc::new(MemoryOptionStore::with_site("Acme", "admin@acme.test"))
	}

	#[fixture]
	fn blocks(store: Arc<MemoryOptionStore>) -> ContactFormBlocks {
		ContactFormBlocks::new(Renderer::new(Settings::new("frm")), store)
	}

	fn field(field_type: &str) -> ContactFormFieldAttributes {
		ContactFormFieldAttributes {
			field_type: field_type.to_string(),
			name: "message".to_string(),
			..Default::default()
		}
	}

	#[rstest]
	fn test_form_defaults_to_site_recipient(blocks: ContactFormBlocks) {
		let attrs = ContactFormAttributes {
			id: "abc".to_string(),
			..Default::default()
		};

		let html = blocks.render_contact_form(&attrs, "<p>fields</p>");

		assert!(html.contains("data-type=\"contact\""));
		assert!(html.contains("<div class=\"o-form__fields l-flex --wrap\"><p>fields</p></div>"));
		assert!(html.contains("<span>Submit</span>"));
		assert_eq!(
			blocks.recipient("abc"),
			Some(FormRecipient {
				email: "admin@acme.test".to_string(),
				subject: "Acme Contact Form".to_string(),
			})
		);
	}

	#[rstest]
	fn test_form_id_is_truncated(blocks: ContactFormBlocks) {
		let attrs = ContactFormAttributes {
			id: "x".repeat(50),
			email: "team@acme.test".to_string(),
			..Default::default()
		};

		blocks.render_contact_form(&attrs, "");

		assert!(blocks.recipient(&"x".repeat(40)).is_some());
		assert!(blocks.recipient(&"x".repeat(50)).is_none());
	}

	#[rstest]
	fn test_form_without_id_stores_nothing() {
		let store = Arc::new(MemoryOptionStore::new());
		let blocks = ContactFormBlocks::new(Renderer::new(Settings::new("frm")), store.clone());

		blocks.render_contact_form(&ContactFormAttributes::default(), "");

		assert!(store.is_empty());
	}

	#[rstest]
	fn test_result_sprites() {
		let settings = Settings::new("frm").with_sprite("Error", 20, 20);
		let blocks = ContactFormBlocks::new(Renderer::new(settings), Arc::new(MemoryOptionStore::new()));

		let html = blocks.render_contact_form(&ContactFormAttributes::default(), "");

		assert!(html.contains("#sprite-Error"));
		assert!(!html.contains("#sprite-Success"));
	}

	#[rstest]
	fn test_group_wrappers(blocks: ContactFormBlocks) {
		assert_eq!(
			blocks.render_contact_form_group("x"),
			"<div class=\"o-field-group l-100\">x</div>"
		);
		assert_eq!(
			blocks.render_contact_form_group_top("x"),
			"<div class=\"o-field-group__top\">x</div>"
		);
		assert_eq!(
			blocks.render_contact_form_group_bottom("x"),
			"<div class=\"o-field-group__bottom l-flex --wrap\">x</div>"
		);
	}

	#[rstest]
	fn test_text_field(blocks: ContactFormBlocks) {
		let attrs = ContactFormFieldAttributes {
			label: "Name".to_string(),
			required: true,
			width: "50".to_string(),
			padding_small: true,
			attr: "maxlength : 40".to_string(),
			email_label: "Sender".to_string(),
			..field("text")
		};

		let html = blocks.render_contact_form_field(&attrs).unwrap();

		assert!(html.contains("<div class=\"o-field l-50 --p-sm\">"));
		assert!(html.contains("name=\"frm_message\" id=\"frm_message\""));
		assert!(html.contains("maxlength=\"40\" aria-required=\"true\" data-email-label=\"Sender\""));
		assert!(html.contains("o-field__label --req"));
	}

	#[rstest]
	#[case("", "rows=\"8\"")]
	#[case("rows : 3", "rows=\"3\"")]
	fn test_textarea_rows(blocks: ContactFormBlocks, #[case] attr: &str, #[case] expected: &str) {
		let attrs = ContactFormFieldAttributes {
			attr: attr.to_string(),
			..field("textarea")
		};

		let html = blocks.render_contact_form_field(&attrs).unwrap();

		assert!(html.contains(expected));
		assert_eq!(html.matches("rows=").count(), 1);
	}

	#[rstest]
	fn test_select_options(blocks: ContactFormBlocks) {
		let attrs = ContactFormFieldAttributes {
			options: "Sales : sales\nSupport : support".to_string(),
			value: "support".to_string(),
			..field("select")
		};

		let html = blocks.render_contact_form_field(&attrs).unwrap();

		assert!(html.contains("<option value=\"sales\">Sales</option><option value=\"support\" selected>Support</option>"));
	}

	#[rstest]
	fn test_radio_options_expand(blocks: ContactFormBlocks) {
		let attrs = ContactFormFieldAttributes {
			options: "Email : email\nPhone : phone".to_string(),
			value: "phone".to_string(),
			..field("radio")
		};

		let html = blocks.render_contact_form_field(&attrs).unwrap();

		assert_eq!(html.matches("type=\"radio\"").count(), 2);
		assert_eq!(html.matches("u-hide-input").count(), 2);
		assert!(html.contains("value=\"phone\" class=\"o-field__radio js-input u-hide-input\" checked"));
		assert!(!html.contains("value=\"email\" class=\"o-field__radio js-input u-hide-input\" checked"));
	}

	#[rstest]
	fn test_radio_without_options_renders_nothing(blocks: ContactFormBlocks) {
		assert_eq!(blocks.render_contact_form_field(&field("radio")).unwrap(), "");
	}

	#[rstest]
	fn test_checkbox_without_options_is_single(blocks: ContactFormBlocks) {
		let attrs = ContactFormFieldAttributes {
			label: "Subscribe".to_string(),
			value: "yes".to_string(),
			label_after: true,
			..field("checkbox")
		};

		let html = blocks.render_contact_form_field(&attrs).unwrap();

		assert_eq!(html.matches("type=\"checkbox\"").count(), 1);
		assert!(html.contains("<div class=\"o-field l-100 --l-after\">"));
	}

	#[rstest]
	fn test_unknown_type(blocks: ContactFormBlocks) {
		let result = blocks.render_contact_form_field(&field("colour"));

		assert!(matches!(result, Err(BlockError::Descriptor(DescriptorError::UnknownType(_)))));
	}

	#[rstest]
	fn test_attributes_from_json(blocks: ContactFormBlocks) {
		let html = blocks
			.render_contact_form_field_value(json!({"type": "email", "name": "email"}))
			.unwrap();

		assert!(html.contains("type=\"email\""));
		assert!(html.contains("<div class=\"o-field l-100\">"));
	}
}
