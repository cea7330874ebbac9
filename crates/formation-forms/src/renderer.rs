//! Field renderer
//!
//! [`Renderer`] turns typed field configuration plus data into HTML. It owns
//! the settings and the host collaborators; everything produced during one
//! render pass is collected in the caller's [`RenderContext`].

use crate::assets::ScriptDataSink;
use crate::bound_field::BoundField;
use crate::context::{RenderContext, RenderPosition};
use crate::escaping::{decode_entities, escape_attribute, escape_html};
use crate::field::{Attributes, Choice, FieldConfig, FieldKind, FileType, LabelPosition, RichTextOptions};
use crate::names::format_id;
use crate::rich_text::{RichTextEditor, RichTextRequest, TextareaEditor};
use formation_conf::Settings;
use std::sync::Arc;
use url::Url;

/// Renders fields, sections and listboxes
#[derive(Clone)]
pub struct Renderer {
	settings: Settings,
	rich_text: Arc<dyn RichTextEditor>,
	script_data: Option<Arc<dyn ScriptDataSink>>,
}

impl Renderer {
	/// Create a renderer with the textarea rich text fallback and no script data sink
	pub fn new(settings: Settings) -> Self {
		Self {
			settings,
			rich_text: Arc::new(TextareaEditor),
			script_data: None,
		}
	}

	pub fn with_rich_text_editor(mut self, editor: Arc<dyn RichTextEditor>) -> Self {
		self.rich_text = editor;
		self
	}

	/// Sink receiving the localize payload after every section render
	pub fn with_script_data(mut self, sink: Arc<dyn ScriptDataSink>) -> Self {
		self.script_data = Some(sink);
		self
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Fresh render context for the configured screen (admin or public)
	pub fn context(&self) -> RenderContext {
		RenderContext::new(self.settings.admin)
	}

	/// Hand the payload collected so far to the script data sink under the namespace.
	///
	/// The payload replaces whatever the sink holds for the namespace, so data
	/// from an earlier pass never leaks into the current one.
	pub fn flush(&self, ctx: &RenderContext) {
		let Some(sink) = &self.script_data else {
			return;
		};
		if ctx.payload().is_empty() {
			return;
		}
		tracing::debug!(
			namespace = %self.settings.namespace,
			templates = ctx.payload().multi.len(),
			files = ctx.payload().files.len(),
			"Flushing localize payload"
		);
		sink.add_script_data(&self.settings.namespace, ctx.payload().to_value(), false);
	}

	/// Render a single field
	///
	/// # Examples
	///
	/// ```
	/// use formation_conf::Settings;
	/// use formation_forms::{FieldConfig, FieldKind, RenderPosition, Renderer};
	/// use serde_json::json;
	///
	/// let renderer = Renderer::new(Settings::default());
	/// let field = FieldConfig::new("user[email]", FieldKind::Email).with_label("Email").required();
	/// let data = json!({"user": {"email": "a@b.com"}});
	///
	/// let mut ctx = renderer.context();
	/// let html = renderer.render_field(&field, &data, RenderPosition::single(), &mut ctx);
	///
	/// assert!(html.contains("<div class=\"o-field__label --req\">Email</div>"));
	/// assert!(html.contains("type=\"email\" value=\"a@b.com\""));
	/// assert!(html.contains("aria-required=\"true\""));
	/// ```
	pub fn render_field(
		&self,
		field: &FieldConfig,
		data: &serde_json::Value,
		position: RenderPosition,
		ctx: &mut RenderContext,
	) -> String {
		if let FieldKind::Select { options } = &field.kind {
			if options.is_empty() {
				return String::new();
			}
		}

		let bound = BoundField::new(field, data, position);
		let name = bound.html_name();
		let id = bound.id_for_label();

		let mut attrs = field.effective_attrs();
		if position.multi {
			attrs.insert("data-name", field.name());
			attrs.insert("data-id", format_id(field.name()));
		}

		let control = FieldControl {
			name: &name,
			id: &id,
			classes: self.control_classes(field, ctx),
			attrs: &attrs,
		};

		let mut html = String::new();

		let mut wrapper_class = String::from("o-field");
		push_class(&mut wrapper_class, &field.field_class);
		if !ctx.is_admin() {
			push_class(&mut wrapper_class, &self.settings.classes.field);
		}
		html.push_str(&format!("<div class=\"{}\"", escape_attribute(&wrapper_class)));
		if bound.is_hidden() {
			html.push_str(" style=\"display: none;\"");
		}
		html.push('>');

		let label = field.visible_label().map(|text| {
			let mut class = String::from("o-field__label");
			if attrs.is_required() {
				class.push_str(" --req");
			}
			if !ctx.is_admin() {
				push_class(&mut class, &self.settings.classes.label);
			}
			format!("<div class=\"{}\">{}</div>", escape_attribute(&class), text)
		});

		if let Some(text) = &label {
			html.push_str("<label>");
			if field.label_position == LabelPosition::Above {
				html.push_str(text);
			}
		}

		html.push_str(&field.before);
		html.push_str(&match &field.kind {
			FieldKind::Text | FieldKind::Email | FieldKind::Number => control.input(field, &bound.value(), false),
			FieldKind::Checkbox | FieldKind::Radio => {
				let mut input = control.input(field, &field.value, bound.is_checked());
				input.push_str("<span class=\"o-field__control\"></span>");
				input
			}
			FieldKind::Textarea => control.textarea(field, &bound.value()),
			FieldKind::Select { options } => control.select(options, &bound.value()),
			FieldKind::File { file_type, accept } => {
				ctx.payload_mut().register_file(id.clone(), file_type.as_str());
				control.file(*file_type, accept, &bound.value(), ctx.is_admin())
			}
			FieldKind::RichText(options) => self.rich_text(&control, options, &bound.value()),
		});
		html.push_str(&field.after);

		if let Some(text) = &label {
			if field.label_position == LabelPosition::Below {
				html.push_str(text);
			}
			html.push_str("</label>");
		}

		html.push_str("</div>");
		html
	}

	fn control_classes(&self, field: &FieldConfig, ctx: &RenderContext) -> String {
		let mut classes = format!("o-field__{} js-input", field.kind.type_name());
		push_class(&mut classes, &field.class);

		match field.kind {
			FieldKind::Text | FieldKind::Email => classes.push_str(" o-field__input"),
			_ => {}
		}

		if ctx.is_admin() {
			match field.kind {
				FieldKind::Text | FieldKind::Email | FieldKind::Radio => classes.push_str(" regular-text"),
				FieldKind::Number => classes.push_str(" small-text"),
				_ => {}
			}
		} else {
			push_class(&mut classes, &self.settings.classes.input);
		}

		classes
	}

	fn rich_text(&self, control: &FieldControl<'_>, options: &RichTextOptions, value: &str) -> String {
		let request = RichTextRequest {
			id: control.id.to_string(),
			name: control.name.to_string(),
			content: decode_entities(value),
			editor_class: control.classes.clone(),
			options: options.clone(),
		};
		self.rich_text.render(&request)
	}
}

impl std::fmt::Debug for Renderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Renderer")
			.field("settings", &self.settings)
			.field("script_data", &self.script_data.is_some())
			.finish_non_exhaustive()
	}
}

fn push_class(classes: &mut String, extra: &str) {
	let extra = extra.trim();
	if !extra.is_empty() {
		classes.push(' ');
		classes.push_str(extra);
	}
}

/// The attributes every control shares
struct FieldControl<'a> {
	name: &'a str,
	id: &'a str,
	classes: String,
	attrs: &'a Attributes,
}

impl FieldControl<'_> {
	fn head(&self) -> String {
		format!(
			"name=\"{}\" id=\"{}\"",
			escape_attribute(self.name),
			escape_attribute(self.id)
		)
	}

	fn tail(&self, placeholder: &str) -> String {
		let mut tail = String::new();
		if !placeholder.is_empty() {
			tail.push_str(&format!(" placeholder=\"{}\"", escape_attribute(placeholder)));
		}
		if !self.attrs.is_empty() {
			tail.push(' ');
			tail.push_str(&self.attrs.to_html());
		}
		tail
	}

	/// Only the multi row attributes the client script needs
	fn data_attrs(&self) -> String {
		["data-name", "data-id"]
			.into_iter()
			.filter_map(|name| self.attrs.get(name).map(|value| format!(" {}=\"{}\"", name, escape_attribute(value))))
			.collect()
	}

	fn input(&self, field: &FieldConfig, value: &str, checked: bool) -> String {
		format!(
			"<input {} type=\"{}\" value=\"{}\" class=\"{}\"{}{}>",
			self.head(),
			field.kind.type_name(),
			escape_attribute(value),
			escape_attribute(&self.classes),
			if checked { " checked" } else { "" },
			self.tail(&field.placeholder),
		)
	}

	fn textarea(&self, field: &FieldConfig, value: &str) -> String {
		format!(
			"<textarea {} class=\"{}\"{}>{}</textarea>",
			self.head(),
			escape_attribute(&self.classes),
			self.tail(&field.placeholder),
			escape_html(value),
		)
	}

	fn select(&self, options: &[Choice], value: &str) -> String {
		let options: String = options
			.iter()
			.map(|choice| {
				format!(
					"<option value=\"{}\"{}>{}</option>",
					escape_attribute(&choice.value),
					if choice.value == value { " selected" } else { "" },
					escape_html(&choice.label),
				)
			})
			.collect();

		format!(
			"<select {} class=\"{}\"{}>{}</select>",
			self.head(),
			escape_attribute(&self.classes),
			self.tail(""),
			options,
		)
	}

	fn file(&self, file_type: FileType, accept: &str, value: &str, admin: bool) -> String {
		let exists = !value.is_empty();
		let title = file_type.title();
		let preview = match file_type {
			FileType::Image => value,
			FileType::File => "",
		};

		let mut html = String::from("<div class=\"o-file\">");
		html.push_str(&format!(
			"<div class=\"o-file__exists\" style=\"display: {}\">",
			if exists { "block" } else { "none" }
		));
		html.push_str("<div class=\"l-flex --align-center --wrap\">");
		html.push_str(&format!(
			"<div class=\"o-file__asset\"><img class=\"o-file__image\" src=\"{}\" alt=\"Image preview\"></div>",
			escape_attribute(preview)
		));
		html.push_str("<div class=\"o-file__icon\"></div>");
		html.push_str(&format!(
			"<span class=\"o-file__name\">{}</span>",
			escape_html(&file_name(value))
		));
		html.push_str(&format!(
			"<button type=\"button\" class=\"o-file__remove\"><span class=\"dashicons dashicons-no-alt\"></span><span class=\"u-visually-hidden\">Remove {}</span></button>",
			title
		));
		html.push_str("</div></div>");

		html.push_str(&format!(
			"<div class=\"o-file__no\" style=\"display: {}\">",
			if exists { "none" } else { "block" }
		));
		html.push_str(&format!(
			"<p style=\"margin: 0\"><label class=\"o-file__select u-position-relative{}\">",
			if admin { " button add-media" } else { "" }
		));
		html.push_str(&format!(
			"<input type=\"file\" aria-label=\"Select {}\" class=\"u-hide-input\" accept=\"{}\">",
			title,
			escape_attribute(accept)
		));
		html.push_str(&format!(
			"<span>Select {}</span><span class=\"o-loader\"><span class=\"spinner is-active\"></span></span>",
			title
		));
		html.push_str("</label></p></div>");

		html.push_str(&format!(
			"<input {} type=\"hidden\" value=\"{}\"{}>",
			self.head(),
			escape_attribute(value),
			self.data_attrs(),
		));
		html.push_str("</div>");
		html
	}
}

/// Last path segment of a stored file URL (or plain path)
fn file_name(value: &str) -> String {
	let path = match Url::parse(value) {
		Ok(url) => url.path().to_string(),
		Err(_) => value
			.split(['?', '#'])
			.next()
			.unwrap_or_default()
			.to_string(),
	};
	path.rsplit('/').next().unwrap_or_default().to_string()
}
