//! Section configuration and rendering
//!
//! A section is a tree of fields and nested sections sharing one data source.
//! A *multi* section repeats its fields once per stored row and additionally
//! renders a clone template that the client script copies when a row is added.

use crate::context::{RenderContext, RenderPosition};
use crate::escaping::escape_attribute;
use crate::field::FieldConfig;
use crate::multi::{MULTI_ADD_BUTTON, MULTI_REMOVE_BUTTON, repeat_count};
use crate::names::top_level_name;
use crate::renderer::Renderer;
use serde_json::Value;

/// One entry of a section
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Section(SectionConfig),
	Field(FieldConfig),
}

/// Configuration of a group of fields
#[derive(Debug, Clone, PartialEq)]
pub struct SectionConfig {
	/// Name of the group, usually the top-level name of its fields
	pub name: String,
	/// Group label emitted once above the fields
	pub label: Option<String>,
	pub multi: bool,
	/// Data source. `null` inherits the data of the parent section.
	pub data: Value,
	pub nodes: Vec<Node>,
}

impl SectionConfig {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			multi: false,
			data: Value::Null,
			nodes: Vec::new(),
		}
	}

	/// Repeatable group named `name`
	pub fn multi(name: impl Into<String>) -> Self {
		Self {
			multi: true,
			..Self::new(name)
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_data(mut self, data: Value) -> Self {
		self.data = data;
		self
	}

	pub fn with_field(mut self, field: FieldConfig) -> Self {
		self.nodes.push(Node::Field(field));
		self
	}

	pub fn with_section(mut self, section: SectionConfig) -> Self {
		self.nodes.push(Node::Section(section));
		self
	}

	pub fn top_level_name(&self) -> &str {
		top_level_name(&self.name)
	}
}

impl Renderer {
	/// Render a section and flush the collected payload to the script data sink.
	///
	/// # Examples
	///
	/// ```
	/// use formation_conf::Settings;
	/// use formation_forms::{FieldConfig, RenderContext, Renderer, SectionConfig};
	/// use serde_json::json;
	///
	/// let renderer = Renderer::new(Settings::default());
	/// let section = SectionConfig::multi("links")
	///     .with_field(FieldConfig::text("links[%i][url]"))
	///     .with_data(json!({"links": [{"url": "a"}, {"url": "b"}]}));
	///
	/// let mut ctx = renderer.context();
	/// let html = renderer.render_section(&section, &mut ctx);
	///
	/// assert_eq!(html.matches("class=\"o-multi__item\"").count(), 2);
	/// assert!(ctx.payload().template("links").unwrap().contains("links[%i][url]"));
	/// ```
	pub fn render_section(&self, section: &SectionConfig, ctx: &mut RenderContext) -> String {
		let mut html = String::new();
		self.write_section(section, &Value::Null, RenderPosition::single(), ctx, &mut html);
		self.flush(ctx);
		html
	}

	fn write_section(
		&self,
		section: &SectionConfig,
		inherited: &Value,
		position: RenderPosition,
		ctx: &mut RenderContext,
		out: &mut String,
	) {
		let data = if section.data.is_null() {
			inherited
		} else {
			&section.data
		};
		let top = section.top_level_name();

		let mut class = String::new();
		if !top.is_empty() {
			class.push_str(&format!("c-section-{} ", top));
		}
		class.push_str("o-section");
		if ctx.is_admin() {
			class.push_str(" --admin");
		}

		out.push_str(&format!("<div class=\"{}\">", escape_attribute(&class)));

		if let Some(label) = section.label.as_deref().filter(|label| !label.is_empty()) {
			out.push_str(&format!("<div class=\"o-section__label\">{}</div>", label));
		}

		if section.multi && top.is_empty() {
			tracing::warn!("Multi section without a name is rendered as a plain section");
		}

		if section.multi && !top.is_empty() {
			let count = repeat_count(top, data);
			tracing::debug!(section = top, count, "Rendering multi section");

			out.push_str("<div class=\"o-multi\">");
			for index in 0..count {
				self.write_multi_item(section, data, RenderPosition::row(index), ctx, out);
			}
			out.push_str("</div>");

			let mut template = String::new();
			self.write_multi_item(section, data, RenderPosition::template(), ctx, &mut template);
			if ctx.payload_mut().store_template(top, template).is_some() {
				tracing::warn!(section = top, "Multi template replaced by a section with the same name");
			}
		} else {
			self.write_nodes(&section.nodes, data, position, ctx, out);
		}

		out.push_str("</div>");
	}

	fn write_multi_item(
		&self,
		section: &SectionConfig,
		data: &Value,
		position: RenderPosition,
		ctx: &mut RenderContext,
		out: &mut String,
	) {
		out.push_str("<div class=\"o-multi__item\"><div class=\"o-multi__fields l-flex --wrap\">");
		self.write_nodes(&section.nodes, data, position, ctx, out);
		out.push_str("</div><div class=\"o-multi__buttons l-flex\">");
		out.push_str(MULTI_ADD_BUTTON);
		if position.index > 0 || position.copy {
			out.push_str(MULTI_REMOVE_BUTTON);
		}
		out.push_str("</div></div>");
	}

	fn write_nodes(
		&self,
		nodes: &[Node],
		data: &Value,
		position: RenderPosition,
		ctx: &mut RenderContext,
		out: &mut String,
	) {
		for node in nodes {
			match node {
				Node::Field(field) => out.push_str(&self.render_field(field, data, position, ctx)),
				// A nested multi group repeats on its own, outside the parent's rows
				Node::Section(nested) if nested.multi => {
					self.write_section(nested, data, RenderPosition::single(), ctx, out)
				}
				Node::Section(nested) => self.write_section(nested, data, position, ctx, out),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldKind;
	use formation_conf::Settings;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn renderer() -> Renderer {
		Renderer::new(Settings::default())
	}

	#[rstest]
	fn test_plain_section_wrapper(renderer: Renderer) {
		let section = SectionConfig::new("title")
			.with_label("Heading")
			.with_field(FieldConfig::text("title"));
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		assert!(html.starts_with("<div class=\"c-section-title o-section\"><div class=\"o-section__label\">Heading</div>"));
		assert!(html.ends_with("</div>"));
		assert!(!html.contains("o-multi"));
		assert!(ctx.payload().is_empty());
	}

	#[rstest]
	fn test_admin_wrapper(renderer: Renderer) {
		let section = SectionConfig::new("").with_field(FieldConfig::text("a"));
		let mut ctx = RenderContext::admin();

		let html = renderer.render_section(&section, &mut ctx);

		assert!(html.starts_with("<div class=\"o-section --admin\">"));
	}

	#[rstest]
	fn test_multi_rows_and_template(renderer: Renderer) {
		let section = SectionConfig::multi("items[%i][v]")
			.with_field(FieldConfig::text("items[%i][v]"))
			.with_data(json!({"items": [{"v": "a"}, {"v": "b"}, {"v": "c"}]}));
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		assert_eq!(html.matches("class=\"o-multi__item\"").count(), 3);
		assert_eq!(html.matches("data-type=\"add\"").count(), 3);
		assert_eq!(html.matches("data-type=\"remove\"").count(), 2);
		assert!(html.contains("name=\"items[2][v]\""));
		assert!(html.contains("value=\"c\""));

		let template = ctx.payload().template("items").unwrap();
		assert!(template.contains("name=\"items[%i][v]\""));
		assert!(template.contains("data-type=\"remove\""));
		assert_eq!(ctx.payload().multi.len(), 1);
	}

	#[rstest]
	fn test_multi_without_rows_renders_one(renderer: Renderer) {
		let section = SectionConfig::multi("links").with_field(FieldConfig::text("links[%i][url]"));
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		assert_eq!(html.matches("class=\"o-multi__item\"").count(), 1);
		assert!(!html.contains("data-type=\"remove\""));
	}

	#[rstest]
	fn test_same_top_level_name_overwrites(renderer: Renderer) {
		let first = SectionConfig::multi("links").with_field(FieldConfig::text("links[%i][url]"));
		let second = SectionConfig::multi("links").with_field(FieldConfig::text("links[%i][label]"));
		let mut ctx = RenderContext::public();

		renderer.render_section(&first, &mut ctx);
		renderer.render_section(&second, &mut ctx);

		let template = ctx.payload().template("links").unwrap();
		assert!(template.contains("links[%i][label]"));
		assert!(!template.contains("links[%i][url]"));
	}

	#[rstest]
	fn test_nested_section_inherits_data(renderer: Renderer) {
		let section = SectionConfig::new("profile")
			.with_data(json!({"profile": {"name": "Ada", "bio": "Hi"}}))
			.with_field(FieldConfig::text("profile[name]"))
			.with_section(
				SectionConfig::new("profile")
					.with_field(FieldConfig::new("profile[bio]", FieldKind::Textarea)),
			);
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		assert!(html.contains("value=\"Ada\""));
		assert!(html.contains(">Hi</textarea>"));
		assert_eq!(html.matches("o-section\"").count(), 2);
	}

	#[rstest]
	fn test_nested_section_with_own_data(renderer: Renderer) {
		let section = SectionConfig::new("outer")
			.with_data(json!({"a": "outer"}))
			.with_section(
				SectionConfig::new("inner")
					.with_data(json!({"a": "inner"}))
					.with_field(FieldConfig::text("a")),
			);
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		assert!(html.contains("value=\"inner\""));
	}

	#[rstest]
	fn test_unnamed_multi_is_plain(renderer: Renderer) {
		let section = SectionConfig::multi("").with_field(FieldConfig::text("a[%i]"));
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		assert!(!html.contains("o-multi"));
		assert!(ctx.payload().multi.is_empty());
	}

	#[rstest]
	fn test_section_class_is_escaped(renderer: Renderer) {
		let section = SectionConfig::new("a\"b").with_field(FieldConfig::text("x"));
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		assert!(html.starts_with("<div class=\"c-section-a&quot;b o-section\">"));
	}

	#[rstest]
	fn test_nested_multi_inside_multi_keeps_one_template(renderer: Renderer) {
		let section = SectionConfig::multi("groups")
			.with_data(json!({"groups": [{"title": "a"}, {"title": "b"}], "links": [{"url": "x"}]}))
			.with_field(FieldConfig::text("groups[%i][title]"))
			.with_section(SectionConfig::multi("links").with_field(FieldConfig::text("links[%i][url]")));
		let mut ctx = RenderContext::public();

		let html = renderer.render_section(&section, &mut ctx);

		// Two parent rows each repeat the nested group
		assert_eq!(html.matches("name=\"links[0][url]\"").count(), 2);
		let links = ctx.payload().template("links").unwrap().to_string();
		assert!(links.contains("name=\"links[%i][url]\""));
		assert_eq!(ctx.payload_mut().store_template("links", links), None);
		assert_eq!(ctx.payload().multi.len(), 2);
	}
}
