//! Listbox: an accessible substitute for `<select>`

use crate::escaping::{escape_attribute, escape_html};
use crate::renderer::Renderer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListboxOption {
	pub value: String,
	pub label: String,
	#[serde(default)]
	pub selected: bool,
}

impl ListboxOption {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
			selected: false,
		}
	}

	pub fn selected(mut self) -> Self {
		self.selected = true;
		self
	}
}

impl Renderer {
	/// Render a listbox button and its option list.
	///
	/// Without options nothing is rendered. `id` defaults to a unique
	/// namespaced id. When several options are selected the last one wins.
	///
	/// # Examples
	///
	/// ```
	/// use formation_conf::Settings;
	/// use formation_forms::{ListboxOption, Renderer};
	///
	/// let renderer = Renderer::new(Settings::default());
	/// let options = [ListboxOption::new("a", "A"), ListboxOption::new("b", "B").selected()];
	///
	/// let html = renderer.render_listbox(&options, Some("sort"), None);
	/// assert!(html.contains("aria-activedescendant=\"sort_b\""));
	/// assert!(renderer.render_listbox(&[], None, None).is_empty());
	/// ```
	pub fn render_listbox(&self, options: &[ListboxOption], id: Option<&str>, list_class: Option<&str>) -> String {
		if options.is_empty() {
			return String::new();
		}

		let id = match id {
			Some(id) => id.to_string(),
			None => format!("{}_{}", self.settings().namespace, uuid::Uuid::new_v4().simple()),
		};
		let list_id = format!("{}_list", id);

		let mut list_classes = String::from("o-listbox__list js-input");
		if let Some(class) = list_class.filter(|class| !class.is_empty()) {
			list_classes.push(' ');
			list_classes.push_str(class);
		}

		let mut selected_id = String::new();
		let mut selected_label = "";
		let mut items = String::new();

		for option in options {
			let option_id = format!("{}_{}", id, option.value);
			if option.selected {
				selected_id = option_id.clone();
				selected_label = option.label.as_str();
			}

			items.push_str(&format!(
				"<li class=\"o-listbox__item\" id=\"{}\" data-value=\"{}\" role=\"option\"{}>{}</li>",
				escape_attribute(&option_id),
				escape_attribute(&option.value),
				if option.selected { " aria-selected=\"true\"" } else { "" },
				escape_html(&option.label),
			));
		}

		let caret = self
			.settings()
			.sprite("caret")
			.map(|caret| {
				format!(
					"<svg class=\"o-listbox__caret u-flex-shrink-0\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\"><use xlink:href=\"#sprite-caret\" /></svg>",
					w = caret.w,
					h = caret.h,
				)
			})
			.unwrap_or_default();

		let id = escape_attribute(&id);
		format!(
			concat!(
				"<div class=\"o-listbox\">",
				"<button class=\"o-listbox__btn l-flex --align-center --justify\" type=\"button\" aria-haspopup=\"listbox\" aria-labelledby=\"{id}\" id=\"{id}\">",
				"<div class=\"o-listbox__text u-flex-shrink-0\">{label}</div>{caret}</button>",
				"<div class=\"o-listbox__container\">",
				"<ul class=\"{list_classes}\" id=\"{list_id}\" tabindex=\"-1\" role=\"listbox\" aria-labelledby=\"{id}\" aria-activedescendant=\"{selected_id}\">",
				"{items}</ul></div></div>"
			),
			id = id,
			label = escape_html(selected_label),
			caret = caret,
			list_classes = escape_attribute(&list_classes),
			list_id = escape_attribute(&list_id),
			selected_id = escape_attribute(&selected_id),
			items = items,
		)
	}
}
