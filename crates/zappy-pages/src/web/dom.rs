//! `web_sys` implementations of the DOM seam

use crate::dom::{
	DomError, ElementQuery, FieldNode, FocusOutHandler, FormSurface, SubmitEvent, SubmitHandler,
	form_fields,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlTextAreaElement};

pub(crate) fn js_error(value: JsValue) -> DomError {
	DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// An `<input>` or `<textarea>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct WebField {
	element: Element,
}

impl WebField {
	pub fn new(element: Element) -> Self {
		Self { element }
	}

	pub fn element(&self) -> &Element {
		&self.element
	}

	fn next_annotation(&self, class: &str) -> Option<Element> {
		self.element
			.next_element_sibling()
			.filter(|sibling| sibling.class_list().contains(class))
	}
}

impl FieldNode for WebField {
	fn name(&self) -> String {
		self.element.get_attribute("name").unwrap_or_default()
	}

	fn tag_name(&self) -> String {
		self.element.tag_name().to_ascii_uppercase()
	}

	fn input_type(&self) -> String {
		if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
			input.type_()
		} else {
			self.element.tag_name().to_ascii_lowercase()
		}
	}

	fn is_required(&self) -> bool {
		self.element.has_attribute("required")
	}

	fn value(&self) -> String {
		if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
			input.value()
		} else if let Some(textarea) = self.element.dyn_ref::<HtmlTextAreaElement>() {
			textarea.value()
		} else {
			self.element.get_attribute("value").unwrap_or_default()
		}
	}

	fn pattern(&self) -> Option<String> {
		self.element
			.get_attribute("pattern")
			.filter(|p| !p.is_empty())
	}

	fn is_connected(&self) -> bool {
		self.element.is_connected()
	}

	fn has_class(&self, class: &str) -> bool {
		self.element.class_list().contains(class)
	}

	fn add_class(&self, class: &str) -> Result<(), DomError> {
		self.element.class_list().add_1(class).map_err(js_error)
	}

	fn remove_class(&self, class: &str) -> Result<(), DomError> {
		self.element.class_list().remove_1(class).map_err(js_error)
	}

	fn annotation_text(&self, class: &str) -> Option<String> {
		self.next_annotation(class)
			.map(|annotation| annotation.text_content().unwrap_or_default())
	}

	fn insert_annotation(&self, class: &str, text: &str) -> Result<(), DomError> {
		let document = self.element.owner_document().ok_or(DomError::Detached)?;
		let annotation = document.create_element("div").map_err(js_error)?;
		annotation.set_class_name(class);
		annotation.set_text_content(Some(text));
		self.element
			.insert_adjacent_element("afterend", &annotation)
			.map_err(js_error)?;
		Ok(())
	}

	fn set_annotation_text(&self, class: &str, text: &str) -> Result<(), DomError> {
		let annotation = self
			.next_annotation(class)
			.ok_or_else(|| DomError::NotFound(format!(".{}", class)))?;
		annotation.set_text_content(Some(text));
		Ok(())
	}

	fn remove_annotation(&self, class: &str) -> Result<(), DomError> {
		if let Some(annotation) = self.next_annotation(class) {
			annotation.remove();
		}
		Ok(())
	}
}

/// A DOM `submit` event.
pub struct WebSubmitEvent(pub Event);

impl SubmitEvent for WebSubmitEvent {
	fn prevent_default(&self) {
		self.0.prevent_default();
	}

	fn default_prevented(&self) -> bool {
		self.0.default_prevented()
	}
}

/// The contact form element.
#[derive(Debug, Clone, PartialEq)]
pub struct WebForm {
	element: Element,
}

impl WebForm {
	pub fn new(element: Element) -> Self {
		Self { element }
	}

	pub fn element(&self) -> &Element {
		&self.element
	}

	fn listen(
		&self,
		event_type: &str,
		mut handler: impl FnMut(Event) + 'static,
	) -> Result<(), DomError> {
		let closure = Closure::wrap(Box::new(move |event: Event| handler(event)) as Box<dyn FnMut(_)>);
		self.element
			.add_event_listener_with_callback_and_bool(
				event_type,
				closure.as_ref().unchecked_ref(),
				true,
			)
			.map_err(js_error)?;
		closure.forget(); // Keep closure alive
		Ok(())
	}
}

impl FormSurface for WebForm {
	type Field = WebField;

	fn fields(&self) -> Vec<WebField> {
		let Ok(nodes) = self.element.query_selector_all("input, textarea") else {
			return Vec::new();
		};
		form_fields(
			(0..nodes.length())
				.filter_map(|i| nodes.item(i))
				.filter_map(|node| node.dyn_into::<Element>().ok())
				.map(WebField::new),
		)
	}

	fn describe(&self) -> String {
		let class_name = self.element.class_name();
		if !class_name.is_empty() {
			return class_name;
		}
		let id = self.element.id();
		if !id.is_empty() {
			return id;
		}
		"unnamed form".to_string()
	}

	fn add_submit_listener(&self, mut handler: SubmitHandler) -> Result<(), DomError> {
		self.listen("submit", move |event| handler(&WebSubmitEvent(event)))
	}

	fn add_focusout_listener(&self, mut handler: FocusOutHandler<WebField>) -> Result<(), DomError> {
		self.listen("focusout", move |event| {
			if let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) {
				handler(WebField::new(element));
			}
		})
	}
}

/// Selector and id lookups on a document.
#[derive(Debug, Clone)]
pub struct WebDocument(pub Document);

impl ElementQuery for WebDocument {
	type Element = Element;

	fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
		self.0
			.query_selector(selector)
			.map_err(|_| DomError::InvalidSelector(selector.to_string()))
	}

	fn get_element_by_id(&self, id: &str) -> Option<Element> {
		self.0.get_element_by_id(id)
	}
}
