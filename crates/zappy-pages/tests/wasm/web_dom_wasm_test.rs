//! Browser tests for the `web_sys` DOM adapters
//!
//! Run with `wasm-pack test --headless --chrome crates/zappy-pages`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlInputElement};
use zappy_pages::dom::{ElementQuery, FieldNode, FormSurface};
use zappy_pages::presenter::{ANNOTATION_CLASS, ERROR_CLASS, ErrorPresenter};
use zappy_pages::web::{WebDocument, WebField, WebForm};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
	web_sys::window().unwrap().document().unwrap()
}

fn mount(html: &str) -> Element {
	let document = document();
	let container = document.create_element("div").unwrap();
	container.set_inner_html(html);
	document.body().unwrap().append_child(&container).unwrap();
	container
}

fn input(container: &Element, selector: &str) -> WebField {
	WebField::new(container.query_selector(selector).unwrap().unwrap())
}

#[wasm_bindgen_test]
fn test_web_field_reads_attributes() {
	let container = mount(
		r#"<form><input name="phone" type="tel" required pattern="[0-9]+" value=" 0123 "></form>"#,
	);
	let field = input(&container, "input");

	assert_eq!(field.name(), "phone");
	assert_eq!(field.tag_name(), "INPUT");
	assert_eq!(field.input_type(), "tel");
	assert!(field.is_required());
	assert_eq!(field.value(), " 0123 ");
	assert_eq!(field.pattern().as_deref(), Some("[0-9]+"));
	assert!(field.is_connected());

	container.remove();
	assert!(!field.is_connected());
}

#[wasm_bindgen_test]
fn test_web_field_reads_live_value() {
	let container = mount(r#"<form><input name="name" type="text"></form>"#);
	let field = input(&container, "input");

	field
		.element()
		.dyn_ref::<HtmlInputElement>()
		.unwrap()
		.set_value("Jo");

	assert_eq!(field.value(), "Jo");
	container.remove();
}

#[wasm_bindgen_test]
fn test_presenter_inserts_one_annotation_after_field() {
	let container = mount(r#"<form><input name="email" type="email"><button>Send</button></form>"#);
	let field = input(&container, "input");
	let presenter = ErrorPresenter::new();

	presenter.show(&field, "Please enter a valid email address");
	presenter.show(&field, "This field is required");

	assert!(field.element().class_list().contains(ERROR_CLASS));
	assert_eq!(
		container
			.query_selector_all(&format!(".{}", ANNOTATION_CLASS))
			.unwrap()
			.length(),
		1
	);
	let annotation = field.element().next_element_sibling().unwrap();
	assert_eq!(annotation.text_content().as_deref(), Some("This field is required"));

	presenter.clear(&field);
	assert!(!field.element().class_list().contains(ERROR_CLASS));
	assert_eq!(field.annotation_text(ANNOTATION_CLASS), None);
	assert_eq!(
		field.element().next_element_sibling().unwrap().tag_name(),
		"BUTTON"
	);
	container.remove();
}

#[wasm_bindgen_test]
fn test_web_form_collects_named_data_fields() {
	let container = mount(
		r#"<form class="contact-form">
			<input name="name" type="text">
			<input type="text">
			<input name="csrf" type="hidden">
			<input name="go" type="submit">
			<input name="agree" type="checkbox">
			<textarea name="message"></textarea>
		</form>"#,
	);
	let form = WebForm::new(container.query_selector("form").unwrap().unwrap());

	let names: Vec<String> = form.fields().iter().map(|f| f.name()).collect();
	assert_eq!(names, vec!["name".to_string(), "message".to_string()]);
	assert_eq!(form.describe(), "contact-form");
	container.remove();
}

#[wasm_bindgen_test]
fn test_web_document_reports_invalid_selector() {
	let container = mount(r#"<form id="contactForm"></form>"#);
	let document = WebDocument(document());

	assert!(document.query_selector("form[").is_err());
	assert!(document.get_element_by_id("contactForm").is_some());
	container.remove();
}
