//! DOM seam
//!
//! The pipeline never touches `web_sys` directly. It talks to the page
//! through the traits below: [`web`](crate::web) implements them over real
//! elements in the browser and [`testing`](crate::testing) implements them
//! in memory.
//!
//! Node handles are cheap clones of a shared element, so every mutating
//! method takes `&self`.

use zappy_forms::{ConstraintPattern, Field, FieldKind};

/// Errors raised by DOM operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	#[error("Node is no longer attached to the document")]
	Detached,
	#[error("Element not found: {0}")]
	NotFound(String),
	#[error("Invalid selector '{0}'")]
	InvalidSelector(String),
	#[error("DOM exception: {0}")]
	Js(String),
}

/// One `<input>` or `<textarea>` of the contact form.
pub trait FieldNode: Clone {
	/// `name` attribute; empty when the input has none.
	fn name(&self) -> String;

	/// Upper-case tag name (`INPUT`, `TEXTAREA`, ...).
	fn tag_name(&self) -> String;

	/// `type` attribute for inputs, `textarea` for text areas.
	fn input_type(&self) -> String;

	fn is_required(&self) -> bool;

	/// Current value, untrimmed.
	fn value(&self) -> String;

	/// `pattern` attribute, if set and non-empty.
	fn pattern(&self) -> Option<String>;

	/// Whether the node is still part of the document.
	fn is_connected(&self) -> bool;

	fn has_class(&self, class: &str) -> bool;

	fn add_class(&self, class: &str) -> Result<(), DomError>;

	fn remove_class(&self, class: &str) -> Result<(), DomError>;

	/// Text of the annotation element directly after this node, if that
	/// element carries `class`.
	fn annotation_text(&self, class: &str) -> Option<String>;

	/// Inserts a new annotation element carrying `class` directly after
	/// this node.
	fn insert_annotation(&self, class: &str, text: &str) -> Result<(), DomError>;

	/// Replaces the text of the annotation directly after this node.
	fn set_annotation_text(&self, class: &str, text: &str) -> Result<(), DomError>;

	/// Removes the annotation directly after this node, if any.
	fn remove_annotation(&self, class: &str) -> Result<(), DomError>;

	/// Whether this node takes part in focus-out validation.
	fn is_text_entry(&self) -> bool {
		matches!(self.tag_name().to_ascii_uppercase().as_str(), "INPUT" | "TEXTAREA")
	}
}

/// A submit event whose default action (native submission) can be suppressed.
pub trait SubmitEvent {
	fn prevent_default(&self);

	fn default_prevented(&self) -> bool;
}

/// Handler for the form's `submit` event.
pub type SubmitHandler = Box<dyn FnMut(&dyn SubmitEvent)>;

/// Handler for `focusout` events delegated from the form to a descendant.
pub type FocusOutHandler<N> = Box<dyn FnMut(N)>;

/// The contact form element.
pub trait FormSurface {
	type Field: FieldNode + 'static;

	/// Input and textarea descendants that carry user data, in document order.
	fn fields(&self) -> Vec<Self::Field>;

	/// Class name, id, or `unnamed form`.
	fn describe(&self) -> String;

	fn add_submit_listener(&self, handler: SubmitHandler) -> Result<(), DomError>;

	/// Registers a capturing `focusout` listener on the form itself.
	fn add_focusout_listener(&self, handler: FocusOutHandler<Self::Field>) -> Result<(), DomError>;
}

/// Document-level lookups.
pub trait ElementQuery {
	type Element;

	fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>, DomError>;

	fn get_element_by_id(&self, id: &str) -> Option<Self::Element>;
}

/// Input types that never carry contact data.
const NON_DATA_TYPES: &[&str] = &[
	"hidden", "submit", "button", "reset", "image", "file", "checkbox", "radio",
];

/// Whether an input of this type is part of the submitted contact data.
pub fn is_data_input_type(input_type: &str) -> bool {
	let input_type = input_type.to_ascii_lowercase();
	!NON_DATA_TYPES.contains(&input_type.as_str())
}

/// Keeps the nodes a submission validates: data-carrying inputs that are
/// named or required. An unnamed required input is still validated even
/// though it contributes nothing to the payload.
pub fn form_fields<N: FieldNode>(nodes: impl IntoIterator<Item = N>) -> Vec<N> {
	nodes
		.into_iter()
		.filter(|node| is_data_input_type(&node.input_type()))
		.filter(|node| !node.name().is_empty() || node.is_required())
		.collect()
}

/// Reads a [`Field`] snapshot from a node.
///
/// An unparsable `pattern` attribute is ignored and logged, so a page
/// authoring mistake degrades to the built-in checks.
pub fn read_field<N: FieldNode>(node: &N) -> Field {
	let input_type = node.input_type();
	let kind = if node.tag_name().eq_ignore_ascii_case("TEXTAREA") {
		FieldKind::Text
	} else {
		FieldKind::from_input_type(&input_type)
	};

	let mut field = Field::new(node.name(), kind)
		.with_required(node.is_required())
		.with_value(node.value());

	if let Some(pattern) = node.pattern() {
		match ConstraintPattern::new(pattern) {
			Ok(pattern) => field = field.with_pattern(pattern),
			Err(e) => crate::warn_log!("Zappy: ignoring pattern on '{}': {}", node.name(), e),
		}
	}
	field
}

/// Reads snapshots of every node, in order.
pub fn read_fields<N: FieldNode>(nodes: &[N]) -> Vec<Field> {
	nodes.iter().map(read_field).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockField;
	use rstest::rstest;

	#[rstest]
	#[case("text", true)]
	#[case("EMAIL", true)]
	#[case("hidden", false)]
	#[case("submit", false)]
	#[case("checkbox", false)]
	fn test_is_data_input_type(#[case] input_type: &str, #[case] expected: bool) {
		assert_eq!(is_data_input_type(input_type), expected);
	}

	#[rstest]
	fn test_read_field_from_input() {
		let node = MockField::input("email", "email")
			.required()
			.with_value(" jo@example.com ");
		let field = read_field(&node);

		assert_eq!(field.name(), "email");
		assert_eq!(field.kind(), FieldKind::Email);
		assert!(field.is_required());
		assert_eq!(field.value(), "jo@example.com");
	}

	#[rstest]
	fn test_read_field_textarea_is_text() {
		let node = MockField::textarea("message").with_value("hi");
		assert_eq!(read_field(&node).kind(), FieldKind::Text);
	}

	#[rstest]
	fn test_read_field_ignores_broken_pattern() {
		let node = MockField::input("phone", "tel").with_pattern("(");
		assert!(read_field(&node).constraint_pattern().is_none());
	}

	#[rstest]
	fn test_text_entry_detection() {
		assert!(MockField::input("name", "text").is_text_entry());
		assert!(MockField::textarea("message").is_text_entry());
		assert!(!MockField::element("SELECT", "budget").is_text_entry());
	}

	#[rstest]
	fn test_form_fields_keeps_unnamed_required_inputs() {
		let nodes = vec![
			MockField::input("name", "text"),
			MockField::input("", "text").required(),
			MockField::input("", "text"),
			MockField::input("token", "hidden").required(),
		];

		let kept = form_fields(nodes);

		assert_eq!(kept.len(), 2);
		assert_eq!(kept[0].name(), "name");
		assert!(kept[1].name().is_empty());
		assert!(kept[1].is_required());
	}
}
