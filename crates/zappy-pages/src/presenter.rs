//! Inline error annotations
//!
//! An invalid field gets the `error` class and one `.error-message` element
//! inserted directly after it. Both operations are idempotent and never fail
//! outward: a node that has left the document is skipped, and DOM errors are
//! logged.

use crate::dom::{DomError, FieldNode};
use zappy_forms::ErrorDisplay;

/// Class added to an invalid field.
pub const ERROR_CLASS: &str = "error";

/// Class of the annotation element inserted after an invalid field.
pub const ANNOTATION_CLASS: &str = "error-message";

/// Shows and clears validation errors on field nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPresenter {
	error_class: String,
	annotation_class: String,
}

impl Default for ErrorPresenter {
	fn default() -> Self {
		Self {
			error_class: ERROR_CLASS.to_string(),
			annotation_class: ANNOTATION_CLASS.to_string(),
		}
	}
}

impl ErrorPresenter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Uses custom class names for the marker and the annotation.
	pub fn with_classes(error_class: impl Into<String>, annotation_class: impl Into<String>) -> Self {
		Self {
			error_class: error_class.into(),
			annotation_class: annotation_class.into(),
		}
	}

	pub fn error_class(&self) -> &str {
		&self.error_class
	}

	pub fn annotation_class(&self) -> &str {
		&self.annotation_class
	}

	/// Marks `node` invalid and makes sure exactly one annotation with
	/// `message` follows it.
	pub fn show<N: FieldNode>(&self, node: &N, message: &str) {
		if !node.is_connected() {
			crate::debug_log!("Zappy: skipping error for detached field '{}'", node.name());
			return;
		}
		if let Err(e) = self.try_show(node, message) {
			crate::warn_log!("Zappy: could not show error for '{}': {}", node.name(), e);
		}
	}

	/// Removes the marker and the annotation from `node`, if present.
	pub fn clear<N: FieldNode>(&self, node: &N) {
		if !node.is_connected() {
			return;
		}
		if let Err(e) = self.try_clear(node) {
			crate::warn_log!("Zappy: could not clear error for '{}': {}", node.name(), e);
		}
	}

	fn try_show<N: FieldNode>(&self, node: &N, message: &str) -> Result<(), DomError> {
		if !node.has_class(&self.error_class) {
			node.add_class(&self.error_class)?;
		}
		match node.annotation_text(&self.annotation_class) {
			Some(text) if text == message => Ok(()),
			Some(_) => node.set_annotation_text(&self.annotation_class, message),
			None => node.insert_annotation(&self.annotation_class, message),
		}
	}

	fn try_clear<N: FieldNode>(&self, node: &N) -> Result<(), DomError> {
		if node.has_class(&self.error_class) {
			node.remove_class(&self.error_class)?;
		}
		if node.annotation_text(&self.annotation_class).is_some() {
			node.remove_annotation(&self.annotation_class)?;
		}
		Ok(())
	}
}

/// Adapts an [`ErrorPresenter`] and a set of nodes to [`ErrorDisplay`],
/// resolving field names to nodes.
///
/// A name applies to every node carrying it. Names with no matching node
/// are ignored.
pub struct PresenterBinding<'a, N> {
	presenter: &'a ErrorPresenter,
	nodes: &'a [N],
}

impl<'a, N: FieldNode> PresenterBinding<'a, N> {
	pub fn new(presenter: &'a ErrorPresenter, nodes: &'a [N]) -> Self {
		Self { presenter, nodes }
	}
}

impl<N: FieldNode> ErrorDisplay for PresenterBinding<'_, N> {
	fn show_error(&mut self, field: &str, message: &str) {
		for node in self.nodes.iter().filter(|n| n.name() == field) {
			self.presenter.show(node, message);
		}
	}

	fn clear_error(&mut self, field: &str) {
		for node in self.nodes.iter().filter(|n| n.name() == field) {
			self.presenter.clear(node);
		}
	}
}
