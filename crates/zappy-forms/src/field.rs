//! Form field snapshots
//!
//! A [`Field`] is what the validator sees of one `<input>` or `<textarea>`
//! at a single instant. The form (the DOM) owns the live element; a `Field`
//! is read from it on every validation trigger and dropped afterwards.

use crate::{FormError, FormResult};
use regex::Regex;
use serde::Serialize;

/// Input kind, derived from the element's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
	Text,
	Email,
	Tel,
	Other,
}

impl FieldKind {
	/// Maps an HTML `type` attribute (or tag name for `<textarea>`) to a kind.
	///
	/// # Examples
	///
	/// ```
	/// use zappy_forms::FieldKind;
	///
	/// assert_eq!(FieldKind::from_input_type("EMAIL"), FieldKind::Email);
	/// assert_eq!(FieldKind::from_input_type("tel"), FieldKind::Tel);
	/// assert_eq!(FieldKind::from_input_type(""), FieldKind::Text);
	/// assert_eq!(FieldKind::from_input_type("number"), FieldKind::Other);
	/// ```
	pub fn from_input_type(input_type: &str) -> Self {
		match input_type.trim().to_ascii_lowercase().as_str() {
			// Browsers treat a missing type as text
			"" | "text" => FieldKind::Text,
			"email" => FieldKind::Email,
			"tel" => FieldKind::Tel,
			_ => FieldKind::Other,
		}
	}
}

/// A kind-specific pattern that replaces the built-in shape check for
/// `email` and `tel` fields.
///
/// The pattern must match the whole trimmed value, the same way the HTML
/// `pattern` attribute does.
#[derive(Debug, Clone)]
pub struct ConstraintPattern {
	source: String,
	regex: Regex,
}

impl ConstraintPattern {
	/// Compiles a pattern.
	///
	/// # Examples
	///
	/// ```
	/// use zappy_forms::ConstraintPattern;
	///
	/// let pattern = ConstraintPattern::new(r"\+972[0-9]{9}").unwrap();
	/// assert!(pattern.matches("+972501234567"));
	/// assert!(!pattern.matches("x+972501234567"));
	/// assert!(ConstraintPattern::new("(").is_err());
	/// ```
	pub fn new(pattern: impl Into<String>) -> FormResult<Self> {
		let source = pattern.into();
		let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
			FormError::InvalidPattern {
				pattern: source.clone(),
				source: e,
			}
		})?;
		Ok(Self { source, regex })
	}

	/// Returns true if the pattern matches the entire value.
	pub fn matches(&self, value: &str) -> bool {
		self.regex.is_match(value)
	}

	/// The pattern as written by the page author.
	pub fn as_str(&self) -> &str {
		&self.source
	}
}

/// One user-editable input within the form.
#[derive(Debug, Clone)]
pub struct Field {
	name: String,
	kind: FieldKind,
	required: bool,
	current_value: String,
	constraint_pattern: Option<ConstraintPattern>,
}

impl Field {
	/// Creates an optional, empty field.
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
			required: false,
			current_value: String::new(),
			constraint_pattern: None,
		}
	}

	/// Creates a field, rejecting an empty name.
	///
	/// Names key the verdict map, so a nameless input cannot be tracked.
	pub fn try_new(name: impl Into<String>, kind: FieldKind) -> FormResult<Self> {
		let name = name.into();
		if name.trim().is_empty() {
			return Err(FormError::EmptyFieldName);
		}
		Ok(Self::new(name, kind))
	}

	/// Marks the field as required.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Sets the required flag.
	pub fn with_required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// Sets the raw (untrimmed) value.
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.current_value = value.into();
		self
	}

	/// Attaches a kind-specific constraint pattern.
	pub fn with_pattern(mut self, pattern: ConstraintPattern) -> Self {
		self.constraint_pattern = Some(pattern);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	pub fn is_required(&self) -> bool {
		self.required
	}

	/// The current value, trimmed.
	pub fn value(&self) -> &str {
		self.current_value.trim()
	}

	/// The value exactly as read from the input.
	pub fn raw_value(&self) -> &str {
		&self.current_value
	}

	pub fn is_empty(&self) -> bool {
		self.value().is_empty()
	}

	pub fn constraint_pattern(&self) -> Option<&ConstraintPattern> {
		self.constraint_pattern.as_ref()
	}
}
