//! Field validation rules
//!
//! Rules are checked in a fixed order and the first failing rule decides the
//! verdict, so a field never carries more than one message:
//!
//! 1. required and empty (after trimming)
//! 2. `email` shape: `local@domain.tld`, printable ASCII, no whitespace
//! 3. `tel` shape: digits, spaces, `+`, `-`, parentheses, 10+ characters
//!
//! The emptiness check runs first so an empty required email field reports
//! "required" rather than "invalid email". Kind checks only apply to
//! non-empty values.
//!
//! ## Security Note
//!
//! These checks exist for visitor feedback only. The delivery backend
//! validates again and may still reject the submission.

use crate::field::{Field, FieldKind};
use crate::messages::ValidationMessages;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// Printable ASCII except '@' on both sides of a single '@', with at least
// one '.' separating non-empty labels after it.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[!-?A-~]+@[!-?A-~]+\.[!-?A-~]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

// Digits, spaces, '+', '-', '(' and ')' only.
static PHONE_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[0-9 +\-()]+$").expect("PHONE_REGEX: invalid regex pattern"));

/// Minimum number of characters in a phone number.
pub const MIN_PHONE_LENGTH: usize = 10;

/// Validity of one field at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
	valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<String>,
}

impl ValidationVerdict {
	pub fn valid() -> Self {
		Self {
			valid: true,
			message: None,
		}
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		Self {
			valid: false,
			message: Some(message.into()),
		}
	}

	pub fn is_valid(&self) -> bool {
		self.valid
	}

	/// The message to show; present iff the verdict is invalid.
	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}
}

/// Validates fields against the built-in rules.
///
/// # Examples
///
/// ```
/// use zappy_forms::{Field, FieldKind, FieldValidator};
///
/// let validator = FieldValidator::new();
///
/// let empty = Field::new("email", FieldKind::Email).required();
/// assert_eq!(validator.validate(&empty).message(), Some("This field is required"));
///
/// let bad = Field::new("email", FieldKind::Email).with_value("bad");
/// assert_eq!(
///     validator.validate(&bad).message(),
///     Some("Please enter a valid email address")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
	messages: ValidationMessages,
}

impl FieldValidator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the messages used for invalid verdicts.
	pub fn with_messages(mut self, messages: ValidationMessages) -> Self {
		self.messages = messages;
		self
	}

	pub fn messages(&self) -> &ValidationMessages {
		&self.messages
	}

	/// Validates a single field.
	pub fn validate(&self, field: &Field) -> ValidationVerdict {
		let value = field.value();

		if value.is_empty() {
			return if field.is_required() {
				ValidationVerdict::invalid(&self.messages.required)
			} else {
				ValidationVerdict::valid()
			};
		}

		match field.kind() {
			FieldKind::Email if !self.is_valid_email(field, value) => {
				ValidationVerdict::invalid(&self.messages.invalid_email)
			}
			FieldKind::Tel if !self.is_valid_phone(field, value) => {
				ValidationVerdict::invalid(&self.messages.invalid_phone)
			}
			_ => ValidationVerdict::valid(),
		}
	}

	fn is_valid_email(&self, field: &Field, value: &str) -> bool {
		match field.constraint_pattern() {
			Some(pattern) => pattern.matches(value),
			None => EMAIL_REGEX.is_match(value),
		}
	}

	fn is_valid_phone(&self, field: &Field, value: &str) -> bool {
		let shape_ok = match field.constraint_pattern() {
			Some(pattern) => pattern.matches(value),
			None => PHONE_REGEX.is_match(value),
		};
		shape_ok && value.chars().count() >= MIN_PHONE_LENGTH
	}
}

/// Validates a field with the default messages.
pub fn validate(field: &Field) -> ValidationVerdict {
	FieldValidator::new().validate(field)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::ConstraintPattern;
	use rstest::rstest;

	#[rstest]
	#[case(FieldKind::Text)]
	#[case(FieldKind::Email)]
	#[case(FieldKind::Tel)]
	#[case(FieldKind::Other)]
	fn test_required_empty_reports_required(#[case] kind: FieldKind) {
		let field = Field::new("f", kind).required().with_value("   ");
		let verdict = validate(&field);
		assert!(!verdict.is_valid());
		assert_eq!(verdict.message(), Some("This field is required"));
	}

	#[rstest]
	#[case(FieldKind::Email)]
	#[case(FieldKind::Tel)]
	fn test_optional_empty_skips_kind_checks(#[case] kind: FieldKind) {
		let field = Field::new("f", kind);
		assert!(validate(&field).is_valid());
	}

	#[rstest]
	#[case("jo@example.com")]
	#[case("first.last+tag@mail.example.co.il")]
	#[case("a@b.c")]
	#[case("  padded@example.com  ")]
	fn test_email_valid(#[case] value: &str) {
		let field = Field::new("email", FieldKind::Email).with_value(value);
		assert!(validate(&field).is_valid(), "{value} should be valid");
	}

	#[rstest]
	#[case("bad")]
	#[case("jo@example")]
	#[case("@example.com")]
	#[case("jo@@example.com")]
	#[case("jo@exa mple.com")]
	#[case("jo@example.")]
	#[case("jo@.com")]
	#[case("jö@example.com")]
	fn test_email_invalid(#[case] value: &str) {
		let field = Field::new("email", FieldKind::Email).with_value(value);
		let verdict = validate(&field);
		assert!(!verdict.is_valid(), "{value} should be invalid");
		assert_eq!(verdict.message(), Some("Please enter a valid email address"));
	}

	#[rstest]
	#[case("0501234567")]
	#[case("+972 50-123-4567")]
	#[case("(03) 123 4567")]
	fn test_phone_valid(#[case] value: &str) {
		let field = Field::new("phone", FieldKind::Tel).with_value(value);
		assert!(validate(&field).is_valid(), "{value} should be valid");
	}

	#[rstest]
	#[case("123")]
	#[case("050123456")]
	#[case("050-123-45x7")]
	#[case("050.123.4567")]
	fn test_phone_invalid(#[case] value: &str) {
		let field = Field::new("phone", FieldKind::Tel).with_value(value);
		let verdict = validate(&field);
		assert!(!verdict.is_valid(), "{value} should be invalid");
		assert_eq!(verdict.message(), Some("Please enter a valid phone number"));
	}

	#[rstest]
	fn test_text_and_other_are_unconstrained() {
		let text = Field::new("name", FieldKind::Text).with_value("anything @ all");
		let other = Field::new("budget", FieldKind::Other).with_value("12");
		assert!(validate(&text).is_valid());
		assert!(validate(&other).is_valid());
	}

	#[rstest]
	fn test_pattern_replaces_email_shape() {
		let pattern = ConstraintPattern::new(r"[^@]+@zappy\.io").unwrap();
		let field = Field::new("email", FieldKind::Email).with_pattern(pattern);

		assert!(validate(&field.clone().with_value("jo@zappy.io")).is_valid());
		assert!(!validate(&field.with_value("jo@example.com")).is_valid());
	}

	#[rstest]
	fn test_pattern_on_phone_keeps_length_rule() {
		let pattern = ConstraintPattern::new("[0-9]+").unwrap();
		let field = Field::new("phone", FieldKind::Tel).with_pattern(pattern);

		assert!(validate(&field.clone().with_value("0501234567")).is_valid());
		assert!(!validate(&field.with_value("050")).is_valid());
	}

	#[rstest]
	fn test_custom_messages() {
		let validator = FieldValidator::new().with_messages(ValidationMessages {
			required: "Required".into(),
			..Default::default()
		});
		let field = Field::new("name", FieldKind::Text).required();
		assert_eq!(validator.validate(&field).message(), Some("Required"));
	}

	#[rstest]
	fn test_valid_verdict_has_no_message() {
		let verdict = ValidationVerdict::valid();
		assert!(verdict.is_valid());
		assert_eq!(verdict.message(), None);
		assert_eq!(serde_json::to_string(&verdict).unwrap(), r#"{"valid":true}"#);
	}
}
