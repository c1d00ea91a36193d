//! Fixed-locale validation messages

use serde::{Deserialize, Serialize};

/// Messages surfaced next to invalid fields.
///
/// The site runs in a single locale; these can be replaced as a whole from
/// settings but are never negotiated per visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationMessages {
	pub required: String,
	pub invalid_email: String,
	pub invalid_phone: String,
}

impl Default for ValidationMessages {
	fn default() -> Self {
		Self {
			required: "This field is required".to_string(),
			invalid_email: "Please enter a valid email address".to_string(),
			invalid_phone: "Please enter a valid phone number".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_partial_override_keeps_defaults() {
		let messages: ValidationMessages =
			serde_json::from_str(r#"{"required": "Required"}"#).unwrap();
		assert_eq!(messages.required, "Required");
		assert_eq!(
			messages.invalid_email,
			ValidationMessages::default().invalid_email
		);
	}
}
