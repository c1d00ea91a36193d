//! Form state tracking
//!
//! [`FormStateTracker`] owns the verdict map of one form. It is driven from
//! two places:
//!
//! - submit: [`reset`](FormStateTracker::reset) then
//!   [`validate_all`](FormStateTracker::validate_all)
//! - blur: [`validate_one`](FormStateTracker::validate_one) for the field
//!   that lost focus
//!
//! ```text
//! untouched ──▶ validating ──▶ valid
//!                   ▲    └────▶ invalid
//!                   └── next blur / submit
//! ```

use crate::field::Field;
use crate::state::{FieldPhase, FormValidationState};
use crate::validators::{FieldValidator, ValidationVerdict};
use std::collections::{HashMap, HashSet};

/// Where verdicts become visible.
///
/// The browser implementation annotates DOM nodes; tests record calls.
pub trait ErrorDisplay {
	/// Shows `message` next to the named field.
	fn show_error(&mut self, field: &str, message: &str);

	/// Removes any error shown for the named field.
	fn clear_error(&mut self, field: &str);

	/// Shows the verdict's message, or clears the field when it is valid.
	fn reflect(&mut self, field: &str, verdict: &ValidationVerdict) {
		match verdict.message() {
			Some(message) => self.show_error(field, message),
			None => self.clear_error(field),
		}
	}
}

/// Per-form verdict state.
#[derive(Debug, Clone, Default)]
pub struct FormStateTracker {
	validator: FieldValidator,
	state: FormValidationState,
	phases: HashMap<String, FieldPhase>,
}

impl FormStateTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_validator(validator: FieldValidator) -> Self {
		Self {
			validator,
			..Self::default()
		}
	}

	/// Validates every field in order and returns the resulting state.
	///
	/// # Examples
	///
	/// ```
	/// use zappy_forms::{Field, FieldKind, FormStateTracker};
	///
	/// let fields = vec![
	///     Field::new("name", FieldKind::Text).required(),
	///     Field::new("email", FieldKind::Email).with_value("bad"),
	/// ];
	///
	/// let mut tracker = FormStateTracker::new();
	/// let state = tracker.validate_all(&fields);
	/// assert!(!state.is_valid());
	/// assert_eq!(state.errors().count(), 2);
	/// ```
	pub fn validate_all(&mut self, fields: &[Field]) -> &FormValidationState {
		self.validate_each(fields);
		&self.state
	}

	/// Validates every field in order and returns one verdict per field.
	///
	/// Fields sharing a name share one state entry. Within a pass, an
	/// invalid verdict for a name is never overwritten by a later valid one.
	pub fn validate_each(&mut self, fields: &[Field]) -> Vec<ValidationVerdict> {
		let mut seen = HashSet::new();
		fields
			.iter()
			.map(|field| {
				let earlier = if seen.insert(field.name()) {
					None
				} else {
					self.state
						.verdict(field.name())
						.filter(|verdict| !verdict.is_valid())
						.cloned()
				};
				let verdict = self.validate_one(field);
				if let Some(earlier) = earlier {
					self.phases
						.insert(field.name().to_string(), FieldPhase::Invalid);
					self.state.record(field.name(), earlier);
				}
				verdict
			})
			.collect()
	}

	/// Re-validates a single field, leaving every other entry alone.
	pub fn validate_one(&mut self, field: &Field) -> ValidationVerdict {
		let name = field.name().to_string();

		self.phases.insert(name.clone(), FieldPhase::Validating);
		self.state.forget(&name);

		let verdict = self.validator.validate(field);

		self.phases
			.insert(name.clone(), FieldPhase::from_verdict(&verdict));
		self.state.record(name, verdict.clone());
		verdict
	}

	/// Clears all verdicts and every visible annotation for `fields`.
	pub fn reset(&mut self, fields: &[Field], display: &mut dyn ErrorDisplay) {
		self.state.clear();
		self.phases.clear();
		for field in fields {
			display.clear_error(field.name());
		}
	}

	/// Pushes the current verdict of each field to `display`.
	///
	/// Fields without a verdict are cleared.
	pub fn present(&self, fields: &[Field], display: &mut dyn ErrorDisplay) {
		for field in fields {
			match self.state.verdict(field.name()) {
				Some(verdict) => display.reflect(field.name(), verdict),
				None => display.clear_error(field.name()),
			}
		}
	}

	pub fn state(&self) -> &FormValidationState {
		&self.state
	}

	pub fn is_valid(&self) -> bool {
		self.state.is_valid()
	}

	/// Phase of the named field; fields never seen are `Untouched`.
	pub fn phase(&self, field: &str) -> FieldPhase {
		self.phases
			.get(field)
			.copied()
			.unwrap_or(FieldPhase::Untouched)
	}

	pub fn validator(&self) -> &FieldValidator {
		&self.validator
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldKind;
	use rstest::{fixture, rstest};

	#[derive(Default)]
	struct RecordingDisplay {
		calls: Vec<String>,
	}

	impl ErrorDisplay for RecordingDisplay {
		fn show_error(&mut self, field: &str, message: &str) {
			self.calls.push(format!("show:{field}:{message}"));
		}

		fn clear_error(&mut self, field: &str) {
			self.calls.push(format!("clear:{field}"));
		}
	}

	#[fixture]
	fn contact_fields() -> Vec<Field> {
		vec![
			Field::new("name", FieldKind::Text).required(),
			Field::new("email", FieldKind::Email)
				.required()
				.with_value("bad"),
			Field::new("phone", FieldKind::Tel).with_value("123"),
		]
	}

	#[rstest]
	fn test_untracked_field_is_untouched() {
		let tracker = FormStateTracker::new();
		assert_eq!(tracker.phase("name"), FieldPhase::Untouched);
	}

	#[rstest]
	fn test_validate_all_covers_every_field(contact_fields: Vec<Field>) {
		let mut tracker = FormStateTracker::new();
		let state = tracker.validate_all(&contact_fields);

		assert_eq!(state.len(), 3);
		assert!(!state.is_valid());
		assert_eq!(tracker.phase("name"), FieldPhase::Invalid);
		assert_eq!(tracker.phase("email"), FieldPhase::Invalid);
		assert_eq!(tracker.phase("phone"), FieldPhase::Invalid);
	}

	#[rstest]
	fn test_validate_one_leaves_other_entries(contact_fields: Vec<Field>) {
		let mut tracker = FormStateTracker::new();
		tracker.validate_all(&contact_fields);

		let fixed = Field::new("email", FieldKind::Email)
			.required()
			.with_value("jo@example.com");
		let verdict = tracker.validate_one(&fixed);

		assert!(verdict.is_valid());
		assert_eq!(tracker.phase("email"), FieldPhase::Valid);
		assert!(!tracker.state().verdict("name").unwrap().is_valid());
		assert_eq!(tracker.state().len(), 3);
	}

	#[rstest]
	fn test_invalid_field_can_become_valid(contact_fields: Vec<Field>) {
		let mut tracker = FormStateTracker::new();
		tracker.validate_one(&contact_fields[0]);
		assert_eq!(tracker.phase("name"), FieldPhase::Invalid);

		tracker.validate_one(&contact_fields[0].clone().with_value("Jo"));
		assert_eq!(tracker.phase("name"), FieldPhase::Valid);
	}

	#[rstest]
	fn test_reset_clears_state_and_display(contact_fields: Vec<Field>) {
		let mut tracker = FormStateTracker::new();
		tracker.validate_all(&contact_fields);

		let mut display = RecordingDisplay::default();
		tracker.reset(&contact_fields, &mut display);

		assert!(tracker.state().is_empty());
		assert_eq!(tracker.phase("email"), FieldPhase::Untouched);
		assert_eq!(
			display.calls,
			vec!["clear:name", "clear:email", "clear:phone"]
		);
	}

	#[rstest]
	fn test_present_reflects_verdicts() {
		let fields = vec![
			Field::new("name", FieldKind::Text).required(),
			Field::new("email", FieldKind::Email).with_value("jo@example.com"),
			Field::new("message", FieldKind::Text),
		];
		let mut tracker = FormStateTracker::new();
		tracker.validate_one(&fields[0]);
		tracker.validate_one(&fields[1]);

		let mut display = RecordingDisplay::default();
		tracker.present(&fields, &mut display);

		assert_eq!(
			display.calls,
			vec![
				"show:name:This field is required",
				"clear:email",
				"clear:message"
			]
		);
	}

	#[rstest]
	fn test_shared_name_keeps_invalid_verdict() {
		let fields = vec![
			Field::new("email", FieldKind::Email)
				.required()
				.with_value("bad"),
			Field::new("email", FieldKind::Email).with_value("jo@example.com"),
		];
		let mut tracker = FormStateTracker::new();

		let verdicts = tracker.validate_each(&fields);

		assert!(!verdicts[0].is_valid());
		assert!(verdicts[1].is_valid());
		assert!(!tracker.is_valid());
		assert_eq!(tracker.phase("email"), FieldPhase::Invalid);
		assert!(!tracker.state().is_submit_eligible(&fields));
	}
}
