//! Aggregate validation state of a form

use crate::field::Field;
use crate::validators::ValidationVerdict;
use indexmap::IndexMap;
use serde::Serialize;

/// Where a field sits in its validation cycle.
///
/// There is no terminal phase: a `Valid` or `Invalid` field re-enters
/// `Validating` on the next blur or submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPhase {
	Untouched,
	Validating,
	Valid,
	Invalid,
}

impl FieldPhase {
	pub fn from_verdict(verdict: &ValidationVerdict) -> Self {
		if verdict.is_valid() {
			FieldPhase::Valid
		} else {
			FieldPhase::Invalid
		}
	}
}

/// Latest verdict per field name, in validation order.
///
/// A field missing from the map has not been validated yet, which is not
/// the same as being valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValidationState {
	verdicts: IndexMap<String, ValidationVerdict>,
}

impl FormValidationState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the verdict for a field, replacing any previous one.
	pub fn record(&mut self, field: impl Into<String>, verdict: ValidationVerdict) {
		self.verdicts.insert(field.into(), verdict);
	}

	/// Forgets a single field's verdict.
	pub fn forget(&mut self, field: &str) -> Option<ValidationVerdict> {
		self.verdicts.shift_remove(field)
	}

	pub fn clear(&mut self) {
		self.verdicts.clear();
	}

	pub fn verdict(&self, field: &str) -> Option<&ValidationVerdict> {
		self.verdicts.get(field)
	}

	/// True unless some tracked verdict is invalid. An empty state is valid.
	///
	/// # Examples
	///
	/// ```
	/// use zappy_forms::{FormValidationState, ValidationVerdict};
	///
	/// let mut state = FormValidationState::new();
	/// assert!(state.is_valid());
	///
	/// state.record("name", ValidationVerdict::valid());
	/// state.record("email", ValidationVerdict::invalid("Please enter a valid email address"));
	/// assert!(!state.is_valid());
	/// ```
	pub fn is_valid(&self) -> bool {
		self.verdicts.values().all(ValidationVerdict::is_valid)
	}

	/// Whether the given fields may be submitted.
	///
	/// Every field that is required or currently non-empty must have a valid
	/// verdict; an unvalidated field of that sort blocks submission.
	pub fn is_submit_eligible(&self, fields: &[Field]) -> bool {
		fields
			.iter()
			.filter(|field| field.is_required() || !field.is_empty())
			.all(|field| {
				self.verdict(field.name())
					.is_some_and(ValidationVerdict::is_valid)
			})
	}

	/// Invalid fields with their messages, in validation order.
	pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
		self.verdicts.iter().filter_map(|(name, verdict)| {
			verdict.message().map(|message| (name.as_str(), message))
		})
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationVerdict)> {
		self.verdicts.iter().map(|(name, verdict)| (name.as_str(), verdict))
	}

	pub fn len(&self) -> usize {
		self.verdicts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.verdicts.is_empty()
	}
}
