//! Contact form validation for Zappy sites
//!
//! This crate holds the DOM-free half of the contact form pipeline:
//! - [`Field`]: a snapshot of one form input (name, kind, required flag, value)
//! - [`FieldValidator`]: maps a field to a [`ValidationVerdict`]
//! - [`FormStateTracker`]: keeps the latest verdict per field and derives
//!   whether the form may be submitted
//!
//! Rendering verdicts is left to an [`ErrorDisplay`] implementation, which
//! `zappy-pages` provides on top of the browser DOM.
//!
//! ## Example
//!
//! ```
//! use zappy_forms::{Field, FieldKind, FormStateTracker};
//!
//! let fields = vec![
//!     Field::new("name", FieldKind::Text).required().with_value("Jo"),
//!     Field::new("email", FieldKind::Email).required().with_value("jo@example.com"),
//! ];
//!
//! let mut tracker = FormStateTracker::new();
//! let state = tracker.validate_all(&fields);
//! assert!(state.is_valid());
//! ```

pub mod field;
pub mod messages;
pub mod state;
pub mod tracker;
pub mod validators;

pub use field::{ConstraintPattern, Field, FieldKind};
pub use messages::ValidationMessages;
pub use state::{FieldPhase, FormValidationState};
pub use tracker::{ErrorDisplay, FormStateTracker};
pub use validators::{FieldValidator, ValidationVerdict, validate};

/// Errors raised while describing a form.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field name must not be empty")]
	EmptyFieldName,
	#[error("Invalid constraint pattern '{pattern}': {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},
}

pub type FormResult<T> = Result<T, FormError>;
