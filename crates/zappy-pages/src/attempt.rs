//! Submission attempts
//!
//! Every submit event yields a fresh [`SubmitOutcome`]. A valid submission
//! carries a [`SubmissionAttempt`]: the values captured at that instant and
//! the API outcome slot that the spawned delivery fills in. The native
//! submission is owned by the browser and not tracked here.

use crate::delivery::{ContactPayload, DeliveryError};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use zappy_forms::FormValidationState;

/// State of the asynchronous delivery of one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApiOutcome {
	#[default]
	Pending,
	Delivered,
	Failed(DeliveryError),
}

impl ApiOutcome {
	pub fn is_pending(&self) -> bool {
		matches!(self, ApiOutcome::Pending)
	}
}

/// One valid submit event.
#[derive(Debug, Clone)]
pub struct SubmissionAttempt {
	values: IndexMap<String, String>,
	payload: ContactPayload,
	api: Rc<RefCell<ApiOutcome>>,
}

impl SubmissionAttempt {
	pub(crate) fn new(values: IndexMap<String, String>, payload: ContactPayload) -> Self {
		Self {
			values,
			payload,
			api: Rc::new(RefCell::new(ApiOutcome::Pending)),
		}
	}

	/// Trimmed field values at submit time, in form order.
	pub fn values(&self) -> &IndexMap<String, String> {
		&self.values
	}

	pub fn payload(&self) -> &ContactPayload {
		&self.payload
	}

	/// Current API outcome; `Pending` until the delivery settles.
	pub fn api_outcome(&self) -> ApiOutcome {
		self.api.borrow().clone()
	}

	pub(crate) fn api_slot(&self) -> Rc<RefCell<ApiOutcome>> {
		Rc::clone(&self.api)
	}
}

/// What the coordinator did with a submit event.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
	/// Validation failed; the default action was suppressed and nothing was sent.
	Blocked { state: FormValidationState },
	/// The native submission proceeds and a delivery was dispatched.
	Proceeding(SubmissionAttempt),
}

impl SubmitOutcome {
	pub fn is_blocked(&self) -> bool {
		matches!(self, SubmitOutcome::Blocked { .. })
	}

	pub fn attempt(&self) -> Option<&SubmissionAttempt> {
		match self {
			SubmitOutcome::Proceeding(attempt) => Some(attempt),
			SubmitOutcome::Blocked { .. } => None,
		}
	}

	pub fn validation_state(&self) -> Option<&FormValidationState> {
		match self {
			SubmitOutcome::Blocked { state } => Some(state),
			SubmitOutcome::Proceeding(_) => None,
		}
	}
}
