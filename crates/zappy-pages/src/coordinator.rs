//! Submission coordinator
//!
//! Gates a submit event on validation and, when the form is valid, fires a
//! best-effort copy of the data at the backend while the browser's native
//! submission carries on untouched.
//!
//! ```text
//! submit ─▶ reset ─▶ validate_all ─▶ present
//!                                     │
//!             invalid ◀───────────────┴──────────────▶ valid
//!               │                                        │
//!       prevent_default                     native submission proceeds
//!       (nothing sent)                      + spawn one delivery (no retry)
//! ```
//!
//! The delivery runs on the supplied [`LocalSpawn`]. Its result is only
//! logged and recorded on the [`SubmissionAttempt`]; it never reaches the
//! submit event. If the page unloads first, the delivery is dropped.

use crate::attempt::{ApiOutcome, SubmissionAttempt, SubmitOutcome};
use crate::delivery::{ContactPayload, DeliveryError, DeliveryTransport, deliver};
use crate::dom::{FieldNode, SubmitEvent, is_data_input_type, read_field, read_fields};
use crate::presenter::{ErrorPresenter, PresenterBinding};
use futures::task::{LocalSpawn, LocalSpawnExt};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use zappy_conf::DeliverySettings;
use zappy_forms::{Field, FieldValidator, FormStateTracker, ValidationMessages, ValidationVerdict};

/// Per-form submit and blur handling.
pub struct SubmissionCoordinator<T: DeliveryTransport + 'static> {
	tracker: FormStateTracker,
	presenter: ErrorPresenter,
	transport: Rc<T>,
	delivery: DeliverySettings,
	spawner: Rc<dyn LocalSpawn>,
}

impl<T: DeliveryTransport + 'static> SubmissionCoordinator<T> {
	pub fn new(transport: Rc<T>, delivery: DeliverySettings, spawner: Rc<dyn LocalSpawn>) -> Self {
		Self {
			tracker: FormStateTracker::new(),
			presenter: ErrorPresenter::new(),
			transport,
			delivery,
			spawner,
		}
	}

	/// Uses `messages` for validation errors.
	pub fn with_messages(mut self, messages: ValidationMessages) -> Self {
		self.tracker = FormStateTracker::with_validator(FieldValidator::new().with_messages(messages));
		self
	}

	pub fn with_presenter(mut self, presenter: ErrorPresenter) -> Self {
		self.presenter = presenter;
		self
	}

	/// Handles one submit event.
	///
	/// Previous annotations are cleared, every field is re-validated and
	/// each node shows its own verdict. An invalid form has its default action
	/// suppressed and nothing is sent. A valid form keeps its default
	/// action and one delivery to `endpoint` is spawned.
	pub fn on_submit<N: FieldNode>(
		&mut self,
		event: &dyn SubmitEvent,
		nodes: &[N],
		endpoint: &str,
	) -> SubmitOutcome {
		let fields = read_fields(nodes);
		let mut display = PresenterBinding::new(&self.presenter, nodes);

		self.tracker.reset(&fields, &mut display);
		let verdicts = self.tracker.validate_each(&fields);
		for (node, verdict) in nodes.iter().zip(&verdicts) {
			match verdict.message() {
				Some(message) => self.presenter.show(node, message),
				None => self.presenter.clear(node),
			}
		}
		let eligible = self.tracker.state().is_submit_eligible(&fields);

		if !eligible {
			event.prevent_default();
			let state = self.tracker.state().clone();
			tracing::debug!(invalid = state.errors().count(), "contact submission blocked");
			crate::info_log!(
				"Zappy: Contact form has {} invalid field(s), submission blocked",
				state.errors().count()
			);
			return SubmitOutcome::Blocked { state };
		}

		let values = collect_values(&fields);
		let payload = ContactPayload::from_values(&values, &self.delivery);
		let attempt = SubmissionAttempt::new(values, payload);
		self.dispatch(&attempt, endpoint);
		SubmitOutcome::Proceeding(attempt)
	}

	/// Re-validates the field that lost focus and updates its annotation.
	///
	/// Returns `None` for nodes that are not data-carrying inputs or text
	/// areas.
	pub fn on_blur<N: FieldNode>(&mut self, node: &N) -> Option<ValidationVerdict> {
		if !node.is_text_entry() || !is_data_input_type(&node.input_type()) {
			return None;
		}

		let field = read_field(node);
		let verdict = self.tracker.validate_one(&field);
		match verdict.message() {
			Some(message) => self.presenter.show(node, message),
			None => self.presenter.clear(node),
		}
		Some(verdict)
	}

	pub fn tracker(&self) -> &FormStateTracker {
		&self.tracker
	}

	pub fn presenter(&self) -> &ErrorPresenter {
		&self.presenter
	}

	pub fn delivery(&self) -> &DeliverySettings {
		&self.delivery
	}

	fn dispatch(&self, attempt: &SubmissionAttempt, endpoint: &str) {
		crate::info_log!("Zappy: Sending contact form to backend API...");
		tracing::debug!(
			website_id = %self.delivery.website_id,
			endpoint,
			"dispatching contact delivery"
		);

		let future = deliver_in_background(
			Rc::clone(&self.transport),
			endpoint.to_string(),
			attempt.payload().clone(),
			attempt.api_slot(),
		);
		if let Err(e) = self.spawner.spawn_local(future) {
			crate::error_log!("Zappy: Failed to send to backend API: {}", e);
			*attempt.api_slot().borrow_mut() =
				ApiOutcome::Failed(DeliveryError::Transport(e.to_string()));
		}
	}
}

/// Trimmed values of named fields, keyed by name. A later field with the
/// same name wins.
fn collect_values(fields: &[Field]) -> IndexMap<String, String> {
	fields
		.iter()
		.filter(|f| !f.name().is_empty())
		.map(|f| (f.name().to_string(), f.value().to_string()))
		.collect()
}

async fn deliver_in_background<T: DeliveryTransport + ?Sized>(
	transport: Rc<T>,
	endpoint: String,
	payload: ContactPayload,
	slot: Rc<RefCell<ApiOutcome>>,
) {
	let outcome = match deliver(&*transport, &endpoint, &payload).await {
		Ok(_) => {
			crate::info_log!("Zappy: Contact form data sent successfully to backend");
			ApiOutcome::Delivered
		}
		Err(DeliveryError::Rejected { reason }) => {
			crate::warn_log!("Zappy: Backend returned error: {}", reason);
			ApiOutcome::Failed(DeliveryError::Rejected { reason })
		}
		Err(e) => {
			crate::error_log!("Zappy: Failed to send to backend API: {}", e);
			ApiOutcome::Failed(e)
		}
	};
	*slot.borrow_mut() = outcome;
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::delivery::TransportResponse;
	use crate::testing::{FailingSpawner, MockField, MockSubmitEvent, MockTransport};
	use futures::executor::LocalPool;
	use rstest::*;

	const ENDPOINT: &str = "http://localhost:5001/api/email/contact-form";

	fn coordinator(
		pool: &LocalPool,
		transport: &Rc<MockTransport>,
	) -> SubmissionCoordinator<MockTransport> {
		SubmissionCoordinator::new(
			Rc::clone(transport),
			DeliverySettings::default(),
			Rc::new(pool.spawner()),
		)
	}

	#[rstest]
	fn test_blur_updates_only_that_field() {
		let pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let mut coordinator = coordinator(&pool, &transport);
		let email = MockField::input("email", "email").with_value("bad");

		let verdict = coordinator.on_blur(&email).unwrap();

		assert!(!verdict.is_valid());
		assert_eq!(email.annotation_count(), 1);
		assert_eq!(coordinator.tracker().state().len(), 1);

		email.set_value("jo@example.com");
		assert!(coordinator.on_blur(&email).unwrap().is_valid());
		assert_eq!(email.annotation_count(), 0);
		assert!(!email.has_class("error"));
	}

	#[rstest]
	fn test_shared_name_invalid_node_blocks_submit() {
		let mut pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let mut coordinator = coordinator(&pool, &transport);
		let nodes = vec![
			MockField::input("email", "email").required().with_value("bad"),
			MockField::input("email", "email").with_value("jo@example.com"),
		];
		let event = MockSubmitEvent::new();

		let outcome = coordinator.on_submit(&event, &nodes, ENDPOINT);
		pool.run_until_stalled();

		assert!(outcome.is_blocked());
		assert!(event.default_prevented());
		assert_eq!(transport.request_count(), 0);
		assert_eq!(nodes[0].annotation_count(), 1);
		assert_eq!(nodes[1].annotation_count(), 0);
	}

	#[rstest]
	#[case(MockField::element("SELECT", "budget"))]
	#[case(MockField::input("token", "hidden"))]
	#[case(MockField::input("send", "submit"))]
	fn test_blur_ignores_non_entry_nodes(#[case] node: MockField) {
		let pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let mut coordinator = coordinator(&pool, &transport);

		assert!(coordinator.on_blur(&node).is_none());
		assert!(coordinator.tracker().state().is_empty());
	}

	#[rstest]
	fn test_spawn_failure_is_recorded_not_raised() {
		let transport = Rc::new(MockTransport::accepting());
		let mut coordinator = SubmissionCoordinator::new(
			Rc::clone(&transport),
			DeliverySettings::default(),
			Rc::new(FailingSpawner),
		);
		let event = MockSubmitEvent::new();
		let fields = vec![MockField::input("name", "text").with_value("Jo")];

		let outcome = coordinator.on_submit(&event, &fields, ENDPOINT);

		assert!(!event.default_prevented());
		let attempt = outcome.attempt().unwrap();
		assert!(matches!(
			attempt.api_outcome(),
			ApiOutcome::Failed(DeliveryError::Transport(_))
		));
		assert_eq!(transport.request_count(), 0);
	}

	#[rstest]
	fn test_rejection_is_recorded() {
		let mut pool = LocalPool::new();
		let transport = Rc::new(MockTransport::responding(TransportResponse::new(
			200,
			r#"{"success": false, "error": "Invalid website"}"#,
		)));
		let mut coordinator = coordinator(&pool, &transport);
		let event = MockSubmitEvent::new();
		let fields = vec![MockField::input("name", "text").with_value("Jo")];

		let outcome = coordinator.on_submit(&event, &fields, ENDPOINT);
		let attempt = outcome.attempt().unwrap();
		assert!(attempt.api_outcome().is_pending());

		pool.run();

		assert_eq!(
			attempt.api_outcome(),
			ApiOutcome::Failed(DeliveryError::Rejected {
				reason: "Invalid website".to_string()
			})
		);
	}

	#[rstest]
	fn test_custom_messages_are_used() {
		let pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let mut coordinator = coordinator(&pool, &transport).with_messages(ValidationMessages {
			required: "שדה חובה".to_string(),
			..ValidationMessages::default()
		});
		let name = MockField::input("name", "text").required();

		coordinator.on_submit(&MockSubmitEvent::new(), std::slice::from_ref(&name), ENDPOINT);

		assert_eq!(name.annotation_text("error-message").as_deref(), Some("שדה חובה"));
	}

	#[rstest]
	fn test_collect_values_skips_unnamed() {
		let fields = vec![
			Field::new("", zappy_forms::FieldKind::Text).with_value("x"),
			Field::new("name", zappy_forms::FieldKind::Text).with_value(" Jo "),
		];
		let values = collect_values(&fields);
		assert_eq!(values.len(), 1);
		assert_eq!(values["name"], "Jo");
	}
}
