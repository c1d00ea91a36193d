//! Test doubles
//!
//! In-memory stand-ins for the DOM, the backend and the third-party widgets,
//! usable from native `cargo test` without a browser.
//!
//! ```
//! use zappy_pages::dom::FieldNode;
//! use zappy_pages::presenter::ErrorPresenter;
//! use zappy_pages::testing::MockField;
//!
//! let field = MockField::input("email", "email").required();
//! ErrorPresenter::new().show(&field, "This field is required");
//!
//! assert!(field.has_class("error"));
//! assert_eq!(field.annotation_count(), 1);
//! ```

use crate::accessibility::ToolbarFactory;
use crate::bootstrap::Sleeper;
use crate::consent::{ChangeCallback, ConsentService, ConsentSignal, ConsentSink, WidgetError};
use crate::delivery::{ContactPayload, DeliveryError, DeliveryTransport, TransportResponse};
use crate::dom::{DomError, ElementQuery, FieldNode, FocusOutHandler, FormSurface, SubmitEvent, SubmitHandler};
use async_trait::async_trait;
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use zappy_conf::{ConsentCategory, ConsentConfig, ToolbarConfig};

#[derive(Debug, Default)]
struct FieldState {
	tag_name: String,
	name: String,
	input_type: String,
	required: bool,
	value: String,
	pattern: Option<String>,
	detached: bool,
	failing: bool,
	classes: Vec<String>,
	/// Sibling annotations, nearest first.
	annotations: Vec<(String, String)>,
}

/// An input or textarea held in memory. Clones share state.
#[derive(Debug, Clone)]
pub struct MockField(Rc<RefCell<FieldState>>);

impl MockField {
	/// Any element; `tag_name` is upper-cased.
	pub fn element(tag_name: &str, name: &str) -> Self {
		Self(Rc::new(RefCell::new(FieldState {
			tag_name: tag_name.to_ascii_uppercase(),
			name: name.to_string(),
			..FieldState::default()
		})))
	}

	pub fn input(name: &str, input_type: &str) -> Self {
		let field = Self::element("INPUT", name);
		field.0.borrow_mut().input_type = input_type.to_string();
		field
	}

	pub fn textarea(name: &str) -> Self {
		let field = Self::element("TEXTAREA", name);
		field.0.borrow_mut().input_type = "textarea".to_string();
		field
	}

	pub fn required(self) -> Self {
		self.0.borrow_mut().required = true;
		self
	}

	pub fn with_value(self, value: &str) -> Self {
		self.set_value(value);
		self
	}

	pub fn with_pattern(self, pattern: &str) -> Self {
		self.0.borrow_mut().pattern = Some(pattern.to_string());
		self
	}

	pub fn set_value(&self, value: &str) {
		self.0.borrow_mut().value = value.to_string();
	}

	/// Removes the field from the simulated document.
	pub fn detach(&self) {
		self.0.borrow_mut().detached = true;
	}

	/// Makes every later mutation fail with [`DomError::Js`].
	pub fn fail_mutations(&self) {
		self.0.borrow_mut().failing = true;
	}

	/// Number of annotation siblings, whatever their class.
	pub fn annotation_count(&self) -> usize {
		self.0.borrow().annotations.len()
	}

	pub fn classes(&self) -> Vec<String> {
		self.0.borrow().classes.clone()
	}

	fn check_mutable(&self) -> Result<(), DomError> {
		let state = self.0.borrow();
		if state.detached {
			return Err(DomError::Detached);
		}
		if state.failing {
			return Err(DomError::Js("NotAllowedError".to_string()));
		}
		Ok(())
	}
}

impl FieldNode for MockField {
	fn name(&self) -> String {
		self.0.borrow().name.clone()
	}

	fn tag_name(&self) -> String {
		self.0.borrow().tag_name.clone()
	}

	fn input_type(&self) -> String {
		self.0.borrow().input_type.clone()
	}

	fn is_required(&self) -> bool {
		self.0.borrow().required
	}

	fn value(&self) -> String {
		self.0.borrow().value.clone()
	}

	fn pattern(&self) -> Option<String> {
		self.0.borrow().pattern.clone()
	}

	fn is_connected(&self) -> bool {
		!self.0.borrow().detached
	}

	fn has_class(&self, class: &str) -> bool {
		self.0.borrow().classes.iter().any(|c| c == class)
	}

	fn add_class(&self, class: &str) -> Result<(), DomError> {
		self.check_mutable()?;
		if !self.has_class(class) {
			self.0.borrow_mut().classes.push(class.to_string());
		}
		Ok(())
	}

	fn remove_class(&self, class: &str) -> Result<(), DomError> {
		self.check_mutable()?;
		self.0.borrow_mut().classes.retain(|c| c != class);
		Ok(())
	}

	fn annotation_text(&self, class: &str) -> Option<String> {
		self.0
			.borrow()
			.annotations
			.first()
			.filter(|(c, _)| c == class)
			.map(|(_, text)| text.clone())
	}

	fn insert_annotation(&self, class: &str, text: &str) -> Result<(), DomError> {
		self.check_mutable()?;
		self.0
			.borrow_mut()
			.annotations
			.insert(0, (class.to_string(), text.to_string()));
		Ok(())
	}

	fn set_annotation_text(&self, class: &str, text: &str) -> Result<(), DomError> {
		self.check_mutable()?;
		let mut state = self.0.borrow_mut();
		match state.annotations.first_mut() {
			Some((c, existing)) if c == class => {
				*existing = text.to_string();
				Ok(())
			}
			_ => Err(DomError::NotFound(format!(".{}", class))),
		}
	}

	fn remove_annotation(&self, class: &str) -> Result<(), DomError> {
		self.check_mutable()?;
		let mut state = self.0.borrow_mut();
		if state.annotations.first().is_some_and(|(c, _)| c == class) {
			state.annotations.remove(0);
		}
		Ok(())
	}
}

/// A submit event that records `preventDefault`.
#[derive(Debug, Default)]
pub struct MockSubmitEvent {
	prevented: Cell<bool>,
}

impl MockSubmitEvent {
	pub fn new() -> Self {
		Self::default()
	}
}

impl SubmitEvent for MockSubmitEvent {
	fn prevent_default(&self) {
		self.prevented.set(true);
	}

	fn default_prevented(&self) -> bool {
		self.prevented.get()
	}
}

#[derive(Default)]
struct FormState {
	fields: RefCell<Vec<MockField>>,
	class_name: String,
	id: String,
	reject_listeners: bool,
	focusout_failures: Cell<u32>,
	submit_handlers: RefCell<Vec<SubmitHandler>>,
	focusout_handlers: RefCell<Vec<FocusOutHandler<MockField>>>,
}

/// A form element held in memory. Clones share state.
#[derive(Clone, Default)]
pub struct MockForm(Rc<FormState>);

impl fmt::Debug for MockForm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MockForm")
			.field("class_name", &self.0.class_name)
			.field("id", &self.0.id)
			.field("fields", &self.0.fields.borrow().len())
			.finish()
	}
}

impl PartialEq for MockForm {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl MockForm {
	pub fn new(fields: Vec<MockField>) -> Self {
		Self(Rc::new(FormState {
			fields: RefCell::new(fields),
			..FormState::default()
		}))
	}

	pub fn with_class(self, class_name: &str) -> Self {
		self.rebuild(|state| state.class_name = class_name.to_string())
	}

	pub fn with_id(self, id: &str) -> Self {
		self.rebuild(|state| state.id = id.to_string())
	}

	/// Makes listener registration fail.
	pub fn rejecting_listeners(self) -> Self {
		self.rebuild(|state| state.reject_listeners = true)
	}

	/// Makes the next `focusout` registration fail once.
	pub fn rejecting_focusout_once(self) -> Self {
		self.rebuild(|state| state.focusout_failures.set(1))
	}

	fn rebuild(self, edit: impl FnOnce(&mut FormState)) -> Self {
		let mut state = FormState {
			fields: RefCell::new(self.0.fields.borrow().clone()),
			class_name: self.0.class_name.clone(),
			id: self.0.id.clone(),
			reject_listeners: self.0.reject_listeners,
			focusout_failures: Cell::new(self.0.focusout_failures.get()),
			..FormState::default()
		};
		edit(&mut state);
		Self(Rc::new(state))
	}

	/// Dispatches a submit event to every listener and returns it.
	pub fn submit(&self) -> MockSubmitEvent {
		let event = MockSubmitEvent::new();
		for handler in self.0.submit_handlers.borrow_mut().iter_mut() {
			handler(&event);
		}
		event
	}

	/// Dispatches a `focusout` from `field`.
	pub fn focus_out(&self, field: &MockField) {
		for handler in self.0.focusout_handlers.borrow_mut().iter_mut() {
			handler(field.clone());
		}
	}

	pub fn submit_listener_count(&self) -> usize {
		self.0.submit_handlers.borrow().len()
	}

	pub fn focusout_listener_count(&self) -> usize {
		self.0.focusout_handlers.borrow().len()
	}
}

impl FormSurface for MockForm {
	type Field = MockField;

	fn fields(&self) -> Vec<MockField> {
		self.0.fields.borrow().clone()
	}

	fn describe(&self) -> String {
		if !self.0.class_name.is_empty() {
			self.0.class_name.clone()
		} else if !self.0.id.is_empty() {
			self.0.id.clone()
		} else {
			"unnamed form".to_string()
		}
	}

	fn add_submit_listener(&self, handler: SubmitHandler) -> Result<(), DomError> {
		if self.0.reject_listeners {
			return Err(DomError::Js("listener rejected".to_string()));
		}
		self.0.submit_handlers.borrow_mut().push(handler);
		Ok(())
	}

	fn add_focusout_listener(&self, handler: FocusOutHandler<MockField>) -> Result<(), DomError> {
		if self.0.reject_listeners {
			return Err(DomError::Js("listener rejected".to_string()));
		}
		let failures = self.0.focusout_failures.get();
		if failures > 0 {
			self.0.focusout_failures.set(failures - 1);
			return Err(DomError::Js("transient".to_string()));
		}
		self.0.focusout_handlers.borrow_mut().push(handler);
		Ok(())
	}
}

/// A document answering selector and id lookups from tables.
#[derive(Debug, Default)]
pub struct MockDocument {
	by_selector: HashMap<String, MockForm>,
	by_id: HashMap<String, MockForm>,
	invalid: HashSet<String>,
}

impl MockDocument {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_selector(mut self, selector: &str, form: MockForm) -> Self {
		self.by_selector.insert(selector.to_string(), form);
		self
	}

	pub fn with_id(mut self, id: &str, form: MockForm) -> Self {
		self.by_id.insert(id.to_string(), form);
		self
	}

	/// Makes `selector` raise a syntax error.
	pub fn with_invalid_selector(mut self, selector: &str) -> Self {
		self.invalid.insert(selector.to_string());
		self
	}
}

impl ElementQuery for MockDocument {
	type Element = MockForm;

	fn query_selector(&self, selector: &str) -> Result<Option<MockForm>, DomError> {
		if self.invalid.contains(selector) {
			return Err(DomError::InvalidSelector(selector.to_string()));
		}
		Ok(self.by_selector.get(selector).cloned())
	}

	fn get_element_by_id(&self, id: &str) -> Option<MockForm> {
		self.by_id.get(id).cloned()
	}
}

/// A backend that records requests and plays back scripted responses.
///
/// Once the script runs out, the fallback response is used.
#[derive(Debug)]
pub struct MockTransport {
	script: RefCell<VecDeque<Result<TransportResponse, DeliveryError>>>,
	fallback: Result<TransportResponse, DeliveryError>,
	requests: RefCell<Vec<(String, ContactPayload)>>,
}

impl MockTransport {
	/// Answers `200 {"success": true}`.
	pub fn accepting() -> Self {
		Self::responding(TransportResponse::new(200, r#"{"success":true}"#))
	}

	pub fn responding(response: TransportResponse) -> Self {
		Self::with_fallback(Ok(response))
	}

	/// Fails every request at the transport level.
	pub fn failing(error: DeliveryError) -> Self {
		Self::with_fallback(Err(error))
	}

	fn with_fallback(fallback: Result<TransportResponse, DeliveryError>) -> Self {
		Self {
			script: RefCell::new(VecDeque::new()),
			fallback,
			requests: RefCell::new(Vec::new()),
		}
	}

	/// Queues a response for the next request.
	pub fn then(self, response: Result<TransportResponse, DeliveryError>) -> Self {
		self.script.borrow_mut().push_back(response);
		self
	}

	pub fn request_count(&self) -> usize {
		self.requests.borrow().len()
	}

	/// `(endpoint, payload)` of every request, oldest first.
	pub fn requests(&self) -> Vec<(String, ContactPayload)> {
		self.requests.borrow().clone()
	}

	pub fn last_payload(&self) -> Option<ContactPayload> {
		self.requests.borrow().last().map(|(_, p)| p.clone())
	}
}

#[async_trait(?Send)]
impl DeliveryTransport for MockTransport {
	async fn post_json(
		&self,
		endpoint: &str,
		payload: &ContactPayload,
	) -> Result<TransportResponse, DeliveryError> {
		self.requests
			.borrow_mut()
			.push((endpoint.to_string(), payload.clone()));
		let scripted = self.script.borrow_mut().pop_front();
		scripted.unwrap_or_else(|| self.fallback.clone())
	}
}

/// A spawner that refuses every task, like an executor shutting down.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSpawner;

impl LocalSpawn for FailingSpawner {
	fn spawn_local_obj(&self, _future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
		Err(SpawnError::shutdown())
	}
}

/// A sleeper that returns at once and records requested durations.
#[derive(Debug, Default)]
pub struct MockSleeper {
	sleeps: RefCell<Vec<Duration>>,
}

impl MockSleeper {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sleeps(&self) -> Vec<Duration> {
		self.sleeps.borrow().clone()
	}
}

#[async_trait(?Send)]
impl Sleeper for MockSleeper {
	async fn sleep(&self, duration: Duration) {
		self.sleeps.borrow_mut().push(duration);
	}
}

/// A consent service with settable consents.
pub struct MockConsentService {
	granted: RefCell<HashSet<ConsentCategory>>,
	runs: RefCell<Vec<ConsentConfig>>,
	fail_run: bool,
	on_change_supported: bool,
	callback: RefCell<Option<ChangeCallback>>,
}

impl Default for MockConsentService {
	fn default() -> Self {
		Self {
			granted: RefCell::new(HashSet::new()),
			runs: RefCell::new(Vec::new()),
			fail_run: false,
			on_change_supported: true,
			callback: RefCell::new(None),
		}
	}
}

impl MockConsentService {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn granting(self, category: ConsentCategory) -> Self {
		self.grant(category);
		self
	}

	pub fn without_on_change(mut self) -> Self {
		self.on_change_supported = false;
		self
	}

	pub fn failing_run(mut self) -> Self {
		self.fail_run = true;
		self
	}

	pub fn grant(&self, category: ConsentCategory) {
		self.granted.borrow_mut().insert(category);
	}

	pub fn revoke(&self, category: ConsentCategory) {
		self.granted.borrow_mut().remove(&category);
	}

	pub fn run_count(&self) -> usize {
		self.runs.borrow().len()
	}

	pub fn last_config(&self) -> Option<ConsentConfig> {
		self.runs.borrow().last().cloned()
	}

	pub fn has_callback(&self) -> bool {
		self.callback.borrow().is_some()
	}

	/// Invokes the registered change callback, if any.
	pub fn fire_change(&self, changed: &[&str]) {
		let changed = changed.iter().map(|c| c.to_string()).collect();
		if let Some(callback) = self.callback.borrow_mut().as_mut() {
			callback(changed);
		}
	}
}

impl ConsentService for MockConsentService {
	fn run(&self, config: &ConsentConfig) -> Result<(), WidgetError> {
		if self.fail_run {
			return Err(WidgetError::Call {
				method: "run".to_string(),
				message: "TypeError".to_string(),
			});
		}
		self.runs.borrow_mut().push(config.clone());
		Ok(())
	}

	fn valid_consent(&self, category: ConsentCategory) -> bool {
		self.granted.borrow().contains(&category)
	}

	fn supports_on_change(&self) -> bool {
		self.on_change_supported
	}

	fn on_change(&self, callback: ChangeCallback) -> Result<(), WidgetError> {
		*self.callback.borrow_mut() = Some(callback);
		Ok(())
	}
}

/// Records every consent signal it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
	signals: RefCell<Vec<ConsentSignal>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn signals(&self) -> Vec<ConsentSignal> {
		self.signals.borrow().clone()
	}
}

impl ConsentSink for RecordingSink {
	fn update(&self, signal: ConsentSignal) {
		self.signals.borrow_mut().push(signal);
	}
}

/// Counts toolbar constructions; optionally fails them.
#[derive(Debug, Default)]
pub struct MockToolbarFactory {
	constructed: Cell<u32>,
	fail: bool,
}

impl MockToolbarFactory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing() -> Self {
		Self {
			fail: true,
			..Self::default()
		}
	}

	pub fn constructed(&self) -> u32 {
		self.constructed.get()
	}
}

impl ToolbarFactory for MockToolbarFactory {
	fn construct(&self, _config: &ToolbarConfig) -> Result<(), WidgetError> {
		if self.fail {
			return Err(WidgetError::NotLoaded("MicAccessTool".to_string()));
		}
		self.constructed.set(self.constructed.get() + 1);
		Ok(())
	}
}
