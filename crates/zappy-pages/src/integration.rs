//! Form integration
//!
//! [`ContactFormIntegration`] binds one [`SubmissionCoordinator`] to one
//! form: a submit listener and a delegated `focusout` listener on the form
//! element. It attaches at most once, so a repeated page-script init cannot
//! double the deliveries of a single submission.

use crate::coordinator::SubmissionCoordinator;
use crate::delivery::DeliveryTransport;
use crate::dom::{DomError, FormSurface, SubmitEvent};
use std::cell::RefCell;
use std::rc::Rc;

pub struct ContactFormIntegration<F: FormSurface + 'static, T: DeliveryTransport + 'static> {
	form: Rc<F>,
	coordinator: Rc<RefCell<SubmissionCoordinator<T>>>,
	endpoint: String,
	submit_attached: bool,
	focusout_attached: bool,
}

impl<F: FormSurface + 'static, T: DeliveryTransport + 'static> ContactFormIntegration<F, T> {
	pub fn new(form: F, coordinator: SubmissionCoordinator<T>, endpoint: impl Into<String>) -> Self {
		Self {
			form: Rc::new(form),
			coordinator: Rc::new(RefCell::new(coordinator)),
			endpoint: endpoint.into(),
			submit_attached: false,
			focusout_attached: false,
		}
	}

	pub fn is_attached(&self) -> bool {
		self.submit_attached && self.focusout_attached
	}

	pub fn form(&self) -> &F {
		&self.form
	}

	pub fn coordinator(&self) -> Rc<RefCell<SubmissionCoordinator<T>>> {
		Rc::clone(&self.coordinator)
	}

	/// Registers the form listeners.
	///
	/// Returns `Ok(false)` without touching the form when already attached.
	/// Each listener is registered at most once: after a partial failure, a
	/// later call only registers the listener that is still missing.
	pub fn attach(&mut self) -> Result<bool, DomError> {
		if self.is_attached() {
			crate::info_log!("Zappy contact form already loaded");
			return Ok(false);
		}
		crate::info_log!("Zappy: Initializing contact form API integration...");

		if !self.submit_attached {
			let form = Rc::downgrade(&self.form);
			let coordinator = Rc::clone(&self.coordinator);
			let endpoint = self.endpoint.clone();
			self.form.add_submit_listener(Box::new(move |event: &dyn SubmitEvent| {
				let Some(form) = form.upgrade() else {
					return;
				};
				let nodes = form.fields();
				match coordinator.try_borrow_mut() {
					Ok(mut coordinator) => {
						coordinator.on_submit(event, &nodes, &endpoint);
					}
					Err(_) => crate::warn_log!("Zappy: submit ignored while another event is handled"),
				}
			}))?;
			self.submit_attached = true;
		}

		if !self.focusout_attached {
			let coordinator = Rc::clone(&self.coordinator);
			self.form.add_focusout_listener(Box::new(move |node: F::Field| {
				if let Ok(mut coordinator) = coordinator.try_borrow_mut() {
					coordinator.on_blur(&node);
				}
			}))?;
			self.focusout_attached = true;
		}

		crate::info_log!("Zappy: Contact form API integration initialized");
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{MockField, MockForm, MockTransport};
	use futures::executor::LocalPool;
	use rstest::rstest;
	use zappy_conf::DeliverySettings;

	fn integration(
		form: MockForm,
		pool: &LocalPool,
		transport: &Rc<MockTransport>,
	) -> ContactFormIntegration<MockForm, MockTransport> {
		let coordinator = SubmissionCoordinator::new(
			Rc::clone(transport),
			DeliverySettings::default(),
			Rc::new(pool.spawner()),
		);
		ContactFormIntegration::new(form, coordinator, "http://localhost:5001/api/email/contact-form")
	}

	#[rstest]
	fn test_attach_once() {
		let mut pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let form = MockForm::new(vec![MockField::input("name", "text").with_value("Jo")]);
		let mut integration = integration(form.clone(), &pool, &transport);

		assert!(integration.attach().unwrap());
		assert!(!integration.attach().unwrap());
		assert!(integration.is_attached());
		assert_eq!(form.submit_listener_count(), 1);
		assert_eq!(form.focusout_listener_count(), 1);

		form.submit();
		pool.run();

		assert_eq!(transport.request_count(), 1);
	}

	#[rstest]
	fn test_focusout_validates_field() {
		let pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let email = MockField::input("email", "email").with_value("nope");
		let form = MockForm::new(vec![email.clone()]);
		let mut integration = integration(form.clone(), &pool, &transport);
		integration.attach().unwrap();

		form.focus_out(&email);

		assert_eq!(email.annotation_count(), 1);
		assert!(!integration.coordinator().borrow().tracker().is_valid());
	}

	#[rstest]
	fn test_attach_failure_leaves_unattached() {
		let pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let form = MockForm::new(vec![]).rejecting_listeners();
		let mut integration = integration(form, &pool, &transport);

		assert!(integration.attach().is_err());
		assert!(!integration.is_attached());
	}

	#[rstest]
	fn test_retry_after_focusout_failure_keeps_one_submit_listener() {
		let mut pool = LocalPool::new();
		let transport = Rc::new(MockTransport::accepting());
		let form = MockForm::new(vec![MockField::input("name", "text").with_value("Jo")])
			.rejecting_focusout_once();
		let mut integration = integration(form.clone(), &pool, &transport);

		assert!(integration.attach().is_err());
		assert!(!integration.is_attached());
		assert!(integration.attach().unwrap());
		assert!(integration.is_attached());
		assert_eq!(form.submit_listener_count(), 1);
		assert_eq!(form.focusout_listener_count(), 1);

		form.submit();
		pool.run();

		assert_eq!(transport.request_count(), 1);
	}
}
