//! Browser entry point
//!
//! [`boot`] wires the whole page:
//!
//! - settings from `<script type="application/json" id="zappy-settings">`
//! - page enhancements and the contact form once the DOM is ready
//! - the consent banner as soon as `window.CookieConsent` shows up
//! - the accessibility toolbar on `load`
//!
//! The page state, including the contact form integration, lives in a
//! thread-local for the lifetime of the page.

pub mod dom;
pub mod enhance;
pub mod runtime;
pub mod widgets;

pub use dom::{WebDocument, WebField, WebForm, WebSubmitEvent};
pub use runtime::{BrowserSpawner, TimeoutSleeper};
pub use widgets::{GtagSink, JsConsentService, MicAccessToolFactory};

use crate::bootstrap::{PollPolicy, acquire};
use crate::consent::ConsentLauncher;
use crate::coordinator::SubmissionCoordinator;
use crate::delivery::ReqwestTransport;
use crate::dom::FormSurface;
use crate::integration::ContactFormIntegration;
use crate::locator::locate;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlScriptElement};
use zappy_conf::sources::JsonSource;
use zappy_conf::{SettingsBuilder, SiteSettings};

/// Element id of the inline settings document.
pub const SETTINGS_ELEMENT_ID: &str = "zappy-settings";

type WebIntegration = ContactFormIntegration<WebForm, ReqwestTransport>;

/// State kept for the lifetime of the page.
#[derive(Default)]
struct Page {
	booted: std::cell::Cell<bool>,
	contact_form: Option<WebIntegration>,
	consent: Rc<ConsentLauncher>,
}

thread_local! {
	static PAGE: RefCell<Page> = RefCell::new(Page::default());
}

/// Reads site settings from the inline settings document.
///
/// Missing settings mean defaults. Invalid settings are logged and replaced
/// by defaults.
pub fn read_settings(document: &Document) -> SiteSettings {
	let Some(text) = document
		.get_element_by_id(SETTINGS_ELEMENT_ID)
		.and_then(|el| el.dyn_into::<HtmlScriptElement>().ok())
		.and_then(|script| script.text().ok())
		.filter(|text| !text.trim().is_empty())
	else {
		return SiteSettings::default();
	};

	SettingsBuilder::new()
		.add_source(JsonSource::from_str(text).with_origin(format!("#{}", SETTINGS_ELEMENT_ID)))
		.build()
		.unwrap_or_else(|e| {
			crate::error_log!("Zappy: invalid site settings, using defaults: {}", e);
			SiteSettings::default()
		})
}

/// Runs `f` once the DOM has been parsed.
pub fn on_dom_ready(document: &Document, f: impl FnOnce() + 'static) {
	if document.ready_state() != "loading" {
		f();
		return;
	}
	let callback = Closure::once_into_js(f);
	if document
		.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
		.is_err()
	{
		crate::warn_log!("Zappy: could not wait for DOMContentLoaded");
	}
}

/// Runs `f` once the page and its subresources have loaded.
pub fn on_window_load(window: &web_sys::Window, document: &Document, f: impl FnOnce() + 'static) {
	if document.ready_state() == "complete" {
		f();
		return;
	}
	let callback = Closure::once_into_js(f);
	if window
		.add_event_listener_with_callback("load", callback.unchecked_ref())
		.is_err()
	{
		crate::warn_log!("Zappy: could not wait for window load");
	}
}

/// Locates the contact form and attaches the submission pipeline to it.
fn install_contact_form(document: &Document, settings: &SiteSettings) -> Option<WebIntegration> {
	let Some(element) = locate(&WebDocument(document.clone()), &settings.form.selectors).into_element() else {
		crate::info_log!("Zappy: No contact form found on page");
		return None;
	};
	let form = WebForm::new(element);
	crate::info_log!("Zappy: Contact form found: {}", form.describe());

	let coordinator = SubmissionCoordinator::new(
		Rc::new(ReqwestTransport::new()),
		settings.delivery.clone(),
		Rc::new(BrowserSpawner),
	)
	.with_messages(settings.messages.clone());
	let mut integration = ContactFormIntegration::new(form, coordinator, settings.delivery.endpoint.clone());
	if let Err(e) = integration.attach() {
		crate::error_log!("Zappy: contact form listeners failed: {}", e);
	}
	Some(integration)
}

/// Waits for the consent service and runs it once.
fn start_consent(settings: &SiteSettings) {
	let launcher = PAGE.with(|page| Rc::clone(&page.borrow().consent));
	if launcher.is_started() {
		return;
	}
	let policy = PollPolicy::from(&settings.bootstrap);
	let config = settings.consent.clone();

	wasm_bindgen_futures::spawn_local(async move {
		match acquire(JsConsentService::probe, policy, &TimeoutSleeper).await {
			Ok(acquired) => {
				launcher.start(Rc::new(acquired.handle), &config, Rc::new(GtagSink));
			}
			Err(e) => crate::debug_log!("Zappy: cookie consent not loaded: {}", e),
		}
	});
}

/// Wires the current page. Later calls do nothing.
pub fn boot() {
	if PAGE.with(|page| page.borrow().booted.replace(true)) {
		crate::info_log!("Zappy contact form already loaded");
		return;
	}
	let Some(window) = web_sys::window() else {
		return;
	};
	let Some(document) = window.document() else {
		return;
	};
	let settings = Rc::new(read_settings(&document));

	let ready = {
		let window = window.clone();
		let document = document.clone();
		let settings = Rc::clone(&settings);
		move || {
			enhance::install_enhancements(&window, &document);
			let integration = install_contact_form(&document, &settings);
			PAGE.with(|page| page.borrow_mut().contact_form = integration);
			start_consent(&settings);
		}
	};
	on_dom_ready(&document, ready);

	let loaded = {
		let window = window.clone();
		let document = document.clone();
		move || {
			start_consent(&settings);
			enhance::install_accessibility(
				&window,
				&document,
				&MicAccessToolFactory,
				&settings.accessibility,
			);
		}
	};
	on_window_load(&window, &document, loaded);
}
