//! Zappy Pages - browser integration for Zappy marketing sites
//!
//! Runs the client-side half of a Zappy site: contact form validation and
//! dual-path submission, third-party widget bootstrapping and small page
//! enhancements.
//!
//! ## Architecture
//!
//! - [`dom`]: the DOM seam (`FieldNode`, `FormSurface`, `SubmitEvent`)
//! - [`presenter`]: inline error annotations next to fields
//! - [`delivery`]: the JSON payload and the backend transport
//! - [`coordinator`]: gates a submit event and fires the async delivery
//! - [`integration`]: wires a coordinator to one form, at most once
//! - [`locator`]: finds the contact form from an ordered strategy list
//! - [`bootstrap`]: bounded polling for third-party globals
//! - [`consent`]: cookie-consent helpers and change signals
//! - [`accessibility`]: toolbar bootstrapping and its keyboard shortcut
//! - [`enhance`]: mobile menu, smooth scroll, navbar and scroll reveal rules
//! - [`testing`]: in-memory doubles for all of the above
//! - `web`: `web_sys` implementations and the page entry point (wasm32 only)
//!
//! The submit path is single-threaded. Validation and DOM mutation run
//! synchronously inside the event handler; the only suspension point is the
//! backend round trip, spawned on a [`LocalSpawn`](futures::task::LocalSpawn).
//!
//! ## Example
//!
//! ```
//! use futures::executor::LocalPool;
//! use std::rc::Rc;
//! use zappy_conf::DeliverySettings;
//! use zappy_pages::SubmitEvent;
//! use zappy_pages::coordinator::SubmissionCoordinator;
//! use zappy_pages::testing::{MockField, MockSubmitEvent, MockTransport};
//!
//! let pool = LocalPool::new();
//! let transport = Rc::new(MockTransport::accepting());
//! let mut coordinator = SubmissionCoordinator::new(
//!     Rc::clone(&transport),
//!     DeliverySettings::default(),
//!     Rc::new(pool.spawner()),
//! );
//!
//! let fields = vec![MockField::input("name", "text").required()];
//! let event = MockSubmitEvent::new();
//! let outcome = coordinator.on_submit(&event, &fields, "http://localhost:5001/api/email/contact-form");
//!
//! assert!(outcome.is_blocked());
//! assert!(event.default_prevented());
//! ```

pub mod accessibility;
pub mod attempt;
pub mod bootstrap;
pub mod consent;
pub mod coordinator;
pub mod delivery;
pub mod dom;
pub mod enhance;
pub mod integration;
pub mod locator;
pub mod logging;
pub mod presenter;
pub mod testing;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use attempt::{ApiOutcome, SubmissionAttempt, SubmitOutcome};
pub use bootstrap::{Acquired, CapabilityError, PollPolicy};
pub use coordinator::SubmissionCoordinator;
pub use delivery::{ContactPayload, DeliveryError, DeliveryResponse, DeliveryTransport, ReqwestTransport};
pub use dom::{DomError, FieldNode, FormSurface, SubmitEvent};
pub use integration::ContactFormIntegration;
pub use locator::{Located, locate};
pub use presenter::ErrorPresenter;

// Re-exported for the logging macros
#[doc(hidden)]
pub mod __private {
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}

/// Routes Rust panics to `console.error`.
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
	console_error_panic_hook::set_once();
}
