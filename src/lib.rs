//! # Zappy
//!
//! Client-side layer for Zappy marketing sites, compiled to WebAssembly.
//!
//! The bundle validates the contact form in place and, when the form is
//! valid, posts its contents to the Zappy backend while the native form
//! submission carries on. It also bootstraps the cookie-consent banner and
//! the accessibility toolbar, and adds a few page enhancements.
//!
//! ## Feature Flags
//!
//! - `forms` - field validation and form state (no DOM, no network)
//! - `conf` - layered site settings
//! - `pages` - browser integration, implies `forms` and `conf`
//! - `full` (default) - everything above
//! - `console_error_panic_hook` - readable panics in the browser console
//!
//! ## Quick Example
//!
//! ```
//! # #[cfg(feature = "forms")]
//! # {
//! use zappy::forms::{Field, FieldKind, FieldValidator};
//!
//! let validator = FieldValidator::default();
//! let field = Field::new("email", FieldKind::Email).with_value("not-an-address");
//! assert!(!validator.validate(&field).is_valid());
//! # }
//! ```
//!
//! In the browser, the module's start function calls `pages::web::boot`,
//! which wires the whole page.

#[cfg(feature = "forms")]
pub use zappy_forms as forms;

#[cfg(feature = "conf")]
pub use zappy_conf as conf;

#[cfg(feature = "pages")]
pub use zappy_pages as pages;

#[cfg(feature = "forms")]
pub use zappy_forms::{
	Field, FieldKind, FieldValidator, FormStateTracker, FormValidationState, ValidationMessages,
	ValidationVerdict,
};

#[cfg(feature = "conf")]
pub use zappy_conf::{SettingsBuilder, SettingsError, SiteSettings};

#[cfg(feature = "pages")]
pub use zappy_pages::{
	ContactFormIntegration, ContactPayload, DeliveryError, SubmissionCoordinator, SubmitOutcome,
};

/// WebAssembly entry point.
#[cfg(all(target_arch = "wasm32", feature = "pages"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
	#[cfg(feature = "console_error_panic_hook")]
	zappy_pages::set_panic_hook();

	zappy_pages::web::boot();
}
