//! Cookie-consent integration
//!
//! The consent banner is a third-party service reached through
//! [`ConsentService`]. This module decides what to do with it: run it once
//! with the site's [`ConsentConfig`], gate tracking code on consent, and
//! translate preference changes into [`ConsentSignal`]s for the tag manager.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use zappy_conf::{ConsentCategory, ConsentConfig};

/// Errors raised by third-party widgets.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
	#[error("Widget is not loaded: {0}")]
	NotLoaded(String),
	#[error("Widget call '{method}' failed: {message}")]
	Call { method: String, message: String },
	#[error("Widget configuration could not be encoded: {0}")]
	Config(String),
}

/// Callback for preference changes; receives the changed category names.
pub type ChangeCallback = Box<dyn FnMut(Vec<String>)>;

/// The consent banner service.
pub trait ConsentService {
	fn run(&self, config: &ConsentConfig) -> Result<(), WidgetError>;

	fn valid_consent(&self, category: ConsentCategory) -> bool;

	/// Whether the loaded service version supports change callbacks.
	fn supports_on_change(&self) -> bool;

	fn on_change(&self, callback: ChangeCallback) -> Result<(), WidgetError>;
}

/// Whether the visitor consented to `category`. Without a service there is
/// no consent.
pub fn has_consent_for<S: ConsentService + ?Sized>(
	service: Option<&S>,
	category: ConsentCategory,
) -> bool {
	service.is_some_and(|s| s.valid_consent(category))
}

/// Runs `f` only when the visitor consented to `category`.
///
/// Returns whether `f` ran.
pub fn with_consent<S, F>(service: Option<&S>, category: ConsentCategory, f: F) -> bool
where
	S: ConsentService + ?Sized,
	F: FnOnce(),
{
	if has_consent_for(service, category) {
		f();
		true
	} else {
		crate::warn_log!("Skipping {} code - no user consent", category);
		false
	}
}

/// Tag-manager storage types tied to a consent category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStorage {
	AnalyticsStorage,
	AdStorage,
}

impl ConsentStorage {
	pub fn for_category(category: ConsentCategory) -> Option<Self> {
		match category {
			ConsentCategory::Analytics => Some(ConsentStorage::AnalyticsStorage),
			ConsentCategory::Marketing => Some(ConsentStorage::AdStorage),
			ConsentCategory::Necessary => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ConsentStorage::AnalyticsStorage => "analytics_storage",
			ConsentStorage::AdStorage => "ad_storage",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentState {
	Granted,
	Denied,
}

impl ConsentState {
	pub fn as_str(&self) -> &'static str {
		match self {
			ConsentState::Granted => "granted",
			ConsentState::Denied => "denied",
		}
	}
}

/// One consent update, e.g. `analytics_storage: granted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentSignal {
	pub storage: ConsentStorage,
	pub state: ConsentState,
}

impl ConsentSignal {
	/// The update object passed to `gtag('consent', 'update', ...)`.
	pub fn to_update_params(&self) -> serde_json::Value {
		let mut params = serde_json::Map::new();
		params.insert(self.storage.as_str().to_string(), self.state.as_str().into());
		serde_json::Value::Object(params)
	}
}

/// Receives consent updates.
pub trait ConsentSink {
	fn update(&self, signal: ConsentSignal);
}

/// Signals for the categories named in a change notification.
///
/// Unknown and `necessary` categories produce nothing.
pub fn signals_for_change<S: ConsentService + ?Sized>(
	service: &S,
	changed: &[String],
) -> Vec<ConsentSignal> {
	changed
		.iter()
		.filter_map(|name| ConsentCategory::parse(name))
		.filter_map(|category| {
			let storage = ConsentStorage::for_category(category)?;
			let state = if service.valid_consent(category) {
				ConsentState::Granted
			} else {
				ConsentState::Denied
			};
			Some(ConsentSignal { storage, state })
		})
		.collect()
}

/// Runs the consent service at most once per page.
#[derive(Debug, Default)]
pub struct ConsentLauncher {
	started: Cell<bool>,
}

impl ConsentLauncher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_started(&self) -> bool {
		self.started.get()
	}

	/// Runs `service` with `config` and forwards preference changes to
	/// `sink`.
	///
	/// Returns `false` when already started or when `run` failed. Failures
	/// are logged, never raised.
	pub fn start<S, K>(&self, service: Rc<S>, config: &ConsentConfig, sink: Rc<K>) -> bool
	where
		S: ConsentService + 'static,
		K: ConsentSink + 'static,
	{
		if self.started.replace(true) {
			crate::debug_log!("Zappy: cookie consent already running");
			return false;
		}

		if let Err(e) = service.run(config) {
			crate::error_log!("Zappy: cookie consent failed to start: {}", e);
			return false;
		}

		if !service.supports_on_change() {
			crate::debug_log!("Zappy: cookie consent has no onChange, skipping change handling");
			return true;
		}

		let watched = Rc::clone(&service);
		let callback: ChangeCallback = Box::new(move |changed| {
			for signal in signals_for_change(watched.as_ref(), &changed) {
				sink.update(signal);
			}
		});
		if let Err(e) = service.on_change(callback) {
			crate::warn_log!("Zappy: could not register consent change handler: {}", e);
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{MockConsentService, RecordingSink};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_no_service_means_no_consent() {
		assert!(!has_consent_for::<MockConsentService>(None, ConsentCategory::Analytics));
	}

	#[rstest]
	fn test_with_consent_runs_only_when_granted() {
		let service = MockConsentService::new().granting(ConsentCategory::Analytics);
		let mut ran = Vec::new();

		assert!(with_consent(Some(&service), ConsentCategory::Analytics, || ran.push("analytics")));
		assert!(!with_consent(Some(&service), ConsentCategory::Marketing, || ran.push("marketing")));

		assert_eq!(ran, vec!["analytics"]);
	}

	#[rstest]
	fn test_signals_for_change() {
		let service = MockConsentService::new().granting(ConsentCategory::Marketing);
		let changed = vec![
			"analytics".to_string(),
			"marketing".to_string(),
			"necessary".to_string(),
			"unknown".to_string(),
		];

		let signals = signals_for_change(&service, &changed);

		assert_eq!(
			signals,
			vec![
				ConsentSignal {
					storage: ConsentStorage::AnalyticsStorage,
					state: ConsentState::Denied
				},
				ConsentSignal {
					storage: ConsentStorage::AdStorage,
					state: ConsentState::Granted
				},
			]
		);
		assert_eq!(signals[1].to_update_params(), json!({"ad_storage": "granted"}));
	}

	#[rstest]
	fn test_launcher_runs_once() {
		let launcher = ConsentLauncher::new();
		let service = Rc::new(MockConsentService::new());
		let sink = Rc::new(RecordingSink::new());
		let config = ConsentConfig::default();

		assert!(launcher.start(Rc::clone(&service), &config, Rc::clone(&sink)));
		assert!(!launcher.start(Rc::clone(&service), &config, Rc::clone(&sink)));

		assert_eq!(service.run_count(), 1);
		assert_eq!(service.last_config(), Some(config));
	}

	#[rstest]
	fn test_change_callback_feeds_sink() {
		let launcher = ConsentLauncher::new();
		let service = Rc::new(MockConsentService::new());
		let sink = Rc::new(RecordingSink::new());
		launcher.start(Rc::clone(&service), &ConsentConfig::default(), Rc::clone(&sink));

		service.grant(ConsentCategory::Analytics);
		service.fire_change(&["analytics"]);

		assert_eq!(
			sink.signals(),
			vec![ConsentSignal {
				storage: ConsentStorage::AnalyticsStorage,
				state: ConsentState::Granted
			}]
		);
	}

	#[rstest]
	fn test_missing_on_change_is_skipped() {
		let service = Rc::new(MockConsentService::new().without_on_change());
		let sink = Rc::new(RecordingSink::new());

		assert!(ConsentLauncher::new().start(Rc::clone(&service), &ConsentConfig::default(), sink));
		assert!(!service.has_callback());
	}

	#[rstest]
	fn test_run_failure_is_contained() {
		let service = Rc::new(MockConsentService::new().failing_run());
		let launcher = ConsentLauncher::new();

		assert!(!launcher.start(service, &ConsentConfig::default(), Rc::new(RecordingSink::new())));
		assert!(launcher.is_started());
	}
}
