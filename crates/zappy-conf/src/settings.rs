//! Site settings
//!
//! All sections have defaults, so an empty document yields a usable
//! configuration pointing at a local delivery backend.

use crate::accessibility::ToolbarConfig;
use crate::consent::ConsentConfig;
use crate::{SettingsError, SettingsResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;
use zappy_forms::ValidationMessages;

/// Default delivery backend used during local development.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001/api/email/contact-form";

/// Site identifier sent when no settings override it.
pub const DEFAULT_WEBSITE_ID: &str = "ff185019-e8e4-48c5-86a8-93b8e0b8686f";

/// Subject sent when the form has no `subject` input.
pub const DEFAULT_SUBJECT: &str = "Contact Form Submission";

/// Settings for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteSettings {
	pub delivery: DeliverySettings,
	pub form: FormSettings,
	pub bootstrap: BootstrapSettings,
	pub consent: ConsentConfig,
	pub accessibility: ToolbarConfig,
	pub messages: ValidationMessages,
}

impl SiteSettings {
	/// Checks values that deserialization alone cannot.
	pub fn validate(&self) -> SettingsResult<()> {
		self.delivery.endpoint_url()?;

		if self.delivery.website_id.trim().is_empty() {
			return Err(SettingsError::InvalidValue {
				key: "delivery.website_id".to_string(),
				reason: "must not be empty".to_string(),
			});
		}

		if self.form.selectors.is_empty() {
			return Err(SettingsError::InvalidValue {
				key: "form.selectors".to_string(),
				reason: "at least one lookup strategy is required".to_string(),
			});
		}
		if self.bootstrap.max_attempts == 0 {
			return Err(SettingsError::InvalidValue {
				key: "bootstrap.max_attempts".to_string(),
				reason: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}

/// Where and how the asynchronous copy of a submission is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
	pub endpoint: String,
	/// Opaque site identifier sent as `websiteId`.
	#[serde(deserialize_with = "string_like")]
	pub website_id: String,
	pub default_subject: String,
}

impl Default for DeliverySettings {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			website_id: DEFAULT_WEBSITE_ID.to_string(),
			default_subject: DEFAULT_SUBJECT.to_string(),
		}
	}
}

impl DeliverySettings {
	/// Parses the endpoint; only `http` and `https` are accepted.
	pub fn endpoint_url(&self) -> SettingsResult<Url> {
		let url = Url::parse(&self.endpoint).map_err(|e| SettingsError::InvalidEndpoint {
			endpoint: self.endpoint.clone(),
			reason: e.to_string(),
		})?;
		match url.scheme() {
			"http" | "https" => Ok(url),
			other => Err(SettingsError::InvalidEndpoint {
				endpoint: self.endpoint.clone(),
				reason: format!("unsupported scheme '{}'", other),
			}),
		}
	}
}

/// One way of finding the contact form on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStrategy {
	/// `document.querySelector(selector)`
	Selector(String),
	/// `document.getElementById(id)`
	Id(String),
}

impl LookupStrategy {
	pub fn selector(selector: impl Into<String>) -> Self {
		Self::Selector(selector.into())
	}

	pub fn id(id: impl Into<String>) -> Self {
		Self::Id(id.into())
	}
}

impl std::fmt::Display for LookupStrategy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Selector(selector) => write!(f, "{}", selector),
			Self::Id(id) => write!(f, "#{} (by id)", id),
		}
	}
}

/// How the contact form is located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
	/// Tried in order; the first match wins.
	pub selectors: Vec<LookupStrategy>,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			selectors: vec![
				LookupStrategy::selector(".contact-form"),
				LookupStrategy::selector("form[action*=\"contact\"]"),
				LookupStrategy::selector("form#contact"),
				LookupStrategy::selector("form#contactForm"),
				LookupStrategy::id("contactForm"),
				LookupStrategy::selector("section.contact form"),
				LookupStrategy::selector("section#contact form"),
				LookupStrategy::selector("form"),
			],
		}
	}
}

/// Bounded polling for third-party globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
	pub max_attempts: u32,
	pub interval_ms: u64,
}

impl Default for BootstrapSettings {
	fn default() -> Self {
		// 50 x 100ms: five seconds
		Self {
			max_attempts: 50,
			interval_ms: 100,
		}
	}
}

impl BootstrapSettings {
	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms)
	}
}

// Environment overrides turn "12345" into a number; ids stay strings.
fn string_like<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	match value {
		serde_json::Value::String(s) => Ok(s),
		serde_json::Value::Null => Ok(String::new()),
		serde_json::Value::Number(n) => Ok(n.to_string()),
		serde_json::Value::Bool(b) => Ok(b.to_string()),
		other => Err(serde::de::Error::custom(format!(
			"expected a string, found {}",
			other
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults_validate() {
		let settings = SiteSettings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.delivery.endpoint, DEFAULT_ENDPOINT);
		assert_eq!(settings.delivery.default_subject, DEFAULT_SUBJECT);
		assert_eq!(settings.delivery.website_id, DEFAULT_WEBSITE_ID);
		assert_eq!(settings.form.selectors.len(), 8);
		assert_eq!(settings.bootstrap.interval(), Duration::from_millis(100));
	}

	#[rstest]
	#[case("not a url")]
	#[case("ftp://example.com/contact")]
	fn test_invalid_endpoint(#[case] endpoint: &str) {
		let delivery = DeliverySettings {
			endpoint: endpoint.to_string(),
			..Default::default()
		};
		assert!(matches!(
			delivery.endpoint_url(),
			Err(SettingsError::InvalidEndpoint { .. })
		));
	}

	#[rstest]
	fn test_empty_selectors_rejected() {
		let settings = SiteSettings {
			form: FormSettings { selectors: vec![] },
			..Default::default()
		};
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::InvalidValue { key, .. }) if key == "form.selectors"
		));
	}

	#[rstest]
	#[case("")]
	#[case("   ")]
	fn test_blank_website_id_rejected(#[case] website_id: &str) {
		let settings = SiteSettings {
			delivery: DeliverySettings {
				website_id: website_id.to_string(),
				..Default::default()
			},
			..Default::default()
		};
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::InvalidValue { key, .. }) if key == "delivery.website_id"
		));
	}

	#[rstest]
	fn test_zero_attempts_rejected() {
		let settings = SiteSettings {
			bootstrap: BootstrapSettings {
				max_attempts: 0,
				interval_ms: 100,
			},
			..Default::default()
		};
		assert!(settings.validate().is_err());
	}

	#[rstest]
	fn test_lookup_strategy_serde_shape() {
		let strategies: Vec<LookupStrategy> =
			serde_json::from_str(r#"[{"selector": ".contact-form"}, {"id": "contactForm"}]"#)
				.unwrap();
		assert_eq!(
			strategies,
			vec![
				LookupStrategy::selector(".contact-form"),
				LookupStrategy::id("contactForm")
			]
		);
	}

	#[rstest]
	fn test_website_id_accepts_numbers() {
		let delivery: DeliverySettings =
			serde_json::from_str(r#"{"website_id": 42}"#).unwrap();
		assert_eq!(delivery.website_id, "42");
		assert_eq!(delivery.endpoint, DEFAULT_ENDPOINT);
	}
}
