//! Cookie-consent service configuration
//!
//! [`ConsentConfig`] is the object handed to the consent service's
//! `run(config)`. Category and cookie rules are typed; translations and GUI
//! options are passed through untouched since only the service reads them.
//!
//! The bundled default is opt-in with `necessary`, `analytics` and
//! `marketing` categories and Hebrew (`he`) texts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static BUNDLED_CONFIG: LazyLock<ConsentConfig> = LazyLock::new(|| {
	serde_json::from_str(include_str!("defaults/consent.json"))
		.expect("defaults/consent.json: invalid consent configuration")
});

/// Consent categories known to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
	Necessary,
	Analytics,
	Marketing,
}

impl ConsentCategory {
	pub const ALL: [ConsentCategory; 3] = [
		ConsentCategory::Necessary,
		ConsentCategory::Analytics,
		ConsentCategory::Marketing,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ConsentCategory::Necessary => "necessary",
			ConsentCategory::Analytics => "analytics",
			ConsentCategory::Marketing => "marketing",
		}
	}

	/// Parses a category name as reported by the consent service.
	pub fn parse(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|c| c.as_str() == name)
	}
}

impl std::fmt::Display for ConsentCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsentMode {
	OptIn,
	OptOut,
}

/// A cookie removed when its category's consent is withdrawn.
///
/// Names may end in `*` to match a prefix, e.g. `_ga_*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRule {
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AutoClear {
	pub cookies: Vec<CookieRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
	pub enabled: bool,
	pub read_only: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_clear: Option<AutoClear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageConfig {
	pub default: String,
	/// Per-language modal texts, passed through as-is.
	pub translations: Value,
}

/// Argument of the consent service's `run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentConfig {
	pub auto_show: bool,
	pub mode: ConsentMode,
	pub revision: u32,
	pub categories: IndexMap<String, CategoryConfig>,
	pub language: LanguageConfig,
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub gui_options: Value,
}

impl Default for ConsentConfig {
	fn default() -> Self {
		BUNDLED_CONFIG.clone()
	}
}

impl ConsentConfig {
	pub fn category(&self, category: ConsentCategory) -> Option<&CategoryConfig> {
		self.categories.get(category.as_str())
	}

	/// Cookie names cleared when `category` is rejected.
	pub fn auto_clear_cookies(&self, category: ConsentCategory) -> Vec<&str> {
		self.category(category)
			.and_then(|c| c.auto_clear.as_ref())
			.map(|ac| ac.cookies.iter().map(|c| c.name.as_str()).collect())
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_bundled_config_round_trips_to_service_shape() {
		let bundled: Value = serde_json::from_str(include_str!("defaults/consent.json")).unwrap();
		let serialized = serde_json::to_value(ConsentConfig::default()).unwrap();
		assert_eq!(serialized, bundled);
	}

	#[rstest]
	fn test_bundled_categories() {
		let config = ConsentConfig::default();
		assert_eq!(config.mode, ConsentMode::OptIn);
		assert!(config.auto_show);

		let necessary = config.category(ConsentCategory::Necessary).unwrap();
		assert!(necessary.enabled && necessary.read_only);

		let analytics = config.category(ConsentCategory::Analytics).unwrap();
		assert!(!analytics.enabled && !analytics.read_only);
		assert_eq!(config.language.default, "he");
	}

	#[rstest]
	#[case(ConsentCategory::Analytics, vec!["_ga", "_ga_*", "_gid", "_gat"])]
	#[case(ConsentCategory::Marketing, vec!["_fbp", "_fbc", "fr"])]
	#[case(ConsentCategory::Necessary, vec![])]
	fn test_auto_clear_cookies(#[case] category: ConsentCategory, #[case] expected: Vec<&str>) {
		assert_eq!(ConsentConfig::default().auto_clear_cookies(category), expected);
	}

	#[rstest]
	fn test_category_parse() {
		assert_eq!(
			ConsentCategory::parse("marketing"),
			Some(ConsentCategory::Marketing)
		);
		assert_eq!(ConsentCategory::parse("ads"), None);
	}
}
