//! Configuration sources for layered settings
//!
//! Each source yields a flat map of top-level keys to JSON values. The
//! builder deep-merges the maps in priority order (environment variables >
//! documents > defaults).

use crate::settings::SiteSettings;
use indexmap::IndexMap;
use serde_json::Value;

/// Trait for configuration sources
pub trait ConfigSource {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Expected a table at the document root")]
	NotATable,
}

fn into_table(value: Value) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::NotATable),
	}
}

/// Built-in defaults, lowest priority.
#[derive(Debug, Default)]
pub struct DefaultSource;

impl DefaultSource {
	pub fn new() -> Self {
		Self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		into_table(serde_json::to_value(SiteSettings::default())?)
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Built-in defaults".to_string()
	}
}

/// A TOML document, usually a `zappy.toml` next to the site build.
pub struct TomlSource {
	content: String,
	origin: String,
}

impl TomlSource {
	/// Reads settings from TOML text.
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			origin: "inline".to_string(),
		}
	}

	/// Names where the text came from, for error messages.
	pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
		self.origin = origin.into();
		self
	}
}

impl ConfigSource for TomlSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let value: Value = toml::from_str(&self.content)?;
		into_table(value)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML document ({})", self.origin)
	}
}

/// A JSON document, e.g. the `<script id="zappy-settings">` block of a page.
pub struct JsonSource {
	content: String,
	origin: String,
}

impl JsonSource {
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			origin: "inline".to_string(),
		}
	}

	pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
		self.origin = origin.into();
		self
	}
}

impl ConfigSource for JsonSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		into_table(serde_json::from_str(&self.content)?)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("JSON document ({})", self.origin)
	}
}

/// Environment variables with a prefix, highest priority.
///
/// `ZAPPY_DELIVERY__ENDPOINT=https://...` sets `delivery.endpoint`: the
/// prefix is stripped, the rest is lowercased and split on `__`. Values
/// that parse as JSON (numbers, booleans, arrays) keep their type; anything
/// else is a string.
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Reads `ZAPPY_*` variables from the process environment.
	pub fn new() -> Self {
		Self {
			prefix: "ZAPPY_".to_string(),
			vars: None,
		}
	}

	/// Set a prefix filter for environment variables
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Uses the given variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			prefix: "ZAPPY_".to_string(),
			vars: Some(
				vars.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}

	fn vars(&self) -> Vec<(String, String)> {
		match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut root = Value::Object(serde_json::Map::new());

		for (key, raw) in self.vars() {
			let Some(stripped) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let path: Vec<String> = stripped
				.split("__")
				.filter(|segment| !segment.is_empty())
				.map(str::to_ascii_lowercase)
				.collect();
			if path.is_empty() {
				continue;
			}

			let value = serde_json::from_str::<Value>(&raw)
				.ok()
				.filter(|v| !v.is_string() && !v.is_null())
				.unwrap_or(Value::String(raw));
			insert_path(&mut root, &path, value);
		}

		into_table(root)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables ({}*)", self.prefix)
	}
}

fn insert_path(root: &mut Value, path: &[String], value: Value) {
	let mut cursor = root;
	for segment in &path[..path.len() - 1] {
		if !cursor.is_object() {
			*cursor = Value::Object(serde_json::Map::new());
		}
		let Value::Object(map) = cursor else {
			return;
		};
		cursor = map
			.entry(segment.clone())
			.or_insert_with(|| Value::Object(serde_json::Map::new()));
	}
	if !cursor.is_object() {
		*cursor = Value::Object(serde_json::Map::new());
	}
	if let (Value::Object(map), Some(last)) = (cursor, path.last()) {
		map.insert(last.clone(), value);
	}
}

/// Deep-merges `overlay` into `base`. Objects merge key by key; any other
/// value in `overlay` replaces the one in `base`.
pub fn merge_values(base: &mut Value, overlay: Value) {
	match (base, overlay) {
		(Value::Object(base_map), Value::Object(overlay_map)) => {
			for (key, value) in overlay_map {
				match base_map.get_mut(&key) {
					Some(existing) => merge_values(existing, value),
					None => {
						base_map.insert(key, value);
					}
				}
			}
		}
		(base, overlay) => *base = overlay,
	}
}
