//! Settings builder

use crate::settings::SiteSettings;
use crate::sources::{ConfigSource, DefaultSource, merge_values};
use crate::{SettingsError, SettingsResult};
use serde_json::Value;

/// Merges configuration sources into [`SiteSettings`].
///
/// Built-in defaults are always the first layer.
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self {
			sources: vec![Box::new(DefaultSource::new())],
		}
	}

	/// Adds a source. Order of addition does not matter; priority does.
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Loads every source, merges them and validates the result.
	pub fn build(mut self) -> SettingsResult<SiteSettings> {
		// Stable sort keeps insertion order among equal priorities
		self.sources.sort_by_key(|source| source.priority());

		let mut merged = Value::Object(serde_json::Map::new());
		for source in &self.sources {
			let table = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = table.len(),
				"Zappy: loaded settings source"
			);
			merge_values(&mut merged, Value::Object(table.into_iter().collect()));
		}

		let settings: SiteSettings = serde_json::from_value(merged)?;
		settings.validate()?;
		Ok(settings)
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}
