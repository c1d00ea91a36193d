//! Accessibility toolbar configuration
//!
//! Mirrors the options object passed to the toolbar constructor. Field names
//! serialize in camelCase, as the toolbar expects.

use serde::{Deserialize, Serialize};

/// Element id of the button the toolbar inserts into the page.
pub const TRIGGER_BUTTON_ID: &str = "mic-access-tool-general-button";

/// A CSS length such as `50px`. `size` may be a keyword like `auto`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
	pub size: DimensionSize,
	pub units: String,
}

impl Dimension {
	pub fn px(size: u32) -> Self {
		Self {
			size: DimensionSize::Value(size),
			units: "px".to_string(),
		}
	}

	pub fn auto() -> Self {
		Self {
			size: DimensionSize::Keyword("auto".to_string()),
			units: "px".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionSize {
	Value(u32),
	Keyword(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPosition {
	pub bottom: Dimension,
	pub left: Dimension,
	#[serde(rename = "type")]
	pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconConfig {
	pub position: IconPosition,
	pub background_color: String,
	pub color: String,
	pub img: String,
	pub circular: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDimensions {
	pub width: Dimension,
	pub height: Dimension,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuConfig {
	pub dimensions: MenuDimensions,
}

/// Toolbar constructor options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolbarConfig {
	pub button_position: String,
	pub force_lang: String,
	pub icon: IconConfig,
	pub menu: MenuConfig,
}

impl Default for ToolbarConfig {
	fn default() -> Self {
		Self {
			button_position: "left".to_string(),
			force_lang: "he-IL".to_string(),
			icon: IconConfig {
				position: IconPosition {
					bottom: Dimension::px(50),
					left: Dimension::px(20),
					kind: "fixed".to_string(),
				},
				// Colors come from the site stylesheet
				background_color: "transparent".to_string(),
				color: "transparent".to_string(),
				img: "accessible".to_string(),
				circular: false,
			},
			menu: MenuConfig {
				dimensions: MenuDimensions {
					width: Dimension::px(300),
					height: Dimension::auto(),
				},
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_default_serializes_to_toolbar_options() {
		let value = serde_json::to_value(ToolbarConfig::default()).unwrap();
		assert_eq!(
			value,
			json!({
				"buttonPosition": "left",
				"forceLang": "he-IL",
				"icon": {
					"position": {
						"bottom": {"size": 50, "units": "px"},
						"left": {"size": 20, "units": "px"},
						"type": "fixed"
					},
					"backgroundColor": "transparent",
					"color": "transparent",
					"img": "accessible",
					"circular": false
				},
				"menu": {
					"dimensions": {
						"width": {"size": 300, "units": "px"},
						"height": {"size": "auto", "units": "px"}
					}
				}
			})
		);
	}

	#[rstest]
	fn test_partial_override() {
		let config: ToolbarConfig =
			serde_json::from_value(json!({"buttonPosition": "right"})).unwrap();
		assert_eq!(config.button_position, "right");
		assert_eq!(config.force_lang, "he-IL");
	}
}
