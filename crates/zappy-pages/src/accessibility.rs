//! Accessibility toolbar
//!
//! The toolbar widget is built once from [`ToolbarConfig`]. Desktop visitors
//! can toggle it with Alt+A (Option+A on macOS): showing it also opens its
//! menu shortly after by clicking the trigger button the widget inserted.

use crate::consent::WidgetError;
use std::time::Duration;
use zappy_conf::ToolbarConfig;

pub use zappy_conf::accessibility::TRIGGER_BUTTON_ID;

/// Body class that makes the toolbar button visible.
pub const VISIBLE_CLASS: &str = "accessibility-widget-visible";

/// `keyCode` / `which` of the A key.
pub const SHORTCUT_KEY_CODE: u32 = 65;

/// The shortcut only works on viewports wider than this.
pub const DESKTOP_MIN_WIDTH: f64 = 768.0;

/// Delay between showing the toolbar and opening its menu.
pub const OPEN_DELAY: Duration = Duration::from_millis(200);

/// The parts of a `keydown` event the shortcut looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
	pub alt: bool,
	pub meta: bool,
	pub key_code: u32,
	pub which: u32,
	pub key: Option<String>,
}

impl KeyChord {
	/// A chord with only `key` set.
	pub fn key(key: impl Into<String>) -> Self {
		Self {
			key: Some(key.into()),
			..Self::default()
		}
	}

	pub fn with_alt(mut self) -> Self {
		self.alt = true;
		self
	}

	pub fn with_meta(mut self) -> Self {
		self.meta = true;
		self
	}

	pub fn with_key_code(mut self, code: u32) -> Self {
		self.key_code = code;
		self.which = code;
		self
	}
}

/// Alt or Meta together with A. On macOS Option+A types `å`.
pub fn is_toggle_shortcut(chord: &KeyChord) -> bool {
	let modifier = chord.alt || chord.meta;
	let a_key = chord.key_code == SHORTCUT_KEY_CODE
		|| chord.which == SHORTCUT_KEY_CODE
		|| chord
			.key
			.as_deref()
			.is_some_and(|k| matches!(k.to_lowercase().as_str(), "a" | "å"));
	modifier && a_key
}

/// What a `keydown` should do to the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
	/// Not the shortcut, or not on desktop; the event is left alone.
	Ignore,
	/// Add [`VISIBLE_CLASS`] and click the trigger after `open_after`.
	Show { open_after: Duration },
	/// Remove [`VISIBLE_CLASS`].
	Hide,
}

impl ShortcutAction {
	/// Whether the event must be prevented and stopped.
	pub fn consumes_event(&self) -> bool {
		!matches!(self, ShortcutAction::Ignore)
	}
}

pub fn decide_shortcut(chord: &KeyChord, viewport_width: f64, visible: bool) -> ShortcutAction {
	if !is_toggle_shortcut(chord) || viewport_width <= DESKTOP_MIN_WIDTH {
		return ShortcutAction::Ignore;
	}
	if visible {
		ShortcutAction::Hide
	} else {
		ShortcutAction::Show {
			open_after: OPEN_DELAY,
		}
	}
}

/// Constructs the toolbar widget.
pub trait ToolbarFactory {
	fn construct(&self, config: &ToolbarConfig) -> Result<(), WidgetError>;
}

/// Builds the toolbar, logging instead of failing.
pub fn init_toolbar<F: ToolbarFactory + ?Sized>(factory: &F, config: &ToolbarConfig) -> bool {
	match factory.construct(config) {
		Ok(()) => {
			crate::debug_log!("Zappy: accessibility toolbar ready");
			true
		}
		Err(e) => {
			crate::warn_log!("Zappy: accessibility toolbar failed to load: {}", e);
			false
		}
	}
}
