//! Page enhancements
//!
//! Small behaviours every Zappy template gets: the mobile menu, smooth
//! scrolling to in-page anchors, the navbar scroll state and reveal-on-scroll
//! animations. The decisions live here; `web` applies them to the DOM.

pub const MOBILE_TOGGLE_SELECTOR: &str = ".mobile-menu-toggle, .hamburger, [data-mobile-toggle]";
pub const MOBILE_MENU_SELECTOR: &str = ".mobile-menu, .nav-mobile, [data-mobile-menu]";
/// Set on both the toggle and the menu while the menu is open.
pub const ACTIVE_CLASS: &str = "active";
/// Set on `<body>` while the menu is open.
pub const MENU_OPEN_CLASS: &str = "menu-open";

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

pub const NAVBAR_SELECTOR: &str = ".navbar, header, [data-navbar]";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const NAVBAR_SCROLL_THRESHOLD: f64 = 50.0;

pub const REVEAL_SELECTOR: &str = "[data-animate], .fade-in, .animate-on-scroll";
pub const REVEAL_CLASSES: [&str; 2] = ["animated", "visible"];

/// Where a click landed relative to the mobile menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuClick {
	Toggle,
	Inside,
	Outside,
}

/// Open/closed state of the mobile menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenuState {
	open: bool,
}

impl MobileMenuState {
	pub fn is_open(&self) -> bool {
		self.open
	}

	/// Applies a click and returns whether the state changed.
	pub fn click(&mut self, click: MenuClick) -> bool {
		match click {
			MenuClick::Toggle => {
				self.open = !self.open;
				true
			}
			MenuClick::Inside => false,
			MenuClick::Outside => self.close(),
		}
	}

	/// Closes the menu; returns whether it was open.
	pub fn close(&mut self) -> bool {
		std::mem::replace(&mut self.open, false)
	}
}

/// The selector to scroll to for an in-page link, or `None` for `#`, `#!`
/// and links that are not in-page.
pub fn anchor_target(href: &str) -> Option<&str> {
	match href {
		"#" | "#!" => None,
		h if h.starts_with('#') => Some(h),
		_ => None,
	}
}

/// Whether the navbar should carry [`SCROLLED_CLASS`].
pub fn navbar_scrolled(scroll_offset: f64) -> bool {
	scroll_offset > NAVBAR_SCROLL_THRESHOLD
}

/// `IntersectionObserver` options for reveal animations.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
	pub threshold: f64,
	pub root_margin: String,
}

impl Default for RevealOptions {
	fn default() -> Self {
		Self {
			threshold: 0.1,
			root_margin: "0px 0px -50px 0px".to_string(),
		}
	}
}
