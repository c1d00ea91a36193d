//! DOM wiring for page enhancements

use crate::accessibility::{
	KeyChord, ShortcutAction, TRIGGER_BUTTON_ID, ToolbarFactory, VISIBLE_CLASS, decide_shortcut,
	init_toolbar,
};
use crate::dom::DomError;
use crate::enhance::{
	ACTIVE_CLASS, ANCHOR_SELECTOR, MENU_OPEN_CLASS, MOBILE_MENU_SELECTOR, MOBILE_TOGGLE_SELECTOR,
	MenuClick, MobileMenuState, NAVBAR_SELECTOR, REVEAL_CLASSES, REVEAL_SELECTOR, RevealOptions,
	SCROLLED_CLASS, anchor_target, navbar_scrolled,
};
use crate::web::dom::js_error;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
	IntersectionObserverInit, KeyboardEvent, Node, ScrollBehavior, ScrollIntoViewOptions,
	ScrollLogicalPosition, Window,
};
use zappy_conf::ToolbarConfig;

fn listen(
	target: &web_sys::EventTarget,
	event_type: &str,
	capture: bool,
	handler: impl FnMut(Event) + 'static,
) -> Result<(), DomError> {
	let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
	target
		.add_event_listener_with_callback_and_bool(event_type, closure.as_ref().unchecked_ref(), capture)
		.map_err(js_error)?;
	closure.forget(); // Keep closure alive
	Ok(())
}

fn set_class(element: &Element, class: &str, on: bool) {
	let classes = element.class_list();
	let result = if on { classes.add_1(class) } else { classes.remove_1(class) };
	if let Err(e) = result {
		crate::debug_log!("Zappy: class update failed: {:?}", e);
	}
}

/// The mobile menu pair, if the page has one.
#[derive(Clone)]
struct MobileMenu {
	toggle: Element,
	menu: Element,
	body: Option<HtmlElement>,
	state: Rc<Cell<MobileMenuState>>,
}

impl MobileMenu {
	fn find(document: &Document) -> Option<Self> {
		let toggle = document.query_selector(MOBILE_TOGGLE_SELECTOR).ok().flatten()?;
		let menu = document.query_selector(MOBILE_MENU_SELECTOR).ok().flatten()?;
		Some(Self {
			toggle,
			menu,
			body: document.body(),
			state: Rc::new(Cell::new(MobileMenuState::default())),
		})
	}

	fn click(&self, click: MenuClick) {
		let mut state = self.state.get();
		if state.click(click) {
			self.state.set(state);
			self.render(state.is_open());
		}
	}

	fn close(&self) {
		self.click(MenuClick::Outside);
	}

	fn render(&self, open: bool) {
		set_class(&self.menu, ACTIVE_CLASS, open);
		set_class(&self.toggle, ACTIVE_CLASS, open);
		if let Some(body) = &self.body {
			set_class(body, MENU_OPEN_CLASS, open);
		}
	}

	fn contains(&self, target: Option<&Node>) -> bool {
		self.menu.contains(target) || self.toggle.contains(target)
	}

	fn install(&self, document: &Document) -> Result<(), DomError> {
		let menu = self.clone();
		listen(&self.toggle, "click", false, move |event| {
			event.prevent_default();
			menu.click(MenuClick::Toggle);
		})?;

		let menu = self.clone();
		listen(document, "click", false, move |event| {
			let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
			if !menu.contains(target.as_ref()) {
				menu.click(MenuClick::Outside);
			}
		})
	}
}

fn install_smooth_scroll(document: &Document, menu: Option<MobileMenu>) -> Result<(), DomError> {
	let doc = document.clone();
	listen(document, "click", false, move |event| {
		let Some(anchor) = event
			.target()
			.and_then(|t| t.dyn_into::<Element>().ok())
			.and_then(|el| el.closest(ANCHOR_SELECTOR).ok().flatten())
		else {
			return;
		};
		let href = anchor.get_attribute("href").unwrap_or_default();
		let Some(selector) = anchor_target(&href) else {
			return;
		};
		let Some(target) = doc.query_selector(selector).ok().flatten() else {
			return;
		};

		event.prevent_default();
		let options = ScrollIntoViewOptions::new();
		options.set_behavior(ScrollBehavior::Smooth);
		options.set_block(ScrollLogicalPosition::Start);
		target.scroll_into_view_with_scroll_into_view_options(&options);

		if let Some(menu) = &menu {
			menu.close();
		}
	})
}

fn install_navbar(window: &Window, document: &Document) -> Result<(), DomError> {
	let Some(navbar) = document.query_selector(NAVBAR_SELECTOR).ok().flatten() else {
		return Ok(());
	};
	let win = window.clone();
	listen(window, "scroll", false, move |_| {
		let offset = win.scroll_y().unwrap_or(0.0);
		set_class(&navbar, SCROLLED_CLASS, navbar_scrolled(offset));
	})
}

fn install_reveal(document: &Document) -> Result<(), DomError> {
	let elements = document.query_selector_all(REVEAL_SELECTOR).map_err(js_error)?;
	if elements.length() == 0 {
		return Ok(());
	}

	let callback = Closure::wrap(Box::new(|entries: js_sys::Array, observer: IntersectionObserver| {
		for entry in entries.iter() {
			let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
				continue;
			};
			if entry.is_intersecting() {
				let target = entry.target();
				for class in REVEAL_CLASSES {
					set_class(&target, class, true);
				}
				observer.unobserve(&target);
			}
		}
	}) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

	let reveal = RevealOptions::default();
	let options = IntersectionObserverInit::new();
	options.set_threshold(&JsValue::from_f64(reveal.threshold));
	options.set_root_margin(&reveal.root_margin);

	let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
		.map_err(js_error)?;
	callback.forget(); // Keep closure alive

	for i in 0..elements.length() {
		if let Some(element) = elements.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
			observer.observe(&element);
		}
	}
	Ok(())
}

/// Installs the mobile menu, smooth scroll, navbar and reveal behaviours.
pub fn install_enhancements(window: &Window, document: &Document) {
	let menu = MobileMenu::find(document);
	if let Some(Err(e)) = menu.as_ref().map(|m| m.install(document)) {
		crate::warn_log!("Zappy: mobile menu not installed: {}", e);
	}
	if let Err(e) = install_smooth_scroll(document, menu) {
		crate::warn_log!("Zappy: smooth scroll not installed: {}", e);
	}
	if let Err(e) = install_navbar(window, document) {
		crate::warn_log!("Zappy: navbar scroll effect not installed: {}", e);
	}
	if let Err(e) = install_reveal(document) {
		crate::warn_log!("Zappy: scroll animations not installed: {}", e);
	}
}

/// Builds the toolbar and installs the Alt+A shortcut.
pub fn install_accessibility<F: ToolbarFactory + ?Sized>(
	window: &Window,
	document: &Document,
	factory: &F,
	config: &ToolbarConfig,
) {
	init_toolbar(factory, config);

	let win = window.clone();
	let doc = document.clone();
	let installed = listen(document, "keydown", true, move |event| {
		let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
			return;
		};
		let chord = KeyChord {
			alt: key_event.alt_key(),
			meta: key_event.meta_key(),
			key_code: key_event.key_code(),
			which: key_event.which(),
			key: Some(key_event.key()),
		};
		let width = win
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or(0.0);
		let Some(body) = doc.body() else {
			return;
		};
		let visible = body.class_list().contains(VISIBLE_CLASS);

		let action = decide_shortcut(&chord, width, visible);
		if action.consumes_event() {
			event.prevent_default();
			event.stop_propagation();
		}
		match action {
			ShortcutAction::Ignore => {}
			ShortcutAction::Hide => set_class(&body, VISIBLE_CLASS, false),
			ShortcutAction::Show { open_after } => {
				set_class(&body, VISIBLE_CLASS, true);
				let doc = doc.clone();
				wasm_bindgen_futures::spawn_local(async move {
					gloo_timers::future::sleep(open_after).await;
					if let Some(button) = doc
						.get_element_by_id(TRIGGER_BUTTON_ID)
						.and_then(|b| b.dyn_into::<HtmlElement>().ok())
					{
						button.click();
					}
				});
			}
		}
	});
	if let Err(e) = installed {
		crate::warn_log!("Zappy: accessibility shortcut not installed: {}", e);
	}
}
