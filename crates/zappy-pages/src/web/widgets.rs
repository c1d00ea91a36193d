//! Third-party widget globals
//!
//! Thin `Reflect` wrappers over `window.CookieConsent`,
//! `window.MicAccessTool` and `window.gtag`.

use crate::accessibility::ToolbarFactory;
use crate::consent::{ChangeCallback, ConsentService, ConsentSignal, ConsentSink, WidgetError};
use js_sys::{Array, Function, JSON, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use zappy_conf::{ConsentCategory, ConsentConfig, ToolbarConfig};

fn call_error(method: &str, value: JsValue) -> WidgetError {
	WidgetError::Call {
		method: method.to_string(),
		message: value.as_string().unwrap_or_else(|| format!("{:?}", value)),
	}
}

/// Converts a serializable value into a plain JS object.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, WidgetError> {
	let json = serde_json::to_string(value).map_err(|e| WidgetError::Config(e.to_string()))?;
	JSON::parse(&json).map_err(|e| call_error("JSON.parse", e))
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
	Reflect::get(target, &JsValue::from_str(name))
		.ok()
		.and_then(|f| f.dyn_into::<Function>().ok())
}

fn global(name: &str) -> Option<JsValue> {
	let window = web_sys::window()?;
	Reflect::get(&window, &JsValue::from_str(name))
		.ok()
		.filter(|v| !v.is_undefined() && !v.is_null())
}

/// `window.CookieConsent`.
#[derive(Debug, Clone)]
pub struct JsConsentService {
	inner: JsValue,
}

impl JsConsentService {
	/// The loaded service, if its script has run.
	pub fn probe() -> Option<Self> {
		global("CookieConsent").map(|inner| Self { inner })
	}
}

impl ConsentService for JsConsentService {
	fn run(&self, config: &ConsentConfig) -> Result<(), WidgetError> {
		let run = method(&self.inner, "run").ok_or_else(|| WidgetError::NotLoaded("CookieConsent.run".to_string()))?;
		let config = to_js(config)?;
		run.call1(&self.inner, &config)
			.map_err(|e| call_error("run", e))?;
		Ok(())
	}

	fn valid_consent(&self, category: ConsentCategory) -> bool {
		method(&self.inner, "validConsent")
			.and_then(|f| f.call1(&self.inner, &JsValue::from_str(category.as_str())).ok())
			.and_then(|v| v.as_bool())
			.unwrap_or(false)
	}

	fn supports_on_change(&self) -> bool {
		method(&self.inner, "onChange").is_some()
	}

	fn on_change(&self, mut callback: ChangeCallback) -> Result<(), WidgetError> {
		let on_change = method(&self.inner, "onChange")
			.ok_or_else(|| WidgetError::NotLoaded("CookieConsent.onChange".to_string()))?;

		let closure = Closure::wrap(Box::new(move |_cookie: JsValue, changed: JsValue| {
			let changed: Vec<String> = Array::from(&changed)
				.iter()
				.filter_map(|v| v.as_string())
				.collect();
			callback(changed);
		}) as Box<dyn FnMut(JsValue, JsValue)>);

		on_change
			.call1(&self.inner, closure.as_ref().unchecked_ref())
			.map_err(|e| call_error("onChange", e))?;
		closure.forget(); // Keep closure alive
		Ok(())
	}
}

/// Builds `window.micAccessTool = new MicAccessTool(config)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicAccessToolFactory;

impl ToolbarFactory for MicAccessToolFactory {
	fn construct(&self, config: &ToolbarConfig) -> Result<(), WidgetError> {
		let window = web_sys::window().ok_or_else(|| WidgetError::NotLoaded("window".to_string()))?;
		let constructor = global("MicAccessTool")
			.and_then(|c| c.dyn_into::<Function>().ok())
			.ok_or_else(|| WidgetError::NotLoaded("MicAccessTool".to_string()))?;

		let args = Array::of1(&to_js(config)?);
		let instance = Reflect::construct(&constructor, &args).map_err(|e| call_error("new MicAccessTool", e))?;
		Reflect::set(&window, &JsValue::from_str("micAccessTool"), &instance)
			.map_err(|e| call_error("window.micAccessTool", e))?;
		Ok(())
	}
}

/// Forwards consent signals to `gtag('consent', 'update', ...)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GtagSink;

impl ConsentSink for GtagSink {
	fn update(&self, signal: ConsentSignal) {
		let Some(gtag) = global("gtag").and_then(|g| g.dyn_into::<Function>().ok()) else {
			crate::debug_log!("Zappy: gtag not loaded, dropping consent update");
			return;
		};
		let params = match to_js(&signal.to_update_params()) {
			Ok(params) => params,
			Err(e) => {
				crate::warn_log!("Zappy: consent update not sent: {}", e);
				return;
			}
		};
		if let Err(e) = gtag.call3(
			&JsValue::NULL,
			&JsValue::from_str("consent"),
			&JsValue::from_str("update"),
			&params,
		) {
			crate::warn_log!("Zappy: consent update failed: {}", call_error("gtag", e));
		}
	}
}
