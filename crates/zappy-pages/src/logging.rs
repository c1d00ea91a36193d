//! Logging abstraction layer for zappy-pages
//!
//! This module provides logging macros that work across WASM and native targets.
//!
//! ## Macro Overview
//!
//! | Macro | Debug Assertions | WASM | Non-WASM |
//! |-------|------------------|------|----------|
//! | `debug_log!` | Required | `console.debug` | `tracing::debug!` |
//! | `info_log!` | No | `console.info` | `tracing::info!` |
//! | `warn_log!` | No | `console.warn` | `tracing::warn!` |
//! | `error_log!` | No | `console.error` | `tracing::error!` |
//!
//! Delivery outcomes are reported through these macros, so `info_log!` and
//! above stay active in release builds.
//!
//! ## Example
//!
//! ```ignore
//! use zappy_pages::{info_log, warn_log};
//!
//! info_log!("Zappy: Contact form found: {}", description);
//! warn_log!("Zappy: Backend returned error: {}", reason);
//! ```

/// Logs a debug message (requires `debug_assertions`)
///
/// Compiles to a no-op in release builds.
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::debug!("{}", format!($($arg)*));
	}};
}

/// No-op debug_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
///
/// # Example
///
/// ```ignore
/// info_log!("Zappy: Contact form data sent successfully to backend");
/// ```
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::info!("{}", format!($($arg)*));
	}};
}

/// Logs a warning message
///
/// # Example
///
/// ```ignore
/// warn_log!("Zappy: No contact form found on page");
/// ```
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::warn!("{}", format!($($arg)*));
	}};
}

/// Logs an error message
///
/// # Example
///
/// ```ignore
/// error_log!("Zappy: Failed to send to backend API: {}", error);
/// ```
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::error!("{}", format!($($arg)*));
	}};
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	#[rstest]
	fn test_logging_macros_compile() {
		crate::debug_log!("Debug message: {}", 42);
		crate::info_log!("Info message: {}", "test");
		crate::warn_log!("Warning message: {:?}", vec![1, 2, 3]);
		crate::error_log!("Error message: {}", "error");
	}

	#[rstest]
	fn test_logging_macros_no_args() {
		crate::debug_log!("Simple debug");
		crate::info_log!("Simple info");
		crate::warn_log!("Simple warning");
		crate::error_log!("Simple error");
	}
}
