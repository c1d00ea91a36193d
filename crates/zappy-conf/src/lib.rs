//! Site settings for Zappy sites
//!
//! Settings are assembled from layered sources, lowest priority first:
//!
//! 1. built-in defaults ([`sources::DefaultSource`])
//! 2. a TOML or JSON document ([`sources::TomlSource`], [`sources::JsonSource`])
//! 3. `ZAPPY_`-prefixed environment variables ([`sources::EnvSource`])
//!
//! ```
//! use zappy_conf::{SettingsBuilder, sources::TomlSource};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlSource::from_str(r#"
//!         [delivery]
//!         endpoint = "https://api.zappy.io/api/email/contact-form"
//!         website_id = "site-123"
//!     "#))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.delivery.website_id, "site-123");
//! assert_eq!(settings.bootstrap.max_attempts, 50);
//! ```

pub mod accessibility;
pub mod builder;
pub mod consent;
pub mod settings;
pub mod sources;

pub use accessibility::ToolbarConfig;
pub use builder::SettingsBuilder;
pub use consent::{ConsentCategory, ConsentConfig};
pub use settings::{
	BootstrapSettings, DeliverySettings, FormSettings, LookupStrategy, SiteSettings,
};
pub use sources::{ConfigSource, SourceError};

/// Errors raised while loading or validating settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Source error ({source_name}): {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Settings do not match the expected shape: {0}")]
	Shape(#[from] serde_json::Error),

	#[error("Invalid delivery endpoint '{endpoint}': {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	#[error("Invalid value for {key}: {reason}")]
	InvalidValue { key: String, reason: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;
