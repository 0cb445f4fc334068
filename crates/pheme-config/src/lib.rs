//! Typed configuration for Pheme.
//!
//! Configuration is loaded in layers: defaults, then a TOML or JSON file,
//! then `PREFIX__SECTION__KEY` environment variables. Unknown keys in files
//! are rejected.
//!
//! # Example
//!
//! ```
//! use pheme_config::{ConfigLoader, LogFormat};
//!
//! let toml = r#"
//!     [handler]
//!     context_iri = "https://www.w3.org/ns/activitystreams"
//!
//!     [logging]
//!     level = "debug"
//!     format = "pretty"
//! "#;
//!
//! let config = ConfigLoader::new()
//!     .with_string(toml, "toml")
//!     .unwrap()
//!     .load()
//!     .unwrap();
//!
//! assert_eq!(config.logging.format, LogFormat::Pretty);
//! assert!(!config.log_config().json_format);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::PhemeConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    HandlerSection, LogFormat, LoggingSection, DEFAULT_CONTENT_TYPE, DEFAULT_CONTEXT_IRI,
};
