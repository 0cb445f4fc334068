//! Structured logging for Pheme.
//!
//! Handlers in `pheme-server` emit `tracing` events inside a `handler` span
//! carrying `kind`, `request_id`, `http.method` and `http.path`. This crate
//! installs the subscriber that writes them out, as JSON in production or
//! pretty-printed during development.
//!
//! # Example
//!
//! ```rust,no_run
//! use pheme_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! tracing::info!(http.path = "/actors/alice/outbox", "ready");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
