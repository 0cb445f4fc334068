//! Root configuration type.

use pheme_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, HandlerSection, LogFormat, LoggingSection};

/// Complete Pheme configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use pheme_config::PhemeConfig;
///
/// let config = PhemeConfig::default();
/// assert_eq!(config.handler.context_iri, "https://www.w3.org/ns/activitystreams");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PhemeConfig {
    /// Handler settings.
    #[serde(default)]
    pub handler: HandlerSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl PhemeConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - `handler.context_iri` is empty or has no scheme
    /// - `handler.content_type` is not a `type/subtype` media type
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let context = self.handler.context_iri.trim();
        if context.is_empty() {
            return Err(ConfigError::invalid_value(
                "handler.context_iri",
                "must not be empty",
            ));
        }
        if !context.contains(':') {
            return Err(ConfigError::invalid_value(
                "handler.context_iri",
                format!("not an absolute IRI: {context}"),
            ));
        }

        let content_type = self.handler.content_type.trim();
        if content_type.split('/').filter(|part| !part.is_empty()).count() != 2 {
            return Err(ConfigError::invalid_value(
                "handler.content_type",
                format!("not a media type: {content_type}"),
            ));
        }

        if self.logging.enabled {
            self.log_config()
                .validate()
                .map_err(|e| ConfigError::invalid_value("logging", e.to_string()))?;
        }

        Ok(())
    }

    /// Development preset: pretty `debug` logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use pheme_config::{LogFormat, PhemeConfig};
    ///
    /// let config = PhemeConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            handler: HandlerSection::default(),
            logging: LoggingSection {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..LoggingSection::default()
            },
        }
    }

    /// The logging settings as a [`LogConfig`].
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let base = match self.logging.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            file_line_info: self.logging.include_location,
            service_name: self.logging.service_name.clone(),
            ..base
        }
    }
}
