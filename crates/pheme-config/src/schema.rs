//! Configuration sections.

use serde::{Deserialize, Serialize};

/// Default JSON-LD context written into response bodies.
pub const DEFAULT_CONTEXT_IRI: &str = "https://www.w3.org/ns/activitystreams";

/// Default `Content-Type` of response bodies.
pub const DEFAULT_CONTENT_TYPE: &str = "application/activity+json";

/// Settings shared by every HTTP handler.
///
/// # Example
///
/// ```
/// use pheme_config::HandlerSection;
///
/// let handler = HandlerSection::default();
/// assert_eq!(handler.content_type, "application/activity+json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HandlerSection {
    /// JSON-LD context IRI.
    #[serde(default = "default_context_iri")]
    pub context_iri: String,

    /// Response media type.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl Default for HandlerSection {
    fn default() -> Self {
        Self {
            context_iri: default_context_iri(),
            content_type: default_content_type(),
        }
    }
}

fn default_context_iri() -> String {
    DEFAULT_CONTEXT_IRI.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

impl LogFormat {
    /// Parses `json` or `pretty`, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if value.eq_ignore_ascii_case("pretty") {
            Some(Self::Pretty)
        } else {
            None
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (`trace`, `debug`, `info`, `pheme_server=debug`, ...).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line.
    #[serde(default)]
    pub include_location: bool,

    /// Service name logged at startup.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
            service_name: default_service_name(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "pheme".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_defaults() {
        let handler = HandlerSection::default();
        assert_eq!(handler.context_iri, DEFAULT_CONTEXT_IRI);
        assert_eq!(handler.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_logging_section_partial_toml() {
        let section: LoggingSection = toml::from_str("format = \"pretty\"").unwrap();
        assert_eq!(section.format, LogFormat::Pretty);
        assert_eq!(section.level, "info");
        assert!(section.enabled);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<HandlerSection, _> = toml::from_str("context = \"x\"");
        assert!(result.is_err());
    }
}
