//! Error types for the vocabulary layer.
//!
//! Two error types live here:
//!
//! - [`VocabError`] - failures while resolving or decoding wire payloads
//! - [`ContextError`] - a message annotated with an optional subject IRI and
//!   an optional underlying cause, used by storage collaborators and business
//!   functions to report what went wrong and to which resource
//!
//! # Example
//!
//! ```
//! use pheme_core::{errf, ContextError, Iri};
//! use std::error::Error;
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such row");
//! let err = errf!("unable to load {}", "object")
//!     .with_iri(Iri::new("https://example.org/objects/1"))
//!     .annotate(io);
//!
//! assert_eq!(
//!     err.to_string(),
//!     "unable to load object: https://example.org/objects/1: no such row"
//! );
//! assert!(err.source().is_some());
//! ```

use std::fmt;

use thiserror::Error;

use crate::types::ActivityVocabularyType;
use crate::values::Iri;

/// Boxed error type used for causes coming from external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`VocabError`].
pub type VocabResult<T> = Result<T, VocabError>;

/// Errors raised while turning wire payloads into vocabulary items.
#[derive(Error, Debug)]
pub enum VocabError {
    /// The resolver has no constructor registered for the payload's type tag.
    #[error("unable to resolve vocabulary type \"{tag}\"")]
    UnknownType {
        /// The unrecognised type tag.
        tag: ActivityVocabularyType,
    },

    /// The payload is an object without a string `type` member.
    #[error("payload has no type tag")]
    MissingType,

    /// The payload has a JSON shape that cannot represent an item.
    #[error("invalid payload: expected {expected}")]
    InvalidPayload {
        /// What the decoder expected to find.
        expected: &'static str,
    },

    /// The payload could not be parsed or did not match the resolved shape.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl VocabError {
    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(tag: impl Into<ActivityVocabularyType>) -> Self {
        Self::UnknownType { tag: tag.into() }
    }

    /// Returns `true` if this is an [`VocabError::UnknownType`] error.
    #[must_use]
    pub const fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnknownType { .. })
    }
}

/// An error message with an optional subject IRI and underlying cause.
///
/// Renders as `"<message>: <iri>: <cause>"`, omitting whichever suffix is
/// absent. The cause stays reachable through [`std::error::Error::source`].
#[derive(Debug)]
pub struct ContextError {
    message: String,
    iri: Option<Iri>,
    cause: Option<BoxError>,
}

impl ContextError {
    /// Creates a new error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            iri: None,
            cause: None,
        }
    }

    /// Wraps an underlying cause.
    #[must_use]
    pub fn annotate(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Attaches the IRI of the resource the error is about.
    #[must_use]
    pub fn with_iri(mut self, iri: impl Into<Iri>) -> Self {
        self.iri = Some(iri.into());
        self
    }

    /// Returns the message without subject or cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the subject IRI, if one was attached.
    #[must_use]
    pub fn subject(&self) -> Option<&Iri> {
        self.iri.as_ref().filter(|iri| !iri.is_empty())
    }

    /// Returns the wrapped cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Consumes the error and returns the wrapped cause.
    #[must_use]
    pub fn into_cause(self) -> Option<BoxError> {
        self.cause
    }
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(iri) = self.subject() {
            write!(f, ": {iri}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Builds a [`ContextError`] from a format string.
///
/// ```
/// let err = pheme_core::errf!("invalid HTTP method {}", "POST");
/// assert_eq!(err.to_string(), "invalid HTTP method POST");
/// ```
#[macro_export]
macro_rules! errf {
    ($($arg:tt)*) => {
        $crate::ContextError::new(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_message_only() {
        let err = ContextError::new("boom");
        assert_eq!(err.to_string(), "boom");
        assert!(err.source().is_none());
        assert!(err.subject().is_none());
    }

    #[test]
    fn test_message_with_iri() {
        let err = ContextError::new("not found").with_iri("https://example.org/1");
        assert_eq!(err.to_string(), "not found: https://example.org/1");
    }

    #[test]
    fn test_message_with_cause() {
        let err = ContextError::new("load failed").annotate(io::Error::other("disk"));
        assert_eq!(err.to_string(), "load failed: disk");
    }

    #[test]
    fn test_full_rendering_order() {
        let err = errf!("unable to save {}", "activity")
            .annotate(io::Error::other("timeout"))
            .with_iri("https://example.org/a/2");
        assert_eq!(
            err.to_string(),
            "unable to save activity: https://example.org/a/2: timeout"
        );
    }

    #[test]
    fn test_empty_iri_is_omitted() {
        let err = ContextError::new("oops").with_iri(Iri::default());
        assert_eq!(err.to_string(), "oops");
    }

    #[test]
    fn test_source_returns_cause() {
        let err = ContextError::new("wrapped")
            .annotate(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));

        let source = err.source().expect("cause should be exposed");
        let io_err = source
            .downcast_ref::<io::Error>()
            .expect("cause should downcast to io::Error");
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_nested_context_errors() {
        let inner = ContextError::new("inner").with_iri("urn:x");
        let outer = ContextError::new("outer").annotate(inner);
        assert_eq!(outer.to_string(), "outer: inner: urn:x");
        assert!(outer
            .source()
            .and_then(|s| s.downcast_ref::<ContextError>())
            .is_some());
    }

    #[test]
    fn test_unknown_type_error() {
        let err = VocabError::unknown_type("Banana");
        assert!(err.is_unknown_type());
        assert!(err.to_string().contains("Banana"));
        assert!(!VocabError::MissingType.is_unknown_type());
    }
}
