//! Handler error type.

use std::fmt;

use http::{Method, StatusCode};
use pheme_core::{BoxError, ContextError, VocabError};

use crate::marshal::MarshalError;

/// Errors produced while serving a request.
///
/// Every variant maps to an HTTP status through [`status_code`](Self::status_code).
#[derive(Debug)]
pub enum HandlerError {
    /// The handler does not accept the request method.
    MethodNotAllowed {
        /// The rejected method.
        method: Method,
        /// 406 for activity handlers, 405 otherwise.
        status: StatusCode,
    },

    /// The storage collaborator is missing from the request scope.
    StorageUnavailable {
        /// Type name of the collaborator that was looked up.
        type_name: &'static str,
    },

    /// A business function, storage collaborator or encoder failed.
    Upstream {
        /// Status chosen by whoever raised the error, if any.
        status: Option<StatusCode>,
        /// The underlying error.
        source: BoxError,
    },
}

impl HandlerError {
    /// Wraps an error without choosing a status. It renders as 500.
    pub fn upstream(err: impl Into<BoxError>) -> Self {
        Self::Upstream {
            status: None,
            source: err.into(),
        }
    }

    /// Wraps an error that should render with `status`.
    pub fn with_status(status: StatusCode, err: impl Into<BoxError>) -> Self {
        Self::Upstream {
            status: Some(status),
            source: err.into(),
        }
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { status, .. } => *status,
            Self::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Returns `true` for method rejections.
    #[must_use]
    pub const fn is_method_not_allowed(&self) -> bool {
        matches!(self, Self::MethodNotAllowed { .. })
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed { method, .. } => write!(f, "invalid HTTP method {method}"),
            Self::StorageUnavailable { .. } => {
                f.write_str("unable to load storage from request scope")
            }
            Self::Upstream { source, .. } => write!(f, "{source}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Upstream { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<ContextError> for HandlerError {
    fn from(err: ContextError) -> Self {
        Self::upstream(err)
    }
}

impl From<VocabError> for HandlerError {
    fn from(err: VocabError) -> Self {
        Self::upstream(err)
    }
}

impl From<MarshalError> for HandlerError {
    fn from(err: MarshalError) -> Self {
        Self::upstream(err)
    }
}

impl From<BoxError> for HandlerError {
    fn from(err: BoxError) -> Self {
        Self::upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_method_not_allowed() {
        let err = HandlerError::MethodNotAllowed {
            method: Method::POST,
            status: StatusCode::NOT_ACCEPTABLE,
        };
        assert_eq!(err.to_string(), "invalid HTTP method POST");
        assert_eq!(err.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert!(err.is_method_not_allowed());
    }

    #[test]
    fn test_storage_unavailable_is_500() {
        let err = HandlerError::StorageUnavailable { type_name: "Store" };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "unable to load storage from request scope");
    }

    #[test]
    fn test_upstream_passes_message_through() {
        let err: HandlerError = ContextError::new("boom")
            .with_iri("https://example.org/1")
            .into();
        assert_eq!(err.to_string(), "boom: https://example.org/1");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_upstream_status_is_kept() {
        let err = HandlerError::with_status(StatusCode::NOT_FOUND, ContextError::new("missing"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_vocab_error_is_upstream() {
        let err: HandlerError = VocabError::MissingType.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "payload has no type tag");

        let err = HandlerError::with_status(StatusCode::BAD_REQUEST, VocabError::MissingType);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
