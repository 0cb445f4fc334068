//! # Pheme
//!
//! **ActivityPub object model and HTTP handler protocol**
//!
//! Pheme decodes ActivityStreams payloads into typed vocabulary items and
//! serves them through three request handlers:
//!
//! - activity handlers accept every method except `POST` (rejected with 406)
//!   and hand the decoded activity to an
//!   [`ActivitySaver`](server::ActivitySaver)
//! - collection handlers answer `GET`/`HEAD` from a
//!   [`CollectionLoader`](server::CollectionLoader)
//! - item handlers answer every other method from an
//!   [`ObjectLoader`](server::ObjectLoader)
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use pheme::prelude::*;
//!
//! async fn outbox(
//!     typ: CollectionType,
//!     req: Request<Bytes>,
//!     storage: Arc<MemoryStorage>,
//! ) -> Result<Box<dyn CollectionInterface>, HandlerError> {
//!     let iri = Iri::new(format!("http://example.org{}", req.uri().path()));
//!     Ok(storage.load_collection(typ, &iri).await?)
//! }
//!
//! # fn main() -> Result<(), pheme::BootstrapError> {
//! let mut config = PhemeConfig::default();
//! config.logging.enabled = false;
//! let options = pheme::bootstrap(&config)?;
//!
//! let storage = MemoryStorage::new();
//! storage.insert_collection(OrderedCollection::new("http://example.org/alice/outbox"));
//! let scope = RequestScope::new().with(Arc::new(storage));
//!
//! let handler = CollectionHandler::new(outbox).with_options(options);
//! let req = Request::get("/alice/outbox").body(Bytes::new()).unwrap();
//! let resp = tokio_test::block_on(handler.serve(req, &scope));
//! assert_eq!(resp.status(), StatusCode::OK);
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/pheme/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use pheme_config::{ConfigError, PhemeConfig};
use pheme_core::{resolver, Iri};
use pheme_server::HandlerOptions;
use pheme_telemetry::{init_logging, TelemetryError};

// Re-export the object model
pub use pheme_core as core;

// Re-export the handler protocol
pub use pheme_server as server;

// Re-export logging setup
pub use pheme_telemetry as telemetry;

// Re-export configuration
pub use pheme_config as config;

/// Errors raised while starting a service from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The logging subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Builds handler options from the `[handler]` section.
///
/// Unlike [`bootstrap`] this has no process-wide side effects.
#[must_use]
pub fn handler_options(config: &PhemeConfig) -> HandlerOptions {
    HandlerOptions::default()
        .with_context(Iri::new(config.handler.context_iri.trim()))
        .with_content_type(config.handler.content_type.trim())
}

/// Prepares the process to serve requests.
///
/// Validates `config`, installs the logging subscriber (unless logging is
/// disabled), installs the default type resolver if none is present and
/// returns the [`HandlerOptions`] every handler should be built with.
///
/// Call it once at startup; a second call fails because a subscriber is
/// already installed.
pub fn bootstrap(config: &PhemeConfig) -> Result<HandlerOptions, BootstrapError> {
    config.validate()?;
    init_logging(&config.log_config())?;
    resolver::ensure_default();

    let options = handler_options(config);
    tracing::debug!(
        context = %options.context,
        content_type = %options.content_type,
        "handler options ready"
    );
    Ok(options)
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use pheme::prelude::*;
///
/// let options = HandlerOptions::default();
/// assert_eq!(options.content_type, ACTIVITY_JSON_CONTENT_TYPE);
/// ```
pub mod prelude {
    pub use crate::{bootstrap, handler_options, BootstrapError};

    pub use pheme_core::{
        resolver, Activity, ActivityVocabularyType, Collection, CollectionInterface,
        ContextError, Iri, Item, ItemCollection, ItemRef, Liked, LikedCollection, Link,
        Mention, Object, ObjectId, OrderedCollection, ResolverTable, Shares, TypeResolver,
        VocabError,
    };

    pub use pheme_server::{
        ActivityHandler, ActivitySaver, CollectionHandler, CollectionLoader, CollectionType,
        Handler, HandlerError, HandlerKind, HandlerOptions, ItemHandler, MemoryStorage,
        ObjectLoader, RequestScope, ACTIVITY_JSON_CONTENT_TYPE,
    };

    pub use pheme_config::{ConfigLoader, PhemeConfig};
}
