//! # Pheme Server
//!
//! HTTP handler protocol for ActivityPub endpoints.
//!
//! This crate provides:
//!
//! - [`ActivityHandler`], [`CollectionHandler`], [`ItemHandler`] - the three
//!   request handlers and the [`Handler`] trait they implement
//! - [`ActivitySaver`], [`CollectionLoader`], [`ObjectLoader`] - storage
//!   collaborator traits
//! - [`RequestScope`] - per-request service lookup
//! - [`Marshaller`] and [`JsonLdMarshaller`] - response body encoding
//! - [`CollectionTyper`] - request classification into [`CollectionType`]
//! - [`MemoryStorage`] - an in-memory storage collaborator
//!
//! Routing is left to the embedding server: build an [`http::Request`] with a
//! [`bytes::Bytes`] body, pass it to a handler together with a scope and
//! write back the returned [`http::Response`].

#![doc(html_root_url = "https://docs.rs/pheme-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod handler;
pub mod marshal;
mod memory;
mod scope;
pub mod storage;
mod typer;

pub use error::HandlerError;
pub use handler::{
    ActivityHandler, CollectionHandler, Handler, HandlerKind, HandlerOptions, ItemHandler,
    MethodValidator, ACTIVITY_JSON_CONTENT_TYPE,
};
pub use marshal::{JsonLdMarshaller, MarshalError, Marshaller, ACTIVITY_BASE_URI};
pub use memory::MemoryStorage;
pub use scope::RequestScope;
pub use storage::{ActivitySaver, CollectionLoader, ObjectLoader};
pub use typer::{CollectionType, CollectionTyper, PathTyper};
