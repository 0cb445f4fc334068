//! Storage collaborator traits.
//!
//! Handlers never call storage themselves. They fetch the collaborator from
//! the [`RequestScope`](crate::RequestScope) and hand it to the business
//! function, which uses these traits.

use std::future::Future;

use http::StatusCode;
use pheme_core::{BoxError, CollectionInterface, Iri, ItemRef};

use crate::typer::CollectionType;

/// Persists activities.
pub trait ActivitySaver: Send + Sync + 'static {
    /// Saves `activity` into the addressed collection and returns its IRI
    /// with the status to report: 201 when created, 410 when it deleted
    /// something, 200 otherwise.
    fn save(
        &self,
        collection: CollectionType,
        activity: ItemRef,
    ) -> impl Future<Output = Result<(Iri, StatusCode), BoxError>> + Send;
}

/// Loads collections.
pub trait CollectionLoader: Send + Sync + 'static {
    /// Loads the collection at `iri`.
    fn load_collection(
        &self,
        collection: CollectionType,
        iri: &Iri,
    ) -> impl Future<Output = Result<Box<dyn CollectionInterface>, BoxError>> + Send;
}

/// Loads single items.
pub trait ObjectLoader: Send + Sync + 'static {
    /// Loads the item at `iri`.
    fn load(&self, iri: &Iri) -> impl Future<Output = Result<ItemRef, BoxError>> + Send;
}
