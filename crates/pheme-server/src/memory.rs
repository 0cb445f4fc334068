//! In-memory storage.
//!
//! Implements all three storage traits over `parking_lot` maps. Useful for
//! tests and small single-process deployments; nothing is persisted.

use std::collections::HashMap;

use http::StatusCode;
use parking_lot::RwLock;
use pheme_core::{
    errf, Activity, ActivityVocabularyType, BoxError, CollectionInterface, Iri, Item, ItemRef,
    OrderedCollection,
};

use crate::storage::{ActivitySaver, CollectionLoader, ObjectLoader};
use crate::typer::CollectionType;

/// A process-local store of items and collections.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<Iri, ItemRef>>,
    collections: RwLock<HashMap<Iri, OrderedCollection>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an item under its own IRI, replacing any previous one.
    pub fn insert_object(&self, item: ItemRef) -> Option<ItemRef> {
        self.objects.write().insert(item.link(), item)
    }

    /// Stores a collection under its own IRI.
    pub fn insert_collection(&self, collection: OrderedCollection) {
        let iri = collection.link();
        self.collections.write().insert(iri, collection);
    }

    /// Appends an item to a stored collection.
    ///
    /// Returns `false` if no collection is stored at `iri`.
    pub fn append_to(&self, iri: &Iri, item: ItemRef) -> bool {
        match self.collections.write().get_mut(iri) {
            Some(collection) => {
                collection.append(item);
                true
            }
            None => false,
        }
    }

    /// Number of stored items.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    fn delete_target(&self, activity: &ItemRef) -> Option<ItemRef> {
        let target = activity
            .downcast_ref::<Activity>()
            .and_then(|a| a.object.as_ref())
            .map(|object| object.link())?;
        self.objects.write().remove(&target)
    }
}

impl ActivitySaver for MemoryStorage {
    async fn save(
        &self,
        collection: CollectionType,
        activity: ItemRef,
    ) -> Result<(Iri, StatusCode), BoxError> {
        let iri = activity.link();
        if iri.is_empty() {
            return Err(errf!("unable to save activity into {} without an id", collection).into());
        }

        if activity.item_type() == ActivityVocabularyType::DELETE {
            if self.delete_target(&activity).is_none() {
                return Err(errf!("nothing to delete").with_iri(iri).into());
            }
            self.insert_object(activity);
            return Ok((iri, StatusCode::GONE));
        }

        // Embedded objects of a Create become addressable on their own.
        if activity.item_type() == ActivityVocabularyType::CREATE {
            if let Some(object) = activity
                .downcast_ref::<Activity>()
                .and_then(|a| a.object.clone())
                .filter(|object| object.is_object() && !object.link().is_empty())
            {
                self.insert_object(object);
            }
        }

        let status = match self.insert_object(activity) {
            Some(_) => StatusCode::OK,
            None => StatusCode::CREATED,
        };
        Ok((iri, status))
    }
}

impl CollectionLoader for MemoryStorage {
    async fn load_collection(
        &self,
        collection: CollectionType,
        iri: &Iri,
    ) -> Result<Box<dyn CollectionInterface>, BoxError> {
        let found = self.collections.read().get(iri).cloned();
        match found {
            Some(c) => Ok(Box::new(c)),
            None => Err(errf!("unable to load {} collection", collection)
                .with_iri(iri.clone())
                .into()),
        }
    }
}

impl ObjectLoader for MemoryStorage {
    async fn load(&self, iri: &Iri) -> Result<ItemRef, BoxError> {
        let found = self.objects.read().get(iri).cloned();
        found.ok_or_else(|| errf!("unable to find object").with_iri(iri.clone()).into())
    }
}
