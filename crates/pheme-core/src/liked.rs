//! The `liked` collection.
//!
//! [`Liked`] and [`LikedCollection`] both wrap an [`OrderedCollection`] but
//! are distinct types: `Liked` is the actor's liked collection as created by
//! a server, `LikedCollection` is the bare shape received from elsewhere and
//! has no defaulting constructor.
//!
//! Neither view hands out mutable access to its members: `append` is the only
//! way in, so `totalItems` always matches the member count.

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::{CollectionInterface, OrderedCollection};
use crate::item::{Item, ItemCollection, ItemRef};
use crate::types::ActivityVocabularyType;
use crate::values::{Iri, NaturalLanguageValues, ObjectId};

macro_rules! ordered_view {
    ($ty:ident) => {
        impl $ty {
            /// The underlying ordered collection.
            #[must_use]
            pub fn collection(&self) -> &OrderedCollection {
                &self.0
            }

            /// Unwraps the ordered collection.
            #[must_use]
            pub fn into_inner(self) -> OrderedCollection {
                self.0
            }
        }

        impl From<OrderedCollection> for $ty {
            fn from(collection: OrderedCollection) -> Self {
                Self(collection)
            }
        }

        impl Item for $ty {
            fn id(&self) -> ObjectId {
                self.0.id()
            }

            fn link(&self) -> Iri {
                self.0.link()
            }

            fn item_type(&self) -> ActivityVocabularyType {
                self.0.item_type()
            }

            fn is_link(&self) -> bool {
                self.0.is_link()
            }

            fn is_object(&self) -> bool {
                self.0.is_object()
            }

            fn to_value(&self) -> Result<Value, serde_json::Error> {
                self.0.to_value()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl CollectionInterface for $ty {
            fn append(&mut self, item: ItemRef) {
                self.0.append(item);
            }

            fn items(&self) -> &ItemCollection {
                self.0.items()
            }

            fn total_items(&self) -> u64 {
                self.0.total_items()
            }

            fn as_item(&self) -> &dyn Item {
                self
            }
        }
    };
}

pub(crate) use ordered_view;

/// Everything an actor has liked.
///
/// Members are added with [`append`](CollectionInterface::append) only:
///
/// ```compile_fail
/// let mut liked = pheme_core::Liked::new();
/// liked.collection_mut().total_items = 7;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liked(OrderedCollection);

impl Liked {
    /// Creates the default liked collection: id `liked`, type `Collection`,
    /// zero-length name, content and summary, no items.
    #[must_use]
    pub fn new() -> Self {
        Self(OrderedCollection {
            id: ObjectId::new("liked"),
            kind: ActivityVocabularyType::COLLECTION,
            name: NaturalLanguageValues::new(),
            content: NaturalLanguageValues::new(),
            summary: NaturalLanguageValues::new(),
            total_items: 0,
            ordered_items: ItemCollection::new(),
        })
    }
}

ordered_view!(Liked);

/// A received liked collection.
///
/// Built by decoding or from an [`OrderedCollection`]; there is no
/// server-side default:
///
/// ```compile_fail
/// let liked = pheme_core::LikedCollection::new();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikedCollection(OrderedCollection);

ordered_view!(LikedCollection);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use std::sync::Arc;

    fn like(n: u32) -> ItemRef {
        Arc::new(Object::new(
            format!("https://example.org/likes/{n}"),
            ActivityVocabularyType::LIKE,
        ))
    }

    #[test]
    fn test_liked_new_defaults() {
        let liked = Liked::new();
        assert_eq!(liked.id().as_str(), "liked");
        assert_eq!(liked.item_type(), ActivityVocabularyType::COLLECTION);
        assert_eq!(liked.total_items(), 0);
        assert!(liked.collection().name.is_empty());
        assert!(liked.collection().content.is_empty());
        assert!(liked.collection().summary.is_empty());
        assert!(liked.is_object());
    }

    #[test]
    fn test_liked_append_counts() {
        let mut liked = Liked::new();
        liked.append(like(1));
        liked.append(like(2));
        assert_eq!(liked.total_items(), 2);
        assert_eq!(liked.count(), 2);
        assert_eq!(
            liked.items().first().map(|i| i.id()),
            Some(ObjectId::new("https://example.org/likes/1"))
        );
    }

    #[test]
    fn test_liked_collection_default_is_zero() {
        let liked = LikedCollection::default();
        assert!(liked.id().is_empty());
        assert!(!liked.is_object());
        assert!(!liked.is_link());
    }

    #[test]
    fn test_views_differ_in_defaults() {
        let server = Liked::new();
        let received = LikedCollection::default();
        assert_ne!(server.id(), received.id());
        assert_ne!(server.item_type(), received.item_type());

        let wrapped = LikedCollection::from(server.clone().into_inner());
        assert_eq!(wrapped.id(), server.id());
        assert_eq!(wrapped.to_value().unwrap(), server.to_value().unwrap());
    }

    #[test]
    fn test_liked_collection_decodes_ordered_items() {
        let liked: LikedCollection = serde_json::from_value(serde_json::json!({
            "id": "https://example.org/alice/liked",
            "type": "OrderedCollection",
            "totalItems": 1,
            "orderedItems": ["https://example.org/notes/9"]
        }))
        .unwrap();
        assert_eq!(liked.total_items(), 1);
        assert!(liked.items().first().map_or(false, |i| i.is::<Iri>()));
    }

    #[test]
    fn test_liked_serializes_as_collection() {
        let mut liked = Liked::new();
        liked.append(Arc::new(Iri::new("https://example.org/notes/1")));
        let value = liked.to_value().unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "liked",
                "type": "Collection",
                "totalItems": 1,
                "orderedItems": ["https://example.org/notes/1"]
            })
        );
    }
}
