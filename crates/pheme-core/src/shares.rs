//! The `shares` collection.

use std::any::Any;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::collection::{CollectionInterface, OrderedCollection};
use crate::item::{Item, ItemCollection, ItemRef};
use crate::liked::ordered_view;
use crate::resolver;
use crate::types::ActivityVocabularyType;
use crate::values::{Iri, NaturalLanguageValues, ObjectId};

/// Activities that shared an object, usually `Announce`s.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Shares(OrderedCollection);

/// Alternate name for [`Shares`].
pub type SharesCollection = Shares;

impl Shares {
    /// Creates the default shares collection: id `Shares`, type `Collection`,
    /// zero-length name, content and summary, no items.
    #[must_use]
    pub fn new() -> Self {
        Self(OrderedCollection {
            id: ObjectId::new("Shares"),
            kind: ActivityVocabularyType::COLLECTION,
            name: NaturalLanguageValues::new(),
            content: NaturalLanguageValues::new(),
            summary: NaturalLanguageValues::new(),
            total_items: 0,
            ordered_items: ItemCollection::new(),
        })
    }
}

ordered_view!(Shares);

impl<'de> Deserialize<'de> for Shares {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        resolver::ensure_default();
        OrderedCollection::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Activity;
    use std::sync::Arc;

    #[test]
    fn test_shares_new_defaults() {
        let shares = SharesCollection::new();
        assert_eq!(shares.id().as_str(), "Shares");
        assert_eq!(shares.item_type(), ActivityVocabularyType::COLLECTION);
        assert_eq!(shares.total_items(), 0);
        assert!(shares.items().first().is_none());
    }

    #[test]
    fn test_shares_append() {
        let mut shares = Shares::new();
        for n in 0..4 {
            shares.append(Arc::new(Activity::new(
                format!("https://example.org/announce/{n}"),
                ActivityVocabularyType::ANNOUNCE,
            )));
        }
        assert_eq!(shares.total_items(), 4);
        assert_eq!(shares.count(), 4);
        assert_eq!(shares.items().item_type(), ActivityVocabularyType::ANNOUNCE);
    }

    #[test]
    fn test_shares_decode_resolves_members() {
        let shares: Shares = serde_json::from_str(
            r#"{
                "id": "https://example.org/notes/1/shares",
                "type": "OrderedCollection",
                "totalItems": 1,
                "orderedItems": [
                    {"type": "Announce", "id": "https://example.org/announce/1"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(shares.total_items(), 1);
        let first = shares.items().first().expect("one member");
        assert!(first.is::<Activity>());
        assert_eq!(shares.collection().kind, ActivityVocabularyType::ORDERED_COLLECTION);
    }
}
