//! Collection engine.
//!
//! [`Collection`] and [`OrderedCollection`] hold their members in an
//! [`ItemCollection`] next to an authoritative `totalItems` counter. Every
//! collection-shaped variant mutates through [`append_counted`], so after each
//! append `items.len() == total_items` holds. Mutating the fields directly
//! bypasses that bookkeeping and is the caller's responsibility.

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::item::{Item, ItemCollection, ItemRef};
use crate::types::{is_link_type, is_object_type, ActivityVocabularyType};
use crate::values::{NaturalLanguageValues, ObjectId};

/// Capability shared by every collection-shaped item.
pub trait CollectionInterface: Item {
    /// Appends an item and bumps the total count by one.
    ///
    /// Never deduplicates and never checks the item's type.
    fn append(&mut self, item: ItemRef);

    /// The member items.
    fn items(&self) -> &ItemCollection;

    /// The authoritative item count.
    fn total_items(&self) -> u64;

    /// Returns this collection as a plain item.
    fn as_item(&self) -> &dyn Item;

    /// Number of members actually held.
    fn count(&self) -> usize {
        self.items().len()
    }
}

/// Appends `item` to `items` and increments `total_items`.
pub fn append_counted(items: &mut ItemCollection, total_items: &mut u64, item: ItemRef) {
    items.append(item);
    *total_items += 1;
}

/// An unordered collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Identifier.
    #[serde(default, skip_serializing_if = "ObjectId::is_empty")]
    pub id: ObjectId,
    /// Type tag.
    #[serde(rename = "type", default, skip_serializing_if = "ActivityVocabularyType::is_empty")]
    pub kind: ActivityVocabularyType,
    /// Display name.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub name: NaturalLanguageValues,
    /// Content.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub content: NaturalLanguageValues,
    /// Summary.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub summary: NaturalLanguageValues,
    /// Authoritative member count.
    #[serde(default)]
    pub total_items: u64,
    /// Members.
    #[serde(default, skip_serializing_if = "ItemCollection::is_empty")]
    pub items: ItemCollection,
}

impl Collection {
    /// Creates an empty `Collection` with the given id.
    #[must_use]
    pub fn new(id: impl Into<ObjectId>) -> Self {
        Self {
            id: id.into(),
            kind: ActivityVocabularyType::COLLECTION,
            ..Self::default()
        }
    }
}

/// An ordered collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedCollection {
    /// Identifier.
    #[serde(default, skip_serializing_if = "ObjectId::is_empty")]
    pub id: ObjectId,
    /// Type tag.
    #[serde(rename = "type", default, skip_serializing_if = "ActivityVocabularyType::is_empty")]
    pub kind: ActivityVocabularyType,
    /// Display name.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub name: NaturalLanguageValues,
    /// Content.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub content: NaturalLanguageValues,
    /// Summary.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub summary: NaturalLanguageValues,
    /// Authoritative member count.
    #[serde(default)]
    pub total_items: u64,
    /// Members, in order.
    #[serde(default, skip_serializing_if = "ItemCollection::is_empty")]
    pub ordered_items: ItemCollection,
}

impl OrderedCollection {
    /// Creates an empty `OrderedCollection` with the given id.
    #[must_use]
    pub fn new(id: impl Into<ObjectId>) -> Self {
        Self {
            id: id.into(),
            kind: ActivityVocabularyType::ORDERED_COLLECTION,
            ..Self::default()
        }
    }
}

macro_rules! impl_collection {
    ($ty:ty, $items:ident) => {
        impl Item for $ty {
            fn id(&self) -> ObjectId {
                self.id.clone()
            }

            fn item_type(&self) -> ActivityVocabularyType {
                self.kind.clone()
            }

            fn is_link(&self) -> bool {
                is_link_type(&self.kind)
            }

            fn is_object(&self) -> bool {
                is_object_type(&self.kind)
            }

            fn to_value(&self) -> Result<Value, serde_json::Error> {
                serde_json::to_value(self)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl CollectionInterface for $ty {
            fn append(&mut self, item: ItemRef) {
                append_counted(&mut self.$items, &mut self.total_items, item);
            }

            fn items(&self) -> &ItemCollection {
                &self.$items
            }

            fn total_items(&self) -> u64 {
                self.total_items
            }

            fn as_item(&self) -> &dyn Item {
                self
            }
        }
    };
}

impl_collection!(Collection, items);
impl_collection!(OrderedCollection, ordered_items);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use crate::values::Iri;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn item(n: usize) -> ItemRef {
        Arc::new(Object::new(
            format!("https://example.org/objects/{n}"),
            ActivityVocabularyType::NOTE,
        ))
    }

    #[test]
    fn test_collection_new() {
        let c = Collection::new("https://example.org/c");
        assert_eq!(c.item_type(), ActivityVocabularyType::COLLECTION);
        assert_eq!(c.total_items(), 0);
        assert!(c.is_object());
        assert!(!c.is_link());
    }

    #[test]
    fn test_zero_valued_collection_is_neither() {
        let c = OrderedCollection::default();
        assert!(!c.is_object());
        assert!(!c.is_link());
        assert!(c.id().is_empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let mut c = OrderedCollection::new("https://example.org/outbox");
        c.append(item(1));
        c.append(Arc::new(Iri::new("https://example.org/x")));
        assert_eq!(c.total_items, 2);
        assert_eq!(c.ordered_items.get(0).map(|i| i.id()), Some(item(1).id()));
        assert!(c.ordered_items.get(1).map_or(false, |i| i.is_link()));
    }

    #[test]
    fn test_serializes_total_items() {
        let mut c = OrderedCollection::new("https://example.org/outbox");
        for n in 0..3 {
            c.append(item(n));
        }
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"totalItems\":3"));
        assert!(json.contains("\"orderedItems\""));
        assert!(json.contains("\"type\":\"OrderedCollection\""));
    }

    #[test]
    fn test_decodes_nested_items() {
        let c: Collection = serde_json::from_value(serde_json::json!({
            "id": "https://example.org/c",
            "type": "Collection",
            "totalItems": 2,
            "items": [
                { "type": "Note", "id": "https://example.org/n/1" },
                { "type": "Link", "href": "https://example.org/l" }
            ]
        }))
        .unwrap();
        assert_eq!(c.count(), 2);
        assert_eq!(c.total_items(), 2);
        assert!(c.items.get(1).map_or(false, |i| i.is_link()));
    }

    proptest! {
        #[test]
        fn prop_count_matches_total_after_appends(n in 0usize..64) {
            let mut ordered = OrderedCollection::new("https://example.org/o");
            let mut unordered = Collection::new("https://example.org/u");
            let mut plain = ItemCollection::new();
            for i in 0..n {
                ordered.append(item(i));
                unordered.append(item(i));
                CollectionInterface::append(&mut plain, item(i));
            }
            prop_assert_eq!(ordered.count() as u64, ordered.total_items());
            prop_assert_eq!(unordered.count() as u64, unordered.total_items());
            prop_assert_eq!(ordered.total_items(), n as u64);
            prop_assert_eq!(unordered.total_items(), n as u64);
            prop_assert_eq!(plain.total_items(), n as u64);
        }
    }
}
