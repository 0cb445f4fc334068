//! The [`Item`] capability and the [`ItemCollection`] list type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::de::Error as _;
use serde::ser::{Error as _, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::collection::CollectionInterface;
use crate::resolver;
use crate::types::ActivityVocabularyType;
use crate::values::{Iri, ObjectId};

/// The capability every vocabulary entity implements.
///
/// All methods are pure and must not panic on a default-constructed value.
/// A zero type tag reports neither [`is_link`](Item::is_link) nor
/// [`is_object`](Item::is_object), except on a bare [`Iri`]: it has no tag
/// and is a link whenever it is non-empty.
pub trait Item: fmt::Debug + Send + Sync + 'static {
    /// The item's identifier; empty when unset.
    fn id(&self) -> ObjectId;

    /// The IRI that refers to this item.
    fn link(&self) -> Iri {
        Iri::from(self.id())
    }

    /// The vocabulary type tag.
    fn item_type(&self) -> ActivityVocabularyType;

    /// Whether the type tag classifies this item as a link.
    fn is_link(&self) -> bool;

    /// Whether the type tag classifies this item as an object.
    fn is_object(&self) -> bool;

    /// Encodes the item into the tagged JSON wire format.
    fn to_value(&self) -> Result<Value, serde_json::Error>;

    /// Upcast used by [`downcast_ref`](trait.Item.html#method.downcast_ref).
    fn as_any(&self) -> &dyn Any;
}

/// A shared, type-erased vocabulary item.
pub type ItemRef = Arc<dyn Item>;

impl dyn Item {
    /// Returns the concrete variant if the item is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Item>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns `true` if the item is a `T`.
    #[must_use]
    pub fn is<T: Item>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Serialize for dyn Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// `deserialize_with` helper for optional polymorphic fields.
pub(crate) fn deserialize_optional_item<'de, D>(deserializer: D) -> Result<Option<ItemRef>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => resolver::decode_item(value)
            .map(Some)
            .map_err(D::Error::custom),
    }
}

impl Item for Iri {
    fn id(&self) -> ObjectId {
        ObjectId::new(self.as_str())
    }

    fn link(&self) -> Iri {
        self.clone()
    }

    fn item_type(&self) -> ActivityVocabularyType {
        ActivityVocabularyType::NONE
    }

    fn is_link(&self) -> bool {
        !self.is_empty()
    }

    fn is_object(&self) -> bool {
        false
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        Ok(Value::String(self.as_str().to_string()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An ordered list of items with no uniqueness constraint.
///
/// The backing slice is shared between clones and replaced on every
/// [`append`](ItemCollection::append): a clone taken before an append keeps
/// observing the old contents.
///
/// ```
/// use pheme_core::{Iri, ItemCollection};
/// use std::sync::Arc;
///
/// let mut items = ItemCollection::new();
/// let before = items.clone();
/// items.append(Arc::new(Iri::new("https://example.org/1")));
///
/// assert_eq!(items.len(), 1);
/// assert_eq!(before.len(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ItemCollection {
    items: Arc<[ItemRef]>,
}

impl ItemCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }

    /// Appends an item by copying the backing slice and replacing it.
    pub fn append(&mut self, item: ItemRef) {
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.extend(self.items.iter().cloned());
        next.push(item);
        self.items = Arc::from(next);
    }

    /// Returns the first item, or `None` when the collection is empty.
    #[must_use]
    pub fn first(&self) -> Option<&ItemRef> {
        self.items.first()
    }

    /// Returns the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemRef> {
        self.items.get(index)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemRef> {
        self.items.iter()
    }

    /// Returns the items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ItemRef] {
        &self.items
    }

    /// Returns `true` if both collections share the same backing slice.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl Default for ItemCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<ItemRef>> for ItemCollection {
    fn from(items: Vec<ItemRef>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }
}

impl FromIterator<ItemRef> for ItemCollection {
    fn from_iter<I: IntoIterator<Item = ItemRef>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a ItemRef;
    type IntoIter = std::slice::Iter<'a, ItemRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Item for ItemCollection {
    fn id(&self) -> ObjectId {
        ObjectId::default()
    }

    fn link(&self) -> Iri {
        Iri::default()
    }

    fn item_type(&self) -> ActivityVocabularyType {
        self.first()
            .map(|item| item.item_type())
            .unwrap_or_default()
    }

    fn is_link(&self) -> bool {
        false
    }

    fn is_object(&self) -> bool {
        false
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        self.items
            .iter()
            .map(|item| item.to_value())
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl CollectionInterface for ItemCollection {
    fn append(&mut self, item: ItemRef) {
        ItemCollection::append(self, item);
    }

    fn items(&self) -> &ItemCollection {
        self
    }

    fn total_items(&self) -> u64 {
        self.items.len() as u64
    }

    fn as_item(&self) -> &dyn Item {
        self
    }
}

impl Serialize for ItemCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in self.items.iter() {
            seq.serialize_element(item.as_ref())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ItemCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Value>::deserialize(deserializer)?
            .into_iter()
            .map(resolver::decode_item)
            .collect::<Result<ItemCollection, _>>()
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    fn note(id: &str) -> ItemRef {
        Arc::new(Object::new(id, ActivityVocabularyType::NOTE))
    }

    #[test]
    fn test_empty_collection_first_is_none() {
        let items = ItemCollection::new();
        assert!(items.first().is_none());
        assert!(items.is_empty());
    }

    #[test]
    fn test_empty_collection_type_matches_first() {
        let items = ItemCollection::default();
        let first_type = items
            .first()
            .map(|item| item.item_type())
            .unwrap_or_default();
        assert_eq!(items.item_type(), first_type);
        assert!(items.item_type().is_empty());
        assert!(!items.is_link());
        assert!(!items.is_object());
    }

    #[test]
    fn test_type_is_first_element_type() {
        let mut items = ItemCollection::new();
        items.append(note("https://example.org/1"));
        items.append(Arc::new(Iri::new("https://example.org/2")));
        assert_eq!(items.item_type(), ActivityVocabularyType::NOTE);
    }

    #[test]
    fn test_append_is_copy_on_write() {
        let mut items = ItemCollection::new();
        items.append(note("https://example.org/1"));

        let alias = items.clone();
        assert!(alias.shares_storage_with(&items));

        items.append(note("https://example.org/2"));
        assert_eq!(alias.len(), 1);
        assert_eq!(items.len(), 2);
        assert!(!alias.shares_storage_with(&items));
    }

    #[test]
    fn test_append_does_not_deduplicate() {
        let item = note("https://example.org/1");
        let mut items = ItemCollection::new();
        items.append(item.clone());
        items.append(item);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_iri_item() {
        let iri = Iri::new("https://example.org/actor");
        assert!(iri.item_type().is_empty());
        assert!(iri.is_link());
        assert!(!iri.is_object());
        assert_eq!(iri.link(), iri);
        assert!(!Iri::default().is_link());
    }

    #[test]
    fn test_downcast() {
        let item = note("https://example.org/1");
        assert!(item.is::<Object>());
        assert!(item.downcast_ref::<Iri>().is_none());
        assert_eq!(
            item.downcast_ref::<Object>().map(|o| o.id.as_str()),
            Some("https://example.org/1")
        );
    }

    #[test]
    fn test_serialize_mixed_items() {
        let mut items = ItemCollection::new();
        items.append(note("https://example.org/1"));
        items.append(Arc::new(Iri::new("https://example.org/2")));

        let value = serde_json::to_value(&items).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "id": "https://example.org/1", "type": "Note" },
                "https://example.org/2"
            ])
        );
    }

    #[test]
    fn test_deserialize_resolves_each_element() {
        let items: ItemCollection = serde_json::from_value(serde_json::json!([
            { "id": "https://example.org/1", "type": "Mention" },
            "https://example.org/2"
        ]))
        .unwrap();

        assert_eq!(items.len(), 2);
        assert!(items.get(0).map_or(false, |i| i.is_link()));
        assert!(items.get(1).map_or(false, |i| i.is::<Iri>()));
    }
}
