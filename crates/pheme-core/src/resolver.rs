//! Type tag resolution.
//!
//! Decoding a polymorphic field first reads the payload's `type` member and
//! then asks a [`TypeResolver`] which constructor builds that variant. The
//! process-wide resolver is installed lazily on first use and can be replaced
//! with [`install`]; callers that prefer explicit plumbing use
//! [`decode_item_with`].
//!
//! # Example
//!
//! ```
//! use pheme_core::resolver::{self, ResolverTable};
//! use pheme_core::{ActivityVocabularyType, Object};
//!
//! let table = ResolverTable::with_defaults()
//!     .register("Emoji", resolver::decode_as::<Object>);
//!
//! let item = resolver::decode_item_with(
//!     &table,
//!     serde_json::json!({"type": "Emoji", "id": "https://example.org/e/1"}),
//! )
//! .unwrap();
//! assert_eq!(item.item_type(), ActivityVocabularyType::new("Emoji"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::collection::{Collection, OrderedCollection};
use crate::error::{VocabError, VocabResult};
use crate::item::{Item, ItemCollection, ItemRef};
use crate::link::{Link, Mention};
use crate::object::{Activity, Object};
use crate::types::{
    known_types, valid_activity_type, valid_link_type, ActivityVocabularyType,
};
use crate::values::Iri;

/// Builds a concrete item from a tagged JSON payload.
pub type ItemConstructor = fn(Value) -> VocabResult<ItemRef>;

/// Maps a type tag to the constructor that decodes it.
pub trait TypeResolver: Send + Sync {
    /// Returns the constructor for `tag`, or `None` when the tag is unknown.
    fn resolve(&self, tag: &ActivityVocabularyType) -> Option<ItemConstructor>;
}

/// Decodes `value` as a `T` and erases it into an [`ItemRef`].
///
/// # Errors
///
/// Returns [`VocabError::Json`] if the payload does not match `T`'s shape.
pub fn decode_as<T>(value: Value) -> VocabResult<ItemRef>
where
    T: Item + DeserializeOwned,
{
    let item: T = serde_json::from_value(value)?;
    Ok(Arc::new(item))
}

/// A table-backed [`TypeResolver`].
#[derive(Clone, Default)]
pub struct ResolverTable {
    entries: HashMap<ActivityVocabularyType, ItemConstructor>,
    fallback: Option<ItemConstructor>,
}

impl ResolverTable {
    /// Creates an empty table that resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table covering every known vocabulary type.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for tag in known_types() {
            let ctor = default_constructor(&tag);
            table.insert(tag, ctor);
        }
        table
    }

    /// Registers a constructor for a tag, replacing any previous one.
    #[must_use]
    pub fn register(mut self, tag: impl Into<ActivityVocabularyType>, ctor: ItemConstructor) -> Self {
        self.insert(tag, ctor);
        self
    }

    /// Registers a constructor for a tag in place.
    pub fn insert(&mut self, tag: impl Into<ActivityVocabularyType>, ctor: ItemConstructor) {
        self.entries.insert(tag.into(), ctor);
    }

    /// Sets a catch-all constructor for unknown tags.
    #[must_use]
    pub fn fallback(mut self, ctor: ItemConstructor) -> Self {
        self.fallback = Some(ctor);
        self
    }

    /// Returns `true` if `tag` has an explicit entry.
    #[must_use]
    pub fn contains(&self, tag: &ActivityVocabularyType) -> bool {
        self.entries.contains_key(tag)
    }

    /// Number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no explicit entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ResolverTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.entries.keys().map(ActivityVocabularyType::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("ResolverTable")
            .field("tags", &tags)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl TypeResolver for ResolverTable {
    fn resolve(&self, tag: &ActivityVocabularyType) -> Option<ItemConstructor> {
        self.entries.get(tag).copied().or(self.fallback)
    }
}

fn default_constructor(tag: &ActivityVocabularyType) -> ItemConstructor {
    match tag.as_str() {
        "Link" => decode_as::<Link>,
        "Mention" => decode_as::<Mention>,
        "Collection" | "CollectionPage" => decode_collection,
        "OrderedCollection" | "OrderedCollectionPage" => decode_as::<OrderedCollection>,
        _ if valid_activity_type(tag) => decode_as::<Activity>,
        _ if valid_link_type(tag) => decode_as::<Link>,
        _ => decode_as::<Object>,
    }
}

/// Decodes a `Collection`-tagged payload.
///
/// Views such as `liked` and `shares` keep the `Collection` tag over an
/// ordered body, so `orderedItems` selects [`OrderedCollection`].
fn decode_collection(value: Value) -> VocabResult<ItemRef> {
    if value.get("orderedItems").is_some() {
        decode_as::<OrderedCollection>(value)
    } else {
        decode_as::<Collection>(value)
    }
}

type SharedResolver = Arc<dyn TypeResolver>;

static PROCESS_RESOLVER: OnceLock<RwLock<SharedResolver>> = OnceLock::new();

fn slot() -> &'static RwLock<SharedResolver> {
    PROCESS_RESOLVER.get_or_init(|| RwLock::new(Arc::new(ResolverTable::with_defaults())))
}

/// Installs the default resolver if none is installed yet.
///
/// Idempotent and safe to call from any thread.
pub fn ensure_default() {
    let _ = slot();
}

/// Replaces the process resolver.
pub fn install(resolver: impl TypeResolver + 'static) {
    *slot().write() = Arc::new(resolver);
}

/// Restores the default resolver.
pub fn reset() {
    install(ResolverTable::with_defaults());
}

/// The resolver currently installed for the process.
#[must_use]
pub fn current() -> Arc<dyn TypeResolver> {
    Arc::clone(&slot().read())
}

fn type_tag(object: &serde_json::Map<String, Value>) -> VocabResult<ActivityVocabularyType> {
    match object.get("type") {
        Some(Value::String(tag)) => Ok(ActivityVocabularyType::new(tag.as_str())),
        Some(Value::Array(tags)) => match tags.first() {
            Some(Value::String(tag)) => Ok(ActivityVocabularyType::new(tag.as_str())),
            _ => Err(VocabError::MissingType),
        },
        _ => Err(VocabError::MissingType),
    }
}

/// Decodes a polymorphic payload with an explicit resolver.
///
/// A JSON string becomes an [`Iri`], an array becomes an [`ItemCollection`]
/// and an object is dispatched on its `type` tag.
///
/// # Errors
///
/// - [`VocabError::MissingType`] if an object has no string `type`
/// - [`VocabError::UnknownType`] if the resolver has no constructor for it
/// - [`VocabError::InvalidPayload`] for numbers, booleans and null
/// - [`VocabError::Json`] if the payload does not fit the resolved variant
pub fn decode_item_with(resolver: &dyn TypeResolver, value: Value) -> VocabResult<ItemRef> {
    match value {
        Value::String(iri) => Ok(Arc::new(Iri::new(iri))),
        Value::Array(values) => values
            .into_iter()
            .map(|value| decode_item_with(resolver, value))
            .collect::<VocabResult<ItemCollection>>()
            .map(|items| Arc::new(items) as ItemRef),
        Value::Object(object) => {
            let tag = type_tag(&object)?;
            let ctor = resolver
                .resolve(&tag)
                .ok_or_else(|| VocabError::unknown_type(tag))?;
            ctor(Value::Object(object))
        }
        _ => Err(VocabError::InvalidPayload {
            expected: "an IRI string, an array or a typed object",
        }),
    }
}

/// Decodes a polymorphic payload with the process resolver.
///
/// # Errors
///
/// See [`decode_item_with`].
pub fn decode_item(value: Value) -> VocabResult<ItemRef> {
    let resolver = current();
    decode_item_with(resolver.as_ref(), value)
}

/// Parses JSON bytes and decodes them with the process resolver.
///
/// # Errors
///
/// Returns [`VocabError::Json`] for malformed JSON, otherwise see
/// [`decode_item_with`].
pub fn from_slice(bytes: &[u8]) -> VocabResult<ItemRef> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_item(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionInterface;
    use crate::liked::Liked;
    use crate::shares::Shares;
    use crate::types::valid_collection_type;
    use serde_json::json;

    fn defaults() -> ResolverTable {
        ResolverTable::with_defaults()
    }

    #[test]
    fn test_defaults_cover_known_types() {
        let table = defaults();
        for tag in known_types() {
            assert!(table.contains(&tag), "{tag} missing");
        }
        assert!(!table.contains(&ActivityVocabularyType::new("Banana")));
    }

    #[test]
    fn test_decodes_by_tag() {
        let table = defaults();
        let cases = [
            (json!({"type": "Note", "id": "urn:1"}), true, false),
            (json!({"type": "Person", "id": "urn:2"}), true, false),
            (json!({"type": "Link", "href": "urn:3"}), false, true),
            (json!({"type": "Mention", "href": "urn:4"}), false, true),
        ];
        for (payload, object, link) in cases {
            let item = decode_item_with(&table, payload).unwrap();
            assert_eq!(item.is_object(), object, "{:?}", item.item_type());
            assert_eq!(item.is_link(), link, "{:?}", item.item_type());
        }
    }

    #[test]
    fn test_activity_and_collection_variants() {
        let table = defaults();

        let create = decode_item_with(&table, json!({"type": "Create", "actor": "urn:alice"})).unwrap();
        assert!(create.is::<Activity>());

        let mention = decode_item_with(&table, json!({"type": "Mention"})).unwrap();
        assert!(mention.is::<Mention>());

        let page = decode_item_with(
            &table,
            json!({"type": "OrderedCollectionPage", "totalItems": 1, "orderedItems": ["urn:x"]}),
        )
        .unwrap();
        let page = page
            .downcast_ref::<OrderedCollection>()
            .expect("ordered collection");
        assert_eq!(page.total_items(), 1);
    }

    #[test]
    fn test_unknown_tag_fails() {
        let err = decode_item_with(&defaults(), json!({"type": "Banana"})).unwrap_err();
        assert!(err.is_unknown_type());
        assert!(err.to_string().contains("Banana"));
    }

    #[test]
    fn test_fallback_accepts_unknown_tag() {
        let table = defaults().fallback(decode_as::<Object>);
        let item = decode_item_with(&table, json!({"type": "Banana", "id": "urn:b"})).unwrap();
        assert_eq!(item.item_type().as_str(), "Banana");
        assert!(!item.is_object());
    }

    #[test]
    fn test_missing_type() {
        let err = decode_item_with(&defaults(), json!({"id": "urn:1"})).unwrap_err();
        assert!(matches!(err, VocabError::MissingType));
    }

    #[test]
    fn test_type_array_uses_first_tag() {
        let item = decode_item_with(&defaults(), json!({"type": ["Note", "Extra"]})).unwrap();
        assert_eq!(item.item_type(), ActivityVocabularyType::NOTE);
        assert!(item.is::<Object>());
        assert_eq!(item.to_value().unwrap(), json!({"type": "Note"}));

        let create = decode_item_with(
            &defaults(),
            json!({"type": ["Create"], "object": {"type": ["Note"], "id": "urn:n"}}),
        )
        .unwrap();
        let object = create
            .downcast_ref::<Activity>()
            .and_then(|a| a.object.clone())
            .expect("embedded object");
        assert_eq!(object.item_type(), ActivityVocabularyType::NOTE);
    }

    #[test]
    fn test_every_known_tag_round_trips() {
        let table = defaults();
        for tag in known_types() {
            let mut payload = json!({
                "id": format!("https://example.org/{tag}"),
                "type": tag.as_str(),
                "name": "sample"
            });
            if valid_collection_type(&tag) {
                let members = if tag.as_str().starts_with("Ordered") {
                    "orderedItems"
                } else {
                    "items"
                };
                payload["totalItems"] = json!(1);
                payload[members] = json!(["https://example.org/notes/1"]);
            }

            let item = decode_item_with(&table, payload.clone())
                .unwrap_or_else(|e| panic!("{tag}: {e}"));
            assert_eq!(item.item_type(), tag);
            assert_eq!(item.to_value().unwrap(), payload, "{tag}");
        }
    }

    #[test]
    fn test_liked_and_shares_keep_members_through_decode() {
        let mut liked = Liked::new();
        liked.append(Arc::new(Iri::new("https://example.org/notes/1")));
        let mut shares = Shares::new();
        shares.append(Arc::new(Activity::new(
            "https://example.org/announce/1",
            ActivityVocabularyType::ANNOUNCE,
        )));
        shares.append(Arc::new(Iri::new("https://example.org/announce/2")));

        for wire in [liked.to_value().unwrap(), shares.to_value().unwrap()] {
            let item = decode_item_with(&defaults(), wire.clone()).unwrap();
            assert_eq!(item.item_type(), ActivityVocabularyType::COLLECTION);

            let ordered = item
                .downcast_ref::<OrderedCollection>()
                .expect("ordered body");
            assert_eq!(u64::try_from(ordered.count()).unwrap(), ordered.total_items());
            assert_eq!(item.to_value().unwrap(), wire);
        }
    }

    #[test]
    fn test_plain_collection_still_decodes_unordered() {
        let item = decode_item_with(
            &defaults(),
            json!({"type": "Collection", "totalItems": 1, "items": ["urn:x"]}),
        )
        .unwrap();
        let collection = item.downcast_ref::<Collection>().expect("unordered body");
        assert_eq!(collection.count(), 1);
    }

    #[test]
    fn test_string_and_array_payloads() {
        let table = defaults();
        let iri = decode_item_with(&table, json!("https://example.org/1")).unwrap();
        assert!(iri.is::<Iri>());
        assert!(iri.is_link());

        let list = decode_item_with(&table, json!(["urn:1", {"type": "Note"}])).unwrap();
        let list = list.downcast_ref::<ItemCollection>().expect("item collection");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_scalar_payload_is_invalid() {
        let err = decode_item_with(&defaults(), json!(42)).unwrap_err();
        assert!(matches!(err, VocabError::InvalidPayload { .. }));
    }

    #[test]
    fn test_empty_table_resolves_nothing() {
        let table = ResolverTable::new();
        assert!(table.is_empty());
        assert!(decode_item_with(&table, json!({"type": "Note"}))
            .unwrap_err()
            .is_unknown_type());
    }

    #[test]
    fn test_from_slice_with_default_resolver() {
        let item = from_slice(br#"{"type":"Article","id":"urn:a"}"#).unwrap();
        assert_eq!(item.item_type(), ActivityVocabularyType::ARTICLE);
        assert!(from_slice(b"{not json").is_err());
    }
}
