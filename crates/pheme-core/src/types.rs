//! Vocabulary type tags.
//!
//! Every payload on the wire carries a `type` member naming which vocabulary
//! variant it represents. [`ActivityVocabularyType`] is that tag; the
//! `valid_*` functions classify a tag against the known vocabulary tables.

use std::borrow::Cow;
use std::fmt;

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A vocabulary type tag such as `"Note"`, `"Create"` or `"Mention"`.
///
/// The zero value is the empty tag, which is neither a link nor an object.
/// On the wire the tag is a string; a `type` array decodes to its first
/// string and encodes back as that single string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActivityVocabularyType(Cow<'static, str>);

impl<'de> Deserialize<'de> for ActivityVocabularyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagVisitor;

        impl<'de> Visitor<'de> for TagVisitor {
            type Value = ActivityVocabularyType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a type tag or a list of type tags")
            }

            fn visit_str<E: de::Error>(self, tag: &str) -> Result<Self::Value, E> {
                Ok(ActivityVocabularyType::new(tag))
            }

            fn visit_string<E: de::Error>(self, tag: String) -> Result<Self::Value, E> {
                Ok(ActivityVocabularyType::new(tag))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let first = seq.next_element::<String>()?.unwrap_or_default();
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(ActivityVocabularyType::new(first))
            }
        }

        deserializer.deserialize_any(TagVisitor)
    }
}

macro_rules! vocabulary_types {
    ($($(#[$doc:meta])* $name:ident => $tag:literal,)*) => {
        impl ActivityVocabularyType {
            $(
                $(#[$doc])*
                pub const $name: Self = Self::from_static($tag);
            )*
        }
    };
}

vocabulary_types! {
    /// `Object`
    OBJECT => "Object",
    /// `Link`
    LINK => "Link",
    /// `Mention`
    MENTION => "Mention",
    /// `Activity`
    ACTIVITY => "Activity",
    /// `IntransitiveActivity`
    INTRANSITIVE_ACTIVITY => "IntransitiveActivity",
    /// `Collection`
    COLLECTION => "Collection",
    /// `OrderedCollection`
    ORDERED_COLLECTION => "OrderedCollection",
    /// `CollectionPage`
    COLLECTION_PAGE => "CollectionPage",
    /// `OrderedCollectionPage`
    ORDERED_COLLECTION_PAGE => "OrderedCollectionPage",
    /// `Article`
    ARTICLE => "Article",
    /// `Document`
    DOCUMENT => "Document",
    /// `Image`
    IMAGE => "Image",
    /// `Note`
    NOTE => "Note",
    /// `Page`
    PAGE => "Page",
    /// `Tombstone`
    TOMBSTONE => "Tombstone",
    /// `Person`
    PERSON => "Person",
    /// `Service`
    SERVICE => "Service",
    /// `Create`
    CREATE => "Create",
    /// `Update`
    UPDATE => "Update",
    /// `Delete`
    DELETE => "Delete",
    /// `Follow`
    FOLLOW => "Follow",
    /// `Like`
    LIKE => "Like",
    /// `Announce`
    ANNOUNCE => "Announce",
    /// `Undo`
    UNDO => "Undo",
}

const LINK_TYPES: &[&str] = &["Mention"];

const OBJECT_TYPES: &[&str] = &[
    "Object",
    "Article",
    "Audio",
    "Document",
    "Event",
    "Image",
    "Note",
    "Page",
    "Place",
    "Profile",
    "Relationship",
    "Tombstone",
    "Video",
];

const ACTOR_TYPES: &[&str] = &["Application", "Group", "Organization", "Person", "Service"];

const ACTIVITY_TYPES: &[&str] = &[
    "Activity",
    "IntransitiveActivity",
    "Accept",
    "Add",
    "Announce",
    "Arrive",
    "Block",
    "Create",
    "Delete",
    "Dislike",
    "Flag",
    "Follow",
    "Ignore",
    "Invite",
    "Join",
    "Leave",
    "Like",
    "Listen",
    "Move",
    "Offer",
    "Question",
    "Read",
    "Reject",
    "Remove",
    "TentativeAccept",
    "TentativeReject",
    "Travel",
    "Undo",
    "Update",
    "View",
];

const COLLECTION_TYPES: &[&str] = &[
    "Collection",
    "OrderedCollection",
    "CollectionPage",
    "OrderedCollectionPage",
];

impl ActivityVocabularyType {
    /// The empty (zero) type tag.
    pub const NONE: Self = Self::from_static("");

    /// Creates a tag from a static string without allocating.
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Creates a tag from any string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the zero tag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ActivityVocabularyType {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for ActivityVocabularyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityVocabularyType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ActivityVocabularyType {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl AsRef<str> for ActivityVocabularyType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

fn listed(table: &[&str], typ: &ActivityVocabularyType) -> bool {
    table.contains(&typ.as_str())
}

/// Returns `true` if `typ` is one of the specialised link types.
///
/// The plain `Link` tag is not in this table; see [`is_link_type`].
#[must_use]
pub fn valid_link_type(typ: &ActivityVocabularyType) -> bool {
    listed(LINK_TYPES, typ)
}

/// Returns `true` if `typ` is an actor type (`Person`, `Service`, ...).
#[must_use]
pub fn valid_actor_type(typ: &ActivityVocabularyType) -> bool {
    listed(ACTOR_TYPES, typ)
}

/// Returns `true` if `typ` is an activity type, intransitive ones included.
#[must_use]
pub fn valid_activity_type(typ: &ActivityVocabularyType) -> bool {
    listed(ACTIVITY_TYPES, typ)
}

/// Returns `true` if `typ` is a collection or collection page type.
#[must_use]
pub fn valid_collection_type(typ: &ActivityVocabularyType) -> bool {
    listed(COLLECTION_TYPES, typ)
}

/// Returns `true` if `typ` names anything object-shaped: plain objects,
/// actors, activities and collections.
#[must_use]
pub fn valid_object_type(typ: &ActivityVocabularyType) -> bool {
    listed(OBJECT_TYPES, typ)
        || valid_actor_type(typ)
        || valid_activity_type(typ)
        || valid_collection_type(typ)
}

/// Link classification by tag: `Link` itself or any specialised link type.
#[must_use]
pub fn is_link_type(typ: &ActivityVocabularyType) -> bool {
    *typ == ActivityVocabularyType::LINK || valid_link_type(typ)
}

/// Object classification by tag: `Object` itself or any object-shaped type.
#[must_use]
pub fn is_object_type(typ: &ActivityVocabularyType) -> bool {
    *typ == ActivityVocabularyType::OBJECT || valid_object_type(typ)
}

/// Every tag the vocabulary knows about, in table order.
pub(crate) fn known_types() -> impl Iterator<Item = ActivityVocabularyType> {
    std::iter::once("Link")
        .chain(LINK_TYPES.iter().copied())
        .chain(OBJECT_TYPES.iter().copied())
        .chain(ACTOR_TYPES.iter().copied())
        .chain(ACTIVITY_TYPES.iter().copied())
        .chain(COLLECTION_TYPES.iter().copied())
        .map(ActivityVocabularyType::from_static)
}
