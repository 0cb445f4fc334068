//! Scalar value types shared by the vocabulary variants.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! string_value {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a string value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the value is unset.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_value! {
    /// Globally unique identifier of an object or link.
    ObjectId
}

string_value! {
    /// An Internationalized Resource Identifier.
    ///
    /// An `Iri` is also an [`Item`](crate::Item): wherever the wire format
    /// allows a nested object it also allows a bare IRI string.
    Iri
}

string_value! {
    /// A MIME media type such as `text/html`.
    MimeType
}

string_value! {
    /// A BCP47 language tag. The empty tag means "no language".
    LangRef
}

impl From<ObjectId> for Iri {
    fn from(id: ObjectId) -> Self {
        Self(id.0)
    }
}

impl From<Iri> for ObjectId {
    fn from(iri: Iri) -> Self {
        Self(iri.0)
    }
}

/// A single language-tagged string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LangRefValue {
    /// Language of the value; empty when untagged.
    pub lang: LangRef,
    /// The text.
    pub value: String,
}

/// A natural language value that may carry several translations.
///
/// On the wire a single untagged value collapses to a plain string; anything
/// else is a `{ "<lang>": "<text>" }` map.
///
/// ```
/// use pheme_core::NaturalLanguageValues;
///
/// let mut name = NaturalLanguageValues::new();
/// name.append("", "Alice");
/// assert_eq!(serde_json::to_string(&name).unwrap(), "\"Alice\"");
///
/// name.append("fr", "Alice (fr)");
/// assert_eq!(name.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NaturalLanguageValues(Vec<LangRefValue>);

impl NaturalLanguageValues {
    /// Creates an empty, zero-length value ready for appends.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a value holding one untagged string.
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        let mut values = Self::new();
        values.append(LangRef::default(), value);
        values
    }

    /// Adds a translation. An existing entry for the same language is replaced.
    pub fn append(&mut self, lang: impl Into<LangRef>, value: impl Into<String>) {
        let lang = lang.into();
        let value = value.into();
        match self.0.iter_mut().find(|entry| entry.lang == lang) {
            Some(entry) => entry.value = value,
            None => self.0.push(LangRefValue { lang, value }),
        }
    }

    /// Returns the text for a language.
    #[must_use]
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.lang.as_str() == lang)
            .map(|entry| entry.value.as_str())
    }

    /// Returns the first entry.
    #[must_use]
    pub fn first(&self) -> Option<&LangRefValue> {
        self.0.first()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LangRefValue> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn is_collapsible(&self) -> bool {
        self.0.len() == 1 && self.0[0].lang.is_empty()
    }
}

impl Serialize for NaturalLanguageValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_collapsible() {
            return serializer.serialize_str(&self.0[0].value);
        }
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(entry.lang.as_str(), &entry.value)?;
        }
        map.end()
    }
}

struct NaturalLanguageVisitor;

impl<'de> Visitor<'de> for NaturalLanguageVisitor {
    type Value = NaturalLanguageValues;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a map of language tags to strings")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(NaturalLanguageValues::single(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(NaturalLanguageValues::single(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NaturalLanguageValues::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NaturalLanguageValues::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut values = NaturalLanguageValues::new();
        while let Some((lang, value)) = access.next_entry::<String, String>()? {
            values.append(lang, value);
        }
        Ok(values)
    }
}

impl<'de> Deserialize<'de> for NaturalLanguageValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NaturalLanguageVisitor)
    }
}
