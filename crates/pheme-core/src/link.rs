//! Links and mentions.
//!
//! A [`Link`] is an indirect, qualified reference to a resource identified by
//! its `href`. Properties of a link describe the reference, not the resource.
//! [`Mention`] is a link that represents an @mention; it wraps a [`Link`] and
//! only differs in its type check.

use std::any::Any;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::item::{deserialize_optional_item, Item, ItemRef};
use crate::types::{is_object_type, valid_link_type, ActivityVocabularyType};
use crate::values::{Iri, LangRef, MimeType, NaturalLanguageValues, ObjectId};

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// A qualified reference to a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Identifier.
    #[serde(default, skip_serializing_if = "ObjectId::is_empty")]
    pub id: ObjectId,
    /// Type tag.
    #[serde(rename = "type", default, skip_serializing_if = "ActivityVocabularyType::is_empty")]
    pub kind: ActivityVocabularyType,
    /// Plain-text name; may carry several language-tagged values.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub name: NaturalLanguageValues,
    /// Relation to another link. This points at the related link, it does
    /// not own it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<Arc<Link>>,
    /// Media type of the referenced resource.
    #[serde(default, skip_serializing_if = "MimeType::is_empty")]
    pub media_type: MimeType,
    /// Rendering height hint in device-independent pixels.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: u32,
    /// Rendering width hint in device-independent pixels.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: u32,
    /// An entity that previews the referenced resource.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub preview: Option<ItemRef>,
    /// The target resource.
    #[serde(default, skip_serializing_if = "Iri::is_empty")]
    pub href: Iri,
    /// Language of the target resource.
    #[serde(default, skip_serializing_if = "LangRef::is_empty")]
    pub href_lang: LangRef,
}

impl Link {
    /// Creates a link. A type that is not a valid link type becomes `Link`.
    #[must_use]
    pub fn new(id: impl Into<ObjectId>, kind: ActivityVocabularyType) -> Self {
        let kind = if valid_link_type(&kind) {
            kind
        } else {
            ActivityVocabularyType::LINK
        };
        Self {
            id: id.into(),
            kind,
            ..Self::default()
        }
    }

    /// Creates a plain `Link` pointing at `href`.
    #[must_use]
    pub fn to(href: impl Into<Iri>) -> Self {
        Self {
            kind: ActivityVocabularyType::LINK,
            href: href.into(),
            ..Self::default()
        }
    }
}

impl Item for Link {
    fn id(&self) -> ObjectId {
        self.id.clone()
    }

    fn item_type(&self) -> ActivityVocabularyType {
        self.kind.clone()
    }

    fn is_link(&self) -> bool {
        self.kind == ActivityVocabularyType::LINK || valid_link_type(&self.kind)
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

/// A link representing an @mention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mention(Link);

impl Mention {
    /// Creates a mention with the given id.
    #[must_use]
    pub fn new(id: impl Into<ObjectId>) -> Self {
        Self(Link {
            id: id.into(),
            kind: ActivityVocabularyType::MENTION,
            ..Link::default()
        })
    }

    /// The wrapped link.
    #[must_use]
    pub fn as_link(&self) -> &Link {
        &self.0
    }

    /// Mutable access to the wrapped link.
    pub fn as_link_mut(&mut self) -> &mut Link {
        &mut self.0
    }

    /// Unwraps the link.
    #[must_use]
    pub fn into_link(self) -> Link {
        self.0
    }
}

impl From<Link> for Mention {
    fn from(link: Link) -> Self {
        Self(link)
    }
}

impl Item for Mention {
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
        self.0.kind == ActivityVocabularyType::MENTION || valid_link_type(&self.0.kind)
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
