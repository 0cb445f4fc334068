//! Objects and activities.

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::item::{deserialize_optional_item, Item, ItemRef};
use crate::types::{is_link_type, valid_object_type, ActivityVocabularyType};
use crate::values::{MimeType, NaturalLanguageValues, ObjectId};

/// The base vocabulary object.
///
/// Properties that may hold either a nested entity or a bare IRI are typed as
/// `Option<ItemRef>` and decoded through the process resolver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    /// Identifier.
    #[serde(default, skip_serializing_if = "ObjectId::is_empty")]
    pub id: ObjectId,
    /// Type tag.
    #[serde(rename = "type", default, skip_serializing_if = "ActivityVocabularyType::is_empty")]
    pub kind: ActivityVocabularyType,
    /// Display name.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub name: NaturalLanguageValues,
    /// Summary.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub summary: NaturalLanguageValues,
    /// Content.
    #[serde(default, skip_serializing_if = "NaturalLanguageValues::is_empty")]
    pub content: NaturalLanguageValues,
    /// Media type of `content`.
    #[serde(default, skip_serializing_if = "MimeType::is_empty")]
    pub media_type: MimeType,
    /// Where the object can be viewed.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub url: Option<ItemRef>,
    /// Who the object is attributed to.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub attributed_to: Option<ItemRef>,
    /// What the object replies to.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub in_reply_to: Option<ItemRef>,
    /// Publication time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

impl Object {
    /// Creates an object with an id and type tag.
    #[must_use]
    pub fn new(id: impl Into<ObjectId>, kind: ActivityVocabularyType) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Self::default()
        }
    }
}

impl Item for Object {
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
        valid_object_type(&self.kind)
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An action performed by an actor on an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Activity {
    /// Shared object properties.
    #[serde(flatten)]
    pub base: Object,
    /// Who performed the activity.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub actor: Option<ItemRef>,
    /// What the activity acts on.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub object: Option<ItemRef>,
    /// Indirect target of the activity.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub target: Option<ItemRef>,
}

impl Activity {
    /// Creates an activity with an id and type tag.
    #[must_use]
    pub fn new(id: impl Into<ObjectId>, kind: ActivityVocabularyType) -> Self {
        Self {
            base: Object::new(id, kind),
            ..Self::default()
        }
    }

    /// Sets the actor.
    #[must_use]
    pub fn with_actor(mut self, actor: ItemRef) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Sets the object.
    #[must_use]
    pub fn with_object(mut self, object: ItemRef) -> Self {
        self.object = Some(object);
        self
    }
}

impl Item for Activity {
    fn id(&self) -> ObjectId {
        self.base.id()
    }

    fn item_type(&self) -> ActivityVocabularyType {
        self.base.item_type()
    }

    fn is_link(&self) -> bool {
        self.base.is_link()
    }

    fn is_object(&self) -> bool {
        self.base.is_object()
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Iri;
    use chrono::TimeZone;
    use std::sync::Arc;

    #[test]
    fn test_default_object_is_neither() {
        let obj = Object::default();
        assert!(!obj.is_link());
        assert!(!obj.is_object());
        assert!(obj.link().is_empty());
    }

    #[test]
    fn test_trusts_tag_over_structure() {
        let obj = Object::new("https://example.org/1", ActivityVocabularyType::LINK);
        assert!(obj.is_link());
        assert!(!obj.is_object());

        let person = Object::new("https://example.org/alice", ActivityVocabularyType::PERSON);
        assert!(person.is_object());
        assert_eq!(person.link().as_str(), "https://example.org/alice");
    }

    #[test]
    fn test_object_wire_format() {
        let mut obj = Object::new("https://example.org/notes/1", ActivityVocabularyType::NOTE);
        obj.content = NaturalLanguageValues::single("hello");
        obj.attributed_to = Some(Arc::new(Iri::new("https://example.org/alice")));
        obj.published = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());

        let value = obj.to_value().unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "https://example.org/notes/1",
                "type": "Note",
                "content": "hello",
                "attributedTo": "https://example.org/alice",
                "published": "2024-05-01T12:00:00Z"
            })
        );

        let back: Object = serde_json::from_value(value).unwrap();
        assert_eq!(back.published, obj.published);
        assert!(back
            .attributed_to
            .as_ref()
            .map_or(false, |a| a.is::<Iri>()));
    }

    #[test]
    fn test_activity_flattens_object_fields() {
        let note: ItemRef = Arc::new(Object::new(
            "https://example.org/notes/1",
            ActivityVocabularyType::NOTE,
        ));
        let create = Activity::new("https://example.org/a/1", ActivityVocabularyType::CREATE)
            .with_actor(Arc::new(Iri::new("https://example.org/alice")))
            .with_object(note);

        let value = create.to_value().unwrap();
        assert_eq!(value["type"], "Create");
        assert_eq!(value["actor"], "https://example.org/alice");
        assert_eq!(value["object"]["type"], "Note");

        let back: Activity = serde_json::from_value(value).unwrap();
        assert_eq!(back.item_type(), ActivityVocabularyType::CREATE);
        assert!(back.is_object());
        let object = back.object.expect("object decoded");
        assert_eq!(
            object.downcast_ref::<Object>().map(|o| o.id.as_str()),
            Some("https://example.org/notes/1")
        );
    }
}
