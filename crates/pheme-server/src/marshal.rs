//! Response body encoding.

use bytes::Bytes;
use pheme_core::{Item, Iri};
use serde_json::Value;
use thiserror::Error;

/// The JSON-LD context every response is marshalled against by default.
pub const ACTIVITY_BASE_URI: &str = "https://www.w3.org/ns/activitystreams";

/// Errors raised while encoding a response body.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// The item could not be encoded as JSON.
    #[error("unable to marshal item: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Encodes an item together with a JSON-LD context IRI.
pub trait Marshaller: Send + Sync {
    /// Encodes `item` for a response body.
    fn marshal(&self, context: &Iri, item: &dyn Item) -> Result<Bytes, MarshalError>;
}

/// Writes the item's JSON with a top-level `@context` member.
///
/// Bare IRIs and item lists have no member to attach the context to and are
/// written as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdMarshaller;

impl Marshaller for JsonLdMarshaller {
    fn marshal(&self, context: &Iri, item: &dyn Item) -> Result<Bytes, MarshalError> {
        let mut value = item.to_value()?;
        if let Value::Object(map) = &mut value {
            if !context.is_empty() {
                map.insert("@context".to_string(), Value::String(context.to_string()));
            }
        }
        Ok(Bytes::from(serde_json::to_vec(&value)?))
    }
}
