//! # Pheme Core
//!
//! The ActivityStreams object model used throughout Pheme.
//!
//! This crate provides:
//!
//! - [`Item`] - The capability every vocabulary entity implements
//! - [`Object`], [`Activity`], [`Link`], [`Mention`], [`Iri`] - Vocabulary variants
//! - [`ItemCollection`], [`Collection`], [`OrderedCollection`] - Collection family
//! - [`Liked`], [`LikedCollection`], [`Shares`] - Specialized collection views
//! - [`resolver`] - Type tag to constructor lookup used when decoding payloads
//! - [`ContextError`] and [`VocabError`] - Error types
//!
//! # Decoding
//!
//! ```
//! use pheme_core::{resolver, Item, ActivityVocabularyType};
//!
//! let payload = serde_json::json!({
//!     "type": "Note",
//!     "id": "https://example.org/notes/1",
//!     "content": "hello"
//! });
//!
//! let item = resolver::decode_item(payload).unwrap();
//! assert_eq!(item.item_type(), ActivityVocabularyType::NOTE);
//! assert!(item.is_object());
//! ```

#![doc(html_root_url = "https://docs.rs/pheme-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod collection;
mod error;
mod item;
mod liked;
mod link;
mod object;
pub mod resolver;
mod shares;
mod types;
mod values;

pub use collection::{Collection, CollectionInterface, OrderedCollection};
pub use error::{BoxError, ContextError, VocabError, VocabResult};
pub use item::{Item, ItemCollection, ItemRef};
pub use liked::{Liked, LikedCollection};
pub use link::{Link, Mention};
pub use object::{Activity, Object};
pub use resolver::{ResolverTable, TypeResolver};
pub use shares::{Shares, SharesCollection};
pub use types::{
    is_link_type, is_object_type, valid_activity_type, valid_actor_type, valid_collection_type,
    valid_link_type, valid_object_type, ActivityVocabularyType,
};
pub use values::{Iri, LangRef, LangRefValue, MimeType, NaturalLanguageValues, ObjectId};
