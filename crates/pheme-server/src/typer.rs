//! Request classification.
//!
//! Business functions receive the [`CollectionType`] a request addresses so
//! one function can serve several endpoints.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use http::Request;

/// The collection a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionType {
    /// An actor's inbox.
    Inbox,
    /// An actor's outbox.
    Outbox,
    /// Actors followed by an actor.
    Following,
    /// An actor's followers.
    Followers,
    /// Objects an actor has liked.
    Liked,
    /// Likes received by an object.
    Likes,
    /// Shares received by an object.
    Shares,
    /// Replies to an object.
    Replies,
    /// Anything else.
    #[default]
    Unknown,
}

impl CollectionType {
    /// Returns the path segment naming this collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Outbox => "outbox",
            Self::Following => "following",
            Self::Followers => "followers",
            Self::Liked => "liked",
            Self::Likes => "likes",
            Self::Shares => "shares",
            Self::Replies => "replies",
            Self::Unknown => "",
        }
    }

    /// Classifies a single path segment. Unknown segments give [`CollectionType::Unknown`].
    #[must_use]
    pub fn from_segment(segment: &str) -> Self {
        match segment.to_ascii_lowercase().as_str() {
            "inbox" => Self::Inbox,
            "outbox" => Self::Outbox,
            "following" => Self::Following,
            "followers" => Self::Followers,
            "liked" => Self::Liked,
            "likes" => Self::Likes,
            "shares" => Self::Shares,
            "replies" => Self::Replies,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_segment(s))
    }
}

/// Classifies a request into a [`CollectionType`].
pub trait CollectionTyper: Send + Sync {
    /// Returns the collection the request addresses.
    fn classify(&self, req: &Request<Bytes>) -> CollectionType;
}

/// Classifies by the last non-empty path segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTyper;

impl CollectionTyper for PathTyper {
    fn classify(&self, req: &Request<Bytes>) -> CollectionType {
        req.uri()
            .path()
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map_or(CollectionType::Unknown, CollectionType::from_segment)
    }
}
