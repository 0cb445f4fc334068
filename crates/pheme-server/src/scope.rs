//! Per-request service scope.
//!
//! Handlers look up their storage collaborator here under its concrete type.
//! The scope is passed explicitly to [`Handler::serve`](crate::Handler::serve).
//!
//! # Example
//!
//! ```rust
//! use pheme_server::{MemoryStorage, RequestScope};
//! use std::sync::Arc;
//!
//! let scope = RequestScope::new().with(Arc::new(MemoryStorage::new()));
//!
//! let storage: Option<Arc<MemoryStorage>> = scope.get();
//! assert!(storage.is_some());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::HandlerError;

/// Services available to a single request, keyed by type.
#[derive(Default, Clone)]
pub struct RequestScope {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl RequestScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Adds a service, replacing any previous one of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(mut self, service: Arc<T>) -> Self {
        self.insert(service);
        self
    }

    /// Looks up a service.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| Arc::clone(s).downcast::<T>().ok())
    }

    /// Looks up a service that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::StorageUnavailable`] if it is missing.
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, HandlerError> {
        self.get().ok_or(HandlerError::StorageUnavailable {
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Checks if a service is present.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Number of services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if the scope holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestScope")
            .field("service_count", &self.services.len())
            .finish()
    }
}
