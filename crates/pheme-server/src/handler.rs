//! Activity, collection and item handlers.
//!
//! Every handler runs the same stages for a request:
//!
//! 1. **Method validation**: rejected methods never reach storage
//! 2. **Storage resolution**: the collaborator is fetched from the
//!    [`RequestScope`] under its concrete type
//! 3. **Invocation**: the business function receives the collaborator
//! 4. **Encoding**: the result or error becomes a [`Response`]
//!
//! | Handler | Accepted methods | Rejection |
//! |---|---|---|
//! | [`ActivityHandler`] | all but `POST` | 406 |
//! | [`CollectionHandler`] | `GET`, `HEAD` | 405 |
//! | [`ItemHandler`] | all but `GET`, `HEAD` | 405 |
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use pheme_core::{resolver, Iri};
//! use pheme_server::{
//!     ActivityHandler, ActivitySaver, CollectionType, Handler, HandlerError, MemoryStorage,
//!     RequestScope,
//! };
//! use std::sync::Arc;
//!
//! async fn outbox(
//!     typ: CollectionType,
//!     req: Request<Bytes>,
//!     storage: Arc<MemoryStorage>,
//! ) -> Result<(Iri, StatusCode), HandlerError> {
//!     let activity = resolver::from_slice(req.body())?;
//!     Ok(storage.save(typ, activity).await?)
//! }
//!
//! # tokio_test::block_on(async {
//! let handler = ActivityHandler::new(outbox);
//! let scope = RequestScope::new().with(Arc::new(MemoryStorage::new()));
//! let req = Request::put("/actors/alice/outbox")
//!     .body(Bytes::from_static(br#"{"type":"Create","id":"https://example.org/a/1"}"#))
//!     .unwrap();
//!
//! let resp = handler.serve(req, &scope).await;
//! assert_eq!(resp.status(), StatusCode::CREATED);
//! assert_eq!(resp.headers()["location"], "https://example.org/a/1");
//! # });
//! ```

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderValue, Method, Request, Response, StatusCode};
use pheme_core::{CollectionInterface, Iri, ItemRef};
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::HandlerError;
use crate::marshal::{JsonLdMarshaller, Marshaller, ACTIVITY_BASE_URI};
use crate::scope::RequestScope;
use crate::storage::{ActivitySaver, CollectionLoader, ObjectLoader};
use crate::typer::{CollectionType, CollectionTyper, PathTyper};

/// Media type of ActivityStreams response bodies.
pub const ACTIVITY_JSON_CONTENT_TYPE: &str = "application/activity+json";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// The three handler flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Receives activities.
    Activity,
    /// Serves collections.
    Collection,
    /// Serves single items.
    Item,
}

impl HandlerKind {
    /// Returns `true` if this handler accepts `method`.
    #[must_use]
    pub fn allows(self, method: &Method) -> bool {
        match self {
            Self::Activity => *method != Method::POST,
            Self::Collection => *method == Method::GET || *method == Method::HEAD,
            Self::Item => *method != Method::GET && *method != Method::HEAD,
        }
    }

    /// Status used when a method is rejected.
    #[must_use]
    pub const fn rejection_status(self) -> StatusCode {
        match self {
            Self::Activity => StatusCode::NOT_ACCEPTABLE,
            Self::Collection | Self::Item => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Collection => "collection",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a request method may proceed.
pub trait MethodValidator {
    /// Validates `method`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::MethodNotAllowed`] if the method is rejected.
    fn validate_method(&self, method: &Method) -> Result<(), HandlerError>;
}

impl MethodValidator for HandlerKind {
    fn validate_method(&self, method: &Method) -> Result<(), HandlerError> {
        if self.allows(method) {
            Ok(())
        } else {
            Err(HandlerError::MethodNotAllowed {
                method: method.clone(),
                status: self.rejection_status(),
            })
        }
    }
}

/// Options shared by all handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOptions {
    /// JSON-LD context IRI written into marshalled bodies.
    pub context: Iri,
    /// `Content-Type` of marshalled bodies.
    pub content_type: String,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            context: Iri::new(ACTIVITY_BASE_URI),
            content_type: ACTIVITY_JSON_CONTENT_TYPE.to_string(),
        }
    }
}

impl HandlerOptions {
    /// Sets the context IRI.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<Iri>) -> Self {
        self.context = context.into();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// An HTTP handler.
pub trait Handler: Send + Sync {
    /// Which flavour of handler this is.
    fn kind(&self) -> HandlerKind;

    /// Serves one request. Never fails: errors are encoded in the response.
    fn serve(
        &self,
        req: Request<Bytes>,
        scope: &RequestScope,
    ) -> impl Future<Output = Response<Bytes>> + Send;
}

/// Collaborators shared by the three handler types.
#[derive(Clone)]
struct Shared {
    options: HandlerOptions,
    typer: Arc<dyn CollectionTyper>,
    marshaller: Arc<dyn Marshaller>,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            options: HandlerOptions::default(),
            typer: Arc::new(PathTyper),
            marshaller: Arc::new(JsonLdMarshaller),
        }
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

macro_rules! builder_methods {
    () => {
        /// Replaces the handler options.
        #[must_use]
        pub fn with_options(mut self, options: HandlerOptions) -> Self {
            self.shared.options = options;
            self
        }

        /// Replaces the request classifier.
        #[must_use]
        pub fn with_typer(mut self, typer: impl CollectionTyper + 'static) -> Self {
            self.shared.typer = Arc::new(typer);
            self
        }

        /// Replaces the body encoder.
        #[must_use]
        pub fn with_marshaller(mut self, marshaller: impl Marshaller + 'static) -> Self {
            self.shared.marshaller = Arc::new(marshaller);
            self
        }

        /// The handler options.
        #[must_use]
        pub fn options(&self) -> &HandlerOptions {
            &self.shared.options
        }
    };
}

fn request_span(kind: HandlerKind, req: &Request<Bytes>) -> tracing::Span {
    info_span!(
        "handler",
        kind = %kind,
        request_id = %Uuid::now_v7(),
        http.method = %req.method(),
        http.path = %req.uri().path(),
    )
}

fn response(status: StatusCode, body: Bytes) -> Response<Bytes> {
    let mut resp = Response::new(body);
    *resp.status_mut() = status;
    resp
}

/// Encodes an error. The body is only written for `GET` requests.
fn error_response(method: &Method, err: &HandlerError) -> Response<Bytes> {
    let status = err.status_code();
    match err {
        HandlerError::MethodNotAllowed { .. } => debug!(error = %err, "method rejected"),
        HandlerError::StorageUnavailable { type_name } => {
            warn!(storage = type_name, "storage missing from request scope");
        }
        HandlerError::Upstream { .. } => error!(error = %err, http.status = status.as_u16(), "request failed"),
    }

    let body = if method == Method::GET {
        Bytes::from(err.to_string())
    } else {
        Bytes::new()
    };
    let mut resp = response(status, body);
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    resp
}

/// Encodes a marshalled body. The body is only written for `GET` requests.
fn document_response(
    method: &Method,
    options: &HandlerOptions,
    body: Bytes,
) -> Result<Response<Bytes>, HandlerError> {
    let content_type = HeaderValue::from_str(&options.content_type).map_err(HandlerError::upstream)?;
    let body = if method == Method::GET { body } else { Bytes::new() };
    let mut resp = response(StatusCode::OK, body);
    resp.headers_mut().insert(CONTENT_TYPE, content_type);
    Ok(resp)
}

/// Encodes the outcome of an activity.
fn activity_response(iri: &Iri, status: StatusCode) -> Result<Response<Bytes>, HandlerError> {
    let body: &'static str = match status {
        StatusCode::CREATED => "CREATED",
        StatusCode::GONE => "DELETED",
        _ => "OK",
    };
    let mut resp = response(status, Bytes::from_static(body.as_bytes()));
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    if status == StatusCode::CREATED {
        let location = HeaderValue::from_str(iri.as_str()).map_err(HandlerError::upstream)?;
        resp.headers_mut().insert(LOCATION, location);
    }
    Ok(resp)
}

fn finish(method: &Method, result: Result<Response<Bytes>, HandlerError>) -> Response<Bytes> {
    match result {
        Ok(resp) => {
            debug!(http.status = resp.status().as_u16(), "request handled");
            resp
        }
        Err(err) => error_response(method, &err),
    }
}

/// Receives activities and saves them through an [`ActivitySaver`].
///
/// The business function returns the activity's IRI and a status: 201 adds a
/// `Location` header and the body `CREATED`, 410 gives `DELETED`, anything
/// else `OK`.
pub struct ActivityHandler<S, F> {
    func: F,
    shared: Shared,
    _storage: PhantomData<fn() -> S>,
}

impl<S, F> ActivityHandler<S, F> {
    /// Wraps a business function.
    pub fn new<Fut>(func: F) -> Self
    where
        S: ActivitySaver,
        F: Fn(CollectionType, Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(Iri, StatusCode), HandlerError>> + Send,
    {
        Self {
            func,
            shared: Shared::default(),
            _storage: PhantomData,
        }
    }

    builder_methods!();
}

impl<S, F, Fut> ActivityHandler<S, F>
where
    S: ActivitySaver,
    F: Fn(CollectionType, Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(Iri, StatusCode), HandlerError>> + Send,
{
    async fn process(
        &self,
        req: Request<Bytes>,
        scope: &RequestScope,
    ) -> Result<Response<Bytes>, HandlerError> {
        HandlerKind::Activity.validate_method(req.method())?;
        let storage = scope.require::<S>()?;
        let typ = self.shared.typer.classify(&req);
        let (iri, status) = (self.func)(typ, req, storage).await?;
        activity_response(&iri, status)
    }
}

impl<S, F, Fut> Handler for ActivityHandler<S, F>
where
    S: ActivitySaver,
    F: Fn(CollectionType, Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(Iri, StatusCode), HandlerError>> + Send,
{
    fn kind(&self) -> HandlerKind {
        HandlerKind::Activity
    }

    async fn serve(&self, req: Request<Bytes>, scope: &RequestScope) -> Response<Bytes> {
        let method = req.method().clone();
        let span = request_span(self.kind(), &req);
        async move { finish(&method, self.process(req, scope).await) }
            .instrument(span)
            .await
    }
}

impl<S, F> fmt::Debug for ActivityHandler<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityHandler")
            .field("storage", &std::any::type_name::<S>())
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}

/// Serves collections loaded through a [`CollectionLoader`].
pub struct CollectionHandler<S, F> {
    func: F,
    shared: Shared,
    _storage: PhantomData<fn() -> S>,
}

impl<S, F> CollectionHandler<S, F> {
    /// Wraps a business function.
    pub fn new<Fut>(func: F) -> Self
    where
        S: CollectionLoader,
        F: Fn(CollectionType, Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Box<dyn CollectionInterface>, HandlerError>> + Send,
    {
        Self {
            func,
            shared: Shared::default(),
            _storage: PhantomData,
        }
    }

    builder_methods!();
}

impl<S, F, Fut> CollectionHandler<S, F>
where
    S: CollectionLoader,
    F: Fn(CollectionType, Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Box<dyn CollectionInterface>, HandlerError>> + Send,
{
    async fn process(
        &self,
        req: Request<Bytes>,
        scope: &RequestScope,
    ) -> Result<Response<Bytes>, HandlerError> {
        let method = req.method().clone();
        HandlerKind::Collection.validate_method(&method)?;
        let storage = scope.require::<S>()?;
        let typ = self.shared.typer.classify(&req);
        let collection = (self.func)(typ, req, storage).await?;
        let body = self
            .shared
            .marshaller
            .marshal(&self.shared.options.context, collection.as_item())?;
        document_response(&method, &self.shared.options, body)
    }
}

impl<S, F, Fut> Handler for CollectionHandler<S, F>
where
    S: CollectionLoader,
    F: Fn(CollectionType, Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Box<dyn CollectionInterface>, HandlerError>> + Send,
{
    fn kind(&self) -> HandlerKind {
        HandlerKind::Collection
    }

    async fn serve(&self, req: Request<Bytes>, scope: &RequestScope) -> Response<Bytes> {
        let method = req.method().clone();
        let span = request_span(self.kind(), &req);
        async move { finish(&method, self.process(req, scope).await) }
            .instrument(span)
            .await
    }
}

impl<S, F> fmt::Debug for CollectionHandler<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionHandler")
            .field("storage", &std::any::type_name::<S>())
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}

/// Serves single items loaded through an [`ObjectLoader`].
pub struct ItemHandler<S, F> {
    func: F,
    shared: Shared,
    _storage: PhantomData<fn() -> S>,
}

impl<S, F> ItemHandler<S, F> {
    /// Wraps a business function.
    pub fn new<Fut>(func: F) -> Self
    where
        S: ObjectLoader,
        F: Fn(Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<ItemRef, HandlerError>> + Send,
    {
        Self {
            func,
            shared: Shared::default(),
            _storage: PhantomData,
        }
    }

    builder_methods!();
}

impl<S, F, Fut> ItemHandler<S, F>
where
    S: ObjectLoader,
    F: Fn(Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ItemRef, HandlerError>> + Send,
{
    async fn process(
        &self,
        req: Request<Bytes>,
        scope: &RequestScope,
    ) -> Result<Response<Bytes>, HandlerError> {
        let method = req.method().clone();
        HandlerKind::Item.validate_method(&method)?;
        let storage = scope.require::<S>()?;
        let item = (self.func)(req, storage).await?;
        let body = self
            .shared
            .marshaller
            .marshal(&self.shared.options.context, item.as_ref())?;
        document_response(&method, &self.shared.options, body)
    }
}

impl<S, F, Fut> Handler for ItemHandler<S, F>
where
    S: ObjectLoader,
    F: Fn(Request<Bytes>, Arc<S>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ItemRef, HandlerError>> + Send,
{
    fn kind(&self) -> HandlerKind {
        HandlerKind::Item
    }

    async fn serve(&self, req: Request<Bytes>, scope: &RequestScope) -> Response<Bytes> {
        let method = req.method().clone();
        let span = request_span(self.kind(), &req);
        async move { finish(&method, self.process(req, scope).await) }
            .instrument(span)
            .await
    }
}

impl<S, F> fmt::Debug for ItemHandler<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemHandler")
            .field("storage", &std::any::type_name::<S>())
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}
