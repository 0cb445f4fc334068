//! End-to-end flow through the facade: bootstrap, then serve an outbox.

use std::sync::Arc;

use bytes::Bytes;
use http::{Request, StatusCode};
use pheme::prelude::*;

const BASE: &str = "http://example.org";

async fn post_outbox(
    typ: CollectionType,
    req: Request<Bytes>,
    storage: Arc<MemoryStorage>,
) -> Result<(Iri, StatusCode), HandlerError> {
    let activity = resolver::from_slice(req.body())?;
    let saved = storage.save(typ, activity).await?;
    let outbox = Iri::new(format!("{BASE}{}", req.uri().path()));
    storage.append_to(&outbox, Arc::new(saved.0.clone()));
    Ok(saved)
}

async fn get_outbox(
    typ: CollectionType,
    req: Request<Bytes>,
    storage: Arc<MemoryStorage>,
) -> Result<Box<dyn CollectionInterface>, HandlerError> {
    let iri = Iri::new(format!("{BASE}{}", req.uri().path()));
    Ok(storage.load_collection(typ, &iri).await?)
}

async fn touch_object(
    req: Request<Bytes>,
    storage: Arc<MemoryStorage>,
) -> Result<ItemRef, HandlerError> {
    let iri = Iri::new(format!("{BASE}{}", req.uri().path()));
    Ok(storage.load(&iri).await?)
}

#[tokio::test]
async fn bootstrap_then_serve_outbox() -> anyhow::Result<()> {
    let mut config = PhemeConfig::development();
    config.handler.content_type = "application/ld+json".to_string();
    let options = pheme::bootstrap(&config)?;

    // The subscriber is process-wide.
    assert!(matches!(
        pheme::bootstrap(&config),
        Err(BootstrapError::Telemetry(_))
    ));

    let storage = Arc::new(MemoryStorage::new());
    storage.insert_collection(OrderedCollection::new(format!("{BASE}/alice/outbox")));
    let scope = RequestScope::new().with(storage.clone());

    let activities = ActivityHandler::new(post_outbox).with_options(options.clone());
    let collections = CollectionHandler::new(get_outbox).with_options(options.clone());
    let items = ItemHandler::new(touch_object).with_options(options);

    let body = serde_json::json!({
        "type": "Create",
        "id": format!("{BASE}/activities/1"),
        "actor": format!("{BASE}/alice"),
        "object": {"type": "Note", "id": format!("{BASE}/notes/1"), "content": "hi"}
    });
    let req = Request::put("/alice/outbox").body(Bytes::from(serde_json::to_vec(&body)?))?;
    let resp = activities.serve(req, &scope).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()["location"], format!("{BASE}/activities/1").as_str());
    assert_eq!(storage.object_count(), 2);

    let req = Request::get("/alice/outbox").body(Bytes::new())?;
    let resp = collections.serve(req, &scope).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/ld+json");
    let doc: serde_json::Value = serde_json::from_slice(resp.body())?;
    assert_eq!(doc["@context"], "https://www.w3.org/ns/activitystreams");
    assert_eq!(doc["totalItems"], 1);

    let req = Request::patch("/notes/1").body(Bytes::new())?;
    let resp = items.serve(req, &scope).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.body().is_empty());

    let req = Request::patch("/notes/2").body(Bytes::new())?;
    let resp = items.serve(req, &scope).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}
