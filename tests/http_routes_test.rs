//! HTTP surface over a loaded data folder, including reloads between requests.

#![cfg(feature = "http-server")]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dujour::datasource::{Registry, load_all};
use dujour::logging::{RecordingReporter, Reporter};
use dujour::query::Datasources;
use dujour::server::router;
use dujour::watcher::{ChangeEvent, ReloadHandler};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_routes_over_folder() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Users.csv"), "id,email\n1,a@x\n2,b@x\n").unwrap();
    fs::write(
        dir.path().join("orders.json"),
        r#"[{"id": 10, "total": 9.5}, {"id": "ten", "total": 1}]"#,
    )
    .unwrap();

    let registry = Arc::new(Registry::new());
    let reporter: Arc<dyn Reporter> = Arc::new(RecordingReporter::new());
    load_all(dir.path(), &registry, &reporter).unwrap();
    let app = router(Datasources::new(registry));

    let (status, list) = get(&app, "/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, users) = get(&app, "/Users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users[1]["email"], "b@x");

    let (status, order) = get(&app, "/orders/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total"], 9.5);

    let (status, order) = get(&app, "/orders/ten").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total"], 1);

    assert_eq!(get(&app, "/orders/11").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/nothing").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reload_is_visible_to_next_request() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("menu.json");
    fs::write(&path, r#"[{"id": "soup", "price": 4}]"#).unwrap();

    let registry = Arc::new(Registry::new());
    let reporter: Arc<dyn Reporter> = Arc::new(RecordingReporter::new());
    let handler = ReloadHandler::new(registry.clone(), reporter);
    handler.apply(&ChangeEvent::created(&path));
    let app = router(Datasources::new(registry));

    let (_, soup) = get(&app, "/menu/soup").await;
    assert_eq!(soup["price"], 4);

    fs::write(&path, r#"[{"id": "soup", "price": 5}]"#).unwrap();
    handler.apply(&ChangeEvent::changed(&path));
    let (_, soup) = get(&app, "/menu/soup").await;
    assert_eq!(soup["price"], 5);

    fs::remove_file(&path).unwrap();
    handler.apply(&ChangeEvent::removed(&path));
    assert_eq!(get(&app, "/menu").await.0, StatusCode::NOT_FOUND);
}
