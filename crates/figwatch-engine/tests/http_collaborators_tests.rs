//! HTTP clients against a local axum stand-in for the remote services.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use figwatch_core::errors::ExErrorKind;
use figwatch_core_types::Sensitive;
use figwatch_engine::api::{ApiConfig, FigmaClient, RevisionApi, TOKEN_HEADER};
use figwatch_engine::notify::{CodexBotNotifier, MessageFormat, Notifier};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TOKEN: &str = "figd_test";

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) == Some(TOKEN)
}

async fn component(Path(key): Path<String>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"status": 403, "err": "Invalid token"})));
    }
    if key != "abc" {
        return (StatusCode::NOT_FOUND, Json(json!({"status": 404, "err": "Not found"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "status": 200,
            "meta": {"key": "abc", "node_id": "1:2", "name": "Primary",
                     "containing_frame": {"name": "Buttons"}}
        })),
    )
}

async fn versions() -> Json<Value> {
    Json(json!({
        "versions": [
            {"id": "v4", "label": null},
            {"id": "v3", "label": "Release 3"},
            {"id": "v2", "label": "Release 2"},
            {"id": "v1", "label": "Release 1"}
        ]
    }))
}

async fn file(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "ids": query.get("ids"),
        "version": query.get("version"),
    }))
}

async fn api_base() -> String {
    let app = Router::new()
        .route("/v1/components/:key", get(component))
        .route("/v1/files/:key/versions", get(versions))
        .route("/v1/files/:key", get(file));
    format!("{}/v1", spawn(app).await)
}

fn client(base: &str, token: &str) -> FigmaClient {
    FigmaClient::new(ApiConfig {
        base_url: base.to_string(),
        token: Sensitive::new(token.to_string()),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_component_info_sends_token() {
    let base = api_base().await;

    let info = client(&base, TOKEN).component_info("abc").await.unwrap();

    assert_eq!(info.node_id, "1:2");
    assert_eq!(info.label(), "Buttons, Primary");
}

#[tokio::test]
async fn test_bad_token_is_upstream_status() {
    let base = api_base().await;

    let err = client(&base, "wrong").component_info("abc").await.unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UpstreamStatus);
    assert!(err.message().contains("403"));
}

#[tokio::test]
async fn test_named_versions_keeps_two_newest_labelled() {
    let base = api_base().await;

    let versions = client(&base, TOKEN).named_versions("FILE1").await.unwrap();

    assert_eq!(versions, vec!["v3", "v2"]);
}

#[tokio::test]
async fn test_snapshot_passes_ids_and_version() {
    let base = api_base().await;
    let ids = vec!["1:2".to_string(), "3:4".to_string()];

    let tree = client(&base, TOKEN).snapshot("FILE1", &ids, "v2").await.unwrap();

    assert_eq!(tree.string_field("ids"), Some("1:2,3:4"));
    assert_eq!(tree.string_field("version"), Some("v2"));
}

#[tokio::test]
async fn test_unreachable_api_is_upstream_unavailable() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr), TOKEN)
        .named_versions("FILE1")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UpstreamUnavailable);
}

type Inbox = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn receive(
    State(inbox): State<Inbox>,
    Path(token): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> StatusCode {
    if token == "broken" {
        return StatusCode::BAD_GATEWAY;
    }
    inbox.lock().unwrap().push((token, form));
    StatusCode::OK
}

async fn notify_base(inbox: Inbox) -> String {
    let app = Router::new()
        .route("/u/:token", post(receive))
        .with_state(inbox);
    format!("{}/u", spawn(app).await)
}

#[tokio::test]
async fn test_notifier_posts_form() {
    let inbox = Inbox::default();
    let base = notify_base(inbox.clone()).await;
    let notifier = CodexBotNotifier::new(
        &base,
        &Sensitive::new("bot-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();

    notifier
        .send("<b>Changes</b> & more", MessageFormat::Html)
        .await
        .unwrap();

    let received = inbox.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, "bot-token");
    assert_eq!(received[0].1.get("message").map(String::as_str), Some("<b>Changes</b> & more"));
    assert_eq!(received[0].1.get("parse_mode").map(String::as_str), Some("HTML"));
}

#[tokio::test]
async fn test_notifier_error_status_is_delivery_failed() {
    let base = notify_base(Inbox::default()).await;
    let notifier = CodexBotNotifier::new(
        &base,
        &Sensitive::new("broken".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = notifier.send("hello", MessageFormat::Html).await.unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::DeliveryFailed);
    assert!(!err.to_string().contains("broken"));
}
