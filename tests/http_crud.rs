use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tododoc::{
    build_router,
    models::Item,
    repository::DocumentRepository,
    state::AppState,
    store::{DocumentStore, MemoryDocumentStore},
    telemetry::{RecordingSink, Telemetry},
};
use tower::ServiceExt;

async fn app_with_sink() -> (axum::Router, Arc<RecordingSink>) {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let sink = Arc::new(RecordingSink::new());
    let telemetry = Telemetry::new(sink.clone());
    let repo = DocumentRepository::<Item>::initialize(store, "ToDoList", "Items", telemetry.clone())
        .await
        .expect("provisioning should succeed");
    let state = AppState::new(Arc::new(repo), telemetry, None);
    (build_router(state), sink)
}

async fn app() -> axum::Router {
    app_with_sink().await.0
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    (status, String::from_utf8_lossy(&body).to_string())
}

async fn send_form(app: &axum::Router, uri: &str, form: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request should build");
    send(app, request).await
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

#[tokio::test]
async fn healthcheck_is_ok() {
    let app = app().await;
    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn values_api_returns_fixed_dataset() {
    let app = app().await;
    let (status, body) = get(&app, "/api/values").await;
    assert_eq!(status, StatusCode::OK);

    let values: Vec<String> = serde_json::from_str(&body).expect("body should be JSON");
    assert!(!values.is_empty());
    assert!(values.len() <= 100);
    assert!(values.contains(&"Water Bottle - 30 oz.".to_string()));

    // The dataset never changes between requests.
    let (_, again) = get(&app, "/api/values").await;
    assert_eq!(body, again);
}

#[tokio::test]
async fn values_api_stub_routes() {
    let app = app().await;

    let (status, body) = get(&app, "/api/values/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#""value""#);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/values")
        .body(Body::from("anything"))
        .expect("request should build");
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/values/5")
        .body(Body::empty())
        .expect("request should build");
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_redirects_and_item_appears_on_index() {
    let app = app().await;

    let (status, _) = send_form(
        &app,
        "/item/create",
        "id=1&name=Buy+milk&description=2+liters",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (status, page) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Buy milk"));
    assert!(page.contains("2 liters"));
}

#[tokio::test]
async fn create_with_blank_name_rerenders_form() {
    let app = app().await;
    let (status, page) = send_form(&app, "/item/create", "id=1&name=++").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Name is required"));
}

#[tokio::test]
async fn create_post_is_traced() {
    let (app, sink) = app_with_sink().await;
    let (_, _) = send_form(&app, "/item/create", "id=1&name=traced").await;

    let traces = sink.traces();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].message, "id=1&name=traced");
    assert!(
        traces[0]
            .tags
            .contains(&("PostData".to_string(), "true".to_string()))
    );
    assert!(
        traces[0]
            .tags
            .contains(&("Method".to_string(), "create".to_string()))
    );
}

#[tokio::test]
async fn completed_items_are_hidden_from_index() {
    let app = app().await;
    send_form(&app, "/item/create", "id=1&name=open").await;
    send_form(&app, "/item/create", "id=2&name=done&completed=on").await;

    let (_, page) = get(&app, "/").await;
    assert!(page.contains("open"));
    assert!(!page.contains(">done<"));
}

#[tokio::test]
async fn index_records_one_dependency_event() {
    let (app, sink) = app_with_sink().await;
    let (status, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);

    let dependencies = sink.dependencies();
    assert_eq!(dependencies.len(), 1);
    assert_eq!(dependencies[0].name, "Index.Values");
    assert!(dependencies[0].success);
}

#[tokio::test]
async fn edit_flow_roundtrips() {
    let app = app().await;
    send_form(&app, "/item/create", "id=1&name=before").await;

    let (status, page) = get(&app, "/item/edit/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("value=\"before\""));

    let (status, _) = send_form(&app, "/item/edit", "id=1&name=after&completed=on").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, details) = get(&app, "/item/details/1").await;
    assert!(details.contains("after"));
    assert!(details.contains("true"));
}

#[tokio::test]
async fn edit_unknown_id_is_not_found() {
    let app = app().await;
    let (status, _) = get(&app, "/item/edit/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_without_id_is_bad_request() {
    let app = app().await;
    let (status, _) = get(&app, "/item/edit").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/item/delete").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_flow_removes_item() {
    let app = app().await;
    send_form(&app, "/item/create", "id=1&name=doomed").await;

    let (status, confirm) = get(&app, "/item/delete/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(confirm.contains("doomed"));

    let (status, _) = send_form(&app, "/item/delete", "id=1").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (status, _) = get(&app, "/item/details/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn details_unknown_id_is_not_found() {
    let app = app().await;
    let (status, _) = get(&app, "/item/details/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_and_pages_share_one_store() {
    let app = app().await;
    send_form(&app, "/item/create", "name=store+assigned+id").await;

    let (_, page) = get(&app, "/").await;
    // The item shows up even though the store assigned its id.
    assert!(page.contains("store assigned id"));

    let value: Value = serde_json::from_str(
        &get(&app, "/api/values").await.1,
    )
    .expect("values should be JSON");
    assert!(value.as_array().is_some());
}
