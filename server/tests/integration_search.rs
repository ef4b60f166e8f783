use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use blogsearch_core::{HttpSource, PostSource, PostStore};
use blogsearch_server::{build_app, AppState};
use blogsearch_widget::{SearchBox, UiEvent, WidgetConfig, DEFAULT_PAGE};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn write_posts(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("posts.json");
    let posts = serde_json::json!([
        { "id": "/a", "title": "Rust error handling", "categories": "rust, errors", "excerpt": "anyhow and thiserror", "url": "/a.html" },
        { "id": "/b", "title": "Weekly links", "categories": "misc", "excerpt": "A rust crate I liked.", "url": "/b.html" },
        { "id": "/c", "title": "Gardening", "categories": "life", "excerpt": "Tomatoes.", "url": "/c.html" }
    ]);
    fs::write(&path, posts.to_string()).unwrap();
    path
}

fn app(dir: &TempDir) -> Router {
    let state = AppState::load(&write_posts(dir), None).unwrap();
    build_app(state)
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn serves_posts_at_fixed_path() {
    let dir = tempdir().unwrap();
    let (status, body) = call(app(&dir), "/json/posts.json").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn search_returns_ranked_rendered_results() {
    let dir = tempdir().unwrap();
    let (status, body) = call(app(&dir), "/search?q=rust&k=5").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr[0]["id"], "/a");
    assert_eq!(arr[1]["id"], "/b");
    assert!(arr[0]["html"].as_str().unwrap().contains(r#"<a href="/a.html">Rust error handling</a>"#));
}

#[tokio::test]
async fn k_limits_results_but_not_total() {
    let dir = tempdir().unwrap();
    let (_, body) = call(app(&dir), "/search?q=rust&k=0").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_query_is_empty() {
    let dir = tempdir().unwrap();
    let (status, body) = call(app(&dir), "/search?q=%20%20").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[test]
fn invalid_posts_file_fails_at_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("posts.json");
    fs::write(&path, r#"{"not": "an array"}"#).unwrap();
    assert!(AppState::load(&path, None).is_err());
    assert!(AppState::load(&dir.path().join("missing.json"), None).is_err());
}

async fn serve(dir: &TempDir) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = app(dir);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn http_source_fetches_from_server() {
    let dir = tempdir().unwrap();
    let base = serve(&dir).await;

    let source = HttpSource::new(&base).unwrap();
    let records = source.load().await.unwrap();
    assert_eq!(records.len(), 3);

    let store = PostStore::fetch(&source).await.unwrap();
    assert_eq!(store.filter("tomato").len(), 1);
}

#[tokio::test]
async fn http_source_reports_bad_status() {
    let dir = tempdir().unwrap();
    let base = serve(&dir).await;
    let source = HttpSource::with_path(&base, "/json/missing.json").unwrap();
    assert!(source.load().await.is_err());
}

#[tokio::test]
async fn search_box_end_to_end_over_http() {
    let dir = tempdir().unwrap();
    let base = serve(&dir).await;

    let search = SearchBox::mount(WidgetConfig::default(), DEFAULT_PAGE).unwrap();
    assert_eq!(search.load(&HttpSource::new(&base).unwrap()).await, 3);

    search.dispatch(UiEvent::ShowClick);
    search.dispatch(UiEvent::KeyUp("garden".into()));
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(search.queries_run(), 1);
    assert!(search.results_html().contains("Gardening"));
}
