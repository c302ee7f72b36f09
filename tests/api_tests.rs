use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use recommendarr::{
    api::{create_router, AppState},
    config::Config,
    models::{ChatMessage, MediaImage, MediaItem, MediaKind},
    services::providers::{LibrarySource, TitleLookup},
    services::CompletionClient,
    AppResult,
};

const TWO_SHOWS: &str = "Here are 2 TV show recommendations:\n\n1. Severance: \nDescription: A thriller about work-life balance.\nWhy you might like it: You liked Lost.\nAvailable on: Apple TV+\n\n2. The Bear:\nDescription: A chef drama.\nWhy you might like it: You liked cooking shows.\nAvailable on: Hulu";

struct FixedCompletion {
    reply: String,
    calls: AtomicUsize,
}

impl FixedCompletion {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl CompletionClient for FixedCompletion {
    async fn complete(&self, _messages: &[ChatMessage]) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    async fn test_connection(&self) -> AppResult<()> {
        Ok(())
    }
}

struct CountingLookup {
    poster: Option<String>,
    calls: AtomicUsize,
}

impl CountingLookup {
    fn new(poster: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            poster: poster.map(str::to_string),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TitleLookup for CountingLookup {
    async fn lookup_title(&self, title: &str) -> AppResult<Option<MediaItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.poster.as_ref().map(|url| MediaItem {
            title: title.to_string(),
            images: vec![MediaImage {
                cover_type: "poster".to_string(),
                remote_url: Some(url.clone()),
            }],
        }))
    }
}

struct StaticLibrary {
    titles: Vec<String>,
}

#[async_trait::async_trait]
impl LibrarySource for StaticLibrary {
    async fn library_titles(&self, _kind: MediaKind) -> AppResult<Vec<String>> {
        Ok(self.titles.clone())
    }

    async fn test_connection(&self) -> AppResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

fn create_test_app(state: AppState) -> Router {
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(AppState::default());

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (_, body) = send(&app, get("/health")).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app(AppState::default());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "client-abc-1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "client-abc-1");
}

#[tokio::test]
async fn test_recommendations_from_supplied_titles() {
    let completion = FixedCompletion::new(TWO_SHOWS);
    let app = create_test_app(AppState::default().with_completions(completion.clone()));

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/recommendations",
            json!({ "kind": "series", "library_titles": ["Lost", "Chef's Table"], "count": 2 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["title"], "Severance");
    assert_eq!(entries[0]["streaming"], "Apple TV+");
    assert_eq!(entries[1]["title"], "The Bear");
    assert_eq!(entries[1]["reasoning"], "You liked cooking shows.");
    assert!(entries[1]["fullText"].as_str().unwrap().starts_with("The Bear:"));
    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_recommendations_fetch_library_when_titles_absent() {
    let completion = FixedCompletion::new(TWO_SHOWS);
    let library = Arc::new(StaticLibrary {
        titles: vec!["Lost".to_string()],
    });
    let state = AppState::default()
        .with_completions(completion.clone())
        .with_library(MediaKind::Series, library);
    let app = create_test_app(state);

    let (status, body) = send(
        &app,
        post_json("/api/v1/recommendations", json!({ "kind": "series" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recommendations_without_llm_is_configuration_error() {
    let app = create_test_app(AppState::default());

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/recommendations",
            json!({ "kind": "movie", "library_titles": ["Heat"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("Configuration error"));
}

#[tokio::test]
async fn test_recommendations_without_library_source() {
    let app = create_test_app(AppState::default().with_completions(FixedCompletion::new(TWO_SHOWS)));

    let (status, _) = send(
        &app,
        post_json("/api/v1/recommendations", json!({ "kind": "movie" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_recommendations_empty_library_is_bad_request() {
    let completion = FixedCompletion::new(TWO_SHOWS);
    let app = create_test_app(AppState::default().with_completions(completion.clone()));

    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/recommendations",
            json!({ "kind": "series", "library_titles": [] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unnumbered_reply_returns_single_entry() {
    let completion = FixedCompletion::new("Sorry, I have no ideas today.");
    let app = create_test_app(AppState::default().with_completions(completion));

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/recommendations",
            json!({ "library_titles": ["Lost"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["fullText"], "Sorry, I have no ideas today.");
    assert_eq!(body[0]["title"], "");
}

#[tokio::test]
async fn test_poster_is_cached_until_refresh() {
    let lookup = CountingLookup::new(Some("https://img/wire.jpg"));
    let app = create_test_app(
        AppState::default().with_title_lookup(MediaKind::Series, lookup.clone()),
    );

    let (status, body) = send(&app, get("/api/v1/posters?title=The%20Wire&kind=series")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://img/wire.jpg");
    assert_eq!(body["placeholder"], false);

    send(&app, get("/api/v1/posters?title=The%20Wire&kind=series")).await;
    assert_eq!(lookup.calls(), 1);

    send(
        &app,
        get("/api/v1/posters?title=The%20Wire&kind=series&refresh=true"),
    )
    .await;
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_poster_falls_back_to_placeholder() {
    let lookup = CountingLookup::new(None);
    let app = create_test_app(
        AppState::default().with_title_lookup(MediaKind::Movie, lookup.clone()),
    );

    let (status, body) = send(&app, get("/api/v1/posters?title=Heat&kind=movie")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["placeholder"], true);
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));

    // Misses are retried on the next request
    send(&app, get("/api/v1/posters?title=Heat&kind=movie")).await;
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_poster_without_lookup_uses_placeholder() {
    let app = create_test_app(AppState::default());

    let (status, body) = send(&app, get("/api/v1/posters?title=Lost")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["placeholder"], true);
    assert_eq!(body["kind"], "series");
}

#[tokio::test]
async fn test_evict_poster_forces_new_lookup() {
    let lookup = CountingLookup::new(Some("https://img/dark.jpg"));
    let app = create_test_app(
        AppState::default().with_title_lookup(MediaKind::Series, lookup.clone()),
    );

    send(&app, get("/api/v1/posters?title=Dark")).await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/v1/posters?title=Dark")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    send(&app, get("/api/v1/posters?title=Dark")).await;
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_poster_empty_title_is_bad_request() {
    let app = create_test_app(AppState::default());

    let (status, _) = send(&app, get("/api/v1/posters?title=%20")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_connection_checks() {
    let state = AppState::new(Config::default())
        .with_completions(FixedCompletion::new(""))
        .with_plex(Arc::new(StaticLibrary { titles: vec![] }));
    let app = create_test_app(state);

    let (status, body) = send(&app, get("/api/v1/connections/plex")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(&app, get("/api/v1/connections/llm")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/api/v1/connections/sonarr")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, get("/api/v1/connections/jellyfin")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
