use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use nr_core::{Category, FetchError, NewsSource};
use nr_fetch::{ClientConfig, GNewsClient, IdStrategy};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Requests = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v4", addr)
}

async fn fake_gnews(
    Path(endpoint): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(requests): State<Requests>,
) -> impl IntoResponse {
    requests.lock().unwrap().push((endpoint, params));
    Json(json!({
        "totalArticles": 2,
        "articles": [
            {
                "title": "New GPU architecture unveiled",
                "description": "Faster and cooler.",
                "content": "...",
                "url": "https://example.com/gpu",
                "image": "https://example.com/gpu.png",
                "publishedAt": "2024-03-10T10:00:00Z",
                "source": { "name": "Tech Daily", "url": "https://example.com" }
            },
            {
                "url": "https://example.com/untitled"
            }
        ]
    }))
}

fn client(base_url: &str) -> GNewsClient {
    GNewsClient::new(ClientConfig::new("test-key").with_base_url(base_url)).unwrap()
}

#[tokio::test]
async fn test_headlines_for_category() {
    let requests = Requests::default();
    let app = Router::new()
        .route("/api/v4/:endpoint", get(fake_gnews))
        .with_state(requests.clone());
    let base_url = serve(app).await;

    let articles = client(&base_url).fetch(Category::Technology, "").await.unwrap();

    let recorded = requests.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    let (endpoint, params) = &recorded[0];
    assert_eq!(endpoint, "top-headlines");
    assert_eq!(params["category"], "technology");
    assert_eq!(params["apikey"], "test-key");
    assert_eq!(params["max"], "10");
    assert!(!params.contains_key("q"));

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].id, "1");
    assert_eq!(articles[0].source_name, "Tech Daily");
    assert_eq!(articles[1].id, "2");
    assert_eq!(articles[1].title, "Untitled");
    assert!(articles.iter().all(|a| a.category == Some(Category::Technology)));
}

#[tokio::test]
async fn test_search_with_url_hash_ids() {
    let requests = Requests::default();
    let app = Router::new()
        .route("/api/v4/:endpoint", get(fake_gnews))
        .with_state(requests.clone());
    let base_url = serve(app).await;

    let config = ClientConfig::new("test-key")
        .with_base_url(&base_url)
        .with_id_strategy(IdStrategy::UrlHash);
    let source = GNewsClient::new(config).unwrap();

    let first = source.fetch(Category::All, "gpu").await.unwrap();
    let second = source.fetch(Category::All, "gpu").await.unwrap();

    let recorded = requests.lock().unwrap().clone();
    assert_eq!(recorded[0].0, "search");
    assert_eq!(recorded[0].1["q"], "gpu");
    assert!(!recorded[0].1.contains_key("category"));

    assert_eq!(first[0].id, second[0].id);
    assert_ne!(first[0].id, first[1].id);
    assert!(first.iter().all(|a| a.category.is_none()));
}

#[tokio::test]
async fn test_error_status_carries_reason() {
    let app = Router::new().route(
        "/api/v4/:endpoint",
        get(|| async { (StatusCode::FORBIDDEN, "quota reached") }),
    );
    let base_url = serve(app).await;

    let err = client(&base_url).fetch(Category::All, "").await.unwrap_err();
    match err {
        FetchError::Status { status, reason } => {
            assert_eq!(status, 403);
            assert_eq!(reason, "Forbidden");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let app = Router::new().route("/api/v4/:endpoint", get(|| async { "<html>oops</html>" }));
    let base_url = serve(app).await;

    let err = client(&base_url).fetch(Category::World, "").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/api/v4", addr))
        .fetch(Category::All, "")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn test_slow_api_times_out() {
    let app = Router::new().route(
        "/api/v4/:endpoint",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "{}"
        }),
    );
    let base_url = serve(app).await;

    let config = ClientConfig::new("test-key")
        .with_base_url(&base_url)
        .with_timeout(Duration::from_millis(100));
    let err = GNewsClient::new(config).unwrap().fetch(Category::All, "").await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(100)));
}

#[tokio::test]
async fn test_error_payload_with_ok_status_is_decode_error() {
    let app = Router::new().route(
        "/api/v4/:endpoint",
        get(|| async { Json(json!({ "errors": ["You did not provide an API key."] })) }),
    );
    let base_url = serve(app).await;

    let err = client(&base_url).fetch(Category::All, "").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}
