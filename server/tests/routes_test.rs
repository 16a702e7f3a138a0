//! Integration tests for dispatch, static serving, the production shell
//! fallback, and the error boundary.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;

use plaza_server::admission::OriginPolicy;
use plaza_server::config::Config;
use plaza_server::error::AppError;
use plaza_server::routes::{build_router, ApiRouters};
use plaza_server::state::AppState;
use plaza_server::ws::ChannelHub;

const SHELL: &str = "<!doctype html><html><body><div id=\"app\">Plaza</div></body></html>";

/// Helper: start the gateway on a random port with temp uploads/public
/// directories. Returns (base_url, tempdir guard).
async fn start_test_server(production: bool, api: ApiRouters) -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let uploads_dir = dir.path().join("uploads");
    let public_dir = dir.path().join("public");
    std::fs::create_dir_all(&uploads_dir).unwrap();
    std::fs::create_dir_all(&public_dir).unwrap();
    std::fs::write(uploads_dir.join("avatar.txt"), "avatar-bytes").unwrap();
    std::fs::write(public_dir.join("index.html"), SHELL).unwrap();

    let config = Config {
        production,
        uploads_dir: uploads_dir.to_str().unwrap().to_string(),
        public_dir: public_dir.to_str().unwrap().to_string(),
        ..Config::default()
    };

    let state = AppState {
        policy: Arc::new(OriginPolicy::new(None)),
        hub: ChannelHub::new(),
    };

    let app = build_router(&config, state, api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), dir)
}

#[tokio::test]
async fn test_liveness_probe() {
    let (base_url, _dir) = start_test_server(false, ApiRouters::default()).await;

    let resp = reqwest::get(format!("{}/api", base_url)).await.unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Plaza API"));
}

#[tokio::test]
async fn test_uploads_are_served() {
    let (base_url, _dir) = start_test_server(false, ApiRouters::default()).await;

    let resp = reqwest::get(format!("{}/uploads/avatar.txt", base_url))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "avatar-bytes");
}

#[tokio::test]
async fn test_unmatched_path_serves_shell_in_production() {
    let (base_url, _dir) = start_test_server(true, ApiRouters::default()).await;

    let resp = reqwest::get(format!("{}/some/deep/link", base_url))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("id=\"app\""), "expected the client shell, got: {}", body);
}

#[tokio::test]
async fn test_unmatched_path_is_404_outside_production() {
    let (base_url, _dir) = start_test_server(false, ApiRouters::default()).await;

    let resp = reqwest::get(format!("{}/some/deep/link", base_url))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_fallback_never_shadows_api_routes() {
    let posts = Router::new().route("/", get(|| async { "posts" }));
    let (base_url, _dir) = start_test_server(
        true,
        ApiRouters {
            posts,
            ..ApiRouters::default()
        },
    )
    .await;

    let resp = reqwest::get(format!("{}/api/posts", base_url)).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "posts");
}

async fn failing_handler() -> Result<&'static str, AppError> {
    Err(AppError::Upstream("database unreachable".into()))
}

async fn panicking_handler() -> &'static str {
    panic!("post lookup exploded");
}

#[tokio::test]
async fn test_handler_error_yields_uniform_body_and_server_survives() {
    let posts = Router::new().route("/", get(failing_handler));
    let (base_url, _dir) = start_test_server(
        false,
        ApiRouters {
            posts,
            ..ApiRouters::default()
        },
    )
    .await;

    let resp = reqwest::get(format!("{}/api/posts", base_url)).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "internal server error");

    // The process keeps serving
    let resp = reqwest::get(format!("{}/api", base_url)).await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_handler_panic_is_caught_and_server_survives() {
    let posts = Router::new().route("/", get(panicking_handler));
    let (base_url, _dir) = start_test_server(
        false,
        ApiRouters {
            posts,
            ..ApiRouters::default()
        },
    )
    .await;

    let resp = reqwest::get(format!("{}/api/posts", base_url)).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "internal server error");

    let resp = reqwest::get(format!("{}/api", base_url)).await.unwrap();
    assert_eq!(resp.status(), 200);
}
