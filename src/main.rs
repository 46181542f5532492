use axum::http::HeaderValue;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod models;
mod services;
mod utils;

use config::Config;
use services::WalletProfiler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_profile_adapter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting wallet profile adapter");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "History window: {} days ({:?})",
        config.history_window_days,
        config.history_filter
    );

    let profiler = WalletProfiler::from_config(&config)?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = build_router(api::AppState::new(config, profiler));

    tracing::info!("Adapter listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    let cors = cors_from_config(&state.config);

    Router::new()
        .route(
            "/",
            get(api::health::health_check).post(api::job::run_job),
        )
        .route("/health", get(api::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::services::profiler::tests::{mount_single_token_wallet, profiler_for, WALLET};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::MockServer;

    fn app_for(server: &MockServer) -> Router {
        let config = test_config(&server.uri(), &server.uri());
        build_router(api::AppState::new(config, profiler_for(server)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn get_root_is_liveness() {
        let server = MockServer::start().await;
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(app_for(&server), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn post_root_returns_job_result() {
        // Memastikan POST / mengembalikan job result dengan status 200
        let server = MockServer::start().await;
        mount_single_token_wallet(&server).await;

        let body = json!({"id": "1", "data": {"wallet": WALLET}}).to_string();
        let (status, body) = send(app_for(&server), post_json(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobRunID"], "1");
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["data"]["ethBalance"], "1000000000000000000");
        assert_eq!(body["data"]["totalValue"], "11000000000000000000");
        assert_eq!(body["data"]["result"], "11000000000000000000");
        assert_eq!(body["data"]["tokenTxCount"], 1);
        assert_eq!(body["data"]["tokenBalances"][0]["balance"], "5");
    }

    #[tokio::test]
    async fn post_without_wallet_is_errored_job() {
        let server = MockServer::start().await;
        let body = json!({"id": "2", "data": {}}).to_string();
        let (status, body) = send(app_for(&server), post_json(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["jobRunID"], "2");
        assert_eq!(body["status"], "errored");
        assert_eq!(body["statusCode"], 400);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn post_non_json_body_is_errored_job() {
        let server = MockServer::start().await;
        let (status, body) = send(app_for(&server), post_json("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["jobRunID"].is_null());
        assert_eq!(body["status"], "errored");
    }
}
