// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 모든 통합 테스트에서 공통으로 사용하는 셋업 함수 제공
// 데이터베이스 없이 in-memory 사용자 저장소를 사용
// =====================================================
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use catalog_api::config::AppConfig;
use catalog_api::routes::build_app;
use catalog_api::shared::database::MemoryUserRepository;
use catalog_api::shared::services::AppState;
use serde_json::Value;
use tokio::net::TcpListener;

// 테스트용 상수
pub const TEST_EMAIL: &str = "a@x.com";
pub const TEST_PASSWORD: &str = "Abcd123!";
pub const TEST_NAME: &str = "A";

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

/// 테스트 설정 (운영 환경 아님, 기본 수명)
pub fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        database_url: None,
        access_secret: TEST_ACCESS_SECRET.to_string(),
        refresh_secret: TEST_REFRESH_SECRET.to_string(),
        environment: "test".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        access_ttl_secs: 900,
        refresh_ttl_secs: 604_800,
        rotate_refresh_tokens: false,
    }
}

/// 라우터와 저장소 생성 (oneshot 테스트용)
pub fn test_app(config: AppConfig) -> (Router, Arc<MemoryUserRepository>) {
    let store = Arc::new(MemoryUserRepository::new());
    let app_state = AppState::new(config, store.clone());
    let app = build_app(app_state).expect("Failed to build app");
    (app, store)
}

/// 실제 TCP 포트에서 서버 실행 (클라이언트 테스트용)
/// Returns the API base URL (".../api") and the store behind it.
pub async fn spawn_server(config: AppConfig) -> (String, Arc<MemoryUserRepository>) {
    let (app, store) = test_app(config);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    (format!("http://{}/api", addr), store)
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Cookie 헤더만 가진 POST 요청 (refresh / logout)
pub fn cookie_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn bearer_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// 응답의 Set-Cookie 값 (없으면 None)
pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// "jwt=<token>; Path=/; ..." → "jwt=<token>" (요청 Cookie 헤더용)
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().trim().to_string()
}

/// "jwt=<token>; ..." → "<token>"
pub fn cookie_token(set_cookie: &str) -> String {
    cookie_pair(set_cookie)
        .split_once('=')
        .map(|(_, v)| v.to_string())
        .unwrap_or_default()
}
