// =====================================================
// Session Client 통합 테스트
// =====================================================
// 실제 TCP 포트에서 서버를 띄우고 SessionClient로 호출
// =====================================================

mod common;

use std::sync::Arc;
use std::time::Duration;

use catalog_api::client::{ApiRequest, ClientError, SessionClient, SessionEvent};
use catalog_api::shared::database::UserStore;
use common::*;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::StatusCode;
use tokio::sync::broadcast::error::TryRecvError;

/// 서버 실행 + 가입 + 로그인된 클라이언트
async fn logged_in_client(base_url: &str, jar: Arc<Jar>) -> SessionClient {
    let client = SessionClient::with_cookie_jar(base_url, jar).unwrap();
    client.register(TEST_EMAIL, TEST_PASSWORD, Some(TEST_NAME)).await.unwrap();
    client.login(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    client
}

/// jar에 저장된 Cookie 헤더 값 ("jwt=...")
fn stored_cookie(jar: &Jar, base_url: &str) -> Option<String> {
    let url = reqwest::Url::parse(base_url).unwrap();
    jar.cookies(&url)
        .and_then(|v| v.to_str().ok().map(str::to_string))
        .filter(|v| v.contains("jwt="))
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let mut config = test_config();
    config.access_ttl_secs = 1;
    let (base_url, _) = spawn_server(config).await;
    let jar = Arc::new(Jar::default());
    let client = SessionClient::with_cookie_jar(&base_url, jar.clone()).unwrap();
    let mut events = client.subscribe();

    // 1. 가입은 로그인하지 않음
    let registered = client.register(TEST_EMAIL, TEST_PASSWORD, Some(TEST_NAME)).await.unwrap();
    assert_eq!(registered.email, TEST_EMAIL);
    assert!(!client.is_authenticated());

    // 2. 로그인: access token은 메모리, refresh token은 cookie
    let user = client.login(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    assert_eq!(user, registered);
    assert!(client.is_authenticated());
    let first_token = client.session().token().unwrap();
    let cookie = stored_cookie(&jar, &base_url).expect("refresh cookie stored");

    assert_eq!(client.me().await.unwrap(), user);

    // 3. access token 만료 후 자동 갱신 + 재시도
    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(client.me().await.unwrap(), user);
    assert_ne!(client.session().token().unwrap(), first_token);
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

    // 4. 로그아웃: 로컬 상태와 cookie 모두 삭제
    client.logout().await.unwrap();
    assert!(!client.is_authenticated());
    assert!(client.session().token().is_none());
    assert!(stored_cookie(&jar, &base_url).is_none());

    // 이전 refresh cookie는 서버에서 무효
    let response = reqwest::Client::new()
        .post(format!("{}/auth/refresh", base_url))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stale_access_token_recovers() {
    let (base_url, _) = spawn_server(test_config()).await;
    let client = logged_in_client(&base_url, Arc::new(Jar::default())).await;
    let mut events = client.subscribe();

    client.session().set_token(Some("stale".to_string()));

    let user = client.me().await.unwrap();
    assert_eq!(user.email, TEST_EMAIL);
    assert_ne!(client.session().token().as_deref(), Some("stale"));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_refresh_failure_signals_unauthenticated() {
    let (base_url, store) = spawn_server(test_config()).await;
    let client = logged_in_client(&base_url, Arc::new(Jar::default())).await;
    let mut events = client.subscribe();

    // 서버 측에서 세션 폐기
    let user = client.current_user().unwrap();
    store.update_refresh_token(user.id, None).await.unwrap();
    client.session().set_token(Some("stale".to_string()));

    let result = client.me().await;
    assert!(matches!(result, Err(ClientError::Forbidden(_))), "got {:?}", result);
    assert!(!client.is_authenticated());
    assert!(client.session().token().is_none());
    assert_eq!(events.try_recv(), Ok(SessionEvent::Unauthenticated));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_replay_is_attempted_once() {
    // 발급되는 access token이 모두 이미 만료된 상태
    let mut config = test_config();
    config.access_ttl_secs = -10;
    let (base_url, _) = spawn_server(config).await;
    let client = logged_in_client(&base_url, Arc::new(Jar::default())).await;
    let mut events = client.subscribe();

    let result = client.dispatch(ApiRequest::get("/auth/me")).await;

    assert!(matches!(result, Err(ClientError::Unauthorized(_))), "got {:?}", result);
    // 갱신 자체는 성공했으므로 세션 종료 신호 없음
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_concurrent_requests_each_recover() {
    let (base_url, _) = spawn_server(test_config()).await;
    let client = logged_in_client(&base_url, Arc::new(Jar::default())).await;
    client.session().set_token(Some("stale".to_string()));

    let other = client.clone();
    let (first, second) = tokio::join!(client.me(), other.me());

    assert_eq!(first.unwrap().email, TEST_EMAIL);
    assert_eq!(second.unwrap().email, TEST_EMAIL);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_rotating_refresh() {
    let mut config = test_config();
    config.rotate_refresh_tokens = true;
    let (base_url, _) = spawn_server(config).await;
    let jar = Arc::new(Jar::default());
    let client = logged_in_client(&base_url, jar.clone()).await;
    let other = client.clone();
    let mut events = client.subscribe();

    for round in 0..10 {
        let cookie_before = stored_cookie(&jar, &base_url);
        client.session().set_token(Some("stale".to_string()));

        let (first, second) = tokio::join!(client.me(), other.me());

        assert_eq!(first.unwrap().email, TEST_EMAIL, "round {}", round);
        assert_eq!(second.unwrap().email, TEST_EMAIL, "round {}", round);
        assert!(client.is_authenticated());
        // refresh는 한 번만 수행되어 cookie가 한 번 교체됨
        assert_ne!(stored_cookie(&jar, &base_url), cookie_before);
    }

    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    assert!(client.refresh().await.is_ok());
}

#[tokio::test]
async fn test_hydrate_without_cookie_is_silent() {
    let (base_url, _) = spawn_server(test_config()).await;
    let client = SessionClient::new(&base_url).unwrap();
    let mut events = client.subscribe();

    assert!(client.hydrate().await.is_none());
    assert!(!client.is_authenticated());
    assert!(client.session().token().is_none());
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_hydrate_restores_session_from_cookie() {
    let (base_url, _) = spawn_server(test_config()).await;
    let jar = Arc::new(Jar::default());
    let first = logged_in_client(&base_url, jar.clone()).await;
    let expected = first.current_user().unwrap();

    // 새 인스턴스: 메모리 상태 없이 cookie만 공유
    let restarted = SessionClient::with_cookie_jar(&base_url, jar).unwrap();
    assert!(!restarted.is_authenticated());

    let user = restarted.hydrate().await;
    assert_eq!(user, Some(expected.clone()));
    assert!(restarted.session().token().is_some());
    assert_eq!(restarted.me().await.unwrap(), expected);
}

#[tokio::test]
async fn test_form_errors_surface_as_typed_errors() {
    let (base_url, _) = spawn_server(test_config()).await;
    let client = SessionClient::new(&base_url).unwrap();
    client.register(TEST_EMAIL, TEST_PASSWORD, None).await.unwrap();

    let duplicate = client.register(TEST_EMAIL, TEST_PASSWORD, None).await;
    assert!(matches!(duplicate, Err(ClientError::Conflict(_))), "got {:?}", duplicate);

    let weak = client.register("b@x.com", "weak", None).await;
    assert!(matches!(weak, Err(ClientError::BadRequest(_))), "got {:?}", weak);

    let wrong = client.login(TEST_EMAIL, "Wrong123!").await;
    match wrong {
        Err(ClientError::Unauthorized(message)) => assert_eq!(message, "Invalid email or password"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_refresh_after_logout_is_unauthenticated() {
    let (base_url, _) = spawn_server(test_config()).await;
    let client = logged_in_client(&base_url, Arc::new(Jar::default())).await;

    client.logout().await.unwrap();

    let result = client.refresh().await;
    assert!(matches!(result, Err(ClientError::Unauthorized(_))), "got {:?}", result);
    assert_eq!(result.unwrap_err().status(), Some(401));
}
