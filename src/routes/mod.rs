// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::shared::services::AppState;

use crate::domains::auth::routes::create_auth_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", create_auth_router())
}

/// 상태, CORS, 요청 로깅까지 적용된 애플리케이션 라우터
/// Build the full application router. Fails if the configured CORS origin is not a valid header value.
pub fn build_app(app_state: AppState) -> Result<Router> {
    // CORS 설정: refresh cookie 전송을 위해 credentials 허용
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", app_state.config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    Ok(create_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
