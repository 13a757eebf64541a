use crate::domains::auth::cookie::{clear_refresh_cookie, extract_cookie_value, refresh_cookie, REFRESH_COOKIE_NAME};
use crate::domains::auth::models::{
    LoginRequest, RegisterRequest, RegisterResponse, SessionResponse, UserSummary,
};
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use crate::shared::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

type HandlerError = (StatusCode, Json<serde_json::Value>);

// 잘못된 JSON body는 ValidationError(400)로 통일
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::Validation(format!("Invalid request body: {}", rejection.body_text())))
}

fn cookie_header(cookie: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(cookie)
        .map_err(|e| AuthError::Internal(format!("Failed to build cookie header: {}", e)))
}

// 회원가입 핸들러
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = RegisterResponse),
        (status = 400, description = "Missing fields or weak password"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), HandlerError> {
    let request = parse_body(payload)?;

    // Service 호출 (비즈니스 로직)
    let user = app_state
        .auth_state
        .auth_service
        .register(request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully".to_string(),
            user,
        }),
    ))
}

// 로그인 핸들러
// Access Token은 body로, Refresh Token은 HttpOnly cookie로 전달
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; refresh cookie set", body = SessionResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, HandlerError> {
    let request = parse_body(payload)?;

    let outcome = app_state
        .auth_state
        .auth_service
        .login(request)
        .await?;

    let cookie = cookie_header(&refresh_cookie(
        &outcome.refresh_token,
        app_state.auth_state.jwt_service.refresh_ttl_secs(),
        app_state.config.is_production(),
    ))?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(SessionResponse {
            access_token: outcome.access_token,
            user: outcome.user,
        }),
    )
        .into_response())
}

/// 토큰 갱신 핸들러
/// Refresh handler: reads the refresh cookie only
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Access token refreshed", body = SessionResponse),
        (status = 401, description = "No refresh cookie"),
        (status = 403, description = "Refresh token invalid, forged, revoked or mismatched"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let refresh_token = extract_cookie_value(&headers, REFRESH_COOKIE_NAME);

    let outcome = app_state
        .auth_state
        .auth_service
        .refresh_session(refresh_token.as_deref())
        .await?;

    let mut response = Json(SessionResponse {
        access_token: outcome.access_token,
        user: outcome.user,
    })
    .into_response();

    // Rotation 정책이 켜진 경우에만 새 cookie 발급
    if let Some(rotated) = outcome.refresh_token {
        let cookie = cookie_header(&refresh_cookie(
            &rotated,
            app_state.auth_state.jwt_service.refresh_ttl_secs(),
            app_state.config.is_production(),
        ))?;
        response.headers_mut().append(SET_COOKIE, cookie);
    }

    Ok(response)
}

/// 로그아웃 핸들러
/// Logout handler: always 204, clears the cookie when one was sent
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Logged out; refresh cookie cleared"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let refresh_token = extract_cookie_value(&headers, REFRESH_COOKIE_NAME);

    app_state
        .auth_state
        .auth_service
        .logout(refresh_token.as_deref())
        .await?;

    let mut response = StatusCode::NO_CONTENT.into_response();
    if refresh_token.is_some() {
        let cookie = cookie_header(&clear_refresh_cookie(app_state.config.is_production()))?;
        response.headers_mut().append(SET_COOKIE, cookie);
    }

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "User info retrieved successfully", body = UserSummary),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<UserSummary>, HandlerError> {
    let user = app_state
        .auth_state
        .auth_service
        .get_user_info(authenticated_user.user_id)
        .await?;

    Ok(Json(user))
}
