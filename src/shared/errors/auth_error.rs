use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;
use tracing::error;

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// 잘못된 입력 (필수 필드 누락, 잘못된 JSON)
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// 비밀번호 강도 부족
    /// Password does not satisfy the strength policy
    #[error("Password is too weak: it must be at least 8 characters and contain an uppercase letter, a digit and a symbol")]
    WeakPassword,

    /// 이메일이 이미 존재함
    /// Email already exists
    #[error("An account with this email already exists")]
    EmailAlreadyExists { email: String },

    /// 잘못된 이메일 또는 비밀번호 (어느 쪽인지 구분하지 않음)
    /// Invalid email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// 세션 증거 없음 (refresh cookie 또는 Authorization 헤더 없음)
    /// No session evidence supplied
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// 잘못된 또는 만료된 Access Token
    /// Invalid or expired access token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// 세션 증거는 있으나 유효하지 않음 (위조, 만료, 로그아웃된 refresh token)
    /// Session evidence present but rejected
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 비밀번호 해싱 실패
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::WeakPassword => StatusCode::BAD_REQUEST,
            AuthError::EmailAlreadyExists { .. } => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated(_)
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
/// 내부 에러는 로그만 남기고 상세 내용은 응답에 포함하지 않음
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let status = err.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "Internal error while handling auth request");
            "Internal server error".to_string()
        } else {
            err.to_string()
        };

        (status, Json(json!({ "error": message })))
    }
}
