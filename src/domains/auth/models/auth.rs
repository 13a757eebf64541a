use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserSummary;

// 회원가입 요청 모델
// 필드가 비어 있어도 역직렬화는 성공하고, 검증은 서비스에서 수행
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterRequest)]
pub struct RegisterRequest {
    /// Email address
    /// 이메일 주소
    #[serde(default)]
    #[schema(example = "a@x.com")]
    pub email: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[serde(default)]
    #[schema(example = "Abcd123!")]
    pub password: String,

    /// Display name
    /// 표시 이름
    #[schema(example = "A")]
    pub name: Option<String>,
}

// 회원가입 응답 모델
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterResponse)]
pub struct RegisterResponse {
    /// Success message
    /// 성공 메시지
    pub message: String,

    /// User information (without password or tokens)
    /// 사용자 정보 (비밀번호, 토큰 제외)
    pub user: UserSummary,
}

// 로그인 요청 모델
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    /// Email address
    /// 이메일 주소
    #[serde(default)]
    #[schema(example = "a@x.com")]
    pub email: String,

    /// Password
    /// 비밀번호
    #[serde(default)]
    #[schema(example = "Abcd123!")]
    pub password: String,
}

// 로그인 / 토큰 갱신 응답 모델
// Refresh Token은 body가 아닌 HttpOnly cookie로만 전달
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = SessionResponse)]
pub struct SessionResponse {
    /// JWT Access Token (짧은 수명, 15분)
    /// JWT Access Token (short lifetime, 15 minutes)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// User information
    /// 사용자 정보
    pub user: UserSummary,
}
