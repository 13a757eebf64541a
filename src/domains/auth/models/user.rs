use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

/// 사용자 레코드 (DB 저장용)
/// User record as held by the user store
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email: String,
    /// argon2 PHC 문자열 (평문 비밀번호는 저장하지 않음)
    pub password_hash: String,
    pub name: Option<String>,
    /// 현재 Refresh Token의 SHA-256 해시 (로그아웃 상태면 None)
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 사용자 생성 데이터
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

/// 공개 사용자 정보 (비밀번호, 토큰 제외)
/// Public user summary returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "a@x.com")]
    pub email: String,

    #[schema(example = "A")]
    pub name: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
