use serde::{Deserialize, Serialize};

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims shared by access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    /// User ID
    pub user_id: u64,

    /// 토큰 고유 ID (같은 초에 발급된 토큰도 서로 달라지도록)
    /// Unique token id
    pub jti: String,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// 새 Claims 생성 (만료 시간 자동 계산)
    /// Create new Claims expiring `ttl_secs` seconds from now
    pub fn new(user_id: u64, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();

        Self {
            user_id,
            jti: uuid::Uuid::new_v4().to_string(),
            exp: now + ttl_secs,
            iat: now,
        }
    }
}
