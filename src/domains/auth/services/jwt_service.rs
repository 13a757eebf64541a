// src/domains/auth/services/jwt_service.rs
use crate::config::AppConfig;
use crate::shared::errors::AuthError;
use crate::domains::auth::models::jwt::Claims;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Sha256, Digest};

/// JWT 서비스
/// Issues and verifies access and refresh tokens.
/// Access / Refresh Token은 서로 다른 시크릿으로 서명
#[derive(Clone)]
pub struct JwtService {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(access_secret: &str, refresh_secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            access_encoding_key: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.access_secret,
            &config.refresh_secret,
            config.access_ttl_secs,
            config.refresh_ttl_secs,
        )
    }

    /// Refresh Token 수명 (cookie Max-Age와 동일)
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    /// Access Token 발급 (짧은 수명)
    /// Generate Access Token (short lifetime)
    pub fn generate_access_token(&self, user_id: u64) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, self.access_ttl_secs);

        encode(&Header::default(), &claims, &self.access_encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Refresh Token 발급 (긴 수명, 해시를 DB에 저장할 것)
    /// Generate Refresh Token (long lifetime, its hash is stored in DB)
    pub fn generate_refresh_token(&self, user_id: u64) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, self.refresh_ttl_secs);

        encode(&Header::default(), &claims, &self.refresh_encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate refresh token: {}", e)))
    }

    /// Refresh Token 해싱 (DB 저장용)
    /// Hash Refresh Token (for database storage)
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Access Token 검증
    /// Verify Access Token (signature + expiry)
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.access_decoding_key, &Self::validation())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Refresh Token 검증
    /// Verify Refresh Token. Any failure is a forbidden session.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.refresh_decoding_key, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AuthError::Forbidden("Refresh token expired".to_string())
                }
                _ => AuthError::Forbidden("Refresh token tampered or invalid".to_string()),
            })
    }

    // 만료 시간은 정확히 적용 (leeway 없음)
    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}
