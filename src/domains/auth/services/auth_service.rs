use std::sync::Arc;
use crate::shared::database::UserStore;
use crate::domains::auth::models::{LoginRequest, NewUser, RegisterRequest, UserSummary};
use crate::domains::auth::services::JwtService;
use crate::domains::auth::services::password::{
    hash_password, is_strong_password, verify_password, verify_unknown_user,
};
use crate::shared::errors::AuthError;
use tracing::{info, warn};

/// 로그인 결과: Access Token은 body로, Refresh Token은 cookie로 전달
/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// 토큰 갱신 결과
/// `refresh_token` is Some only when rotation is enabled
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: UserSummary,
}

// 인증 서비스
// AuthService: credential verification, token issuance and revocation
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    jwt_service: JwtService,
    rotate_refresh_tokens: bool,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, jwt_service: JwtService, rotate_refresh_tokens: bool) -> Self {
        Self {
            store,
            jwt_service,
            rotate_refresh_tokens,
        }
    }

    // 회원가입 (비즈니스 로직)
    pub async fn register(&self, request: RegisterRequest) -> Result<UserSummary, AuthError> {
        // 1. 필수 필드 확인
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".to_string()));
        }

        // 2. 비밀번호 강도 확인
        if !is_strong_password(&request.password) {
            return Err(AuthError::WeakPassword);
        }

        // 3. 이메일 중복 확인 (해싱 비용을 피하기 위해 먼저 확인)
        let existing_user = self
            .store
            .find_by_email(&request.email)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to check email existence: {}", e)))?;

        if existing_user.is_some() {
            return Err(AuthError::EmailAlreadyExists { email: request.email });
        }

        // 4. 비밀번호 해싱 후 생성 (동시 가입은 store가 원자적으로 거절)
        let password_hash = hash_password(&request.password)?;
        let user = self
            .store
            .create(NewUser {
                email: request.email.clone(),
                password_hash,
                name: request.name,
            })
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to create user: {}", e)))?
            .ok_or(AuthError::EmailAlreadyExists { email: request.email })?;

        info!(user_id = user.id, "User registered");
        Ok(user.into())
    }

    // 로그인 (비즈니스 로직)
    // 이메일 없음 / 비밀번호 불일치는 같은 에러로 응답
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AuthError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".to_string()));
        }

        // 1. 이메일로 사용자 조회
        let user = self
            .store
            .find_by_email(&request.email)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?;

        let user = match user {
            Some(u) => u,
            None => {
                warn!("Login rejected: invalid credentials");
                return Err(verify_unknown_user(&request.password));
            }
        };

        // 2. 비밀번호 검증
        if let Err(e) = verify_password(&request.password, &user.password_hash) {
            if matches!(e, AuthError::InvalidCredentials) {
                warn!(user_id = user.id, "Login rejected: invalid credentials");
            }
            return Err(e);
        }

        // 3. 토큰 발급
        let access_token = self.jwt_service.generate_access_token(user.id)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id)?;

        // 4. Refresh Token 저장 (이전 값 덮어쓰기 = 이전 세션 종료)
        let token_hash = self.jwt_service.hash_refresh_token(&refresh_token);
        self.store
            .update_refresh_token(user.id, Some(&token_hash))
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to store refresh token: {}", e)))?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginOutcome {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    /// Refresh Token 검증 및 새 Access Token 발급
    /// Verify refresh token and issue new access token
    pub async fn refresh_session(&self, refresh_token: Option<&str>) -> Result<RefreshOutcome, AuthError> {
        // 1. cookie 확인
        let refresh_token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Unauthenticated("No refresh cookie".to_string()))?;

        // 2. 저장된 값과 일치하는 사용자 조회 (로그아웃, 재로그인, 위조 토큰은 여기서 거절)
        let token_hash = self.jwt_service.hash_refresh_token(refresh_token);
        let user = self
            .store
            .find_by_refresh_token(&token_hash)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to find refresh token: {}", e)))?;

        let user = match user {
            Some(u) => u,
            None => {
                warn!("Refresh rejected: token not held by any user");
                return Err(AuthError::Forbidden("Refresh token is not recognised".to_string()));
            }
        };

        // 3. 서명 / 만료 검증, 토큰의 사용자와 레코드의 사용자 일치 확인
        let claims = self.jwt_service.verify_refresh_token(refresh_token).map_err(|e| {
            warn!(user_id = user.id, error = %e, "Refresh rejected: verification failed");
            e
        })?;

        if claims.user_id != user.id {
            warn!(user_id = user.id, token_user_id = claims.user_id, "Refresh rejected: token user mismatch");
            return Err(AuthError::Forbidden("Refresh token tampered or invalid".to_string()));
        }

        // 4. 새 Access Token 발급
        let access_token = self.jwt_service.generate_access_token(user.id)?;

        // 5. Rotation 정책이 켜져 있으면 Refresh Token 교체
        let refresh_token = if self.rotate_refresh_tokens {
            let new_refresh_token = self.jwt_service.generate_refresh_token(user.id)?;
            let new_hash = self.jwt_service.hash_refresh_token(&new_refresh_token);
            // 조회 이후 다른 refresh / 로그인이 값을 바꿨다면 교체하지 않음
            let replaced = self
                .store
                .replace_refresh_token(user.id, &token_hash, &new_hash)
                .await
                .map_err(|e| AuthError::DatabaseError(format!("Failed to rotate refresh token: {}", e)))?;
            if !replaced {
                warn!(user_id = user.id, "Refresh rejected: token replaced concurrently");
                return Err(AuthError::Forbidden("Refresh token is not recognised".to_string()));
            }
            Some(new_refresh_token)
        } else {
            None
        };

        Ok(RefreshOutcome {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    /// 로그아웃 - Refresh Token 무효화
    /// Logout. Idempotent: missing or unknown tokens still succeed.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let refresh_token = match refresh_token.filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => return Ok(()),
        };

        let token_hash = self.jwt_service.hash_refresh_token(refresh_token);
        let cleared = self
            .store
            .clear_refresh_token(&token_hash)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to revoke refresh token: {}", e)))?;

        info!(sessions_cleared = cleared, "User logged out");
        Ok(())
    }

    pub async fn get_user_info(&self, user_id: u64) -> Result<UserSummary, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::InvalidToken)?; // 사용자가 없으면 InvalidToken 에러

        Ok(user.into())
    }
}
