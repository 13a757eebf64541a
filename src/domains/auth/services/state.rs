// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;
use crate::shared::database::UserStore;
use crate::domains::auth::services::{AuthService, JwtService};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
}

impl AuthState {
    /// Create AuthState with a user store and JWT service
    /// AuthState 생성 (사용자 저장소와 JWT 서비스 필요)
    pub fn new(store: Arc<dyn UserStore>, jwt_service: JwtService, rotate_refresh_tokens: bool) -> Self {
        Self {
            auth_service: AuthService::new(store, jwt_service.clone(), rotate_refresh_tokens),
            jwt_service,
        }
    }
}
