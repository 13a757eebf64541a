use std::sync::Arc;
use crate::config::AppConfig;
use crate::shared::database::UserStore;
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::JwtService;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (설정 + 도메인 상태)
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_state: AuthState,
}

impl AppState {
    /// Create AppState from configuration and a user store
    pub fn new(config: AppConfig, store: Arc<dyn UserStore>) -> Self {
        // 1. 공유 서비스 생성 (JWT)
        let jwt_service = JwtService::from_config(&config);

        // 2. 도메인 State 생성
        let auth_state = AuthState::new(store, jwt_service, config.rotate_refresh_tokens);

        Self {
            config: Arc::new(config),
            auth_state,
        }
    }
}
