// 애플리케이션 설정
// Application configuration loaded from the environment (.env supported)

use anyhow::{bail, Context, Result};
use tracing::warn;

/// 개발용 기본 시크릿 (운영 환경에서는 사용 불가)
/// Development fallback secrets (rejected in production)
const DEV_ACCESS_SECRET: &str = "dev-access-secret-change-in-production";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-change-in-production";

/// Access Token 수명: 15분
const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Refresh Token 수명: 7일
const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Application configuration
/// 서버 실행에 필요한 모든 설정값
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// PostgreSQL URL. None이면 in-memory store 사용
    pub database_url: Option<String>,
    pub access_secret: String,
    pub refresh_secret: String,
    /// "production" 이면 refresh cookie에 Secure 속성 추가
    pub environment: String,
    pub cors_origin: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    /// Refresh 시 refresh token 교체 여부 (기본: false)
    pub rotate_refresh_tokens: bool,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("APP_ENV").unwrap_or_else(|| "development".to_string());
        let production = environment == "production";

        let access_secret = match get("JWT_ACCESS_SECRET") {
            Some(secret) => secret,
            None if production => bail!("JWT_ACCESS_SECRET must be set in production"),
            None => {
                warn!("JWT_ACCESS_SECRET not set, using development secret");
                DEV_ACCESS_SECRET.to_string()
            }
        };
        let refresh_secret = match get("JWT_REFRESH_SECRET") {
            Some(secret) => secret,
            None if production => bail!("JWT_REFRESH_SECRET must be set in production"),
            None => {
                warn!("JWT_REFRESH_SECRET not set, using development secret");
                DEV_REFRESH_SECRET.to_string()
            }
        };
        if access_secret == refresh_secret {
            bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
        }

        let port = match get("PORT") {
            Some(v) => v.parse().with_context(|| format!("Invalid PORT: {}", v))?,
            None => DEFAULT_PORT,
        };
        let access_ttl_secs = parse_ttl(get("ACCESS_TOKEN_TTL_SECS"), "ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_ttl_secs = parse_ttl(get("REFRESH_TOKEN_TTL_SECS"), "REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;
        let rotate_refresh_tokens = match get("REFRESH_TOKEN_ROTATION") {
            Some(v) => parse_bool(&v)
                .with_context(|| format!("Invalid REFRESH_TOKEN_ROTATION: {}", v))?,
            None => false,
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            access_secret,
            refresh_secret,
            environment,
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            access_ttl_secs,
            refresh_ttl_secs,
            rotate_refresh_tokens,
        })
    }

    /// 운영 환경 여부
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_ttl(value: Option<String>, key: &str, default: i64) -> Result<i64> {
    match value {
        Some(v) => {
            let secs: i64 = v.parse().with_context(|| format!("Invalid {}: {}", key, v))?;
            if secs <= 0 {
                bail!("{} must be positive, got {}", key, secs);
            }
            Ok(secs)
        }
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{}'", other),
    }
}
