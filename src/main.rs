use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use catalog_api::config::AppConfig;
use catalog_api::routes::build_app;
use catalog_api::shared::database::{Database, MemoryUserRepository, PgUserRepository, UserStore};
use catalog_api::shared::services::AppState;

// Import models for OpenAPI schema
use catalog_api::domains::auth::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        catalog_api::domains::auth::handlers::auth_handler::register,
        catalog_api::domains::auth::handlers::auth_handler::login,
        catalog_api::domains::auth::handlers::auth_handler::refresh,
        catalog_api::domains::auth::handlers::auth_handler::logout,
        catalog_api::domains::auth::handlers::auth_handler::get_me
    ),
    components(schemas(
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        SessionResponse,
        UserSummary
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Authentication API endpoints")
    ),
    info(
        title = "Catalog API Server",
        description = "Authentication API for the construction-materials catalog",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // 사용자 저장소: DATABASE_URL이 있으면 PostgreSQL, 없으면 in-memory
    let store: Arc<dyn UserStore> = match config.database_url.as_deref() {
        Some(db_url) => {
            let db = Database::new(db_url).await?;
            db.initialize().await?;
            info!("Using PostgreSQL user store");
            Arc::new(PgUserRepository::new(db.pool().clone()))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory user store (data is lost on restart)");
            Arc::new(MemoryUserRepository::new())
        }
    };

    let port = config.port;
    let app_state = AppState::new(config, store);

    // Router 생성
    let app = build_app(app_state)?
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Server running on http://localhost:{}", port);
    info!("Swagger UI available at http://localhost:{}/api", port);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
