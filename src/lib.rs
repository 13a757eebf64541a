// Construction-materials catalog API: authentication core
// 서버 (Credential & Session Service) 와 클라이언트 (Session Client)

pub mod client;
pub mod config;
pub mod domains;
pub mod routes;
pub mod shared;

pub use config::AppConfig;
pub use routes::{build_app, create_router};
pub use shared::services::AppState;
