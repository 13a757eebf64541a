use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use crate::domains::auth::models::user::{NewUser, User};

/// 사용자 저장소 인터페이스
/// User store consumed by the auth service. Every operation touches a single record atomically.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 이메일로 사용자 조회 (대소문자 구분)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: u64) -> Result<Option<User>>;

    /// 저장된 refresh token 해시로 사용자 조회
    async fn find_by_refresh_token(&self, token_hash: &str) -> Result<Option<User>>;

    /// 사용자 생성. 이메일이 이미 있으면 None
    async fn create(&self, new_user: NewUser) -> Result<Option<User>>;

    /// 사용자의 refresh token 해시 덮어쓰기 (None이면 삭제)
    async fn update_refresh_token(&self, user_id: u64, token_hash: Option<&str>) -> Result<()>;

    /// 저장된 값이 `current_hash`일 때만 `new_hash`로 교체. 교체 여부 반환
    async fn replace_refresh_token(&self, user_id: u64, current_hash: &str, new_hash: &str) -> Result<bool>;

    /// 해당 refresh token 해시를 가진 레코드에서 값을 삭제. 삭제된 레코드 수 반환
    async fn clear_refresh_token(&self, token_hash: &str) -> Result<u64>;
}

// PostgreSQL 사용자 저장소
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_user(row: &PgRow) -> User {
        User {
            id: row.get::<i64, _>("id") as u64,
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            name: row.get("name"),
            refresh_token_hash: row.get("refresh_token_hash"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    // 이메일로 사용자 조회 (로그인용)
    // Get user by email (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, name, refresh_token_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(row.as_ref().map(Self::map_user))
    }

    // ID로 사용자 조회
    // Get user by ID
    async fn find_by_id(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, name, refresh_token_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by id")?;

        Ok(row.as_ref().map(Self::map_user))
    }

    async fn find_by_refresh_token(&self, token_hash: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, name, refresh_token_hash, created_at, updated_at
            FROM users
            WHERE refresh_token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by refresh token")?;

        Ok(row.as_ref().map(Self::map_user))
    }

    // 이메일 UNIQUE 제약으로 중복 확인과 삽입을 한 번에 처리
    async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, name, refresh_token_hash, created_at, updated_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.name.as_deref())
        .bind(now)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(row.as_ref().map(Self::map_user))
    }

    async fn update_refresh_token(&self, user_id: u64, token_hash: Option<&str>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id as i64)
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .context("Failed to update refresh token")?;

        Ok(())
    }

    // compare-and-set: 동시 refresh / 로그인이 바꾼 값은 덮어쓰지 않음
    async fn replace_refresh_token(&self, user_id: u64, current_hash: &str, new_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $3, updated_at = NOW()
            WHERE id = $1 AND refresh_token_hash = $2
            "#,
        )
        .bind(user_id as i64)
        .bind(current_hash)
        .bind(new_hash)
        .execute(&self.pool)
        .await
        .context("Failed to replace refresh token")?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_token(&self, token_hash: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = NULL, updated_at = NOW()
            WHERE refresh_token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .context("Failed to clear refresh token")?;

        Ok(result.rows_affected())
    }
}
