use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use crate::domains::auth::models::user::{NewUser, User};
use crate::shared::database::repositories::auth::UserStore;

/// In-memory 사용자 저장소
/// Used when no DATABASE_URL is configured, and by the tests.
/// 모든 변경은 하나의 write lock 안에서 수행
pub struct MemoryUserRepository {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 저장된 사용자 수
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_refresh_token(&self, token_hash: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.refresh_token_hash.as_deref() == Some(token_hash))
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == new_user.email) {
            return Ok(None);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let user = User {
            id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());

        Ok(Some(user))
    }

    async fn update_refresh_token(&self, user_id: u64, token_hash: Option<&str>) -> Result<()> {
        let mut users = self.users.write();

        // refresh token 해시는 UNIQUE (PostgreSQL 제약과 동일)
        if let Some(hash) = token_hash {
            if users
                .values()
                .any(|u| u.id != user_id && u.refresh_token_hash.as_deref() == Some(hash))
            {
                bail!("Refresh token already assigned to another user");
            }
        }

        if let Some(user) = users.get_mut(&user_id) {
            user.refresh_token_hash = token_hash.map(str::to_string);
            user.updated_at = Utc::now();
        }

        Ok(())
    }

    async fn replace_refresh_token(&self, user_id: u64, current_hash: &str, new_hash: &str) -> Result<bool> {
        let mut users = self.users.write();

        if users
            .values()
            .any(|u| u.id != user_id && u.refresh_token_hash.as_deref() == Some(new_hash))
        {
            bail!("Refresh token already assigned to another user");
        }

        match users.get_mut(&user_id) {
            Some(user) if user.refresh_token_hash.as_deref() == Some(current_hash) => {
                user.refresh_token_hash = Some(new_hash.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, token_hash: &str) -> Result<u64> {
        let mut users = self.users.write();
        let mut cleared = 0;
        for user in users.values_mut() {
            if user.refresh_token_hash.as_deref() == Some(token_hash) {
                user.refresh_token_hash = None;
                user.updated_at = Utc::now();
                cleared += 1;
            }
        }

        Ok(cleared)
    }
}
