//! User persistence.
//!
//! `MemoryUserStore` backs local development and tests; `PostgresUserStore`
//! is used whenever a database URL is configured.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewUser, OAuthAccount, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email is already registered")]
    DuplicateEmail,

    #[error("user store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Short label reported by the health endpoint
    fn kind(&self) -> &'static str;

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert the account, or refresh its tokens when the provider identity
    /// is already linked.
    async fn upsert_oauth_account(&self, account: OAuthAccount) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
    accounts: RwLock<HashMap<(String, String), OAuthAccount>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn oauth_accounts(&self) -> Vec<OAuthAccount> {
        self.accounts.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            image: new_user.image,
            email_verified: new_user.email_verified,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn upsert_oauth_account(&self, account: OAuthAccount) -> Result<(), StoreError> {
        let key = (account.provider.clone(), account.provider_account_id.clone());
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&key) {
            Some(existing) => {
                existing.access_token = account.access_token;
                existing.refresh_token = account.refresh_token.or(existing.refresh_token.take());
                existing.expires_at = account.expires_at;
            }
            None => {
                accounts.insert(key, account);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Postgres store
// =============================================================================

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, image, email_verified, created_at, updated_at";

#[async_trait]
impl UserStore for PostgresUserStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let query = format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, image, email_verified)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.image)
            .bind(new_user.email_verified)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
                _ => StoreError::Database(e),
            })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn upsert_oauth_account(&self, account: OAuthAccount) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO oauth_accounts (
                provider, provider_account_id, user_id, access_token, refresh_token,
                expires_at, token_type, scope, id_token
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (provider, provider_account_id) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                refresh_token = COALESCE(EXCLUDED.refresh_token, oauth_accounts.refresh_token),
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()
            "#,
        )
        .bind(&account.provider)
        .bind(&account.provider_account_id)
        .bind(account.user_id)
        .bind(&account.access_token)
        .bind(&account.refresh_token)
        .bind(account.expires_at)
        .bind(&account.token_type)
        .bind(&account.scope)
        .bind(&account.id_token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        match tokio::time::timeout(
            Duration::from_secs(5),
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(StoreError::Unavailable("query timeout (>5s)".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: email.into(),
            password_hash: None,
            image: None,
            email_verified: None,
        }
    }

    fn google_account(user_id: Uuid, access: &str, refresh: Option<&str>) -> OAuthAccount {
        OAuthAccount {
            user_id,
            provider: "google".into(),
            provider_account_id: "g-123".into(),
            access_token: Some(access.into()),
            refresh_token: refresh.map(Into::into),
            expires_at: Some(100),
            token_type: Some("Bearer".into()),
            scope: None,
            id_token: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_create_and_find() {
        let store = MemoryUserStore::new();
        let user = store.create_user(new_user("ada@example.com")).await.unwrap();

        let by_email = store.find_user_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email.as_ref().map(|u| u.id), Some(user.id));

        let by_id = store.find_user_by_id(user.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.email), Some("ada@example.com".to_string()));

        assert!(store.find_user_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create_user(new_user("ada@example.com")).await.unwrap();
        let err = store.create_user(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_memory_store_upsert_keeps_refresh_token() {
        let store = MemoryUserStore::new();
        let user_id = Uuid::new_v4();

        store
            .upsert_oauth_account(google_account(user_id, "first", Some("refresh")))
            .await
            .unwrap();
        store
            .upsert_oauth_account(google_account(user_id, "second", None))
            .await
            .unwrap();

        let accounts = store.oauth_accounts().await;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].access_token.as_deref(), Some("second"));
        assert_eq!(accounts[0].refresh_token.as_deref(), Some("refresh"));
    }
}
