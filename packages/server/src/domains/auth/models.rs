use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored user row. OAuth-only accounts have no password hash.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub image: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Already normalized (trimmed, lowercased)
    pub email: String,
    pub password_hash: Option<String>,
    pub image: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
}

/// Link between a user and an external identity provider account.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthAccount {
    pub user_id: Uuid,
    pub provider: String,
    pub provider_account_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Unix seconds
    pub expires_at: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
}

/// User as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for SanitizedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_user_drops_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: Some("$argon2id$secret".into()),
            image: None,
            email_verified: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(SanitizedUser::from(&user)).unwrap();
        assert_eq!(value["email"], "ada@example.com");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("emailVerified").is_some());
        assert!(!value.to_string().contains("argon2"));
    }
}
