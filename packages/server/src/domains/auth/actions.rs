//! Account operations shared by the HTTP handlers.

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::jwt::JwtService;
use super::models::{NewUser, OAuthAccount, User};
use super::oauth::GoogleOAuthClient;
use super::password::{hash_password, verify_password};
use super::store::{StoreError, UserStore};

pub const GOOGLE_PROVIDER: &str = "google";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("User already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Google OAuth is not configured")]
    OAuthNotConfigured,

    #[error("OAuth provider returned an error: {0}")]
    Provider(String),

    #[error("Missing authorization code")]
    MissingCode,

    #[error("OAuth token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Google account has no email")]
    NoEmail,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Value of the `error` query parameter on the sign-in page after a
    /// failed OAuth round trip.
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            AuthError::Provider(_) => "oauth_error",
            AuthError::MissingCode => "missing_code",
            AuthError::TokenExchange(_) => "token_error",
            AuthError::NoEmail => "no_email",
            _ => "server_error",
        }
    }
}

/// A user plus a freshly issued token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue(user: User, jwt: &JwtService) -> Result<AuthSession, AuthError> {
    let token = jwt.create_token(user.id, user.email.clone())?;
    Ok(AuthSession { user, token })
}

/// Register a password account.
pub async fn signup(
    name: &str,
    email: &str,
    password: &str,
    store: &dyn UserStore,
    jwt: &JwtService,
) -> Result<AuthSession, AuthError> {
    let name = name.trim();
    let email = normalize_email(email);
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AuthError::AlreadyExists);
    }

    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let user = store
        .create_user(NewUser {
            name: name.to_string(),
            email,
            password_hash: Some(password_hash),
            image: None,
            email_verified: None,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateEmail => AuthError::AlreadyExists,
            other => other.into(),
        })?;

    info!(user_id = %user.id, "User signed up");
    issue(user, jwt)
}

/// Password sign-in. Unknown emails, wrong passwords and OAuth-only
/// accounts all fail the same way.
pub async fn login(
    email: &str,
    password: &str,
    store: &dyn UserStore,
    jwt: &JwtService,
) -> Result<AuthSession, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    let Some(stored_hash) = user.password_hash.clone() else {
        return Err(AuthError::InvalidCredentials);
    };

    let password = password.to_string();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(anyhow::Error::from)?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    info!(user_id = %user.id, "User logged in");
    issue(user, jwt)
}

/// The user a verified token belongs to.
pub async fn current_user(user_id: Uuid, store: &dyn UserStore) -> Result<User, AuthError> {
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or(AuthError::Unauthorized)
}

/// Complete a Google sign-in: exchange the code, find or create the user
/// by email, and record the linked account.
pub async fn oauth_login(
    code: &str,
    oauth: &GoogleOAuthClient,
    store: &dyn UserStore,
    jwt: &JwtService,
) -> Result<AuthSession, AuthError> {
    if code.is_empty() {
        return Err(AuthError::MissingCode);
    }

    let tokens = oauth.exchange_code(code).await?;
    let profile = oauth.fetch_profile(&tokens.access_token).await?;

    let email = profile
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or(AuthError::NoEmail)?;

    let user = match store.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            let name = profile
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
            let user = store
                .create_user(NewUser {
                    name,
                    email: email.clone(),
                    password_hash: None,
                    image: profile.picture.clone(),
                    email_verified: Some(Utc::now()),
                })
                .await?;
            info!(user_id = %user.id, "User created from Google sign-in");
            user
        }
    };

    store
        .upsert_oauth_account(OAuthAccount {
            user_id: user.id,
            provider: GOOGLE_PROVIDER.to_string(),
            provider_account_id: profile.id.clone().unwrap_or_else(|| email.clone()),
            access_token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_in.map(|secs| Utc::now().timestamp() + secs),
            token_type: tokens.token_type.or_else(|| Some("Bearer".to_string())),
            scope: tokens.scope,
            id_token: tokens.id_token,
        })
        .await?;

    issue(user, jwt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::MemoryUserStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn jwt() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        let session = signup("Ada", " Ada@Example.com ", "pw-123", &store, &jwt)
            .await
            .unwrap();
        assert_eq!(session.user.email, "ada@example.com");
        let claims = jwt.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);

        let again = login("ada@example.com", "pw-123", &store, &jwt).await.unwrap();
        assert_eq!(again.user.id, session.user.id);
    }

    #[tokio::test]
    async fn test_signup_validation_and_conflict() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        let err = signup("", "a@b.com", "pw", &store, &jwt).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));

        signup("Ada", "a@b.com", "pw", &store, &jwt).await.unwrap();
        let err = signup("Ada", "A@B.com", "pw", &store, &jwt).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryUserStore::new();
        let jwt = jwt();
        signup("Ada", "a@b.com", "pw", &store, &jwt).await.unwrap();
        store
            .create_user(NewUser {
                name: "Oauth".into(),
                email: "o@b.com".into(),
                password_hash: None,
                image: None,
                email_verified: Some(Utc::now()),
            })
            .await
            .unwrap();

        for (email, password) in [("a@b.com", "wrong"), ("nobody@b.com", "pw"), ("o@b.com", "pw")] {
            let err = login(email, password, &store, &jwt).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials), "{}", email);
        }
    }

    #[tokio::test]
    async fn test_oauth_login_creates_user_and_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29", "refresh_token": "r1", "expires_in": 60
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "g-42", "email": "grace@example.com", "picture": "https://img/g.png"
            })))
            .mount(&server)
            .await;

        let oauth = GoogleOAuthClient::new("id", "secret", "http://localhost/cb").with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/userinfo", server.uri()),
        );
        let store = MemoryUserStore::new();

        let session = oauth_login("code-1", &oauth, &store, &jwt()).await.unwrap();
        assert_eq!(session.user.name, "grace");
        assert!(session.user.email_verified.is_some());
        assert!(session.user.password_hash.is_none());

        // Second sign-in reuses the user and refreshes the account
        let again = oauth_login("code-2", &oauth, &store, &jwt()).await.unwrap();
        assert_eq!(again.user.id, session.user.id);
        let accounts = store.oauth_accounts().await;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].provider_account_id, "g-42");
    }

    #[tokio::test]
    async fn test_oauth_profile_without_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "ya29"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "g-1"})))
            .mount(&server)
            .await;

        let oauth = GoogleOAuthClient::new("id", "secret", "http://localhost/cb").with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/userinfo", server.uri()),
        );
        let err = oauth_login("code", &oauth, &MemoryUserStore::new(), &jwt())
            .await
            .unwrap_err();
        assert_eq!(err.oauth_error_code(), "no_email");
    }

    #[test]
    fn test_oauth_error_codes() {
        assert_eq!(AuthError::MissingCode.oauth_error_code(), "missing_code");
        assert_eq!(AuthError::Provider("denied".into()).oauth_error_code(), "oauth_error");
        assert_eq!(AuthError::TokenExchange("x".into()).oauth_error_code(), "token_error");
        assert_eq!(AuthError::Unauthorized.oauth_error_code(), "server_error");
    }
}
