//! Google OAuth 2.0 authorization code flow.

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::actions::AuthError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const GOOGLE_SCOPES: &str = "openid email profile";

/// Token endpoint response. Only the access token is required.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    token_type: Option<String>,
    scope: Option<String>,
    id_token: Option<String>,
    error: Option<String>,
}

/// Userinfo endpoint response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleProfile {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Clone)]
pub struct GoogleOAuthClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    /// Point the token and userinfo calls somewhere else (tests, proxies).
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.userinfo_url = userinfo_url.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    /// Consent screen URL the browser is sent to.
    pub fn authorization_url(&self) -> anyhow::Result<String> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPES),
            ],
        )
        .context("Invalid OAuth authorization URL")?;
        Ok(url.to_string())
    }

    /// Trade an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, AuthError> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .context("OAuth token request failed")?;

        let status = response.status();
        let raw: RawTokenResponse = response
            .json()
            .await
            .context("OAuth token response was not JSON")?;

        let Some(access_token) = raw.access_token.filter(|t| !t.is_empty()) else {
            warn!(status = %status, error = ?raw.error, "Failed to get access token");
            return Err(AuthError::TokenExchange(
                raw.error.unwrap_or_else(|| format!("status {}", status)),
            ));
        };

        debug!("OAuth code exchanged");
        Ok(GoogleTokens {
            access_token,
            refresh_token: raw.refresh_token,
            expires_in: raw.expires_in,
            token_type: raw.token_type,
            scope: raw.scope,
            id_token: raw.id_token,
        })
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, AuthError> {
        let profile = self
            .http_client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Userinfo request failed")?
            .json::<GoogleProfile>()
            .await
            .context("Userinfo response was not JSON")?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GoogleOAuthClient {
        GoogleOAuthClient::new("client-1", "secret-1", "http://localhost:3000/api/auth/google/callback")
            .with_endpoints(
                format!("{}/token", server.uri()),
                format!("{}/userinfo", server.uri()),
            )
    }

    #[test]
    fn test_authorization_url_parameters() {
        let oauth = GoogleOAuthClient::new("client-1", "secret-1", "http://localhost:3000/api/auth/google/callback");
        let url = Url::parse(&oauth.authorization_url().unwrap()).unwrap();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(url.path(), "/o/oauth2/v2/auth");
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-1");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["scope"], "openid email profile");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:3000/api/auth/google/callback"
        );
    }

    #[tokio::test]
    async fn test_exchange_code_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let tokens = client(&server).exchange_code("abc").await.unwrap();
        assert_eq!(tokens.access_token, "ya29.token");
        assert_eq!(tokens.expires_in, Some(3599));
    }

    #[tokio::test]
    async fn test_exchange_without_access_token_is_token_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).exchange_code("bad").await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExchange(ref e) if e == "invalid_grant"));
    }

    #[tokio::test]
    async fn test_fetch_profile_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer ya29.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "g-1", "email": "ada@example.com", "name": "Ada", "picture": "https://img/ada.png"
            })))
            .mount(&server)
            .await;

        let profile = client(&server).fetch_profile("ya29.token").await.unwrap();
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
        assert_eq!(profile.id.as_deref(), Some("g-1"));
    }
}
