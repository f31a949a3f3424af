//! Password and Google sign-in endpoints.

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::{
        header::{LOCATION, SET_COOKIE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domains::auth::{
    current_user, login, oauth_login, signup, AuthError, AuthSession, SanitizedUser,
    TOKEN_TTL_DAYS,
};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: SanitizedUser,
    pub token: String,
}

impl AuthResponse {
    fn new(message: &'static str, session: AuthSession) -> Self {
        Self {
            message,
            user: SanitizedUser::from(&session.user),
            token: session.token,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// POST /auth/signup
pub async fn signup_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = body?;
    let session = signup(
        &request.name,
        &request.email,
        &request.password,
        state.deps.user_store.as_ref(),
        &state.deps.jwt_service,
    )
    .await?;
    Ok(Json(AuthResponse::new("User created successfully", session)))
}

/// POST /auth/login
pub async fn login_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = body?;
    let session = login(
        &request.email,
        &request.password,
        state.deps.user_store.as_ref(),
        &state.deps.jwt_service,
    )
    .await?;
    Ok(Json(AuthResponse::new("Login successful", session)))
}

/// GET /auth/me
pub async fn me_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<SanitizedUser>, ApiError> {
    let Some(Extension(auth_user)) = auth_user else {
        return Err(AuthError::Unauthorized.into());
    };
    let user = current_user(auth_user.user_id, state.deps.user_store.as_ref()).await?;
    Ok(Json(SanitizedUser::from(&user)))
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// GET /auth/google
pub async fn google_redirect_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Response, ApiError> {
    let oauth = state
        .deps
        .google_oauth
        .as_ref()
        .ok_or(AuthError::OAuthNotConfigured)?;
    let url = oauth.authorization_url().map_err(AuthError::from)?;
    Ok(found(&url))
}

/// GET /auth/google/callback
///
/// Never answers with an error body: every failure becomes a redirect to the
/// sign-in page with a machine-readable `error` code.
pub async fn google_callback_handler(
    Extension(state): Extension<AxumAppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> Response {
    let result = match (params.error, params.code) {
        (Some(error), _) => Err(AuthError::Provider(error)),
        (None, None) => Err(AuthError::MissingCode),
        (None, Some(code)) => match &state.deps.google_oauth {
            Some(oauth) => {
                oauth_login(
                    &code,
                    oauth,
                    state.deps.user_store.as_ref(),
                    &state.deps.jwt_service,
                )
                .await
            }
            None => Err(AuthError::OAuthNotConfigured),
        },
    };

    match result {
        Ok(session) => {
            info!(user_id = %session.user.id, "Google sign-in complete");
            let cookie = format!(
                "token={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
                session.token,
                TOKEN_TTL_DAYS * 24 * 60 * 60
            );
            (
                StatusCode::FOUND,
                [
                    (LOCATION, format!("{}/dashboard", state.app_url)),
                    (SET_COOKIE, cookie),
                ],
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Google sign-in failed");
            found(&format!(
                "{}/auth?error={}",
                state.app_url,
                e.oauth_error_code()
            ))
        }
    }
}
