use axum::body::Body;
use axum::http::{header::AUTHORIZATION, HeaderMap, Request};
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domains::auth::{Claims, JwtService};

/// Caller identity taken from a valid session token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Attach an [`AuthUser`] when the request carries a valid token.
///
/// Anonymous requests pass through; handlers that need a user reject them.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(user) = authenticate(request.headers(), &jwt_service) {
        debug!(user_id = %user.user_id, "Authenticated request");
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// `Authorization: Bearer <token>`; a bare token is accepted too.
fn authenticate(headers: &HeaderMap, jwt_service: &JwtService) -> Option<AuthUser> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    jwt_service.verify_token(token).ok().map(AuthUser::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(authorization: Option<String>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = authorization {
            headers.insert(AUTHORIZATION, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn test_bearer_and_bare_tokens() {
        let jwt = JwtService::new("test_secret", "test_issuer".to_string());
        let user_id = Uuid::new_v4();
        let token = jwt.create_token(user_id, "ada@example.com".into()).unwrap();

        let user = authenticate(&headers(Some(format!("Bearer {}", token))), &jwt).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "ada@example.com");

        let user = authenticate(&headers(Some(token)), &jwt);
        assert_eq!(user.map(|u| u.user_id), Some(user_id));
    }

    #[test]
    fn test_missing_or_bad_tokens_are_anonymous() {
        let jwt = JwtService::new("test_secret", "test_issuer".to_string());
        let foreign = JwtService::new("test_secret", "someone_else".to_string())
            .create_token(Uuid::new_v4(), "ada@example.com".into())
            .unwrap();

        assert!(authenticate(&headers(None), &jwt).is_none());
        assert!(authenticate(&headers(Some("Bearer invalid_token".into())), &jwt).is_none());
        assert!(authenticate(&headers(Some(format!("Bearer {}", foreign))), &jwt).is_none());
    }
}
