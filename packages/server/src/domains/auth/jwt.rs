use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tokens and the OAuth cookie both live this long
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Session token payload.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

/// Signs and checks HS256 session tokens for one issuer.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    pub fn create_token(&self, user_id: Uuid, email: String) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email,
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Claims of a token signed by us, for our issuer, not yet expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }
}
