//! Auth domain - email/password accounts, Google sign-in and session tokens
//!
//! Responsibilities:
//! - Argon2 password hashing
//! - JWT issuing and verification
//! - User persistence behind the `UserStore` trait (memory or Postgres)
//! - Google OAuth code exchange

pub mod actions;
pub mod jwt;
pub mod models;
pub mod oauth;
pub mod password;
pub mod store;

pub use actions::{current_user, login, oauth_login, signup, AuthError, AuthSession};
pub use jwt::{Claims, JwtService, TOKEN_TTL_DAYS};
pub use models::{NewUser, OAuthAccount, SanitizedUser, User};
pub use oauth::{GoogleOAuthClient, GoogleProfile, GoogleTokens};
pub use password::{hash_password, verify_password};
pub use store::{MemoryUserStore, PostgresUserStore, StoreError, UserStore};
