//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    analyze_website_handler, generate_presentation_handler, google_callback_handler,
    google_redirect_handler, health_handler, login_handler, me_handler, scrape_website_handler,
    signup_handler,
};

/// Upper bound for a whole request, including the one-hop scrape fetches.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    /// Public base URL of the web client; OAuth redirects land here
    pub app_url: String,
}

fn api_routes() -> Router {
    Router::new()
        .route("/analyze/website", post(analyze_website_handler))
        .route("/scrape-website", post(scrape_website_handler))
        .route("/generate-presentation", post(generate_presentation_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/me", get(me_handler))
        .route("/auth/google", get(google_redirect_handler))
        .route("/auth/google/callback", get(google_callback_handler))
}

/// Build the Axum application router
///
/// Every endpoint is served both at the root and under `/api`.
pub fn build_app(deps: Arc<ServerDeps>, app_url: impl Into<String>) -> Router {
    let jwt_service = deps.jwt_service.clone();
    let app_state = AxumAppState {
        deps,
        app_url: app_url.into().trim_end_matches('/').to_string(),
    };

    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
