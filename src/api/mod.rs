//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the Mercato catalog
//! backend:
//! - User/token API endpoints
//! - Article API endpoints (CRUD, image upload, import)
//! - Category API endpoints
//! - Attribute variant API endpoints
//! - Multi-step form demo endpoints

pub mod articles;
pub mod attribute_variants;
pub mod categories;
pub mod middleware;
pub mod msf;
pub mod users;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Protected routes (require a valid token)
    let protected_routes = Router::new()
        .merge(users::protected_router())
        .merge(articles::router())
        .nest("/categories", categories::router())
        .nest("/attribute-variants", attribute_variants::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .merge(users::public_router())
        .nest("/msf", msf::router())
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
