//! User API endpoints
//!
//! Handles HTTP requests for accounts and tokens:
//! - POST /api/v1/users - Create a user
//! - POST /api/v1/users/token - Issue a token for credentials
//! - GET /api/v1/users/me - Get the authenticated profile
//! - PATCH /api/v1/users/me - Update name/password

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateUserInput, UpdateProfileInput};
use crate::services::UserServiceError;

/// Request body for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Request body for issuing a token
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a freshly issued token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public profile of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub name: String,
    pub email: String,
}

impl From<crate::models::User> for UserResponse {
    fn from(user: crate::models::User) -> Self {
        Self {
            name: user.name,
            email: user.email,
        }
    }
}

/// Request body for updating the authenticated profile
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Build public user routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/token", post(issue_token))
}

/// Build protected user routes (require auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/users/me", get(me).patch(update_me))
}

/// POST /api/v1/users - Create a user
async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_service
        .register(CreateUserInput::new(body.email, body.name, body.password))
        .await
        .map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/v1/users/token - Issue a token for credentials
///
/// Bad credentials are a 400 with a field-level message, matching the
/// behavior of a form-validated token endpoint.
async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let session = state
        .user_service
        .issue_token(&body.email, &body.password)
        .await
        .map_err(|e| match e {
            UserServiceError::AuthenticationError(msg) => ApiError::with_details(
                "VALIDATION_ERROR",
                msg,
                serde_json::json!({"non_field_errors": ["Unable to authenticate with provided credentials"]}),
            ),
            other => map_user_error(other),
        })?;

    Ok(Json(TokenResponse { token: session.id }))
}

/// GET /api/v1/users/me - Get the authenticated profile
async fn me(user: AuthenticatedUser) -> Json<UserResponse> {
    Json(user.0.into())
}

/// PATCH /api/v1/users/me - Update the authenticated profile
async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state
        .user_service
        .update_profile(
            user.0,
            UpdateProfileInput {
                name: body.name,
                password: body.password,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(updated.into()))
}

fn map_user_error(e: UserServiceError) -> ApiError {
    match e {
        UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        UserServiceError::UserExists(msg) => ApiError::validation_error(msg),
        UserServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
        UserServiceError::InternalError(e) => {
            tracing::error!("User service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}
