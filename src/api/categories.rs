//! Category API endpoints
//!
//! Handles HTTP requests for category management:
//! - GET /api/v1/categories - List the user's categories
//! - PATCH /api/v1/categories/{id} - Rename
//! - DELETE /api/v1/categories/{id} - Delete
//!
//! There is no create endpoint: categories come into existence through
//! nested article writes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::services::CategoryServiceError;

/// Query parameters for listing categories
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `1` restricts the listing to categories assigned to an article
    pub assigned_only: Option<String>,
}

/// Category response shape
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<crate::models::Category> for CategoryResponse {
    fn from(category: crate::models::Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Request body for renaming a category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
}

/// Build the categories router (all routes require auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route(
            "/{id}",
            axum::routing::patch(update_category).delete(delete_category),
        )
}

/// Parse the `assigned_only` flag: absent or `0` is false, `1` is true,
/// anything else is a validation error.
pub(crate) fn parse_assigned_only(raw: Option<&str>) -> Result<bool, ApiError> {
    match raw {
        None => Ok(false),
        Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(other) => Err(ApiError::validation_error(format!(
            "Invalid assigned_only value: {}",
            other
        ))),
    }
}

/// GET /api/v1/categories - List the user's categories
async fn list_categories(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let assigned_only = parse_assigned_only(query.assigned_only.as_deref())?;

    let categories = state
        .category_service
        .list(user.0.id, assigned_only)
        .await
        .map_err(map_category_error)?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// PATCH /api/v1/categories/{id} - Rename a category
async fn update_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let updated = state
        .category_service
        .update(user.0.id, id, &body.name)
        .await
        .map_err(map_category_error)?;

    Ok(Json(updated.into()))
}

/// DELETE /api/v1/categories/{id} - Delete a category
async fn delete_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .category_service
        .delete(user.0.id, id)
        .await
        .map_err(map_category_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn map_category_error(e: CategoryServiceError) -> ApiError {
    match e {
        CategoryServiceError::NotFound(msg) => ApiError::not_found(msg),
        CategoryServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        CategoryServiceError::InternalError(e) => {
            tracing::error!("Category service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assigned_only() {
        assert!(!parse_assigned_only(None).unwrap());
        assert!(!parse_assigned_only(Some("0")).unwrap());
        assert!(parse_assigned_only(Some("1")).unwrap());
        assert!(parse_assigned_only(Some("yes")).is_err());
        assert!(parse_assigned_only(Some("2")).is_err());
    }
}
