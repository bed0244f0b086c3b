//! Attribute variant API endpoints
//!
//! Handles HTTP requests for attribute variant management:
//! - GET /api/v1/attribute-variants - List the user's variants
//! - PATCH /api/v1/attribute-variants/{id} - Update name/price
//! - DELETE /api/v1/attribute-variants/{id} - Delete
//!
//! Like categories, variants are created through nested article writes;
//! the kind is fixed once created.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::categories::parse_assigned_only;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::UpdateAttributeVariantInput;
use crate::services::AttributeVariantServiceError;

/// Query parameters for listing variants
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub assigned_only: Option<String>,
}

/// Attribute variant response shape
#[derive(Debug, Serialize)]
pub struct AttributeVariantResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub price: Decimal,
}

impl From<crate::models::AttributeVariant> for AttributeVariantResponse {
    fn from(variant: crate::models::AttributeVariant) -> Self {
        Self {
            id: variant.id,
            kind: variant.kind,
            name: variant.name,
            price: variant.price,
        }
    }
}

/// Request body for updating a variant
#[derive(Debug, Deserialize)]
pub struct UpdateVariantRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

/// Build the attribute variants router (all routes require auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_variants))
        .route(
            "/{id}",
            axum::routing::patch(update_variant).delete(delete_variant),
        )
}

/// GET /api/v1/attribute-variants - List the user's variants
async fn list_variants(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AttributeVariantResponse>>, ApiError> {
    let assigned_only = parse_assigned_only(query.assigned_only.as_deref())?;

    let variants = state
        .attribute_variant_service
        .list(user.0.id, assigned_only)
        .await
        .map_err(map_variant_error)?;

    Ok(Json(variants.into_iter().map(Into::into).collect()))
}

/// PATCH /api/v1/attribute-variants/{id} - Update a variant
async fn update_variant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVariantRequest>,
) -> Result<Json<AttributeVariantResponse>, ApiError> {
    let updated = state
        .attribute_variant_service
        .update(
            user.0.id,
            id,
            UpdateAttributeVariantInput {
                name: body.name,
                price: body.price,
            },
        )
        .await
        .map_err(map_variant_error)?;

    Ok(Json(updated.into()))
}

/// DELETE /api/v1/attribute-variants/{id} - Delete a variant
async fn delete_variant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .attribute_variant_service
        .delete(user.0.id, id)
        .await
        .map_err(map_variant_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn map_variant_error(e: AttributeVariantServiceError) -> ApiError {
    match e {
        AttributeVariantServiceError::NotFound(msg) => ApiError::not_found(msg),
        AttributeVariantServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        AttributeVariantServiceError::InternalError(e) => {
            tracing::error!("Attribute variant service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}
