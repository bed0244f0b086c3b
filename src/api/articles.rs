//! Article API endpoints
//!
//! Handles HTTP requests for article management:
//! - GET /api/v1/articles - List the user's articles (optional category filter)
//! - POST /api/v1/articles - Create an article with nested associations
//! - GET /api/v1/articles/{id} - Article detail
//! - PUT /api/v1/articles/{id} - Full update
//! - PATCH /api/v1/articles/{id} - Partial update
//! - DELETE /api/v1/articles/{id} - Delete
//! - POST /api/v1/articles/{id}/upload-image - Set the primary image
//! - POST /api/v1/articles/import - Bulk upsert

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use base64::Engine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::config::UploadConfig;
use crate::models::{ArticleDetail, UpdateArticleInput, VariantKind};
use crate::services::article::{
    ArticleChanges, ArticleWrite, AttributePayload, CategoryPayload, ImportOutcome,
};
use crate::services::ArticleServiceError;

/// Subdirectory of the upload root holding article images
const ARTICLE_IMAGE_DIR: &str = "article";

/// Query parameters for listing articles
#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    /// Comma-separated category ids to filter by
    pub categories: Option<String>,
}

/// Nested category reference in a write payload
#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
}

/// Nested attribute variant reference in a write payload
#[derive(Debug, Deserialize)]
pub struct AttributeBody {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: String,
    pub price: Decimal,
}

/// Inline image payload on article writes (base64-encoded bytes)
#[derive(Debug, Deserialize)]
pub struct UploadedImageBody {
    pub filename: String,
    pub data: String,
}

/// Request body for creating an article (also the import item shape)
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub description: String,
    pub variant_kind: Option<VariantKind>,
    pub categories: Option<Vec<CategoryBody>>,
    pub attributes: Option<Vec<AttributeBody>>,
    pub uploaded_images: Option<Vec<UploadedImageBody>>,
}

/// Request body for a full update
#[derive(Debug, Deserialize)]
pub struct FullUpdateRequest {
    pub title: String,
    pub short_description: String,
    pub price: Decimal,
    pub stock: Option<String>,
    pub description: Option<String>,
    pub variant_kind: Option<VariantKind>,
    pub categories: Option<Vec<CategoryBody>>,
    pub attributes: Option<Vec<AttributeBody>>,
    pub uploaded_images: Option<Vec<UploadedImageBody>>,
}

/// Request body for a partial update
#[derive(Debug, Default, Deserialize)]
pub struct PartialUpdateRequest {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<String>,
    pub description: Option<String>,
    pub variant_kind: Option<VariantKind>,
    pub categories: Option<Vec<CategoryBody>>,
    pub attributes: Option<Vec<AttributeBody>>,
    pub uploaded_images: Option<Vec<UploadedImageBody>>,
}

/// Category as embedded in article responses
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

/// Attribute variant as embedded in article responses
#[derive(Debug, Serialize)]
pub struct AttributeResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub price: Decimal,
}

/// Gallery image as embedded in article responses
#[derive(Debug, Serialize)]
pub struct ArticleImageResponse {
    pub id: i64,
    pub image: String,
}

/// Summary shape used in listings (no long description, no primary image)
#[derive(Debug, Serialize)]
pub struct ArticleListItem {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub price: Decimal,
    pub stock: String,
    pub categories: Vec<CategoryResponse>,
    pub attributes: Vec<AttributeResponse>,
    pub images: Vec<ArticleImageResponse>,
}

/// Detail shape (adds description, primary image, variant kind)
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub price: Decimal,
    pub stock: String,
    pub description: String,
    pub image: Option<String>,
    pub variant_kind: Option<VariantKind>,
    pub categories: Vec<CategoryResponse>,
    pub attributes: Vec<AttributeResponse>,
    pub images: Vec<ArticleImageResponse>,
}

fn categories_response(detail: &ArticleDetail) -> Vec<CategoryResponse> {
    detail
        .categories
        .iter()
        .map(|c| CategoryResponse {
            id: c.id,
            name: c.name.clone(),
        })
        .collect()
}

fn attributes_response(detail: &ArticleDetail) -> Vec<AttributeResponse> {
    detail
        .attributes
        .iter()
        .map(|a| AttributeResponse {
            id: a.id,
            kind: a.kind.clone(),
            name: a.name.clone(),
            price: a.price,
        })
        .collect()
}

fn images_response(detail: &ArticleDetail) -> Vec<ArticleImageResponse> {
    detail
        .images
        .iter()
        .map(|i| ArticleImageResponse {
            id: i.id,
            image: i.image.clone(),
        })
        .collect()
}

impl From<ArticleDetail> for ArticleListItem {
    fn from(detail: ArticleDetail) -> Self {
        let categories = categories_response(&detail);
        let attributes = attributes_response(&detail);
        let images = images_response(&detail);
        Self {
            id: detail.article.id,
            title: detail.article.title,
            short_description: detail.article.short_description,
            price: detail.article.price,
            stock: detail.article.stock,
            categories,
            attributes,
            images,
        }
    }
}

impl From<ArticleDetail> for ArticleResponse {
    fn from(detail: ArticleDetail) -> Self {
        let categories = categories_response(&detail);
        let attributes = attributes_response(&detail);
        let images = images_response(&detail);
        Self {
            id: detail.article.id,
            title: detail.article.title,
            short_description: detail.article.short_description,
            price: detail.article.price,
            stock: detail.article.stock,
            description: detail.article.description,
            image: detail.article.image,
            variant_kind: detail.article.variant_kind,
            categories,
            attributes,
            images,
        }
    }
}

/// Response for the primary image upload action
#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub id: i64,
    pub image: String,
}

/// Build the articles router (all routes require auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/articles",
            axum::routing::get(list_articles).post(create_article),
        )
        .route("/articles/import", post(import_articles))
        .route(
            "/articles/{id}",
            axum::routing::get(get_article)
                .put(full_update_article)
                .patch(partial_update_article)
                .delete(delete_article),
        )
        .route("/articles/{id}/upload-image", post(upload_image))
}

/// GET /api/v1/articles - List the user's articles
async fn list_articles(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<Vec<ArticleListItem>>, ApiError> {
    let category_ids = match query.categories.as_deref() {
        Some(raw) => Some(parse_id_list(raw)?),
        None => None,
    };

    let details = state
        .article_service
        .list(user.0.id, category_ids.as_deref())
        .await
        .map_err(map_article_error)?;

    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/articles - Create an article
async fn create_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let write = build_write(&state.upload_config, body).await?;

    let detail = state
        .article_service
        .create(user.0.id, write)
        .await
        .map_err(map_article_error)?;

    Ok((StatusCode::CREATED, Json(ArticleResponse::from(detail))))
}

/// GET /api/v1/articles/{id} - Article detail
async fn get_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let detail = state
        .article_service
        .get(user.0.id, id)
        .await
        .map_err(map_article_error)?;

    Ok(Json(detail.into()))
}

/// PUT /api/v1/articles/{id} - Full update
async fn full_update_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<FullUpdateRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let changes = ArticleChanges {
        fields: UpdateArticleInput {
            title: Some(body.title),
            short_description: Some(body.short_description),
            price: Some(body.price),
            stock: body.stock,
            description: body.description,
            variant_kind: body.variant_kind.map(Some),
        },
        categories: body.categories.map(to_category_payloads),
        attributes: body.attributes.map(to_attribute_payloads),
        uploaded_images: match body.uploaded_images {
            Some(images) => Some(store_inline_images(&state.upload_config, images).await?),
            None => None,
        },
    };

    let detail = state
        .article_service
        .update(user.0.id, id, changes)
        .await
        .map_err(map_article_error)?;

    Ok(Json(detail.into()))
}

/// PATCH /api/v1/articles/{id} - Partial update
async fn partial_update_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<PartialUpdateRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let changes = ArticleChanges {
        fields: UpdateArticleInput {
            title: body.title,
            short_description: body.short_description,
            price: body.price,
            stock: body.stock,
            description: body.description,
            variant_kind: body.variant_kind.map(Some),
        },
        categories: body.categories.map(to_category_payloads),
        attributes: body.attributes.map(to_attribute_payloads),
        uploaded_images: match body.uploaded_images {
            Some(images) => Some(store_inline_images(&state.upload_config, images).await?),
            None => None,
        },
    };

    let detail = state
        .article_service
        .update(user.0.id, id, changes)
        .await
        .map_err(map_article_error)?;

    Ok(Json(detail.into()))
}

/// DELETE /api/v1/articles/{id} - Delete an article
async fn delete_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .article_service
        .delete(user.0.id, id)
        .await
        .map_err(map_article_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/articles/{id}/upload-image - Set the primary image
///
/// Accepts multipart/form-data with a single file field named "image".
async fn upload_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let config = &state.upload_config;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "image" {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !config.is_type_allowed(&content_type) {
            return Err(ApiError::validation_error(format!(
                "Invalid file type: {}. Allowed types: {:?}",
                content_type, config.allowed_types
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::validation_error(format!(
                "File too large. Maximum size: {} MB",
                config.max_file_size / 1024 / 1024
            )));
        }

        let ext = extension_for(&filename, &content_type, config);
        let stored = store_image_file(config, &ext, &data).await?;

        let article = state
            .article_service
            .attach_image(user.0.id, id, &stored)
            .await
            .map_err(map_article_error)?;

        return Ok(Json(UploadImageResponse {
            id: article.id,
            image: article.image.unwrap_or(stored),
        }));
    }

    Err(ApiError::validation_error("No image provided"))
}

/// POST /api/v1/articles/import - Bulk upsert
async fn import_articles(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<Vec<CreateArticleRequest>>,
) -> Result<Json<ImportOutcome>, ApiError> {
    let mut items = Vec::with_capacity(body.len());
    for item in body {
        items.push(build_write(&state.upload_config, item).await?);
    }

    let outcome = state
        .article_service
        .import(user.0.id, items)
        .await
        .map_err(map_article_error)?;

    Ok(Json(outcome))
}

/// Parse a comma-separated id list; any malformed entry is a 400
fn parse_id_list(raw: &str) -> Result<Vec<i64>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ApiError::validation_error(format!("Invalid category id: {}", s)))
        })
        .collect()
}

fn to_category_payloads(bodies: Vec<CategoryBody>) -> Vec<CategoryPayload> {
    bodies
        .into_iter()
        .map(|b| CategoryPayload { name: b.name })
        .collect()
}

fn to_attribute_payloads(bodies: Vec<AttributeBody>) -> Vec<AttributePayload> {
    bodies
        .into_iter()
        .map(|b| AttributePayload {
            kind: b.kind,
            name: b.name,
            price: b.price,
        })
        .collect()
}

/// Turn a create request into a service write, storing inline images
async fn build_write(
    config: &UploadConfig,
    body: CreateArticleRequest,
) -> Result<ArticleWrite, ApiError> {
    let uploaded_images = match body.uploaded_images {
        Some(images) => store_inline_images(config, images).await?,
        None => Vec::new(),
    };

    Ok(ArticleWrite {
        title: body.title,
        short_description: body.short_description,
        price: body.price,
        stock: body.stock,
        description: body.description,
        variant_kind: body.variant_kind,
        categories: body.categories.map(to_category_payloads).unwrap_or_default(),
        attributes: body.attributes.map(to_attribute_payloads).unwrap_or_default(),
        uploaded_images,
    })
}

/// Decode and store base64 image payloads, returning their stored paths
async fn store_inline_images(
    config: &UploadConfig,
    images: Vec<UploadedImageBody>,
) -> Result<Vec<String>, ApiError> {
    let mut stored = Vec::with_capacity(images.len());

    for image in images {
        // Tolerate data-URI payloads by stripping the prefix
        let raw = match image.data.split_once(";base64,") {
            Some((_, payload)) => payload,
            None => image.data.as_str(),
        };

        let data = base64::engine::general_purpose::STANDARD
            .decode(raw)
            .map_err(|_| {
                ApiError::validation_error(format!("Invalid base64 image: {}", image.filename))
            })?;

        if data.is_empty() {
            return Err(ApiError::validation_error(format!(
                "Empty image payload: {}",
                image.filename
            )));
        }
        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::validation_error(format!(
                "Image too large: {}",
                image.filename
            )));
        }

        let ext = extension_for(&image.filename, "", config);
        stored.push(store_image_file(config, &ext, &data).await?);
    }

    Ok(stored)
}

/// Write image bytes under a generated name, returning the relative path
async fn store_image_file(config: &UploadConfig, ext: &str, data: &[u8]) -> Result<String, ApiError> {
    let dir = config.path.join(ARTICLE_IMAGE_DIR);
    ensure_dir(&dir).await?;

    let relative = format!("{}/{}.{}", ARTICLE_IMAGE_DIR, Uuid::new_v4(), ext);
    let file_path = config.path.join(&relative);

    fs::write(&file_path, data)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to save file: {}", e)))?;

    Ok(relative)
}

async fn ensure_dir(path: &PathBuf) -> Result<(), ApiError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to create upload dir: {}", e)))?;
    }
    Ok(())
}

/// Derive a file extension from the filename, falling back to content type
fn extension_for(filename: &str, content_type: &str, config: &UploadConfig) -> String {
    if let Some((_, ext)) = filename.rsplit_once('.') {
        if !ext.is_empty() && ext.len() < 10 {
            return ext.to_lowercase();
        }
    }

    config.get_extension(content_type).to_string()
}

fn map_article_error(e: ArticleServiceError) -> ApiError {
    match e {
        ArticleServiceError::NotFound(msg) => ApiError::not_found(msg),
        ArticleServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ArticleServiceError::InternalError(e) => {
            tracing::error!("Article service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list(" 4 , 5 ").unwrap(), vec![4, 5]);
        assert_eq!(parse_id_list("7").unwrap(), vec![7]);
        assert!(parse_id_list("1,abc").is_err());
        assert!(parse_id_list("1.5").is_err());
    }

    #[test]
    fn test_extension_for() {
        let config = UploadConfig::default();
        assert_eq!(extension_for("photo.JPG", "", &config), "jpg");
        assert_eq!(extension_for("archive.tar.gz", "", &config), "gz");
        assert_eq!(extension_for("noext", "image/png", &config), "png");
        assert_eq!(extension_for("noext", "application/unknown", &config), "bin");
    }
}
