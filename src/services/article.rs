//! Article service
//!
//! Implements business logic for catalog articles:
//! - CRUD scoped to the owning user
//! - Category-id filtering on lists
//! - Nested get-or-create of categories and attribute variants on writes
//! - Gallery image children and the primary image action
//! - Bulk import (upsert by title)
//! - Cache invalidation for article detail reads

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::{
    ArticleImageRepository, ArticleRepository, AttributeVariantRepository, CategoryRepository,
};
use crate::models::{
    Article, ArticleDetail, AttributeVariant, AttributeVariantInput, Category, CreateArticleInput,
    UpdateArticleInput, VariantKind,
};
use anyhow::Context;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Cache TTL for article detail reads (10 minutes)
const ARTICLE_CACHE_TTL_SECS: u64 = 600;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found (or owned by someone else)
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Nested category reference on an article write
#[derive(Debug, Clone)]
pub struct CategoryPayload {
    pub name: String,
}

/// Nested attribute variant reference on an article write
#[derive(Debug, Clone)]
pub struct AttributePayload {
    pub kind: Option<String>,
    pub name: String,
    pub price: Decimal,
}

/// Full payload for creating an article, nested associations included.
///
/// `uploaded_images` holds stored file paths; decoding and writing the
/// actual bytes is the HTTP layer's job.
#[derive(Debug, Clone)]
pub struct ArticleWrite {
    pub title: String,
    pub short_description: String,
    pub price: Decimal,
    pub stock: String,
    pub description: String,
    pub variant_kind: Option<VariantKind>,
    pub categories: Vec<CategoryPayload>,
    pub attributes: Vec<AttributePayload>,
    pub uploaded_images: Vec<String>,
}

/// Payload for updating an article.
///
/// Scalar fields follow `UpdateArticleInput` semantics. For the nested
/// lists, `None` leaves the association untouched while `Some` (even empty)
/// clears it and re-applies the provided entries.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub fields: UpdateArticleInput,
    pub categories: Option<Vec<CategoryPayload>>,
    pub attributes: Option<Vec<AttributePayload>>,
    pub uploaded_images: Option<Vec<String>>,
}

/// Result of a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportOutcome {
    pub created: usize,
    pub updated: usize,
}

/// Article service for managing catalog articles
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    categories: Arc<dyn CategoryRepository>,
    variants: Arc<dyn AttributeVariantRepository>,
    images: Arc<dyn ArticleImageRepository>,
    cache: Arc<Cache>,
    cache_ttl: Duration,
}

impl ArticleService {
    /// Create a new article service
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        categories: Arc<dyn CategoryRepository>,
        variants: Arc<dyn AttributeVariantRepository>,
        images: Arc<dyn ArticleImageRepository>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            articles,
            categories,
            variants,
            images,
            cache,
            cache_ttl: Duration::from_secs(ARTICLE_CACHE_TTL_SECS),
        }
    }

    fn detail_cache_key(user_id: i64, article_id: i64) -> String {
        format!("article:{}:{}", user_id, article_id)
    }

    /// List the user's articles, newest first, optionally filtered to those
    /// assigned to any of the given categories.
    pub async fn list(
        &self,
        user_id: i64,
        category_ids: Option<&[i64]>,
    ) -> Result<Vec<ArticleDetail>, ArticleServiceError> {
        let articles = self
            .articles
            .list_for_user(user_id, category_ids)
            .await
            .context("Failed to list articles")?;

        let mut details = Vec::with_capacity(articles.len());
        for article in articles {
            details.push(self.assemble_detail(article).await?);
        }

        Ok(details)
    }

    /// Get one article with its associations. 404 across owners.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<ArticleDetail, ArticleServiceError> {
        let key = Self::detail_cache_key(user_id, id);

        if let Ok(Some(cached)) = self.cache.get::<ArticleDetail>(&key).await {
            return Ok(cached);
        }

        let article = self
            .articles
            .get_for_user(id, user_id)
            .await
            .context("Failed to get article")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("Article {}", id)))?;

        let detail = self.assemble_detail(article).await?;

        if let Err(e) = self.cache.set(&key, &detail, self.cache_ttl).await {
            tracing::warn!("Failed to cache article {}: {}", id, e);
        }

        Ok(detail)
    }

    /// Create an article with nested associations.
    pub async fn create(
        &self,
        user_id: i64,
        write: ArticleWrite,
    ) -> Result<ArticleDetail, ArticleServiceError> {
        let input = CreateArticleInput {
            user_id,
            title: write.title,
            short_description: write.short_description,
            price: write.price,
            stock: write.stock,
            description: write.description,
            variant_kind: write.variant_kind,
        };

        let article = self
            .articles
            .create(&input)
            .await
            .context("Failed to create article")?;

        self.apply_categories(user_id, article.id, &write.categories)
            .await?;
        self.apply_attributes(user_id, article.id, &write.attributes)
            .await?;
        for image in &write.uploaded_images {
            self.images
                .create(article.id, image)
                .await
                .context("Failed to attach uploaded image")?;
        }

        self.assemble_detail(article).await
    }

    /// Update an article. Provided nested lists replace the existing
    /// associations; omitted ones are left untouched.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        changes: ArticleChanges,
    ) -> Result<ArticleDetail, ArticleServiceError> {
        // Ownership gate: someone else's article reads as missing
        self.articles
            .get_for_user(id, user_id)
            .await
            .context("Failed to get article")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("Article {}", id)))?;

        let article = if changes.fields.has_changes() {
            self.articles
                .update(id, &changes.fields)
                .await
                .context("Failed to update article")?
        } else {
            self.articles
                .get_for_user(id, user_id)
                .await
                .context("Failed to reload article")?
                .ok_or_else(|| ArticleServiceError::NotFound(format!("Article {}", id)))?
        };

        if let Some(categories) = &changes.categories {
            self.categories
                .clear_for_article(id)
                .await
                .context("Failed to clear categories")?;
            self.apply_categories(user_id, id, categories).await?;
        }

        if let Some(attributes) = &changes.attributes {
            self.variants
                .clear_for_article(id)
                .await
                .context("Failed to clear attributes")?;
            self.apply_attributes(user_id, id, attributes).await?;
        }

        if let Some(images) = &changes.uploaded_images {
            self.images
                .delete_for_article(id)
                .await
                .context("Failed to clear images")?;
            for image in images {
                self.images
                    .create(id, image)
                    .await
                    .context("Failed to attach uploaded image")?;
            }
        }

        self.invalidate(user_id, id).await;
        self.assemble_detail(article).await
    }

    /// Delete an article. 404 across owners.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), ArticleServiceError> {
        self.articles
            .get_for_user(id, user_id)
            .await
            .context("Failed to get article")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("Article {}", id)))?;

        self.articles
            .delete(id)
            .await
            .context("Failed to delete article")?;

        self.invalidate(user_id, id).await;
        Ok(())
    }

    /// Set the primary image of an article to an already-stored file path.
    pub async fn attach_image(
        &self,
        user_id: i64,
        id: i64,
        image: &str,
    ) -> Result<Article, ArticleServiceError> {
        self.articles
            .get_for_user(id, user_id)
            .await
            .context("Failed to get article")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("Article {}", id)))?;

        let article = self
            .articles
            .set_image(id, image)
            .await
            .context("Failed to set article image")?;

        self.invalidate(user_id, id).await;
        Ok(article)
    }

    /// Bulk import: upsert each payload by title within the user's catalog.
    pub async fn import(
        &self,
        user_id: i64,
        items: Vec<ArticleWrite>,
    ) -> Result<ImportOutcome, ArticleServiceError> {
        let mut outcome = ImportOutcome::default();

        for item in items {
            match self
                .articles
                .find_by_title(user_id, &item.title)
                .await
                .context("Failed to look up article by title")?
            {
                Some(existing) => {
                    let changes = ArticleChanges {
                        fields: UpdateArticleInput {
                            title: Some(item.title),
                            short_description: Some(item.short_description),
                            price: Some(item.price),
                            stock: Some(item.stock),
                            description: Some(item.description),
                            variant_kind: Some(item.variant_kind),
                        },
                        categories: Some(item.categories),
                        attributes: Some(item.attributes),
                        uploaded_images: if item.uploaded_images.is_empty() {
                            None
                        } else {
                            Some(item.uploaded_images)
                        },
                    };
                    self.update(user_id, existing.id, changes).await?;
                    outcome.updated += 1;
                }
                None => {
                    self.create(user_id, item).await?;
                    outcome.created += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Load the associations of an article into an `ArticleDetail`
    async fn assemble_detail(&self, article: Article) -> Result<ArticleDetail, ArticleServiceError> {
        let categories = self
            .categories
            .list_for_article(article.id)
            .await
            .context("Failed to load article categories")?;
        let attributes = self
            .variants
            .list_for_article(article.id)
            .await
            .context("Failed to load article attributes")?;
        let images = self
            .images
            .list_for_article(article.id)
            .await
            .context("Failed to load article images")?;

        Ok(ArticleDetail {
            article,
            categories,
            attributes,
            images,
        })
    }

    /// Get-or-create each named category for the user and assign it
    async fn apply_categories(
        &self,
        user_id: i64,
        article_id: i64,
        payloads: &[CategoryPayload],
    ) -> Result<(), ArticleServiceError> {
        for payload in payloads {
            let category = self.get_or_create_category(user_id, &payload.name).await?;
            self.categories
                .add_to_article(category.id, article_id)
                .await
                .context("Failed to assign category")?;
        }
        Ok(())
    }

    /// Get-or-create each attribute variant for the user and attach it
    async fn apply_attributes(
        &self,
        user_id: i64,
        article_id: i64,
        payloads: &[AttributePayload],
    ) -> Result<(), ArticleServiceError> {
        for payload in payloads {
            let variant = self.get_or_create_variant(user_id, payload).await?;
            self.variants
                .add_to_article(variant.id, article_id)
                .await
                .context("Failed to attach attribute variant")?;
        }
        Ok(())
    }

    async fn get_or_create_category(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Category, ArticleServiceError> {
        if let Some(existing) = self
            .categories
            .find_by_name(user_id, name)
            .await
            .context("Failed to look up category")?
        {
            return Ok(existing);
        }

        let created = self
            .categories
            .create(user_id, name)
            .await
            .context("Failed to create category")?;

        // New category: listings for this user are stale
        let _ = self
            .cache
            .delete_pattern(&format!("categories:{}:*", user_id))
            .await;

        Ok(created)
    }

    async fn get_or_create_variant(
        &self,
        user_id: i64,
        payload: &AttributePayload,
    ) -> Result<AttributeVariant, ArticleServiceError> {
        let input = AttributeVariantInput {
            user_id,
            kind: payload.kind.clone().unwrap_or_default(),
            name: payload.name.clone(),
            price: payload.price,
        };

        if let Some(existing) = self
            .variants
            .find_match(&input)
            .await
            .context("Failed to look up attribute variant")?
        {
            return Ok(existing);
        }

        let created = self
            .variants
            .create(&input)
            .await
            .context("Failed to create attribute variant")?;

        let _ = self
            .cache
            .delete_pattern(&format!("attribute_variants:{}:*", user_id))
            .await;

        Ok(created)
    }

    async fn invalidate(&self, user_id: i64, article_id: i64) {
        let _ = self
            .cache
            .delete(&Self::detail_cache_key(user_id, article_id))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::{
        SqlxArticleImageRepository, SqlxArticleRepository, SqlxAttributeVariantRepository,
        SqlxCategoryRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;
    use std::str::FromStr;

    async fn setup() -> (ArticleService, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let user = user_repo
            .create(&User::new(
                "svc@example.com".to_string(),
                "Service User".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        let service = ArticleService::new(
            SqlxArticleRepository::boxed(pool.clone()),
            SqlxCategoryRepository::boxed(pool.clone()),
            SqlxAttributeVariantRepository::boxed(pool.clone()),
            SqlxArticleImageRepository::boxed(pool.clone()),
            create_cache(&CacheConfig::default()),
        );

        (service, user.id)
    }

    fn write(title: &str) -> ArticleWrite {
        ArticleWrite {
            title: title.to_string(),
            short_description: "sample article short description".to_string(),
            price: Decimal::from_str("5.50").unwrap(),
            stock: "1".to_string(),
            description: "sample article long description".to_string(),
            variant_kind: None,
            categories: Vec::new(),
            attributes: Vec::new(),
            uploaded_images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_plain_article() {
        let (service, user_id) = setup().await;

        let detail = service
            .create(user_id, write("Sample article"))
            .await
            .expect("Create failed");

        assert!(detail.article.id > 0);
        assert_eq!(detail.article.title, "Sample article");
        assert!(detail.categories.is_empty());
        assert!(detail.attributes.is_empty());
        assert!(detail.images.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_nested_categories_creates_them() {
        let (service, user_id) = setup().await;

        let mut payload = write("categorized");
        payload.categories = vec![
            CategoryPayload {
                name: "books".to_string(),
            },
            CategoryPayload {
                name: "games".to_string(),
            },
        ];

        let detail = service
            .create(user_id, payload)
            .await
            .expect("Create failed");
        assert_eq!(detail.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_nested_category_reuses_existing() {
        let (service, user_id) = setup().await;

        let mut first = write("first");
        first.categories = vec![CategoryPayload {
            name: "shared".to_string(),
        }];
        let d1 = service.create(user_id, first).await.expect("Create failed");

        let mut second = write("second");
        second.categories = vec![CategoryPayload {
            name: "shared".to_string(),
        }];
        let d2 = service.create(user_id, second).await.expect("Create failed");

        // Same category row on both articles, not a duplicate
        assert_eq!(d1.categories[0].id, d2.categories[0].id);
    }

    #[tokio::test]
    async fn test_nested_attributes_get_or_create() {
        let (service, user_id) = setup().await;

        let attr = AttributePayload {
            kind: Some("size".to_string()),
            name: "XL".to_string(),
            price: Decimal::from_str("2.50").unwrap(),
        };

        let mut first = write("first");
        first.attributes = vec![attr.clone()];
        let d1 = service.create(user_id, first).await.expect("Create failed");

        let mut second = write("second");
        second.attributes = vec![attr];
        let d2 = service.create(user_id, second).await.expect("Create failed");

        assert_eq!(d1.attributes.len(), 1);
        assert_eq!(d1.attributes[0].id, d2.attributes[0].id);
        assert_eq!(d1.attributes[0].kind, "size");
    }

    #[tokio::test]
    async fn test_create_with_uploaded_images() {
        let (service, user_id) = setup().await;

        let mut payload = write("gallery");
        payload.uploaded_images = vec![
            "article/one.jpg".to_string(),
            "article/two.jpg".to_string(),
        ];

        let detail = service
            .create(user_id, payload)
            .await
            .expect("Create failed");
        assert_eq!(detail.images.len(), 2);
    }

    #[tokio::test]
    async fn test_get_scoped_to_owner() {
        let (service, user_id) = setup().await;

        let detail = service
            .create(user_id, write("mine"))
            .await
            .expect("Create failed");

        let found = service
            .get(user_id, detail.article.id)
            .await
            .expect("Get failed");
        assert_eq!(found.article.title, "mine");

        let missing = service.get(user_id + 999, detail.article.id).await;
        assert!(matches!(missing, Err(ArticleServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_with_category_filter() {
        let (service, user_id) = setup().await;

        let mut a = write("book article");
        a.categories = vec![CategoryPayload {
            name: "books".to_string(),
        }];
        let book = service.create(user_id, a).await.expect("Create failed");

        service
            .create(user_id, write("plain article"))
            .await
            .expect("Create failed");

        let all = service.list(user_id, None).await.expect("List failed");
        assert_eq!(all.len(), 2);

        let category_id = book.categories[0].id;
        let filtered = service
            .list(user_id, Some(&[category_id]))
            .await
            .expect("List failed");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].article.id, book.article.id);
    }

    #[tokio::test]
    async fn test_update_replaces_categories_when_provided() {
        let (service, user_id) = setup().await;

        let mut payload = write("recategorize");
        payload.categories = vec![CategoryPayload {
            name: "old".to_string(),
        }];
        let detail = service
            .create(user_id, payload)
            .await
            .expect("Create failed");

        let changes = ArticleChanges {
            categories: Some(vec![CategoryPayload {
                name: "new".to_string(),
            }]),
            ..Default::default()
        };
        let updated = service
            .update(user_id, detail.article.id, changes)
            .await
            .expect("Update failed");

        assert_eq!(updated.categories.len(), 1);
        assert_eq!(updated.categories[0].name, "new");
    }

    #[tokio::test]
    async fn test_update_with_empty_list_clears_categories() {
        let (service, user_id) = setup().await;

        let mut payload = write("clear me");
        payload.categories = vec![CategoryPayload {
            name: "gone".to_string(),
        }];
        let detail = service
            .create(user_id, payload)
            .await
            .expect("Create failed");

        let changes = ArticleChanges {
            categories: Some(Vec::new()),
            ..Default::default()
        };
        let updated = service
            .update(user_id, detail.article.id, changes)
            .await
            .expect("Update failed");
        assert!(updated.categories.is_empty());
    }

    #[tokio::test]
    async fn test_update_omitted_lists_untouched() {
        let (service, user_id) = setup().await;

        let mut payload = write("keep categories");
        payload.categories = vec![CategoryPayload {
            name: "sticky".to_string(),
        }];
        let detail = service
            .create(user_id, payload)
            .await
            .expect("Create failed");

        let changes = ArticleChanges {
            fields: UpdateArticleInput {
                title: Some("new title".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let updated = service
            .update(user_id, detail.article.id, changes)
            .await
            .expect("Update failed");

        assert_eq!(updated.article.title, "new title");
        assert_eq!(updated.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_update_other_users_article_is_not_found() {
        let (service, user_id) = setup().await;

        let detail = service
            .create(user_id, write("protected"))
            .await
            .expect("Create failed");

        let result = service
            .update(user_id + 999, detail.article.id, ArticleChanges::default())
            .await;
        assert!(matches!(result, Err(ArticleServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, user_id) = setup().await;

        let detail = service
            .create(user_id, write("doomed"))
            .await
            .expect("Create failed");

        service
            .delete(user_id, detail.article.id)
            .await
            .expect("Delete failed");

        let result = service.get(user_id, detail.article.id).await;
        assert!(matches!(result, Err(ArticleServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_attach_image() {
        let (service, user_id) = setup().await;

        let detail = service
            .create(user_id, write("pictured"))
            .await
            .expect("Create failed");

        let article = service
            .attach_image(user_id, detail.article.id, "article/cover.jpg")
            .await
            .expect("Attach failed");
        assert_eq!(article.image.as_deref(), Some("article/cover.jpg"));

        // The cached detail must reflect the new image
        let reloaded = service
            .get(user_id, detail.article.id)
            .await
            .expect("Get failed");
        assert_eq!(reloaded.article.image.as_deref(), Some("article/cover.jpg"));
    }

    #[tokio::test]
    async fn test_import_creates_and_updates() {
        let (service, user_id) = setup().await;

        let outcome = service
            .import(user_id, vec![write("alpha"), write("beta")])
            .await
            .expect("Import failed");
        assert_eq!(
            outcome,
            ImportOutcome {
                created: 2,
                updated: 0
            }
        );

        let mut changed = write("alpha");
        changed.price = Decimal::from_str("9.99").unwrap();

        let outcome = service
            .import(user_id, vec![changed, write("gamma")])
            .await
            .expect("Import failed");
        assert_eq!(
            outcome,
            ImportOutcome {
                created: 1,
                updated: 1
            }
        );

        let all = service.list(user_id, None).await.expect("List failed");
        assert_eq!(all.len(), 3);

        let alpha = all
            .iter()
            .find(|d| d.article.title == "alpha")
            .expect("alpha missing");
        assert_eq!(alpha.article.price, Decimal::from_str("9.99").unwrap());
    }
}
