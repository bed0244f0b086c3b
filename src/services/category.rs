//! Category service
//!
//! Listing, renaming, and deletion of user-owned categories. Categories are
//! created implicitly through nested article writes; there is no standalone
//! create operation.

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::CategoryRepository;
use crate::models::Category;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

/// Cache TTL for category listings (10 minutes)
const CATEGORY_LIST_CACHE_TTL_SECS: u64 = 600;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category not found (or owned by someone else)
    #[error("Category not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    cache: Arc<Cache>,
    cache_ttl: Duration,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>, cache: Arc<Cache>) -> Self {
        Self {
            repo,
            cache,
            cache_ttl: Duration::from_secs(CATEGORY_LIST_CACHE_TTL_SECS),
        }
    }

    fn list_cache_key(user_id: i64, assigned_only: bool) -> String {
        format!("categories:{}:{}", user_id, assigned_only)
    }

    /// List the user's categories, name-descending.
    pub async fn list(
        &self,
        user_id: i64,
        assigned_only: bool,
    ) -> Result<Vec<Category>, CategoryServiceError> {
        let key = Self::list_cache_key(user_id, assigned_only);

        if let Ok(Some(cached)) = self.cache.get::<Vec<Category>>(&key).await {
            return Ok(cached);
        }

        let categories = self
            .repo
            .list_for_user(user_id, assigned_only)
            .await
            .context("Failed to list categories")?;

        if let Err(e) = self.cache.set(&key, &categories, self.cache_ttl).await {
            tracing::warn!("Failed to cache category list: {}", e);
        }

        Ok(categories)
    }

    /// Rename a category. 404 across owners.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
    ) -> Result<Category, CategoryServiceError> {
        if name.trim().is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category name must not be empty".to_string(),
            ));
        }

        self.repo
            .get_for_user(id, user_id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| CategoryServiceError::NotFound(format!("Category {}", id)))?;

        let updated = self
            .repo
            .update_name(id, name.trim())
            .await
            .context("Failed to update category")?;

        self.invalidate(user_id).await;
        Ok(updated)
    }

    /// Delete a category. 404 across owners.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), CategoryServiceError> {
        self.repo
            .get_for_user(id, user_id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| CategoryServiceError::NotFound(format!("Category {}", id)))?;

        self.repo
            .delete(id)
            .await
            .context("Failed to delete category")?;

        self.invalidate(user_id).await;
        Ok(())
    }

    async fn invalidate(&self, user_id: i64) {
        let _ = self
            .cache
            .delete_pattern(&format!("categories:{}:*", user_id))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::{SqlxCategoryRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;

    async fn setup() -> (CategoryService, Arc<dyn CategoryRepository>, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let user = user_repo
            .create(&User::new(
                "catsvc@example.com".to_string(),
                "Cat Service".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        let repo = SqlxCategoryRepository::boxed(pool);
        let service = CategoryService::new(repo.clone(), create_cache(&CacheConfig::default()));
        (service, repo, user.id)
    }

    #[tokio::test]
    async fn test_list_name_descending() {
        let (service, repo, user_id) = setup().await;

        repo.create(user_id, "alpha").await.unwrap();
        repo.create(user_id, "zulu").await.unwrap();

        let list = service.list(user_id, false).await.expect("List failed");
        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zulu", "alpha"]);
    }

    #[tokio::test]
    async fn test_update_and_cache_invalidation() {
        let (service, repo, user_id) = setup().await;

        let category = repo.create(user_id, "old").await.unwrap();

        // Prime the list cache
        let list = service.list(user_id, false).await.expect("List failed");
        assert_eq!(list[0].name, "old");

        service
            .update(user_id, category.id, "new")
            .await
            .expect("Update failed");

        // Cache invalidated: the rename is visible
        let list = service.list(user_id, false).await.expect("List failed");
        assert_eq!(list[0].name, "new");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_name() {
        let (service, repo, user_id) = setup().await;
        let category = repo.create(user_id, "kept").await.unwrap();

        let result = service.update(user_id, category.id, "  ").await;
        assert!(matches!(
            result,
            Err(CategoryServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_cross_owner_is_not_found() {
        let (service, repo, user_id) = setup().await;
        let category = repo.create(user_id, "mine").await.unwrap();

        let update = service.update(user_id + 999, category.id, "stolen").await;
        assert!(matches!(update, Err(CategoryServiceError::NotFound(_))));

        let delete = service.delete(user_id + 999, category.id).await;
        assert!(matches!(delete, Err(CategoryServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, repo, user_id) = setup().await;
        let category = repo.create(user_id, "gone").await.unwrap();

        service
            .delete(user_id, category.id)
            .await
            .expect("Delete failed");

        let list = service.list(user_id, false).await.expect("List failed");
        assert!(list.is_empty());
    }
}
