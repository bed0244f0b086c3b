//! Attribute variant service
//!
//! Listing, updating, and deletion of user-owned attribute variants. Like
//! categories, variants come into existence through nested article writes.

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::AttributeVariantRepository;
use crate::models::{AttributeVariant, UpdateAttributeVariantInput};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

/// Cache TTL for variant listings (10 minutes)
const VARIANT_LIST_CACHE_TTL_SECS: u64 = 600;

/// Error types for attribute variant service operations
#[derive(Debug, thiserror::Error)]
pub enum AttributeVariantServiceError {
    /// Variant not found (or owned by someone else)
    #[error("Attribute variant not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Attribute variant service
pub struct AttributeVariantService {
    repo: Arc<dyn AttributeVariantRepository>,
    cache: Arc<Cache>,
    cache_ttl: Duration,
}

impl AttributeVariantService {
    /// Create a new attribute variant service
    pub fn new(repo: Arc<dyn AttributeVariantRepository>, cache: Arc<Cache>) -> Self {
        Self {
            repo,
            cache,
            cache_ttl: Duration::from_secs(VARIANT_LIST_CACHE_TTL_SECS),
        }
    }

    fn list_cache_key(user_id: i64, assigned_only: bool) -> String {
        format!("attribute_variants:{}:{}", user_id, assigned_only)
    }

    /// List the user's variants, name-descending.
    pub async fn list(
        &self,
        user_id: i64,
        assigned_only: bool,
    ) -> Result<Vec<AttributeVariant>, AttributeVariantServiceError> {
        let key = Self::list_cache_key(user_id, assigned_only);

        if let Ok(Some(cached)) = self.cache.get::<Vec<AttributeVariant>>(&key).await {
            return Ok(cached);
        }

        let variants = self
            .repo
            .list_for_user(user_id, assigned_only)
            .await
            .context("Failed to list attribute variants")?;

        if let Err(e) = self.cache.set(&key, &variants, self.cache_ttl).await {
            tracing::warn!("Failed to cache attribute variant list: {}", e);
        }

        Ok(variants)
    }

    /// Update a variant's name and/or price. The kind is immutable. 404
    /// across owners.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: UpdateAttributeVariantInput,
    ) -> Result<AttributeVariant, AttributeVariantServiceError> {
        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(AttributeVariantServiceError::ValidationError(
                    "Variant name must not be empty".to_string(),
                ));
            }
        }

        self.repo
            .get_for_user(id, user_id)
            .await
            .context("Failed to get attribute variant")?
            .ok_or_else(|| {
                AttributeVariantServiceError::NotFound(format!("Attribute variant {}", id))
            })?;

        let updated = self
            .repo
            .update(id, &input)
            .await
            .context("Failed to update attribute variant")?;

        self.invalidate(user_id).await;
        Ok(updated)
    }

    /// Delete a variant. 404 across owners.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AttributeVariantServiceError> {
        self.repo
            .get_for_user(id, user_id)
            .await
            .context("Failed to get attribute variant")?
            .ok_or_else(|| {
                AttributeVariantServiceError::NotFound(format!("Attribute variant {}", id))
            })?;

        self.repo
            .delete(id)
            .await
            .context("Failed to delete attribute variant")?;

        self.invalidate(user_id).await;
        Ok(())
    }

    async fn invalidate(&self, user_id: i64) {
        let _ = self
            .cache
            .delete_pattern(&format!("attribute_variants:{}:*", user_id))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::{
        SqlxAttributeVariantRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{AttributeVariantInput, User};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    async fn setup() -> (
        AttributeVariantService,
        Arc<dyn AttributeVariantRepository>,
        i64,
    ) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let user = user_repo
            .create(&User::new(
                "varsvc@example.com".to_string(),
                "Variant Service".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        let repo = SqlxAttributeVariantRepository::boxed(pool);
        let service =
            AttributeVariantService::new(repo.clone(), create_cache(&CacheConfig::default()));
        (service, repo, user.id)
    }

    fn input(user_id: i64, kind: &str, name: &str, price: &str) -> AttributeVariantInput {
        AttributeVariantInput {
            user_id,
            kind: kind.to_string(),
            name: name.to_string(),
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_list() {
        let (service, repo, user_id) = setup().await;

        repo.create(&input(user_id, "size", "L", "1.00")).await.unwrap();
        repo.create(&input(user_id, "size", "XL", "2.00")).await.unwrap();

        let list = service.list(user_id, false).await.expect("List failed");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "XL");
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let (service, repo, user_id) = setup().await;

        let variant = repo
            .create(&input(user_id, "size", "XL", "2.00"))
            .await
            .unwrap();

        // Prime the cache
        service.list(user_id, false).await.expect("List failed");

        service
            .update(
                user_id,
                variant.id,
                UpdateAttributeVariantInput {
                    name: Some("XXL".to_string()),
                    price: None,
                },
            )
            .await
            .expect("Update failed");

        let list = service.list(user_id, false).await.expect("List failed");
        assert_eq!(list[0].name, "XXL");
    }

    #[tokio::test]
    async fn test_cross_owner_is_not_found() {
        let (service, repo, user_id) = setup().await;

        let variant = repo
            .create(&input(user_id, "size", "XL", "2.00"))
            .await
            .unwrap();

        let result = service
            .update(
                user_id + 999,
                variant.id,
                UpdateAttributeVariantInput::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(AttributeVariantServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, repo, user_id) = setup().await;

        let variant = repo
            .create(&input(user_id, "color", "red", "0.00"))
            .await
            .unwrap();

        service
            .delete(user_id, variant.id)
            .await
            .expect("Delete failed");

        let list = service.list(user_id, false).await.expect("List failed");
        assert!(list.is_empty());
    }
}
