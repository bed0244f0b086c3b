//! Attribute variant repository
//!
//! Database operations for user-owned attribute variants and the junction
//! table linking them to articles. Prices are stored as text so both
//! backends round-trip decimals without loss.
//!
//! This module provides:
//! - `AttributeVariantRepository` trait defining the data access interface
//! - `SqlxAttributeVariantRepository` implementing it for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{AttributeVariant, AttributeVariantInput, UpdateAttributeVariantInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Attribute variant repository trait
#[async_trait]
pub trait AttributeVariantRepository: Send + Sync {
    /// Create a new attribute variant
    async fn create(&self, input: &AttributeVariantInput) -> Result<AttributeVariant>;

    /// Get a variant by ID, scoped to its owner
    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<AttributeVariant>>;

    /// Find a variant matching every field of the input (get-or-create probe)
    async fn find_match(&self, input: &AttributeVariantInput) -> Result<Option<AttributeVariant>>;

    /// List a user's variants ordered by name descending.
    ///
    /// With `assigned_only`, restricts to variants attached to at least one
    /// article.
    async fn list_for_user(&self, user_id: i64, assigned_only: bool)
        -> Result<Vec<AttributeVariant>>;

    /// Update a variant's name and/or price
    async fn update(
        &self,
        id: i64,
        input: &UpdateAttributeVariantInput,
    ) -> Result<AttributeVariant>;

    /// Delete a variant
    async fn delete(&self, id: i64) -> Result<()>;

    /// List the variants attached to an article
    async fn list_for_article(&self, article_id: i64) -> Result<Vec<AttributeVariant>>;

    /// Attach a variant to an article (idempotent)
    async fn add_to_article(&self, variant_id: i64, article_id: i64) -> Result<()>;

    /// Remove all variant attachments from an article
    async fn clear_for_article(&self, article_id: i64) -> Result<()>;
}

/// SQLx-based attribute variant repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxAttributeVariantRepository {
    pool: DynDatabasePool,
}

impl SqlxAttributeVariantRepository {
    /// Create a new SQLx attribute variant repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn AttributeVariantRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AttributeVariantRepository for SqlxAttributeVariantRepository {
    async fn create(&self, input: &AttributeVariantInput) -> Result<AttributeVariant> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_variant_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_variant_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<AttributeVariant>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_variant_for_user_sqlite(self.pool.as_sqlite().unwrap(), id, user_id).await
            }
            DatabaseDriver::Mysql => {
                get_variant_for_user_mysql(self.pool.as_mysql().unwrap(), id, user_id).await
            }
        }
    }

    async fn find_match(&self, input: &AttributeVariantInput) -> Result<Option<AttributeVariant>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                find_variant_match_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                find_variant_match_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        assigned_only: bool,
    ) -> Result<Vec<AttributeVariant>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_variants_sqlite(self.pool.as_sqlite().unwrap(), user_id, assigned_only).await
            }
            DatabaseDriver::Mysql => {
                list_variants_mysql(self.pool.as_mysql().unwrap(), user_id, assigned_only).await
            }
        }
    }

    async fn update(
        &self,
        id: i64,
        input: &UpdateAttributeVariantInput,
    ) -> Result<AttributeVariant> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_variant_sqlite(self.pool.as_sqlite().unwrap(), id, input).await
            }
            DatabaseDriver::Mysql => {
                update_variant_mysql(self.pool.as_mysql().unwrap(), id, input).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_variant_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_variant_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list_for_article(&self, article_id: i64) -> Result<Vec<AttributeVariant>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_for_article_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                list_for_article_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }

    async fn add_to_article(&self, variant_id: i64, article_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                add_to_article_sqlite(self.pool.as_sqlite().unwrap(), variant_id, article_id).await
            }
            DatabaseDriver::Mysql => {
                add_to_article_mysql(self.pool.as_mysql().unwrap(), variant_id, article_id).await
            }
        }
    }

    async fn clear_for_article(&self, article_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                clear_for_article_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                clear_for_article_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }
}

fn parse_price(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).with_context(|| format!("Invalid stored price: {}", raw))
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_variant_sqlite(
    pool: &SqlitePool,
    input: &AttributeVariantInput,
) -> Result<AttributeVariant> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO attribute_variants (user_id, kind, name, price, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.user_id)
    .bind(&input.kind)
    .bind(&input.name)
    .bind(input.price.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create attribute variant")?;

    Ok(AttributeVariant {
        id: result.last_insert_rowid(),
        user_id: input.user_id,
        kind: input.kind.clone(),
        name: input.name.clone(),
        price: input.price,
        created_at: now,
        updated_at: now,
    })
}

async fn get_variant_for_user_sqlite(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<AttributeVariant>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get attribute variant")?;

    match row {
        Some(row) => Ok(Some(row_to_variant_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn find_variant_match_sqlite(
    pool: &SqlitePool,
    input: &AttributeVariantInput,
) -> Result<Option<AttributeVariant>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE user_id = ? AND kind = ? AND name = ? AND price = ?
        "#,
    )
    .bind(input.user_id)
    .bind(&input.kind)
    .bind(&input.name)
    .bind(input.price.to_string())
    .fetch_optional(pool)
    .await
    .context("Failed to find attribute variant")?;

    match row {
        Some(row) => Ok(Some(row_to_variant_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_variants_sqlite(
    pool: &SqlitePool,
    user_id: i64,
    assigned_only: bool,
) -> Result<Vec<AttributeVariant>> {
    let query = if assigned_only {
        r#"
        SELECT DISTINCT v.id, v.user_id, v.kind, v.name, v.price, v.created_at, v.updated_at
        FROM attribute_variants v
        INNER JOIN article_attributes aa ON v.id = aa.attribute_variant_id
        WHERE v.user_id = ?
        ORDER BY v.name DESC
        "#
    } else {
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE user_id = ?
        ORDER BY name DESC
        "#
    };

    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list attribute variants")?;

    let mut variants = Vec::new();
    for row in rows {
        variants.push(row_to_variant_sqlite(&row)?);
    }

    Ok(variants)
}

async fn update_variant_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdateAttributeVariantInput,
) -> Result<AttributeVariant> {
    let existing = sqlx::query(
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to load attribute variant")?
    .map(|row| row_to_variant_sqlite(&row))
    .transpose()?
    .ok_or_else(|| anyhow::anyhow!("Attribute variant not found"))?;

    let now = Utc::now();
    let new_name = input.name.as_ref().unwrap_or(&existing.name);
    let new_price = input.price.unwrap_or(existing.price);

    sqlx::query("UPDATE attribute_variants SET name = ?, price = ?, updated_at = ? WHERE id = ?")
        .bind(new_name)
        .bind(new_price.to_string())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update attribute variant")?;

    Ok(AttributeVariant {
        name: new_name.clone(),
        price: new_price,
        updated_at: now,
        ..existing
    })
}

async fn delete_variant_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    // article_attributes rows are removed by ON DELETE CASCADE
    sqlx::query("DELETE FROM attribute_variants WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete attribute variant")?;

    Ok(())
}

async fn list_for_article_sqlite(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<AttributeVariant>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.user_id, v.kind, v.name, v.price, v.created_at, v.updated_at
        FROM attribute_variants v
        INNER JOIN article_attributes aa ON v.id = aa.attribute_variant_id
        WHERE aa.article_id = ?
        ORDER BY v.name ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list attribute variants for article")?;

    let mut variants = Vec::new();
    for row in rows {
        variants.push(row_to_variant_sqlite(&row)?);
    }

    Ok(variants)
}

async fn add_to_article_sqlite(pool: &SqlitePool, variant_id: i64, article_id: i64) -> Result<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO article_attributes (article_id, attribute_variant_id) VALUES (?, ?)",
    )
    .bind(article_id)
    .bind(variant_id)
    .execute(pool)
    .await
    .context("Failed to attach attribute variant to article")?;

    Ok(())
}

async fn clear_for_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_attributes WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear attribute variants for article")?;

    Ok(())
}

fn row_to_variant_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<AttributeVariant> {
    let price_raw: String = row.get("price");

    Ok(AttributeVariant {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: row.get("kind"),
        name: row.get("name"),
        price: parse_price(&price_raw)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_variant_mysql(
    pool: &MySqlPool,
    input: &AttributeVariantInput,
) -> Result<AttributeVariant> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO attribute_variants (user_id, kind, name, price, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.user_id)
    .bind(&input.kind)
    .bind(&input.name)
    .bind(input.price.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create attribute variant")?;

    Ok(AttributeVariant {
        id: result.last_insert_id() as i64,
        user_id: input.user_id,
        kind: input.kind.clone(),
        name: input.name.clone(),
        price: input.price,
        created_at: now,
        updated_at: now,
    })
}

async fn get_variant_for_user_mysql(
    pool: &MySqlPool,
    id: i64,
    user_id: i64,
) -> Result<Option<AttributeVariant>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get attribute variant")?;

    match row {
        Some(row) => Ok(Some(row_to_variant_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn find_variant_match_mysql(
    pool: &MySqlPool,
    input: &AttributeVariantInput,
) -> Result<Option<AttributeVariant>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE user_id = ? AND kind = ? AND name = ? AND price = ?
        "#,
    )
    .bind(input.user_id)
    .bind(&input.kind)
    .bind(&input.name)
    .bind(input.price.to_string())
    .fetch_optional(pool)
    .await
    .context("Failed to find attribute variant")?;

    match row {
        Some(row) => Ok(Some(row_to_variant_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_variants_mysql(
    pool: &MySqlPool,
    user_id: i64,
    assigned_only: bool,
) -> Result<Vec<AttributeVariant>> {
    let query = if assigned_only {
        r#"
        SELECT DISTINCT v.id, v.user_id, v.kind, v.name, v.price, v.created_at, v.updated_at
        FROM attribute_variants v
        INNER JOIN article_attributes aa ON v.id = aa.attribute_variant_id
        WHERE v.user_id = ?
        ORDER BY v.name DESC
        "#
    } else {
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE user_id = ?
        ORDER BY name DESC
        "#
    };

    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list attribute variants")?;

    let mut variants = Vec::new();
    for row in rows {
        variants.push(row_to_variant_mysql(&row)?);
    }

    Ok(variants)
}

async fn update_variant_mysql(
    pool: &MySqlPool,
    id: i64,
    input: &UpdateAttributeVariantInput,
) -> Result<AttributeVariant> {
    let existing = sqlx::query(
        r#"
        SELECT id, user_id, kind, name, price, created_at, updated_at
        FROM attribute_variants
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to load attribute variant")?
    .map(|row| row_to_variant_mysql(&row))
    .transpose()?
    .ok_or_else(|| anyhow::anyhow!("Attribute variant not found"))?;

    let now = Utc::now();
    let new_name = input.name.as_ref().unwrap_or(&existing.name);
    let new_price = input.price.unwrap_or(existing.price);

    sqlx::query("UPDATE attribute_variants SET name = ?, price = ?, updated_at = ? WHERE id = ?")
        .bind(new_name)
        .bind(new_price.to_string())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update attribute variant")?;

    Ok(AttributeVariant {
        name: new_name.clone(),
        price: new_price,
        updated_at: now,
        ..existing
    })
}

async fn delete_variant_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM attribute_variants WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete attribute variant")?;

    Ok(())
}

async fn list_for_article_mysql(
    pool: &MySqlPool,
    article_id: i64,
) -> Result<Vec<AttributeVariant>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.user_id, v.kind, v.name, v.price, v.created_at, v.updated_at
        FROM attribute_variants v
        INNER JOIN article_attributes aa ON v.id = aa.attribute_variant_id
        WHERE aa.article_id = ?
        ORDER BY v.name ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list attribute variants for article")?;

    let mut variants = Vec::new();
    for row in rows {
        variants.push(row_to_variant_mysql(&row)?);
    }

    Ok(variants)
}

async fn add_to_article_mysql(pool: &MySqlPool, variant_id: i64, article_id: i64) -> Result<()> {
    sqlx::query(
        "INSERT IGNORE INTO article_attributes (article_id, attribute_variant_id) VALUES (?, ?)",
    )
    .bind(article_id)
    .bind(variant_id)
    .execute(pool)
    .await
    .context("Failed to attach attribute variant to article")?;

    Ok(())
}

async fn clear_for_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_attributes WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear attribute variants for article")?;

    Ok(())
}

fn row_to_variant_mysql(row: &sqlx::mysql::MySqlRow) -> Result<AttributeVariant> {
    let price_raw: String = row.get("price");

    Ok(AttributeVariant {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: row.get("kind"),
        name: row.get("name"),
        price: parse_price(&price_raw)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::UserRepository;
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::User;

    async fn setup() -> (DynDatabasePool, SqlxAttributeVariantRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = super::super::user::SqlxUserRepository::new(pool.clone());
        let user = user_repo
            .create(&User::new(
                "variant@example.com".to_string(),
                "Variant User".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        let repo = SqlxAttributeVariantRepository::new(pool.clone());
        (pool, repo, user.id)
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
    async fn test_create_and_price_roundtrip() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&input(user_id, "size", "XL", "2.50"))
            .await
            .expect("Failed to create variant");

        let found = repo
            .get_for_user(created.id, user_id)
            .await
            .expect("Query failed")
            .expect("Variant not found");

        assert_eq!(found.kind, "size");
        assert_eq!(found.price, Decimal::from_str("2.50").unwrap());
    }

    #[tokio::test]
    async fn test_find_match_requires_all_fields() {
        let (_pool, repo, user_id) = setup().await;

        repo.create(&input(user_id, "size", "XL", "2.50"))
            .await
            .expect("Failed to create variant");

        assert!(repo
            .find_match(&input(user_id, "size", "XL", "2.50"))
            .await
            .expect("Query failed")
            .is_some());

        // Different price is a different variant
        assert!(repo
            .find_match(&input(user_id, "size", "XL", "3.00"))
            .await
            .expect("Query failed")
            .is_none());

        // Other users never match
        assert!(repo
            .find_match(&input(user_id + 1, "size", "XL", "2.50"))
            .await
            .expect("Query failed")
            .is_none());
    }

    #[tokio::test]
    async fn test_list_ordered_by_name_desc() {
        let (_pool, repo, user_id) = setup().await;

        repo.create(&input(user_id, "size", "L", "1.00")).await.unwrap();
        repo.create(&input(user_id, "size", "XL", "1.00")).await.unwrap();
        repo.create(&input(user_id, "color", "blue", "0.00")).await.unwrap();

        let list = repo
            .list_for_user(user_id, false)
            .await
            .expect("Failed to list");
        let names: Vec<&str> = list.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["blue", "XL", "L"]);
    }

    #[tokio::test]
    async fn test_update_keeps_kind() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&input(user_id, "size", "XL", "2.50"))
            .await
            .expect("Failed to create variant");

        let updated = repo
            .update(
                created.id,
                &UpdateAttributeVariantInput {
                    name: Some("XXL".to_string()),
                    price: Some(Decimal::from_str("3.75").unwrap()),
                },
            )
            .await
            .expect("Failed to update");

        assert_eq!(updated.kind, "size");
        assert_eq!(updated.name, "XXL");
        assert_eq!(updated.price, Decimal::from_str("3.75").unwrap());
    }

    #[tokio::test]
    async fn test_assigned_only_filter() {
        let (pool, repo, user_id) = setup().await;

        let attached = repo
            .create(&input(user_id, "size", "XL", "2.50"))
            .await
            .expect("Failed to create variant");
        repo.create(&input(user_id, "color", "red", "0.00"))
            .await
            .expect("Failed to create variant");

        let result = sqlx::query(
            "INSERT INTO articles (user_id, title, short_description, price, stock, description) VALUES (?, 'a', 's', '1.00', '1', 'd')",
        )
        .bind(user_id)
        .execute(pool.as_sqlite().unwrap())
        .await
        .expect("Failed to insert article");
        let article_id = result.last_insert_rowid();

        repo.add_to_article(attached.id, article_id)
            .await
            .expect("Failed to attach");

        let filtered = repo
            .list_for_user(user_id, true)
            .await
            .expect("Failed to list");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "XL");
    }

    #[tokio::test]
    async fn test_delete() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&input(user_id, "size", "XL", "2.50"))
            .await
            .expect("Failed to create variant");

        repo.delete(created.id).await.expect("Failed to delete");
        assert!(repo
            .get_for_user(created.id, user_id)
            .await
            .expect("Query failed")
            .is_none());
    }
}
