//! Category repository
//!
//! Database operations for user-owned categories, including the junction
//! table linking categories to articles.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category owned by a user
    async fn create(&self, user_id: i64, name: &str) -> Result<Category>;

    /// Get a category by ID, scoped to its owner
    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<Category>>;

    /// Find a category by exact name within a user's categories
    async fn find_by_name(&self, user_id: i64, name: &str) -> Result<Option<Category>>;

    /// List a user's categories ordered by name descending.
    ///
    /// With `assigned_only`, restricts to categories assigned to at least
    /// one article.
    async fn list_for_user(&self, user_id: i64, assigned_only: bool) -> Result<Vec<Category>>;

    /// Rename a category
    async fn update_name(&self, id: i64, name: &str) -> Result<Category>;

    /// Delete a category
    async fn delete(&self, id: i64) -> Result<()>;

    /// List the categories assigned to an article
    async fn list_for_article(&self, article_id: i64) -> Result<Vec<Category>>;

    /// Assign a category to an article (idempotent)
    async fn add_to_article(&self, category_id: i64, article_id: i64) -> Result<()>;

    /// Remove all category assignments from an article
    async fn clear_for_article(&self, article_id: i64) -> Result<()>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, user_id: i64, name: &str) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_category_sqlite(self.pool.as_sqlite().unwrap(), user_id, name).await
            }
            DatabaseDriver::Mysql => {
                create_category_mysql(self.pool.as_mysql().unwrap(), user_id, name).await
            }
        }
    }

    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_category_for_user_sqlite(self.pool.as_sqlite().unwrap(), id, user_id).await
            }
            DatabaseDriver::Mysql => {
                get_category_for_user_mysql(self.pool.as_mysql().unwrap(), id, user_id).await
            }
        }
    }

    async fn find_by_name(&self, user_id: i64, name: &str) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                find_category_by_name_sqlite(self.pool.as_sqlite().unwrap(), user_id, name).await
            }
            DatabaseDriver::Mysql => {
                find_category_by_name_mysql(self.pool.as_mysql().unwrap(), user_id, name).await
            }
        }
    }

    async fn list_for_user(&self, user_id: i64, assigned_only: bool) -> Result<Vec<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_categories_sqlite(self.pool.as_sqlite().unwrap(), user_id, assigned_only).await
            }
            DatabaseDriver::Mysql => {
                list_categories_mysql(self.pool.as_mysql().unwrap(), user_id, assigned_only).await
            }
        }
    }

    async fn update_name(&self, id: i64, name: &str) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_category_name_sqlite(self.pool.as_sqlite().unwrap(), id, name).await
            }
            DatabaseDriver::Mysql => {
                update_category_name_mysql(self.pool.as_mysql().unwrap(), id, name).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_category_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_category_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list_for_article(&self, article_id: i64) -> Result<Vec<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_for_article_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                list_for_article_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }

    async fn add_to_article(&self, category_id: i64, article_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                add_to_article_sqlite(self.pool.as_sqlite().unwrap(), category_id, article_id).await
            }
            DatabaseDriver::Mysql => {
                add_to_article_mysql(self.pool.as_mysql().unwrap(), category_id, article_id).await
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

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_category_sqlite(pool: &SqlitePool, user_id: i64, name: &str) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO categories (user_id, name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_rowid(),
        user_id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_category_for_user_sqlite(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Category>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM categories
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get category")?;

    Ok(row.map(|row| row_to_category_sqlite(&row)))
}

async fn find_category_by_name_sqlite(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
) -> Result<Option<Category>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM categories
        WHERE user_id = ? AND name = ?
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to find category by name")?;

    Ok(row.map(|row| row_to_category_sqlite(&row)))
}

async fn list_categories_sqlite(
    pool: &SqlitePool,
    user_id: i64,
    assigned_only: bool,
) -> Result<Vec<Category>> {
    let query = if assigned_only {
        r#"
        SELECT DISTINCT c.id, c.user_id, c.name, c.created_at, c.updated_at
        FROM categories c
        INNER JOIN article_categories ac ON c.id = ac.category_id
        WHERE c.user_id = ?
        ORDER BY c.name DESC
        "#
    } else {
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM categories
        WHERE user_id = ?
        ORDER BY name DESC
        "#
    };

    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    Ok(rows.iter().map(row_to_category_sqlite).collect())
}

async fn update_category_name_sqlite(pool: &SqlitePool, id: i64, name: &str) -> Result<Category> {
    let now = Utc::now();

    sqlx::query("UPDATE categories SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    let row = sqlx::query(
        "SELECT id, user_id, name, created_at, updated_at FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to reload category")?;

    row.map(|row| row_to_category_sqlite(&row))
        .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
}

async fn delete_category_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    // article_categories rows are removed by ON DELETE CASCADE
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?;

    Ok(())
}

async fn list_for_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<Category>> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.user_id, c.name, c.created_at, c.updated_at
        FROM categories c
        INNER JOIN article_categories ac ON c.id = ac.category_id
        WHERE ac.article_id = ?
        ORDER BY c.name ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list categories for article")?;

    Ok(rows.iter().map(row_to_category_sqlite).collect())
}

async fn add_to_article_sqlite(pool: &SqlitePool, category_id: i64, article_id: i64) -> Result<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO article_categories (article_id, category_id) VALUES (?, ?)",
    )
    .bind(article_id)
    .bind(category_id)
    .execute(pool)
    .await
    .context("Failed to assign category to article")?;

    Ok(())
}

async fn clear_for_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear categories for article")?;

    Ok(())
}

fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_category_mysql(pool: &MySqlPool, user_id: i64, name: &str) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO categories (user_id, name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_id() as i64,
        user_id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_category_for_user_mysql(
    pool: &MySqlPool,
    id: i64,
    user_id: i64,
) -> Result<Option<Category>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM categories
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get category")?;

    Ok(row.map(|row| row_to_category_mysql(&row)))
}

async fn find_category_by_name_mysql(
    pool: &MySqlPool,
    user_id: i64,
    name: &str,
) -> Result<Option<Category>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM categories
        WHERE user_id = ? AND name = ?
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to find category by name")?;

    Ok(row.map(|row| row_to_category_mysql(&row)))
}

async fn list_categories_mysql(
    pool: &MySqlPool,
    user_id: i64,
    assigned_only: bool,
) -> Result<Vec<Category>> {
    let query = if assigned_only {
        r#"
        SELECT DISTINCT c.id, c.user_id, c.name, c.created_at, c.updated_at
        FROM categories c
        INNER JOIN article_categories ac ON c.id = ac.category_id
        WHERE c.user_id = ?
        ORDER BY c.name DESC
        "#
    } else {
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM categories
        WHERE user_id = ?
        ORDER BY name DESC
        "#
    };

    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    Ok(rows.iter().map(row_to_category_mysql).collect())
}

async fn update_category_name_mysql(pool: &MySqlPool, id: i64, name: &str) -> Result<Category> {
    let now = Utc::now();

    sqlx::query("UPDATE categories SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    let row = sqlx::query(
        "SELECT id, user_id, name, created_at, updated_at FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to reload category")?;

    row.map(|row| row_to_category_mysql(&row))
        .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
}

async fn delete_category_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?;

    Ok(())
}

async fn list_for_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<Category>> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.user_id, c.name, c.created_at, c.updated_at
        FROM categories c
        INNER JOIN article_categories ac ON c.id = ac.category_id
        WHERE ac.article_id = ?
        ORDER BY c.name ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list categories for article")?;

    Ok(rows.iter().map(row_to_category_mysql).collect())
}

async fn add_to_article_mysql(pool: &MySqlPool, category_id: i64, article_id: i64) -> Result<()> {
    sqlx::query("INSERT IGNORE INTO article_categories (article_id, category_id) VALUES (?, ?)")
        .bind(article_id)
        .bind(category_id)
        .execute(pool)
        .await
        .context("Failed to assign category to article")?;

    Ok(())
}

async fn clear_for_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear categories for article")?;

    Ok(())
}

fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow) -> Category {
    Category {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
