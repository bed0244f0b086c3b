//! Article repository
//!
//! Database operations for articles. Every read is scoped to the owning
//! user: an article belonging to someone else behaves as nonexistent.
//!
//! This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Article, CreateArticleInput, UpdateArticleInput, VariantKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

const ARTICLE_COLUMNS: &str = "id, user_id, title, short_description, price, stock, description, image, variant_kind, created_at, updated_at";

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article
    async fn create(&self, input: &CreateArticleInput) -> Result<Article>;

    /// Get an article by ID, scoped to its owner
    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<Article>>;

    /// Find a user's article by exact title (used by the import upsert)
    async fn find_by_title(&self, user_id: i64, title: &str) -> Result<Option<Article>>;

    /// List a user's articles, newest id first.
    ///
    /// When `category_ids` is given, restricts to articles assigned to any
    /// of those categories.
    async fn list_for_user(&self, user_id: i64, category_ids: Option<&[i64]>)
        -> Result<Vec<Article>>;

    /// Update an article's scalar fields
    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article>;

    /// Set the article's primary image path
    async fn set_image(&self, id: i64, image: &str) -> Result<Article>;

    /// Delete an article
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, input: &CreateArticleInput) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_article_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_article_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_article_for_user_sqlite(self.pool.as_sqlite().unwrap(), id, user_id).await
            }
            DatabaseDriver::Mysql => {
                get_article_for_user_mysql(self.pool.as_mysql().unwrap(), id, user_id).await
            }
        }
    }

    async fn find_by_title(&self, user_id: i64, title: &str) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                find_article_by_title_sqlite(self.pool.as_sqlite().unwrap(), user_id, title).await
            }
            DatabaseDriver::Mysql => {
                find_article_by_title_mysql(self.pool.as_mysql().unwrap(), user_id, title).await
            }
        }
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        category_ids: Option<&[i64]>,
    ) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_articles_sqlite(self.pool.as_sqlite().unwrap(), user_id, category_ids).await
            }
            DatabaseDriver::Mysql => {
                list_articles_mysql(self.pool.as_mysql().unwrap(), user_id, category_ids).await
            }
        }
    }

    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_article_sqlite(self.pool.as_sqlite().unwrap(), id, input).await
            }
            DatabaseDriver::Mysql => {
                update_article_mysql(self.pool.as_mysql().unwrap(), id, input).await
            }
        }
    }

    async fn set_image(&self, id: i64, image: &str) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_article_image_sqlite(self.pool.as_sqlite().unwrap(), id, image).await
            }
            DatabaseDriver::Mysql => {
                set_article_image_mysql(self.pool.as_mysql().unwrap(), id, image).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_article_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_article_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

/// Build an `IN (?, ?, ...)` placeholder list for the given slice length
fn in_placeholders(len: usize) -> String {
    let mut placeholders = Vec::with_capacity(len);
    placeholders.resize(len, "?");
    placeholders.join(", ")
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_article_sqlite(pool: &SqlitePool, input: &CreateArticleInput) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (user_id, title, short_description, price, stock, description, variant_kind, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.user_id)
    .bind(&input.title)
    .bind(&input.short_description)
    .bind(input.price.to_string())
    .bind(&input.stock)
    .bind(&input.description)
    .bind(input.variant_kind.map(|v| v.as_str()))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_rowid(),
        user_id: input.user_id,
        title: input.title.clone(),
        short_description: input.short_description.clone(),
        price: input.price,
        stock: input.stock.clone(),
        description: input.description.clone(),
        image: None,
        variant_kind: input.variant_kind,
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_for_user_sqlite(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ? AND user_id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article")?;

    match row {
        Some(row) => Ok(Some(row_to_article_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn find_article_by_title_sqlite(
    pool: &SqlitePool,
    user_id: i64,
    title: &str,
) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE user_id = ? AND title = ? ORDER BY id DESC LIMIT 1",
        ARTICLE_COLUMNS
    ))
    .bind(user_id)
    .bind(title)
    .fetch_optional(pool)
    .await
    .context("Failed to find article by title")?;

    match row {
        Some(row) => Ok(Some(row_to_article_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_articles_sqlite(
    pool: &SqlitePool,
    user_id: i64,
    category_ids: Option<&[i64]>,
) -> Result<Vec<Article>> {
    let rows = match category_ids {
        Some(ids) if !ids.is_empty() => {
            let query = format!(
                r#"
                SELECT DISTINCT a.id, a.user_id, a.title, a.short_description, a.price, a.stock, a.description, a.image, a.variant_kind, a.created_at, a.updated_at
                FROM articles a
                INNER JOIN article_categories ac ON a.id = ac.article_id
                WHERE a.user_id = ? AND ac.category_id IN ({})
                ORDER BY a.id DESC
                "#,
                in_placeholders(ids.len())
            );
            let mut q = sqlx::query(&query).bind(user_id);
            for id in ids {
                q = q.bind(*id);
            }
            q.fetch_all(pool)
                .await
                .context("Failed to list articles by category")?
        }
        _ => {
            sqlx::query(&format!(
                "SELECT {} FROM articles WHERE user_id = ? ORDER BY id DESC",
                ARTICLE_COLUMNS
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await
            .context("Failed to list articles")?
        }
    };

    let mut articles = Vec::new();
    for row in rows {
        articles.push(row_to_article_sqlite(&row)?);
    }

    Ok(articles)
}

async fn update_article_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdateArticleInput,
) -> Result<Article> {
    let existing = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to load article")?
    .map(|row| row_to_article_sqlite(&row))
    .transpose()?
    .ok_or_else(|| anyhow::anyhow!("Article not found"))?;

    let now = Utc::now();
    let new_title = input.title.as_ref().unwrap_or(&existing.title);
    let new_short = input
        .short_description
        .as_ref()
        .unwrap_or(&existing.short_description);
    let new_price = input.price.unwrap_or(existing.price);
    let new_stock = input.stock.as_ref().unwrap_or(&existing.stock);
    let new_description = input.description.as_ref().unwrap_or(&existing.description);
    let new_variant = match input.variant_kind {
        Some(v) => v,
        None => existing.variant_kind,
    };

    sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, short_description = ?, price = ?, stock = ?, description = ?, variant_kind = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_title)
    .bind(new_short)
    .bind(new_price.to_string())
    .bind(new_stock)
    .bind(new_description)
    .bind(new_variant.map(|v| v.as_str()))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    Ok(Article {
        title: new_title.clone(),
        short_description: new_short.clone(),
        price: new_price,
        stock: new_stock.clone(),
        description: new_description.clone(),
        variant_kind: new_variant,
        updated_at: now,
        ..existing
    })
}

async fn set_article_image_sqlite(pool: &SqlitePool, id: i64, image: &str) -> Result<Article> {
    let now = Utc::now();

    sqlx::query("UPDATE articles SET image = ?, updated_at = ? WHERE id = ?")
        .bind(image)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to set article image")?;

    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to reload article")?;

    row.map(|row| row_to_article_sqlite(&row))
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("Article not found after image update"))
}

async fn delete_article_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    // Junction rows and gallery images are removed by ON DELETE CASCADE
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    let price_raw: String = row.get("price");
    let price = Decimal::from_str(&price_raw)
        .with_context(|| format!("Invalid stored price: {}", price_raw))?;

    let variant_raw: Option<String> = row.get("variant_kind");
    let variant_kind = match variant_raw {
        Some(s) => Some(
            VariantKind::from_str(&s)
                .ok_or_else(|| anyhow::anyhow!("Invalid variant kind: {}", s))?,
        ),
        None => None,
    };

    Ok(Article {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        short_description: row.get("short_description"),
        price,
        stock: row.get("stock"),
        description: row.get("description"),
        image: row.get("image"),
        variant_kind,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_article_mysql(pool: &MySqlPool, input: &CreateArticleInput) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (user_id, title, short_description, price, stock, description, variant_kind, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.user_id)
    .bind(&input.title)
    .bind(&input.short_description)
    .bind(input.price.to_string())
    .bind(&input.stock)
    .bind(&input.description)
    .bind(input.variant_kind.map(|v| v.as_str()))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_id() as i64,
        user_id: input.user_id,
        title: input.title.clone(),
        short_description: input.short_description.clone(),
        price: input.price,
        stock: input.stock.clone(),
        description: input.description.clone(),
        image: None,
        variant_kind: input.variant_kind,
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_for_user_mysql(
    pool: &MySqlPool,
    id: i64,
    user_id: i64,
) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ? AND user_id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article")?;

    match row {
        Some(row) => Ok(Some(row_to_article_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn find_article_by_title_mysql(
    pool: &MySqlPool,
    user_id: i64,
    title: &str,
) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE user_id = ? AND title = ? ORDER BY id DESC LIMIT 1",
        ARTICLE_COLUMNS
    ))
    .bind(user_id)
    .bind(title)
    .fetch_optional(pool)
    .await
    .context("Failed to find article by title")?;

    match row {
        Some(row) => Ok(Some(row_to_article_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_articles_mysql(
    pool: &MySqlPool,
    user_id: i64,
    category_ids: Option<&[i64]>,
) -> Result<Vec<Article>> {
    let rows = match category_ids {
        Some(ids) if !ids.is_empty() => {
            let query = format!(
                r#"
                SELECT DISTINCT a.id, a.user_id, a.title, a.short_description, a.price, a.stock, a.description, a.image, a.variant_kind, a.created_at, a.updated_at
                FROM articles a
                INNER JOIN article_categories ac ON a.id = ac.article_id
                WHERE a.user_id = ? AND ac.category_id IN ({})
                ORDER BY a.id DESC
                "#,
                in_placeholders(ids.len())
            );
            let mut q = sqlx::query(&query).bind(user_id);
            for id in ids {
                q = q.bind(*id);
            }
            q.fetch_all(pool)
                .await
                .context("Failed to list articles by category")?
        }
        _ => {
            sqlx::query(&format!(
                "SELECT {} FROM articles WHERE user_id = ? ORDER BY id DESC",
                ARTICLE_COLUMNS
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await
            .context("Failed to list articles")?
        }
    };

    let mut articles = Vec::new();
    for row in rows {
        articles.push(row_to_article_mysql(&row)?);
    }

    Ok(articles)
}

async fn update_article_mysql(
    pool: &MySqlPool,
    id: i64,
    input: &UpdateArticleInput,
) -> Result<Article> {
    let existing = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to load article")?
    .map(|row| row_to_article_mysql(&row))
    .transpose()?
    .ok_or_else(|| anyhow::anyhow!("Article not found"))?;

    let now = Utc::now();
    let new_title = input.title.as_ref().unwrap_or(&existing.title);
    let new_short = input
        .short_description
        .as_ref()
        .unwrap_or(&existing.short_description);
    let new_price = input.price.unwrap_or(existing.price);
    let new_stock = input.stock.as_ref().unwrap_or(&existing.stock);
    let new_description = input.description.as_ref().unwrap_or(&existing.description);
    let new_variant = match input.variant_kind {
        Some(v) => v,
        None => existing.variant_kind,
    };

    sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, short_description = ?, price = ?, stock = ?, description = ?, variant_kind = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_title)
    .bind(new_short)
    .bind(new_price.to_string())
    .bind(new_stock)
    .bind(new_description)
    .bind(new_variant.map(|v| v.as_str()))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    Ok(Article {
        title: new_title.clone(),
        short_description: new_short.clone(),
        price: new_price,
        stock: new_stock.clone(),
        description: new_description.clone(),
        variant_kind: new_variant,
        updated_at: now,
        ..existing
    })
}

async fn set_article_image_mysql(pool: &MySqlPool, id: i64, image: &str) -> Result<Article> {
    let now = Utc::now();

    sqlx::query("UPDATE articles SET image = ?, updated_at = ? WHERE id = ?")
        .bind(image)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to set article image")?;

    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to reload article")?;

    row.map(|row| row_to_article_mysql(&row))
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("Article not found after image update"))
}

async fn delete_article_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Article> {
    let price_raw: String = row.get("price");
    let price = Decimal::from_str(&price_raw)
        .with_context(|| format!("Invalid stored price: {}", price_raw))?;

    let variant_raw: Option<String> = row.get("variant_kind");
    let variant_kind = match variant_raw {
        Some(s) => Some(
            VariantKind::from_str(&s)
                .ok_or_else(|| anyhow::anyhow!("Invalid variant kind: {}", s))?,
        ),
        None => None,
    };

    Ok(Article {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        short_description: row.get("short_description"),
        price,
        stock: row.get("stock"),
        description: row.get("description"),
        image: row.get("image"),
        variant_kind,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{CategoryRepository, SqlxCategoryRepository, UserRepository};
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::User;

    async fn setup() -> (DynDatabasePool, SqlxArticleRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = super::super::user::SqlxUserRepository::new(pool.clone());
        let user = user_repo
            .create(&User::new(
                "article@example.com".to_string(),
                "Article User".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        let repo = SqlxArticleRepository::new(pool.clone());
        (pool, repo, user.id)
    }

    fn sample_input(user_id: i64, title: &str) -> CreateArticleInput {
        CreateArticleInput {
            user_id,
            title: title.to_string(),
            short_description: "sample article short description".to_string(),
            price: Decimal::from_str("5.50").unwrap(),
            stock: "1".to_string(),
            description: "sample article long description".to_string(),
            variant_kind: None,
        }
    }

    #[tokio::test]
    async fn test_create_article() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&sample_input(user_id, "sample article title"))
            .await
            .expect("Failed to create article");

        assert!(created.id > 0);
        assert_eq!(created.title, "sample article title");
        assert_eq!(created.price, Decimal::from_str("5.50").unwrap());
        assert!(created.image.is_none());
        assert!(created.variant_kind.is_none());
    }

    #[tokio::test]
    async fn test_create_article_with_variant_kind() {
        let (_pool, repo, user_id) = setup().await;

        let mut input = sample_input(user_id, "variant article");
        input.variant_kind = Some(VariantKind::SizeColor);

        let created = repo.create(&input).await.expect("Failed to create article");
        let found = repo
            .get_for_user(created.id, user_id)
            .await
            .expect("Query failed")
            .expect("Article not found");
        assert_eq!(found.variant_kind, Some(VariantKind::SizeColor));
    }

    #[tokio::test]
    async fn test_ownership_scoping() {
        let (pool, repo, user_id) = setup().await;

        let user_repo = super::super::user::SqlxUserRepository::new(pool.clone());
        let other = user_repo
            .create(&User::new(
                "other@example.com".to_string(),
                "Other".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        let article = repo
            .create(&sample_input(user_id, "mine"))
            .await
            .expect("Failed to create article");

        assert!(repo
            .get_for_user(article.id, user_id)
            .await
            .expect("Query failed")
            .is_some());
        assert!(repo
            .get_for_user(article.id, other.id)
            .await
            .expect("Query failed")
            .is_none());

        let other_list = repo
            .list_for_user(other.id, None)
            .await
            .expect("Failed to list");
        assert!(other_list.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_pool, repo, user_id) = setup().await;

        for i in 1..=3 {
            repo.create(&sample_input(user_id, &format!("article {}", i)))
                .await
                .expect("Failed to create article");
        }

        let list = repo
            .list_for_user(user_id, None)
            .await
            .expect("Failed to list");
        assert_eq!(list.len(), 3);
        assert!(list[0].id > list[1].id);
        assert!(list[1].id > list[2].id);
    }

    #[tokio::test]
    async fn test_list_filtered_by_categories() {
        let (pool, repo, user_id) = setup().await;
        let category_repo = SqlxCategoryRepository::new(pool.clone());

        let books = category_repo
            .create(user_id, "books")
            .await
            .expect("Failed to create category");
        let games = category_repo
            .create(user_id, "games")
            .await
            .expect("Failed to create category");

        let a1 = repo
            .create(&sample_input(user_id, "book article"))
            .await
            .expect("Failed to create article");
        let a2 = repo
            .create(&sample_input(user_id, "game article"))
            .await
            .expect("Failed to create article");
        repo.create(&sample_input(user_id, "plain article"))
            .await
            .expect("Failed to create article");

        category_repo
            .add_to_article(books.id, a1.id)
            .await
            .expect("Failed to assign");
        category_repo
            .add_to_article(games.id, a2.id)
            .await
            .expect("Failed to assign");

        let filtered = repo
            .list_for_user(user_id, Some(&[books.id]))
            .await
            .expect("Failed to list");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, a1.id);

        let both = repo
            .list_for_user(user_id, Some(&[books.id, games.id]))
            .await
            .expect("Failed to list");
        assert_eq!(both.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&sample_input(user_id, "original title"))
            .await
            .expect("Failed to create article");

        let update = UpdateArticleInput {
            title: Some("new article title".to_string()),
            ..Default::default()
        };
        let updated = repo
            .update(created.id, &update)
            .await
            .expect("Failed to update");

        assert_eq!(updated.title, "new article title");
        assert_eq!(
            updated.short_description,
            "sample article short description"
        );
        assert_eq!(updated.price, created.price);
    }

    #[tokio::test]
    async fn test_full_update() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&sample_input(user_id, "to replace"))
            .await
            .expect("Failed to create article");

        let update = UpdateArticleInput {
            title: Some("New article title".to_string()),
            short_description: Some("New sample short description".to_string()),
            price: Some(Decimal::from_str("16.50").unwrap()),
            stock: Some("12".to_string()),
            description: Some("New sample description".to_string()),
            variant_kind: Some(Some(VariantKind::Size)),
        };
        let updated = repo
            .update(created.id, &update)
            .await
            .expect("Failed to update");

        assert_eq!(updated.title, "New article title");
        assert_eq!(updated.price, Decimal::from_str("16.50").unwrap());
        assert_eq!(updated.variant_kind, Some(VariantKind::Size));
    }

    #[tokio::test]
    async fn test_clear_variant_kind() {
        let (_pool, repo, user_id) = setup().await;

        let mut input = sample_input(user_id, "clears variant");
        input.variant_kind = Some(VariantKind::Color);
        let created = repo.create(&input).await.expect("Failed to create article");

        let update = UpdateArticleInput {
            variant_kind: Some(None),
            ..Default::default()
        };
        let updated = repo
            .update(created.id, &update)
            .await
            .expect("Failed to update");
        assert!(updated.variant_kind.is_none());
    }

    #[tokio::test]
    async fn test_set_image() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&sample_input(user_id, "with image"))
            .await
            .expect("Failed to create article");

        let updated = repo
            .set_image(created.id, "article/abc.jpg")
            .await
            .expect("Failed to set image");
        assert_eq!(updated.image.as_deref(), Some("article/abc.jpg"));
    }

    #[tokio::test]
    async fn test_find_by_title() {
        let (_pool, repo, user_id) = setup().await;

        repo.create(&sample_input(user_id, "findable"))
            .await
            .expect("Failed to create article");

        assert!(repo
            .find_by_title(user_id, "findable")
            .await
            .expect("Query failed")
            .is_some());
        assert!(repo
            .find_by_title(user_id, "missing")
            .await
            .expect("Query failed")
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_article() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&sample_input(user_id, "to delete"))
            .await
            .expect("Failed to create article");

        repo.delete(created.id).await.expect("Failed to delete");
        assert!(repo
            .get_for_user(created.id, user_id)
            .await
            .expect("Query failed")
            .is_none());
    }
}
