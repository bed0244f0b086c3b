//! Article image repository
//!
//! Database operations for article gallery images.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::ArticleImage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article image repository trait
#[async_trait]
pub trait ArticleImageRepository: Send + Sync {
    /// Attach a new gallery image to an article
    async fn create(&self, article_id: i64, image: &str) -> Result<ArticleImage>;

    /// List an article's gallery images, oldest first
    async fn list_for_article(&self, article_id: i64) -> Result<Vec<ArticleImage>>;

    /// Remove all gallery images from an article
    async fn delete_for_article(&self, article_id: i64) -> Result<()>;
}

/// SQLx-based article image repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleImageRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleImageRepository {
    /// Create a new SQLx article image repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleImageRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleImageRepository for SqlxArticleImageRepository {
    async fn create(&self, article_id: i64, image: &str) -> Result<ArticleImage> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_image_sqlite(self.pool.as_sqlite().unwrap(), article_id, image).await
            }
            DatabaseDriver::Mysql => {
                create_image_mysql(self.pool.as_mysql().unwrap(), article_id, image).await
            }
        }
    }

    async fn list_for_article(&self, article_id: i64) -> Result<Vec<ArticleImage>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_images_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                list_images_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }

    async fn delete_for_article(&self, article_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_images_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                delete_images_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_image_sqlite(
    pool: &SqlitePool,
    article_id: i64,
    image: &str,
) -> Result<ArticleImage> {
    let now = Utc::now();

    let result =
        sqlx::query("INSERT INTO article_images (article_id, image, created_at) VALUES (?, ?, ?)")
            .bind(article_id)
            .bind(image)
            .bind(now)
            .execute(pool)
            .await
            .context("Failed to create article image")?;

    Ok(ArticleImage {
        id: result.last_insert_rowid(),
        article_id,
        image: image.to_string(),
        created_at: now,
    })
}

async fn list_images_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<ArticleImage>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, image, created_at
        FROM article_images
        WHERE article_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list article images")?;

    Ok(rows
        .iter()
        .map(|row| ArticleImage {
            id: row.get("id"),
            article_id: row.get("article_id"),
            image: row.get("image"),
            created_at: row.get("created_at"),
        })
        .collect())
}

async fn delete_images_sqlite(pool: &SqlitePool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_images WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to delete article images")?;

    Ok(())
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_image_mysql(
    pool: &MySqlPool,
    article_id: i64,
    image: &str,
) -> Result<ArticleImage> {
    let now = Utc::now();

    let result =
        sqlx::query("INSERT INTO article_images (article_id, image, created_at) VALUES (?, ?, ?)")
            .bind(article_id)
            .bind(image)
            .bind(now)
            .execute(pool)
            .await
            .context("Failed to create article image")?;

    Ok(ArticleImage {
        id: result.last_insert_id() as i64,
        article_id,
        image: image.to_string(),
        created_at: now,
    })
}

async fn list_images_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<ArticleImage>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, image, created_at
        FROM article_images
        WHERE article_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list article images")?;

    Ok(rows
        .iter()
        .map(|row| ArticleImage {
            id: row.get("id"),
            article_id: row.get("article_id"),
            image: row.get("image"),
            created_at: row.get("created_at"),
        })
        .collect())
}

async fn delete_images_mysql(pool: &MySqlPool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_images WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to delete article images")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{ArticleRepository, SqlxArticleRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{CreateArticleInput, User};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    async fn setup() -> (SqlxArticleImageRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = super::super::user::SqlxUserRepository::new(pool.clone());
        let user = user_repo
            .create(&User::new(
                "image@example.com".to_string(),
                "Image User".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        let article_repo = SqlxArticleRepository::new(pool.clone());
        let article = article_repo
            .create(&CreateArticleInput {
                user_id: user.id,
                title: "gallery article".to_string(),
                short_description: "s".to_string(),
                price: Decimal::from_str("1.00").unwrap(),
                stock: "1".to_string(),
                description: "d".to_string(),
                variant_kind: None,
            })
            .await
            .expect("Failed to create article");

        (SqlxArticleImageRepository::new(pool), article.id)
    }

    #[tokio::test]
    async fn test_create_and_list_images() {
        let (repo, article_id) = setup().await;

        repo.create(article_id, "article/one.jpg")
            .await
            .expect("Failed to create image");
        repo.create(article_id, "article/two.jpg")
            .await
            .expect("Failed to create image");

        let images = repo
            .list_for_article(article_id)
            .await
            .expect("Failed to list");
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].image, "article/one.jpg");
        assert_eq!(images[1].image, "article/two.jpg");
    }

    #[tokio::test]
    async fn test_delete_for_article() {
        let (repo, article_id) = setup().await;

        repo.create(article_id, "article/one.jpg")
            .await
            .expect("Failed to create image");
        repo.delete_for_article(article_id)
            .await
            .expect("Failed to delete");

        let images = repo
            .list_for_article(article_id)
            .await
            .expect("Failed to list");
        assert!(images.is_empty());
    }
}
