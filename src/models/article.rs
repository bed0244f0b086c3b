//! Article model
//!
//! This module provides:
//! - `Article` entity representing a catalog product
//! - `VariantKind` enum for the optional variant axis of an article
//! - Input types for creating and updating articles
//! - `ArticleDetail` bundling an article with its associations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ArticleImage, AttributeVariant, Category};

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Owning user ID
    pub user_id: i64,
    /// Article title
    pub title: String,
    /// Short listing description
    pub short_description: String,
    /// Unit price
    pub price: Decimal,
    /// Free-form stock annotation
    pub stock: String,
    /// Long description
    pub description: String,
    /// Primary image path (relative to the upload root)
    pub image: Option<String>,
    /// Which variant axis applies to this article, if any
    pub variant_kind: Option<VariantKind>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Variant axis of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// Varies by size only
    Size,
    /// Varies by color only
    Color,
    /// Varies by both size and color
    SizeColor,
}

impl VariantKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Size => "size",
            VariantKind::Color => "color",
            VariantKind::SizeColor => "size_color",
        }
    }

    /// Parse from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "size" => Some(VariantKind::Size),
            "color" => Some(VariantKind::Color),
            "size_color" => Some(VariantKind::SizeColor),
            _ => None,
        }
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new article
#[derive(Debug, Clone)]
pub struct CreateArticleInput {
    /// Owning user ID
    pub user_id: i64,
    /// Article title
    pub title: String,
    /// Short listing description
    pub short_description: String,
    /// Unit price
    pub price: Decimal,
    /// Free-form stock annotation
    pub stock: String,
    /// Long description
    pub description: String,
    /// Variant axis (optional)
    pub variant_kind: Option<VariantKind>,
}

/// Input for updating an existing article
///
/// Every field is optional; omitted fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleInput {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the variant axis, `None` leaves it untouched
    pub variant_kind: Option<Option<VariantKind>>,
}

impl UpdateArticleInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.short_description.is_some()
            || self.price.is_some()
            || self.stock.is_some()
            || self.description.is_some()
            || self.variant_kind.is_some()
    }
}

/// An article together with its associated catalog data.
///
/// Used by the service layer so API handlers can shape list and detail
/// payloads without re-querying associations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub article: Article,
    pub categories: Vec<Category>,
    pub attributes: Vec<AttributeVariant>,
    pub images: Vec<ArticleImage>,
}
