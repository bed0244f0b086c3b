//! Article image model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gallery image attached to an article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleImage {
    /// Unique identifier
    pub id: i64,
    /// Parent article ID
    pub article_id: i64,
    /// Stored file path (relative to the upload root)
    pub image: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
