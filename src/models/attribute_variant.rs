//! Attribute variant model
//!
//! An attribute variant is a user-owned, price-bearing option (e.g. size
//! "XL", color "red") that can be attached to any number of articles.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Attribute variant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeVariant {
    /// Unique identifier
    pub id: i64,
    /// Owning user ID
    pub user_id: i64,
    /// Variant kind, e.g. "size" or "color"
    #[serde(rename = "type")]
    pub kind: String,
    /// Variant name, e.g. "XL" or "red"
    pub name: String,
    /// Price delta or absolute price for this variant
    pub price: Decimal,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating (or matching) an attribute variant
#[derive(Debug, Clone)]
pub struct AttributeVariantInput {
    pub user_id: i64,
    pub kind: String,
    pub name: String,
    pub price: Decimal,
}

/// Input for updating an attribute variant.
///
/// The kind is fixed at creation time and cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateAttributeVariantInput {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    #[test]
    fn test_kind_serialized_as_type() {
        let variant = AttributeVariant {
            id: 1,
            user_id: 1,
            kind: "size".to_string(),
            name: "XL".to_string(),
            price: Decimal::from_str("2.50").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&variant).expect("Failed to serialize");
        assert_eq!(json["type"], "size");
        assert!(json.get("kind").is_none());
    }
}
