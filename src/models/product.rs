//! Product model
//!
//! This module defines the Product entity and its input types.
//!
//! Products are user-owned list entries with no referential integrity back to
//! any user record; the `user_id` is whatever identity the session cookie
//! carried when the product was created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product entity representing a single entry in a user's list.
///
/// Serialized in camelCase to match the JSON contract consumed by the
/// browser client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque identifier, generated at creation time
    pub id: String,
    /// Display name
    pub name: String,
    /// Non-negative quantity
    pub amount: f64,
    /// Optional free text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Owning identity
    pub user_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new Product with both timestamps set to now.
    pub fn new(
        id: String,
        name: String,
        amount: f64,
        comment: Option<String>,
        user_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            amount,
            comment,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new product
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Display name (must be non-empty)
    pub name: String,
    /// Quantity (must be non-negative)
    pub amount: f64,
    /// Optional free text
    pub comment: Option<String>,
}

/// Input for updating a product
///
/// `None` fields are left untouched; provided fields are applied as-is.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// New name (optional)
    pub name: Option<String>,
    /// New amount (optional)
    pub amount: Option<f64>,
    /// New comment (optional)
    pub comment: Option<String>,
}
