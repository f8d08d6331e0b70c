//! Product service
//!
//! Business logic over the product store: input validation, id and timestamp
//! stamping, and the all-or-nothing reorder gate.

use crate::models::{CreateProductInput, Product, UpdateProductInput};
use crate::store::ProductStore;
use chrono::Utc;
use std::sync::Arc;

/// Error types for product service operations
#[derive(Debug, thiserror::Error)]
pub enum ProductServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No product matches the given id
    #[error("Product not found")]
    NotFound,

    /// Reorder list contains ids the user does not own
    #[error("Invalid productIds")]
    InvalidOrdering,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Generate a timestamp-derived product id.
///
/// Uniqueness is assumed rather than enforced; the nanosecond clock keeps
/// back-to-back creations within one process from colliding.
fn next_product_id() -> String {
    let ts = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_millis());
    format!("product_{}", ts)
}

/// Product service for managing one user's list entries
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    /// Create a new product service over the given store
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// List the products owned by `user_id`, in stored order.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Product>, ProductServiceError> {
        Ok(self.store.list_for_user(user_id).await?)
    }

    /// Create a product owned by `user_id`.
    ///
    /// The name must be non-empty and the amount non-negative; the id and
    /// both timestamps are stamped here.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateProductInput,
    ) -> Result<Product, ProductServiceError> {
        if input.name.is_empty() {
            return Err(ProductServiceError::ValidationError(
                "Name and amount are required".to_string(),
            ));
        }
        if input.amount < 0.0 {
            return Err(ProductServiceError::ValidationError(
                "Amount must be non-negative".to_string(),
            ));
        }

        let product = Product::new(
            next_product_id(),
            input.name,
            input.amount,
            input.comment,
            user_id.to_string(),
        );

        Ok(self.store.add(product).await?)
    }

    /// Apply the provided fields to the product with a matching id and
    /// refresh its `updated_at`.
    pub async fn update(
        &self,
        id: &str,
        changes: UpdateProductInput,
    ) -> Result<Product, ProductServiceError> {
        self.store
            .update(id, changes)
            .await?
            .ok_or(ProductServiceError::NotFound)
    }

    /// Remove the product with a matching id.
    pub async fn delete(&self, id: &str) -> Result<(), ProductServiceError> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(ProductServiceError::NotFound)
        }
    }

    /// Reassign the order of the user's products.
    ///
    /// Fails without effect when `ordered_ids` contains an id the user does
    /// not own.
    pub async fn reorder(
        &self,
        user_id: &str,
        ordered_ids: &[String],
    ) -> Result<(), ProductServiceError> {
        if self.store.reorder(user_id, ordered_ids).await? {
            Ok(())
        } else {
            Err(ProductServiceError::InvalidOrdering)
        }
    }
}
