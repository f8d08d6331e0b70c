//! Product storage
//!
//! Storage layer for product records.
//!
//! This module provides:
//! - `ProductStore` trait defining the interface for product data access
//! - `MemoryProductStore` implementing the trait over a process-local list
//!
//! Storage is ephemeral by contract: the list lives for the lifetime of the
//! process and is reset on every restart.

pub mod memory;

pub use memory::MemoryProductStore;

use crate::models::{Product, UpdateProductInput};
use anyhow::Result;
use async_trait::async_trait;

/// Product store trait
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Return the full stored list (empty when nothing has been stored)
    async fn read_all(&self) -> Result<Vec<Product>>;

    /// Replace the stored list wholesale
    async fn write(&self, products: Vec<Product>) -> Result<()>;

    /// Return the subsequence owned by `user_id`, relative order preserved
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Product>>;

    /// Append a product; returns the stored product unchanged
    async fn add(&self, product: Product) -> Result<Product>;

    /// Merge the provided fields over the first product with a matching id
    /// and refresh its `updated_at`; `None` when no product matches
    async fn update(&self, id: &str, changes: UpdateProductInput) -> Result<Option<Product>>;

    /// Remove the first product with a matching id; returns whether a match
    /// was found
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Reassign the relative order of one user's products.
    ///
    /// Every id in `ordered_ids` must belong to `user_id`; a single foreign
    /// or unknown id fails the whole operation (`false`) with no effect on
    /// the stored list. Products of `user_id` that `ordered_ids` omits are
    /// dropped from storage, and the user's block is reattached after all
    /// other users' records.
    async fn reorder(&self, user_id: &str, ordered_ids: &[String]) -> Result<bool>;
}
