//! In-memory product store
//!
//! The canonical store: one `tokio::sync::RwLock` around a `Vec<Product>`.
//! Every mutation holds the write lock for its whole read-modify-write, so
//! concurrent requests serialize at this single coordination point instead of
//! racing on interleaved whole-list reads and writes.

use crate::models::{Product, UpdateProductInput};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ProductStore;

/// In-memory product store implementation
#[derive(Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
        }
    }

    /// Create a boxed store for use with dependency injection
    pub fn boxed() -> Arc<dyn ProductStore> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn read_all(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn write(&self, products: Vec<Product>) -> Result<()> {
        *self.products.write().await = products;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add(&self, product: Product) -> Result<Product> {
        let mut products = self.products.write().await;
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &str, changes: UpdateProductInput) -> Result<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(amount) = changes.amount {
            product.amount = amount;
        }
        if let Some(comment) = changes.comment {
            product.comment = Some(comment);
        }
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut products = self.products.write().await;
        match products.iter().position(|p| p.id == id) {
            Some(index) => {
                products.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reorder(&self, user_id: &str, ordered_ids: &[String]) -> Result<bool> {
        let mut products = self.products.write().await;
        let user_products: Vec<Product> = products
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();

        // All-or-nothing gate: one foreign or unknown id rejects the whole
        // request before anything is touched.
        let invalid: Vec<&String> = ordered_ids
            .iter()
            .filter(|id| !user_products.iter().any(|p| &p.id == *id))
            .collect();
        if !invalid.is_empty() {
            tracing::debug!(user_id, ?invalid, "reorder rejected: ids not owned by user");
            return Ok(false);
        }

        let reordered: Vec<Product> = ordered_ids
            .iter()
            .filter_map(|id| user_products.iter().find(|p| &p.id == id).cloned())
            .collect();

        if reordered.len() < user_products.len() {
            tracing::warn!(
                user_id,
                dropped = user_products.len() - reordered.len(),
                "reorder list omitted existing products; omitted records are dropped"
            );
        }

        // Other users keep their relative order; the reordered block is
        // reattached at the tail.
        let mut next: Vec<Product> = products
            .iter()
            .filter(|p| p.user_id != user_id)
            .cloned()
            .collect();
        next.extend(reordered);
        *products = next;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_product(id: &str, user_id: &str) -> Product {
        Product::new(
            id.to_string(),
            format!("Product {}", id),
            100.0,
            Some("test comment".to_string()),
            user_id.to_string(),
        )
    }

    async fn seeded_store(products: Vec<Product>) -> MemoryProductStore {
        let store = MemoryProductStore::new();
        store.write(products).await.expect("Failed to seed store");
        store
    }

    #[tokio::test]
    async fn test_read_all_empty() {
        let store = MemoryProductStore::new();
        let products = store.read_all().await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_write_replaces_wholesale() {
        let store = seeded_store(vec![
            create_test_product("product_1", "user_a"),
            create_test_product("product_2", "user_a"),
        ])
        .await;

        let replacement = vec![create_test_product("product_9", "user_b")];
        store.write(replacement.clone()).await.unwrap();

        assert_eq!(store.read_all().await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn test_list_for_user_preserves_order() {
        let store = seeded_store(vec![
            create_test_product("product_1", "user_a"),
            create_test_product("product_2", "user_b"),
            create_test_product("product_3", "user_a"),
        ])
        .await;

        let listed = store.list_for_user("user_a").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["product_1", "product_3"]);
    }

    #[tokio::test]
    async fn test_list_for_unknown_user_is_empty() {
        let store = seeded_store(vec![create_test_product("product_1", "user_a")]).await;
        assert!(store.list_for_user("user_zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_appends() {
        let store = seeded_store(vec![create_test_product("product_1", "user_a")]).await;

        let added = store
            .add(create_test_product("product_2", "user_a"))
            .await
            .unwrap();
        assert_eq!(added.id, "product_2");

        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id, "product_2");
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let mut product = create_test_product("product_1", "user_a");
        product.updated_at = product.updated_at - Duration::hours(1);
        let original_updated_at = product.updated_at;
        let store = seeded_store(vec![product]).await;

        let updated = store
            .update(
                "product_1",
                UpdateProductInput {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("Product not found");

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.amount, 100.0);
        assert_eq!(updated.comment.as_deref(), Some("test comment"));
        assert!(updated.updated_at > original_updated_at);
    }

    #[tokio::test]
    async fn test_update_applies_zero_and_empty_values() {
        let store = seeded_store(vec![create_test_product("product_1", "user_a")]).await;

        let updated = store
            .update(
                "product_1",
                UpdateProductInput {
                    amount: Some(0.0),
                    comment: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("Product not found");

        assert_eq!(updated.amount, 0.0);
        assert_eq!(updated.comment.as_deref(), Some(""));
        assert_eq!(updated.name, "Product product_1");
    }

    #[tokio::test]
    async fn test_update_not_found_leaves_store_unchanged() {
        let store = seeded_store(vec![create_test_product("product_1", "user_a")]).await;
        let before = store.read_all().await.unwrap();

        let result = store
            .update(
                "product_missing",
                UpdateProductInput {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.read_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_match() {
        let store = seeded_store(vec![
            create_test_product("product_1", "user_a"),
            create_test_product("product_2", "user_a"),
        ])
        .await;

        assert!(store.delete("product_1").await.unwrap());

        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.iter().all(|p| p.id != "product_1"));
    }

    #[tokio::test]
    async fn test_delete_not_found_is_noop() {
        let store = seeded_store(vec![create_test_product("product_1", "user_a")]).await;
        let before = store.read_all().await.unwrap();

        assert!(!store.delete("product_missing").await.unwrap());
        assert_eq!(store.read_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_reorder_swaps_user_products() {
        let store = seeded_store(vec![
            create_test_product("p1", "u1"),
            create_test_product("p2", "u1"),
            create_test_product("p3", "u2"),
        ])
        .await;

        let ok = store
            .reorder("u1", &["p2".to_string(), "p1".to_string()])
            .await
            .unwrap();
        assert!(ok);

        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 3);

        let u1_ids: Vec<String> = store
            .list_for_user("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(u1_ids, vec!["p2".to_string(), "p1".to_string()]);

        let u2 = store.list_for_user("u2").await.unwrap();
        assert_eq!(u2.len(), 1);
        assert_eq!(u2[0].id, "p3");
    }

    #[tokio::test]
    async fn test_reorder_foreign_id_fails_without_effect() {
        let store = seeded_store(vec![
            create_test_product("p1", "u1"),
            create_test_product("p2", "u1"),
            create_test_product("p3", "u2"),
        ])
        .await;
        let before = store.read_all().await.unwrap();

        // p3 belongs to u2
        let ok = store
            .reorder("u1", &["p3".to_string(), "p1".to_string()])
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(store.read_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_reorder_unknown_id_fails_without_effect() {
        let store = seeded_store(vec![create_test_product("p1", "u1")]).await;
        let before = store.read_all().await.unwrap();

        let ok = store
            .reorder("u1", &["p1".to_string(), "p_missing".to_string()])
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(store.read_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_reorder_omitted_products_are_dropped() {
        let store = seeded_store(vec![
            create_test_product("p1", "u1"),
            create_test_product("p2", "u1"),
            create_test_product("p3", "u1"),
        ])
        .await;

        let ok = store
            .reorder("u1", &["p3".to_string(), "p1".to_string()])
            .await
            .unwrap();
        assert!(ok);

        let ids: Vec<String> = store
            .list_for_user("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p3".to_string(), "p1".to_string()]);
        assert_eq!(store.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reorder_moves_user_block_to_tail() {
        let store = seeded_store(vec![
            create_test_product("p1", "u1"),
            create_test_product("p2", "u2"),
        ])
        .await;

        assert!(store.reorder("u1", &["p1".to_string()]).await.unwrap());

        let ids: Vec<String> = store
            .read_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        // u1's block is reattached after the untouched u2 records
        assert_eq!(ids, vec!["p2".to_string(), "p1".to_string()]);
    }

    #[tokio::test]
    async fn test_reorder_empty_list_for_user_without_products() {
        let store = seeded_store(vec![create_test_product("p1", "u2")]).await;

        // An empty ordering is vacuously valid
        assert!(store.reorder("u1", &[]).await.unwrap());
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn ids_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set("[a-z0-9]{4,8}", 1..8)
            .prop_map(|set| set.into_iter().map(|s| format!("product_{}", s)).collect())
    }

    fn seeded(ids: &[String], user_id: &str) -> Vec<Product> {
        ids.iter()
            .map(|id| {
                Product::new(
                    id.clone(),
                    format!("Product {}", id),
                    1.0,
                    None,
                    user_id.to_string(),
                )
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Reordering with any permutation of the user's own ids keeps the
        /// stored set intact and applies exactly the requested order.
        #[test]
        fn property_reorder_permutation_preserves_set(ids in ids_strategy(), seed in any::<u64>()) {
            tokio_test::block_on(async {
                let mut permuted = ids.clone();
                // Deterministic shuffle driven by the seed
                let len = permuted.len();
                for i in (1..len).rev() {
                    let j = (seed as usize).wrapping_mul(31).wrapping_add(i) % (i + 1);
                    permuted.swap(i, j);
                }

                let store = MemoryProductStore::new();
                store.write(seeded(&ids, "u1")).await.unwrap();

                prop_assert!(store.reorder("u1", &permuted).await.unwrap());

                let stored: Vec<String> = store
                    .list_for_user("u1")
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                prop_assert_eq!(stored, permuted);
                Ok(())
            })?;
        }

        /// A single unknown id always rejects the reorder and leaves the
        /// stored list untouched.
        #[test]
        fn property_reorder_unknown_id_has_no_effect(ids in ids_strategy()) {
            tokio_test::block_on(async {
                let store = MemoryProductStore::new();
                store.write(seeded(&ids, "u1")).await.unwrap();
                let before = store.read_all().await.unwrap();

                let mut with_unknown = ids.clone();
                with_unknown.push("product_not_stored".to_string());

                prop_assert!(!store.reorder("u1", &with_unknown).await.unwrap());
                prop_assert_eq!(store.read_all().await.unwrap(), before);
                Ok(())
            })?;
        }
    }
}
