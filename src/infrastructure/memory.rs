//! In-memory implementation of every repository trait.
//!
//! Mirrors the constraints of the PostgreSQL schema (unique names, foreign
//! keys, the conditional distributor write on save) so services behave the
//! same against either backend. Used by the HTTP tests and by
//! `STORAGE_BACKEND=memory`.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use crate::domain::admission::AdmissionError;
use crate::domain::entities::{
    Distributor, Enterprise, MAX_QUANTITY, NewDistributor, NewEnterprise, NewProduct,
    NewSupplier, Order, Product, Supplier, UpdateDistributor, UpdateEnterprise, UpdateSupplier,
};
use crate::domain::repositories::{
    DistributorRepository, EnterpriseRepository, OrderRepository, ProductRepository,
    SupplierRepository,
};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    next_id: i64,
    distributors: BTreeMap<i64, Distributor>,
    suppliers: BTreeMap<i64, Supplier>,
    enterprises: BTreeMap<i64, Enterprise>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn unique_violation(table: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": format!("{table}_name_key") }),
    )
}

fn still_referenced(table: &str) -> AppError {
    AppError::conflict(
        "Record is still referenced",
        json!({ "constraint": format!("{table}_fkey") }),
    )
}

fn carts_still_hold(product_id: i64, distributor_ids: &BTreeSet<i64>) -> AppError {
    AppError::conflict(
        "Carts still hold this product through a distributor being removed",
        json!({ "product_id": product_id, "distributor_ids": distributor_ids }),
    )
}

/// Process-local store shared by all repository traits.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DistributorRepository for MemoryStore {
    async fn create(&self, new_distributor: NewDistributor) -> Result<Distributor, AppError> {
        let mut t = self.tables.write().await;
        if t.distributors.values().any(|d| d.name == new_distributor.name) {
            return Err(unique_violation("distributors"));
        }

        let now = Utc::now();
        let distributor = Distributor {
            id: t.next_id(),
            name: new_distributor.name,
            description: new_distributor.description,
            email: new_distributor.email,
            pickup_address: new_distributor.pickup_address,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.distributors.insert(distributor.id, distributor.clone());
        Ok(distributor)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Distributor>, AppError> {
        Ok(self.tables.read().await.distributors.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Distributor>, AppError> {
        let t = self.tables.read().await;
        Ok(t.distributors.values().find(|d| d.name == name).cloned())
    }

    async fn list(&self, only_active: bool) -> Result<Vec<Distributor>, AppError> {
        let t = self.tables.read().await;
        let mut list: Vec<_> = t
            .distributors
            .values()
            .filter(|d| !only_active || d.is_active)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn update(&self, id: i64, update: UpdateDistributor) -> Result<Distributor, AppError> {
        let mut t = self.tables.write().await;
        if let Some(name) = &update.name
            && t.distributors.values().any(|d| &d.name == name && d.id != id)
        {
            return Err(unique_violation("distributors"));
        }

        let distributor = t
            .distributors
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Distributor not found", json!({"id": id})))?;
        update.apply_to(distributor);
        distributor.updated_at = Utc::now();
        Ok(distributor.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if !t.distributors.contains_key(&id) {
            return Err(AppError::not_found(
                "Distributor not found",
                json!({"id": id}),
            ));
        }
        if t.orders.values().any(|o| o.distributor_id == Some(id)) {
            return Err(still_referenced("orders_distributor_id"));
        }

        t.distributors.remove(&id);
        for product in t.products.values_mut() {
            product.distributor_ids.remove(&id);
        }
        Ok(())
    }

    async fn set_active_many(&self, ids: Vec<i64>, is_active: bool) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for id in ids.into_iter().collect::<BTreeSet<_>>() {
            if let Some(d) = t.distributors.get_mut(&id) {
                d.is_active = is_active;
                d.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_orders(&self, id: i64) -> Result<i64, AppError> {
        let t = self.tables.read().await;
        Ok(t.orders
            .values()
            .filter(|o| o.distributor_id == Some(id))
            .count() as i64)
    }
}

#[async_trait]
impl SupplierRepository for MemoryStore {
    async fn create(&self, new_supplier: NewSupplier) -> Result<Supplier, AppError> {
        let mut t = self.tables.write().await;
        if t.suppliers.values().any(|s| s.name == new_supplier.name) {
            return Err(unique_violation("suppliers"));
        }

        let now = Utc::now();
        let supplier = Supplier {
            id: t.next_id(),
            name: new_supplier.name,
            description: new_supplier.description,
            email: new_supplier.email,
            created_at: now,
            updated_at: now,
        };
        t.suppliers.insert(supplier.id, supplier.clone());
        Ok(supplier)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Supplier>, AppError> {
        Ok(self.tables.read().await.suppliers.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Supplier>, AppError> {
        let t = self.tables.read().await;
        Ok(t.suppliers.values().find(|s| s.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Supplier>, AppError> {
        let t = self.tables.read().await;
        let mut list: Vec<_> = t.suppliers.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn update(&self, id: i64, update: UpdateSupplier) -> Result<Supplier, AppError> {
        let mut t = self.tables.write().await;
        if let Some(name) = &update.name
            && t.suppliers.values().any(|s| &s.name == name && s.id != id)
        {
            return Err(unique_violation("suppliers"));
        }

        let supplier = t
            .suppliers
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Supplier not found", json!({"id": id})))?;
        update.apply_to(supplier);
        supplier.updated_at = Utc::now();
        Ok(supplier.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if t.suppliers.remove(&id).is_none() {
            return Err(AppError::not_found("Supplier not found", json!({"id": id})));
        }
        for product in t.products.values_mut() {
            if product.supplier_id == Some(id) {
                product.supplier_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EnterpriseRepository for MemoryStore {
    async fn create(&self, new_enterprise: NewEnterprise) -> Result<Enterprise, AppError> {
        let mut t = self.tables.write().await;
        if t.enterprises.values().any(|e| e.name == new_enterprise.name) {
            return Err(unique_violation("enterprises"));
        }

        let now = Utc::now();
        let enterprise = Enterprise {
            id: t.next_id(),
            name: new_enterprise.name,
            description: new_enterprise.description,
            is_primary_producer: new_enterprise.is_primary_producer,
            is_distributor: new_enterprise.is_distributor,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.enterprises.insert(enterprise.id, enterprise.clone());
        Ok(enterprise)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Enterprise>, AppError> {
        Ok(self.tables.read().await.enterprises.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Enterprise>, AppError> {
        let t = self.tables.read().await;
        Ok(t.enterprises.values().find(|e| e.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Enterprise>, AppError> {
        let t = self.tables.read().await;
        let mut list: Vec<_> = t.enterprises.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn update(&self, id: i64, update: UpdateEnterprise) -> Result<Enterprise, AppError> {
        let mut updated = self.update_many(vec![(id, update)]).await?;
        updated
            .pop()
            .ok_or_else(|| AppError::not_found("Enterprise not found", json!({"id": id})))
    }

    async fn update_many(
        &self,
        updates: Vec<(i64, UpdateEnterprise)>,
    ) -> Result<Vec<Enterprise>, AppError> {
        let mut t = self.tables.write().await;

        // Work on a copy so a failure leaves the table untouched.
        let mut staged = t.enterprises.clone();
        let now = Utc::now();
        let mut touched = Vec::with_capacity(updates.len());

        for (id, update) in updates {
            if let Some(name) = &update.name
                && staged.values().any(|e| &e.name == name && e.id != id)
            {
                return Err(unique_violation("enterprises"));
            }
            let enterprise = staged
                .get_mut(&id)
                .ok_or_else(|| AppError::not_found("Enterprise not found", json!({"id": id})))?;
            update.apply_to(enterprise);
            enterprise.updated_at = now;
            touched.push(id);
        }

        let updated = touched
            .iter()
            .filter_map(|id| staged.get(id).cloned())
            .collect();
        t.enterprises = staged;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut t = self.tables.write().await;
        if t.enterprises.remove(&id).is_none() {
            return Err(AppError::not_found(
                "Enterprise not found",
                json!({"id": id}),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let mut t = self.tables.write().await;
        if t.products.values().any(|p| p.name == new_product.name) {
            return Err(unique_violation("products"));
        }
        if let Some(supplier_id) = new_product.supplier_id
            && !t.suppliers.contains_key(&supplier_id)
        {
            return Err(still_referenced("products_supplier_id"));
        }
        if new_product
            .distributor_ids
            .iter()
            .any(|id| !t.distributors.contains_key(id))
        {
            return Err(still_referenced("product_distributions_distributor_id"));
        }

        let now = Utc::now();
        let product = Product {
            id: t.next_id(),
            name: new_product.name,
            description: new_product.description,
            supplier_id: new_product.supplier_id,
            distributor_ids: new_product.distributor_ids,
            created_at: now,
            updated_at: now,
        };
        t.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, AppError> {
        let t = self.tables.read().await;
        Ok(t.products.values().find(|p| p.name == name).cloned())
    }

    async fn find_many(&self, ids: Vec<i64>) -> Result<Vec<Product>, AppError> {
        let t = self.tables.read().await;
        let wanted: BTreeSet<i64> = ids.into_iter().collect();
        Ok(wanted
            .iter()
            .filter_map(|id| t.products.get(id).cloned())
            .collect())
    }

    async fn list(&self, distributor_id: Option<i64>) -> Result<Vec<Product>, AppError> {
        let t = self.tables.read().await;
        let mut list: Vec<_> = t
            .products
            .values()
            .filter(|p| distributor_id.is_none_or(|d| p.is_available_at(d)))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn set_distributors(
        &self,
        id: i64,
        distributor_ids: BTreeSet<i64>,
    ) -> Result<Product, AppError> {
        let mut t = self.tables.write().await;
        if distributor_ids
            .iter()
            .any(|d| !t.distributors.contains_key(d))
        {
            return Err(still_referenced("product_distributions_distributor_id"));
        }

        let stranded: BTreeSet<i64> = t
            .orders
            .values()
            .filter(|o| o.line_items.iter().any(|li| li.product_id == id))
            .filter_map(|o| o.distributor_id)
            .filter(|d| !distributor_ids.contains(d))
            .collect();
        if !stranded.is_empty() {
            return Err(carts_still_hold(id, &stranded));
        }

        let product = t
            .products
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Product not found", json!({"id": id})))?;
        product.distributor_ids = distributor_ids;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<Order>, AppError> {
        let t = self.tables.read().await;
        Ok(t.orders.values().find(|o| o.token == token).cloned())
    }

    async fn save(&self, order: &Order) -> Result<Order, AppError> {
        let mut t = self.tables.write().await;

        if let Some(distributor_id) = order.distributor_id
            && !t.distributors.contains_key(&distributor_id)
        {
            return Err(still_referenced("orders_distributor_id"));
        }
        if let Some(item) = order
            .unsaved_line_items()
            .find(|li| !t.products.contains_key(&li.product_id))
        {
            return Err(AppError::not_found(
                "Product not found",
                json!({"id": item.product_id}),
            ));
        }

        if let Some(item) = order.unsaved_line_items().find(|li| {
            !order
                .distributor_id
                .zip(t.products.get(&li.product_id))
                .is_some_and(|(d, p)| p.is_available_at(d))
        }) {
            return Err(match order.distributor_id {
                Some(distributor_id) => AdmissionError::ProductNotAtDistributor {
                    product_id: item.product_id,
                    distributor_id,
                }
                .into(),
                None => AdmissionError::NoDistributor.into(),
            });
        }
        if let Some(item) = order
            .unsaved_line_items()
            .find(|li| li.quantity > MAX_QUANTITY)
        {
            return Err(AppError::bad_request(
                "Quantity is too large",
                json!({"product_id": item.product_id}),
            ));
        }

        let order_id = if order.is_stored() {
            order.id
        } else {
            if t.orders.values().any(|o| o.token == order.token) {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "orders_token_key" }),
                ));
            }
            let now = Utc::now();
            let id = t.next_id();
            t.orders.insert(
                id,
                Order {
                    id,
                    line_items: Vec::new(),
                    created_at: now,
                    updated_at: now,
                    ..order.clone()
                },
            );
            id
        };

        let unsaved: Vec<_> = order.unsaved_line_items().cloned().collect();
        let mut ids = Vec::with_capacity(unsaved.len());
        for _ in &unsaved {
            ids.push(t.next_id());
        }

        let stored = t
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::not_found("Order not found", json!({"id": order.id})))?;

        if !stored.line_items.is_empty() && stored.distributor_id != order.distributor_id {
            return Err(match (stored.distributor_id, order.distributor_id) {
                (Some(current), Some(requested)) => AdmissionError::DistributorMismatch {
                    order_distributor: current,
                    requested,
                }
                .into(),
                _ => AdmissionError::CartNotEmpty.into(),
            });
        }

        stored.distributor_id = order.distributor_id;
        for (mut item, id) in unsaved.into_iter().zip(ids) {
            item.id = Some(id);
            stored.line_items.push(item);
        }
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn clear(&self, order_id: i64) -> Result<Order, AppError> {
        let mut t = self.tables.write().await;
        let stored = t
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::not_found("Order not found", json!({"id": order_id})))?;

        stored.line_items.clear();
        stored.distributor_id = None;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LineItem;

    async fn seed_distributor(store: &MemoryStore, name: &str) -> Distributor {
        DistributorRepository::create(
            store,
            NewDistributor {
                name: name.to_string(),
                description: None,
                email: None,
                pickup_address: None,
            },
        )
        .await
        .unwrap()
    }

    async fn seed_product(store: &MemoryStore, name: &str, distributors: &[i64]) -> Product {
        ProductRepository::create(
            store,
            NewProduct {
                name: name.to_string(),
                description: None,
                supplier_id: None,
                distributor_ids: distributors.iter().copied().collect(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_distributor_name_conflicts() {
        let store = MemoryStore::new();
        seed_distributor(&store, "Hub").await;

        let result = DistributorRepository::create(
            &store,
            NewDistributor {
                name: "Hub".to_string(),
                description: None,
                email: None,
                pickup_address: None,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_save_assigns_line_item_ids() {
        let store = MemoryStore::new();
        let d = seed_distributor(&store, "Hub").await;
        let p = seed_product(&store, "Eggs", &[d.id]).await;

        let mut order = Order::draft("tok");
        order.distributor_id = Some(d.id);
        order.line_items.push(LineItem::new(p.id, 2));

        let saved = store.save(&order).await.unwrap();

        assert!(saved.is_stored());
        assert_eq!(saved.line_items.len(), 1);
        assert!(saved.line_items[0].id.is_some());
        assert_eq!(saved.distributor_id, Some(d.id));
    }

    #[tokio::test]
    async fn test_failed_first_save_stores_nothing() {
        let store = MemoryStore::new();
        let d = seed_distributor(&store, "Hub").await;

        let mut order = Order::draft("tok");
        order.distributor_id = Some(d.id);
        order.line_items.push(LineItem::new(999, 1));

        let result = store.save(&order).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert!(store.find_by_token("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_draft_with_taken_token_conflicts() {
        let store = MemoryStore::new();
        store.save(&Order::draft("tok")).await.unwrap();

        let result = store.save(&Order::draft("tok")).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_save_refuses_rebinding_non_empty_cart() {
        let store = MemoryStore::new();
        let d1 = seed_distributor(&store, "Hub 1").await;
        let d2 = seed_distributor(&store, "Hub 2").await;
        let p = seed_product(&store, "Eggs", &[d1.id, d2.id]).await;

        let mut order = Order::draft("tok");
        order.distributor_id = Some(d1.id);
        order.line_items.push(LineItem::new(p.id, 1));
        let saved = store.save(&order).await.unwrap();

        let mut stale = saved.clone();
        stale.distributor_id = Some(d2.id);
        stale.line_items.push(LineItem::new(p.id, 1));

        let result = store.save(&stale).await;
        assert!(matches!(
            result,
            Err(AppError::Rejected {
                reason: "distributor_mismatch",
                ..
            })
        ));

        let current = store.find_by_token("tok").await.unwrap().unwrap();
        assert_eq!(current.line_items.len(), 1);
        assert_eq!(current.distributor_id, Some(d1.id));
    }

    #[tokio::test]
    async fn test_delete_distributor_in_use_conflicts() {
        let store = MemoryStore::new();
        let d = seed_distributor(&store, "Hub").await;

        let mut order = Order::draft("tok");
        order.distributor_id = Some(d.id);
        store.save(&order).await.unwrap();

        let result = DistributorRepository::delete(&store, d.id).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_bulk_update_is_atomic() {
        let store = MemoryStore::new();
        let e = EnterpriseRepository::create(
            &store,
            NewEnterprise {
                name: "Farm".to_string(),
                description: None,
                is_primary_producer: true,
                is_distributor: false,
            },
        )
        .await
        .unwrap();

        let result = store
            .update_many(vec![
                (
                    e.id,
                    UpdateEnterprise {
                        is_active: Some(false),
                        ..Default::default()
                    },
                ),
                (9_999, UpdateEnterprise::default()),
            ])
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        let unchanged = EnterpriseRepository::find_by_id(&store, e.id)
            .await
            .unwrap()
            .unwrap();
        assert!(unchanged.is_active);
    }

    #[tokio::test]
    async fn test_removing_distributor_of_held_product_conflicts() {
        let store = MemoryStore::new();
        let d1 = seed_distributor(&store, "Hub 1").await;
        let d2 = seed_distributor(&store, "Hub 2").await;
        let p = seed_product(&store, "Eggs", &[d1.id, d2.id]).await;

        let mut order = Order::draft("tok");
        order.distributor_id = Some(d1.id);
        order.line_items.push(LineItem::new(p.id, 1));
        store.save(&order).await.unwrap();

        let result = store.set_distributors(p.id, BTreeSet::from([d2.id])).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
        let unchanged = ProductRepository::find_by_id(&store, p.id)
            .await
            .unwrap()
            .unwrap();
        assert!(unchanged.is_available_at(d1.id));

        let narrowed = store
            .set_distributors(p.id, BTreeSet::from([d1.id]))
            .await
            .unwrap();
        assert!(!narrowed.is_available_at(d2.id));
    }

    #[tokio::test]
    async fn test_save_rejects_item_no_longer_at_distributor() {
        let store = MemoryStore::new();
        let d1 = seed_distributor(&store, "Hub 1").await;
        let d2 = seed_distributor(&store, "Hub 2").await;
        let p = seed_product(&store, "Eggs", &[d1.id, d2.id]).await;
        store
            .set_distributors(p.id, BTreeSet::from([d2.id]))
            .await
            .unwrap();

        let mut order = Order::draft("tok");
        order.distributor_id = Some(d1.id);
        order.line_items.push(LineItem::new(p.id, 1));

        let result = store.save(&order).await;
        assert!(matches!(
            result,
            Err(AppError::Rejected {
                reason: "product_not_at_distributor",
                ..
            })
        ));
        assert!(store.find_by_token("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_products_by_distributor() {
        let store = MemoryStore::new();
        let d1 = seed_distributor(&store, "Hub 1").await;
        let d2 = seed_distributor(&store, "Hub 2").await;
        seed_product(&store, "Apples", &[d1.id]).await;
        seed_product(&store, "Bread", &[d2.id]).await;

        let at_d1 = ProductRepository::list(&store, Some(d1.id)).await.unwrap();
        assert_eq!(at_d1.len(), 1);
        assert_eq!(at_d1[0].name, "Apples");

        let all = ProductRepository::list(&store, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
