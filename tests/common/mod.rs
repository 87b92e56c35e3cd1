#![allow(dead_code)]

use axum_test::TestResponse;
use openfoodweb::domain::entities::{
    Distributor, NewDistributor, NewProduct, NewSupplier, Product, Supplier,
};
use openfoodweb::domain::repositories::{
    DistributorRepository, ProductRepository, SupplierRepository,
};
use openfoodweb::infrastructure::memory::MemoryStore;
use openfoodweb::state::{AppState, Repositories};
use std::collections::BTreeSet;
use std::sync::Arc;

pub fn create_test_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Repositories::memory(store.clone()), "memory", false);
    (state, store)
}

pub async fn create_test_distributor(store: &MemoryStore, name: &str) -> Distributor {
    DistributorRepository::create(
        store,
        NewDistributor {
            name: name.to_string(),
            description: None,
            email: None,
            pickup_address: Some("1 Market Square".to_string()),
        },
    )
    .await
    .unwrap()
}

pub async fn create_test_supplier(store: &MemoryStore, name: &str) -> Supplier {
    SupplierRepository::create(
        store,
        NewSupplier {
            name: name.to_string(),
            description: None,
            email: None,
        },
    )
    .await
    .unwrap()
}

pub async fn create_test_product(
    store: &MemoryStore,
    name: &str,
    distributor_ids: &[i64],
) -> Product {
    ProductRepository::create(
        store,
        NewProduct {
            name: name.to_string(),
            description: None,
            supplier_id: None,
            distributor_ids: distributor_ids.iter().copied().collect::<BTreeSet<_>>(),
        },
    )
    .await
    .unwrap()
}

/// Extracts the cart token from a `Set-Cookie` response header.
pub fn cart_token(response: &TestResponse) -> Option<String> {
    let header = response.headers().get("set-cookie")?.to_str().ok()?;
    header
        .split(';')
        .next()?
        .strip_prefix("cart_token=")
        .map(str::to_string)
}

pub fn cookie(token: &str) -> String {
    format!("cart_token={token}")
}
