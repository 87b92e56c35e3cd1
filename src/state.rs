//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    CartService, DistributorService, EnterpriseService, ProductService, SupplierService,
};
use crate::domain::repositories::{
    DistributorRepository, EnterpriseRepository, OrderRepository, ProductRepository,
    SupplierRepository,
};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{
    PgDistributorRepository, PgEnterpriseRepository, PgOrderRepository, PgProductRepository,
    PgSupplierRepository,
};

pub type DynCartService =
    CartService<dyn OrderRepository, dyn DistributorRepository, dyn ProductRepository>;
pub type DynProductService =
    ProductService<dyn ProductRepository, dyn DistributorRepository, dyn SupplierRepository>;

/// The repositories backing one storage backend.
#[derive(Clone)]
pub struct Repositories {
    pub orders: Arc<dyn OrderRepository>,
    pub distributors: Arc<dyn DistributorRepository>,
    pub suppliers: Arc<dyn SupplierRepository>,
    pub enterprises: Arc<dyn EnterpriseRepository>,
    pub products: Arc<dyn ProductRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            distributors: Arc::new(PgDistributorRepository::new(pool.clone())),
            suppliers: Arc::new(PgSupplierRepository::new(pool.clone())),
            enterprises: Arc::new(PgEnterpriseRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool)),
        }
    }

    /// Every repository served by one shared in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            orders: store.clone(),
            distributors: store.clone(),
            suppliers: store.clone(),
            enterprises: store.clone(),
            products: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub cart_service: Arc<DynCartService>,
    pub distributor_service: Arc<DistributorService<dyn DistributorRepository>>,
    pub supplier_service: Arc<SupplierService<dyn SupplierRepository>>,
    pub enterprise_service: Arc<EnterpriseService<dyn EnterpriseRepository>>,
    pub product_service: Arc<DynProductService>,
    /// Name of the storage backend, reported by the health check.
    pub storage: &'static str,
    pub cart_cookie_secure: bool,
}

impl AppState {
    /// Wires every service to the given repositories.
    pub fn new(repositories: Repositories, storage: &'static str, cart_cookie_secure: bool) -> Self {
        let Repositories {
            orders,
            distributors,
            suppliers,
            enterprises,
            products,
        } = repositories;

        Self {
            cart_service: Arc::new(CartService::new(
                orders,
                distributors.clone(),
                products.clone(),
            )),
            distributor_service: Arc::new(DistributorService::new(distributors.clone())),
            supplier_service: Arc::new(SupplierService::new(suppliers.clone())),
            enterprise_service: Arc::new(EnterpriseService::new(enterprises)),
            product_service: Arc::new(ProductService::new(products, distributors, suppliers)),
            storage,
            cart_cookie_secure,
        }
    }
}
