//! Product catalog service.

use crate::application::services::normalize_name;
use crate::domain::entities::{NewProduct, Product};
use crate::domain::repositories::{DistributorRepository, ProductRepository, SupplierRepository};
use crate::error::AppError;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Service for the product catalog and the distributors carrying each product.
pub struct ProductService<P, D, S>
where
    P: ProductRepository + ?Sized,
    D: DistributorRepository + ?Sized,
    S: SupplierRepository + ?Sized,
{
    product_repository: Arc<P>,
    distributor_repository: Arc<D>,
    supplier_repository: Arc<S>,
}

impl<P, D, S> ProductService<P, D, S>
where
    P: ProductRepository + ?Sized,
    D: DistributorRepository + ?Sized,
    S: SupplierRepository + ?Sized,
{
    pub fn new(
        product_repository: Arc<P>,
        distributor_repository: Arc<D>,
        supplier_repository: Arc<S>,
    ) -> Self {
        Self {
            product_repository,
            distributor_repository,
            supplier_repository,
        }
    }

    /// Creates a product carried by the given distributors.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the name is blank or too long.
    /// Returns [`AppError::NotFound`] if the supplier or a distributor does not exist.
    /// Returns [`AppError::Conflict`] if the name is already taken.
    pub async fn create_product(&self, mut new_product: NewProduct) -> Result<Product, AppError> {
        new_product.name = normalize_name(&new_product.name)?;

        if let Some(supplier_id) = new_product.supplier_id
            && self
                .supplier_repository
                .find_by_id(supplier_id)
                .await?
                .is_none()
        {
            return Err(AppError::not_found(
                "Supplier not found",
                json!({"id": supplier_id}),
            ));
        }

        self.ensure_distributors_exist(&new_product.distributor_ids)
            .await?;

        if self
            .product_repository
            .find_by_name(&new_product.name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Product already exists",
                json!({"name": new_product.name}),
            ));
        }

        let product = self.product_repository.create(new_product).await?;
        tracing::info!(
            product_id = product.id,
            distributors = product.distributor_ids.len(),
            "Product created"
        );
        Ok(product)
    }

    /// Lists products, optionally only those carried by one distributor.
    pub async fn list_products(&self, distributor_id: Option<i64>) -> Result<Vec<Product>, AppError> {
        self.product_repository.list(distributor_id).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product does not exist.
    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        self.product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found", json!({"id": id})))
    }

    /// Replaces the set of distributors carrying a product.
    ///
    /// Dropping a distributor is refused with a conflict while a cart bound to
    /// it holds the product.
    pub async fn set_distributors(
        &self,
        id: i64,
        distributor_ids: BTreeSet<i64>,
    ) -> Result<Product, AppError> {
        self.ensure_distributors_exist(&distributor_ids).await?;
        let product = self
            .product_repository
            .set_distributors(id, distributor_ids)
            .await?;
        tracing::info!(product_id = id, "Product distributors updated");
        Ok(product)
    }

    async fn ensure_distributors_exist(&self, ids: &BTreeSet<i64>) -> Result<(), AppError> {
        for id in ids {
            if self.distributor_repository.find_by_id(*id).await?.is_none() {
                return Err(AppError::not_found(
                    "Distributor not found",
                    json!({"id": id}),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Distributor;
    use crate::domain::repositories::{
        MockDistributorRepository, MockProductRepository, MockSupplierRepository,
    };
    use chrono::Utc;

    fn product(id: i64, distributor_ids: &[i64]) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: format!("Product {id}"),
            description: None,
            supplier_id: None,
            distributor_ids: distributor_ids.iter().copied().collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn distributor(id: i64) -> Distributor {
        let now = Utc::now();
        Distributor {
            id,
            name: format!("Hub {id}"),
            description: None,
            email: None,
            pickup_address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        products: MockProductRepository,
        distributors: MockDistributorRepository,
        suppliers: MockSupplierRepository,
    ) -> ProductService<MockProductRepository, MockDistributorRepository, MockSupplierRepository>
    {
        ProductService::new(
            Arc::new(products),
            Arc::new(distributors),
            Arc::new(suppliers),
        )
    }

    #[tokio::test]
    async fn test_create_product_unknown_distributor() {
        let mut distributors = MockDistributorRepository::new();
        distributors
            .expect_find_by_id()
            .returning(|id| Ok((id == 1).then(|| distributor(1))));

        let mut products = MockProductRepository::new();
        products.expect_create().times(0);

        let service = service(products, distributors, MockSupplierRepository::new());

        let result = service
            .create_product(NewProduct {
                name: "Carrots".to_string(),
                description: None,
                supplier_id: None,
                distributor_ids: BTreeSet::from([1, 2]),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_product_unknown_supplier() {
        let mut suppliers = MockSupplierRepository::new();
        suppliers.expect_find_by_id().returning(|_| Ok(None));

        let service = service(
            MockProductRepository::new(),
            MockDistributorRepository::new(),
            suppliers,
        );

        let result = service
            .create_product(NewProduct {
                name: "Carrots".to_string(),
                description: None,
                supplier_id: Some(5),
                distributor_ids: BTreeSet::new(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_set_distributors_success() {
        let mut distributors = MockDistributorRepository::new();
        distributors
            .expect_find_by_id()
            .returning(|id| Ok(Some(distributor(id))));

        let mut products = MockProductRepository::new();
        products
            .expect_set_distributors()
            .withf(|id, ids| *id == 4 && ids == &BTreeSet::from([1, 2]))
            .times(1)
            .returning(|id, ids| Ok(product(id, &ids.into_iter().collect::<Vec<_>>())));

        let service = service(products, distributors, MockSupplierRepository::new());

        let updated = service
            .set_distributors(4, BTreeSet::from([1, 2]))
            .await
            .unwrap();

        assert!(updated.is_available_at(1));
        assert!(updated.is_available_at(2));
    }
}
