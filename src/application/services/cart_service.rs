//! Cart service: token resolution, admission and persistence.
//!
//! Every operation follows the same shape: resolve the order for the cart
//! token, resolve whatever the request refers to, let the pure guard in
//! [`crate::domain::admission`] decide, then persist the order it hands back.
//! A rejected request never reaches the repository.

use crate::domain::admission::{self, Rejection};
use crate::domain::entities::{Order, Product};
use crate::domain::repositories::{DistributorRepository, OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::utils::cart_token::generate_token;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Products to add, keyed by product id, and the distributor to buy them from.
#[derive(Debug, Clone, Default)]
pub struct PopulateItems {
    pub variants: BTreeMap<i64, u32>,
    pub distributor_id: Option<i64>,
}

/// Result of a cart mutation.
#[derive(Debug, Clone)]
pub struct CartOutcome {
    pub order: Order,
    /// True when the request started a new cart and the client needs its token.
    pub created: bool,
}

/// Service orchestrating cart admission.
pub struct CartService<O, D, P>
where
    O: OrderRepository + ?Sized,
    D: DistributorRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    order_repository: Arc<O>,
    distributor_repository: Arc<D>,
    product_repository: Arc<P>,
}

impl<O, D, P> CartService<O, D, P>
where
    O: OrderRepository + ?Sized,
    D: DistributorRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    pub fn new(
        order_repository: Arc<O>,
        distributor_repository: Arc<D>,
        product_repository: Arc<P>,
    ) -> Self {
        Self {
            order_repository,
            distributor_repository,
            product_repository,
        }
    }

    /// Returns the cart for a token, if one exists.
    pub async fn get_cart(&self, token: Option<&str>) -> Result<Option<Order>, AppError> {
        match token {
            Some(token) => self.order_repository.find_by_token(token).await,
            None => Ok(None),
        }
    }

    /// Adds products to the cart through the requested distributor.
    ///
    /// The batch is all-or-nothing. When no cart matches `token` a new one is
    /// started, but it is only stored if the products are admitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if no products were sent.
    /// Returns [`AppError::NotFound`] if a product id matches no product.
    /// Returns [`AppError::Rejected`] with the admission reason otherwise; the
    /// stored cart is unchanged.
    pub async fn populate(
        &self,
        token: Option<&str>,
        items: PopulateItems,
    ) -> Result<CartOutcome, AppError> {
        if items.variants.is_empty() {
            return Err(AppError::bad_request(
                "At least one product is required",
                json!({}),
            ));
        }

        let products = self.load_products(&items.variants).await?;
        let distributor = match items.distributor_id {
            Some(id) => self.distributor_repository.find_by_id(id).await?,
            None => None,
        };
        let order = self.load_or_draft(token).await?;

        let batch: Vec<(&Product, u32)> = items
            .variants
            .iter()
            .filter_map(|(id, quantity)| products.get(id).map(|p| (p, *quantity)))
            .collect();

        let admitted = admission::admit_items(order, &batch, distributor.as_ref())
            .map_err(record_rejection)?;

        let outcome = self.persist(admitted).await?;

        metrics::counter!("cart_admissions_total").increment(1);
        tracing::info!(
            order_id = outcome.order.id,
            distributor_id = ?outcome.order.distributor_id,
            products = batch.len(),
            "Products added to cart"
        );

        Ok(outcome)
    }

    /// Chooses the distributor for the cart before any product is added.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the distributor does not exist.
    /// Returns [`AppError::Rejected`] (`distributor_mismatch`) if the cart
    /// already holds items from another distributor.
    pub async fn select_distributor(
        &self,
        token: Option<&str>,
        distributor_id: i64,
    ) -> Result<CartOutcome, AppError> {
        let distributor = self
            .distributor_repository
            .find_by_id(distributor_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Distributor not found", json!({"id": distributor_id}))
            })?;

        let order = self.load_or_draft(token).await?;
        let selected =
            admission::select_distributor(order, &distributor).map_err(record_rejection)?;

        let outcome = self.persist(selected).await?;
        tracing::info!(
            order_id = outcome.order.id,
            distributor_id,
            "Distributor selected"
        );
        Ok(outcome)
    }

    /// Clears the cart's distributor.
    ///
    /// Returns `None` when there is no cart for the token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Rejected`] (`cart_not_empty`) if the cart holds items.
    pub async fn deselect_distributor(
        &self,
        token: Option<&str>,
    ) -> Result<Option<Order>, AppError> {
        let Some(order) = self.get_cart(token).await? else {
            return Ok(None);
        };

        let deselected = admission::deselect_distributor(order).map_err(record_rejection)?;
        let saved = self.order_repository.save(&deselected).await?;

        tracing::info!(order_id = saved.id, "Distributor deselected");
        Ok(Some(saved))
    }

    /// Removes every line item and the distributor, returning the cart to empty.
    ///
    /// Returns `None` when there is no cart for the token.
    pub async fn empty_cart(&self, token: Option<&str>) -> Result<Option<Order>, AppError> {
        let Some(order) = self.get_cart(token).await? else {
            return Ok(None);
        };

        let cleared = self.order_repository.clear(order.id).await?;
        tracing::info!(order_id = cleared.id, "Cart emptied");
        Ok(Some(cleared))
    }

    async fn load_products(
        &self,
        variants: &BTreeMap<i64, u32>,
    ) -> Result<HashMap<i64, Product>, AppError> {
        let ids: BTreeSet<i64> = variants.keys().copied().collect();
        let products = self
            .product_repository
            .find_many(ids.iter().copied().collect())
            .await?;

        let by_id: HashMap<i64, Product> = products.into_iter().map(|p| (p.id, p)).collect();
        let missing: Vec<i64> = ids.into_iter().filter(|id| !by_id.contains_key(id)).collect();
        if !missing.is_empty() {
            return Err(AppError::not_found(
                "Product not found",
                json!({"ids": missing}),
            ));
        }

        Ok(by_id)
    }

    async fn load_or_draft(&self, token: Option<&str>) -> Result<Order, AppError> {
        if let Some(order) = self.get_cart(token).await? {
            return Ok(order);
        }
        Ok(Order::draft(generate_token()?))
    }

    /// Saves the order; a draft is inserted in the same write as its items.
    async fn persist(&self, order: Order) -> Result<CartOutcome, AppError> {
        let created = !order.is_stored();

        let order = self
            .order_repository
            .save(&order)
            .await
            .inspect_err(count_rejected)?;

        Ok(CartOutcome { order, created })
    }
}

fn record_rejection(rejection: Rejection) -> AppError {
    let reason = rejection.reason.reason();
    metrics::counter!("cart_rejections_total", "reason" => reason).increment(1);
    tracing::info!(
        order_id = rejection.order.id,
        reason,
        "Cart change rejected"
    );
    rejection.reason.into()
}

fn count_rejected(err: &AppError) {
    if let AppError::Rejected { reason, .. } = err {
        metrics::counter!("cart_rejections_total", "reason" => *reason).increment(1);
        tracing::info!(reason = *reason, "Cart change rejected on save");
    }
}
