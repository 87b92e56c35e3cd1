//! Cart admission guard.
//!
//! Decides whether products may enter a cart given the distributor the shopper
//! asked for, and applies the resulting state change. The guard is pure: it
//! receives the [`Order`] by value and hands it back, either updated (on
//! success) or untouched (inside a [`Rejection`]). Loading and persisting the
//! order is the caller's job.
//!
//! # Rules
//!
//! Checks run in order and stop at the first failure:
//!
//! 1. The requested distributor must resolve ([`AdmissionError::NoDistributor`]).
//! 2. The product must be carried by that distributor
//!    ([`AdmissionError::ProductNotAtDistributor`]).
//! 3. If the cart already has a distributor, it must be the same one
//!    ([`AdmissionError::DistributorMismatch`]).
//!
//! On success the cart's distributor is set if it was unset and a new
//! [`LineItem`] is appended.
//!
//! # State Machine
//!
//! ```text
//!            select(d)                 add(p, d)
//!   Empty ─────────────▶ Selected ────────────────▶ Bound ──┐
//!     │  ◀───────────── (deselect)                   ▲      │ add(p, d), same d
//!     │                                              │      │
//!     └──────────────────── add(p, d) ───────────────┘◀─────┘
//! ```

use thiserror::Error;

use crate::domain::entities::{Distributor, LineItem, MAX_QUANTITY, Order, Product};

/// Reason a cart mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("A valid distributor must be chosen before adding products")]
    NoDistributor,

    #[error("Product {product_id} is not available at distributor {distributor_id}")]
    ProductNotAtDistributor { product_id: i64, distributor_id: i64 },

    #[error("Cart is bound to distributor {order_distributor}, cannot use distributor {requested}")]
    DistributorMismatch {
        order_distributor: i64,
        requested: i64,
    },

    #[error("Quantity for product {product_id} must be between 1 and {max}", max = MAX_QUANTITY)]
    InvalidQuantity { product_id: i64 },

    #[error("Cart still holds items")]
    CartNotEmpty,
}

impl AdmissionError {
    /// Stable snake_case reason code exposed to clients and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::NoDistributor => "no_distributor",
            AdmissionError::ProductNotAtDistributor { .. } => "product_not_at_distributor",
            AdmissionError::DistributorMismatch { .. } => "distributor_mismatch",
            AdmissionError::InvalidQuantity { .. } => "invalid_quantity",
            AdmissionError::CartNotEmpty => "cart_not_empty",
        }
    }
}

/// A refused mutation: the order exactly as it was passed in, plus the reason.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct Rejection {
    pub order: Order,
    pub reason: AdmissionError,
}

impl Rejection {
    fn new(order: Order, reason: AdmissionError) -> Self {
        Self { order, reason }
    }
}

/// Runs the admission checks for one product without touching the order.
///
/// Returns the id of the distributor the order will be bound to.
pub fn check_item(
    order: &Order,
    product: &Product,
    distributor: Option<&Distributor>,
    quantity: u32,
) -> Result<i64, AdmissionError> {
    let distributor = distributor.ok_or(AdmissionError::NoDistributor)?;

    if !product.is_available_at(distributor.id) {
        return Err(AdmissionError::ProductNotAtDistributor {
            product_id: product.id,
            distributor_id: distributor.id,
        });
    }

    if let Some(current) = order.distributor_id
        && current != distributor.id
    {
        return Err(AdmissionError::DistributorMismatch {
            order_distributor: current,
            requested: distributor.id,
        });
    }

    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AdmissionError::InvalidQuantity {
            product_id: product.id,
        });
    }

    Ok(distributor.id)
}

/// Tries to add `quantity` units of `product` to the cart.
///
/// `distributor` is the distributor resolved from the request; `None` when
/// the request carried no id or an id that matched nothing.
pub fn try_add_item(
    order: Order,
    product: &Product,
    distributor: Option<&Distributor>,
    quantity: u32,
) -> Result<Order, Rejection> {
    admit_items(order, &[(product, quantity)], distributor)
}

/// Admits several products in one all-or-nothing step.
///
/// Every item is checked before anything changes; the first failure rejects
/// the whole batch and the order comes back untouched.
pub fn admit_items(
    mut order: Order,
    items: &[(&Product, u32)],
    distributor: Option<&Distributor>,
) -> Result<Order, Rejection> {
    let mut bound_to = None;
    for (product, quantity) in items {
        match check_item(&order, product, distributor, *quantity) {
            Ok(id) => bound_to = Some(id),
            Err(reason) => return Err(Rejection::new(order, reason)),
        }
    }

    if let Some(distributor_id) = bound_to {
        order.distributor_id.get_or_insert(distributor_id);
    }
    order.line_items.extend(
        items
            .iter()
            .map(|(product, quantity)| LineItem::new(product.id, *quantity)),
    );

    Ok(order)
}

/// Chooses a distributor for the cart ahead of adding products.
///
/// Re-selecting the current distributor is a no-op. Once the cart holds items
/// its distributor cannot change.
pub fn select_distributor(mut order: Order, distributor: &Distributor) -> Result<Order, Rejection> {
    match order.distributor_id {
        Some(current) if current == distributor.id => Ok(order),
        Some(current) if !order.is_empty() => Err(Rejection::new(
            order,
            AdmissionError::DistributorMismatch {
                order_distributor: current,
                requested: distributor.id,
            },
        )),
        _ => {
            order.distributor_id = Some(distributor.id);
            Ok(order)
        }
    }
}

/// Clears the cart's distributor. Only allowed while the cart holds no items.
pub fn deselect_distributor(mut order: Order) -> Result<Order, Rejection> {
    if !order.is_empty() {
        return Err(Rejection::new(order, AdmissionError::CartNotEmpty));
    }
    order.distributor_id = None;
    Ok(order)
}
