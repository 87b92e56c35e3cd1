//! Repository trait for carts.

use crate::domain::entities::Order;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for in-progress orders.
///
/// Orders are looked up by their cart token, never through ambient session
/// state: the HTTP layer resolves the token and passes it explicitly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Loads the order for a cart token, with its line items.
    async fn find_by_token(&self, token: &str) -> Result<Option<Order>, AppError>;

    /// Persists the order's distributor and inserts its unsaved line items.
    ///
    /// An order that is not stored yet ([`Order::is_stored`] is false) is
    /// inserted first, in the same write, so a failed save of a new cart
    /// leaves nothing behind. A token that is already taken yields
    /// [`AppError::Conflict`].
    ///
    /// The write is atomic. The distributor is only changed when the stored
    /// order has the same distributor or no line items; otherwise nothing is
    /// written and [`AppError::Rejected`] with reason `distributor_mismatch`
    /// is returned.
    ///
    /// Returns the order as stored, with ids assigned to new line items.
    async fn save(&self, order: &Order) -> Result<Order, AppError>;

    /// Removes every line item and clears the distributor.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the order does not exist.
    async fn clear(&self, order_id: i64) -> Result<Order, AppError>;
}
