//! Order (cart) entity and its line items.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Largest quantity a line item can hold; line item quantities are stored as
/// a PostgreSQL `INTEGER`.
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// A product/quantity pair held by an order.
///
/// `id` is `None` until the line item has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub id: Option<i64>,
    pub product_id: i64,
    pub quantity: u32,
}

impl LineItem {
    /// Creates an unsaved line item.
    pub fn new(product_id: i64, quantity: u32) -> Self {
        Self {
            id: None,
            product_id,
            quantity,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Lifecycle position of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    /// No distributor and no items.
    Empty,
    /// Distributor chosen, no items yet.
    Selected,
    /// Distributor set and at least one item; the distributor is now fixed.
    Bound,
}

/// An in-progress order, identified to the shopper by its cart token.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub token: String,
    pub distributor_id: Option<i64>,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// An empty cart that has not been stored yet.
    ///
    /// The id stays `0` until the order is created in a repository.
    pub fn draft(token: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            token: token.into(),
            distributor_id: None,
            line_items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_stored(&self) -> bool {
        self.id != 0
    }

    pub fn state(&self) -> CartState {
        match (self.distributor_id, self.line_items.is_empty()) {
            (None, _) => CartState::Empty,
            (Some(_), true) => CartState::Selected,
            (Some(_), false) => CartState::Bound,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.line_items.iter().map(|li| u64::from(li.quantity)).sum()
    }

    /// Product ids of the line items, in insertion order.
    pub fn product_ids(&self) -> Vec<i64> {
        self.line_items.iter().map(|li| li.product_id).collect()
    }

    /// Line items added in memory but not yet persisted.
    pub fn unsaved_line_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|li| !li.is_persisted())
    }
}
