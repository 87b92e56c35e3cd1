//! DTOs for the cart endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use crate::domain::entities::{CartState, LineItem, MAX_QUANTITY, Order};

/// Request body for `PUT /orders/populate`.
///
/// `variants` maps product ids to quantities. Keys arrive as JSON object
/// keys (strings); quantities may be numbers or numeric strings, as sent by
/// HTML forms.
///
/// ```json
/// { "variants": { "12": 2, "15": "1" }, "distributor_id": 3 }
/// ```
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct PopulateRequest {
    #[serde_as(as = "BTreeMap<DisplayFromStr, PickFirst<(_, DisplayFromStr)>>")]
    #[validate(
        length(min = 1, message = "At least one product is required"),
        custom(function = "validate_quantities")
    )]
    pub variants: BTreeMap<i64, u32>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub distributor_id: Option<i64>,
}

fn validate_quantities(variants: &BTreeMap<i64, u32>) -> Result<(), ValidationError> {
    if let Some((product_id, quantity)) = variants
        .iter()
        .find(|(_, q)| !(1..=MAX_QUANTITY).contains(*q))
    {
        let mut err = ValidationError::new("quantity");
        err.message = Some(format!("Quantities must be between 1 and {MAX_QUANTITY}").into());
        err.add_param("product_id".into(), product_id);
        err.add_param("value".into(), quantity);
        return Err(err);
    }
    Ok(())
}

/// A line item as shown to the shopper.
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub id: Option<i64>,
    pub product_id: i64,
    pub quantity: u32,
}

impl From<LineItem> for LineItemResponse {
    fn from(li: LineItem) -> Self {
        Self {
            id: li.id,
            product_id: li.product_id,
            quantity: li.quantity,
        }
    }
}

/// Cart representation returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    /// `None` until the first successful change creates the cart.
    pub id: Option<i64>,
    pub state: CartState,
    pub distributor_id: Option<i64>,
    pub item_count: u64,
    pub line_items: Vec<LineItemResponse>,
}

impl CartResponse {
    /// The representation of a cart that does not exist yet.
    pub fn empty() -> Self {
        Self {
            id: None,
            state: CartState::Empty,
            distributor_id: None,
            item_count: 0,
            line_items: Vec::new(),
        }
    }
}

impl From<Order> for CartResponse {
    fn from(order: Order) -> Self {
        Self {
            id: Some(order.id),
            state: order.state(),
            distributor_id: order.distributor_id,
            item_count: order.item_count(),
            line_items: order.line_items.into_iter().map(Into::into).collect(),
        }
    }
}
