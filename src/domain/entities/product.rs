//! Product entity and its distributor availability.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// A product offered in the catalog.
///
/// `distributor_ids` is the many-to-many availability relation: the product
/// may only be added to carts bound to one of these distributors.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub supplier_id: Option<i64>,
    pub distributor_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns true if the product can be ordered through the given distributor.
    pub fn is_available_at(&self, distributor_id: i64) -> bool {
        self.distributor_ids.contains(&distributor_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub supplier_id: Option<i64>,
    pub distributor_ids: BTreeSet<i64>,
}
