//! Supplier entity: the producer side of the catalog.

use chrono::{DateTime, Utc};

/// A producer whose products are sold through distributors.
///
/// Suppliers are managed administratively and take no part in cart admission.
#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSupplier {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub email: Option<Option<String>>,
}

impl UpdateSupplier {
    pub fn apply_to(self, supplier: &mut Supplier) {
        if let Some(name) = self.name {
            supplier.name = name;
        }
        if let Some(description) = self.description {
            supplier.description = description;
        }
        if let Some(email) = self.email {
            supplier.email = email;
        }
    }
}
