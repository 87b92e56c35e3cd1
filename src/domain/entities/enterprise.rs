//! Enterprise entity: an administrative record for any business in the network.

use chrono::{DateTime, Utc};

/// A business participating in the food network.
///
/// An enterprise can be a primary producer, a distributor, both, or neither
/// (e.g. a buying group still being onboarded).
#[derive(Debug, Clone, PartialEq)]
pub struct Enterprise {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_primary_producer: bool,
    pub is_distributor: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEnterprise {
    pub name: String,
    pub description: Option<String>,
    pub is_primary_producer: bool,
    pub is_distributor: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEnterprise {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_primary_producer: Option<bool>,
    pub is_distributor: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateEnterprise {
    pub fn apply_to(self, enterprise: &mut Enterprise) {
        if let Some(name) = self.name {
            enterprise.name = name;
        }
        if let Some(description) = self.description {
            enterprise.description = description;
        }
        if let Some(v) = self.is_primary_producer {
            enterprise.is_primary_producer = v;
        }
        if let Some(v) = self.is_distributor {
            enterprise.is_distributor = v;
        }
        if let Some(v) = self.is_active {
            enterprise.is_active = v;
        }
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_primary_producer.is_none()
            && self.is_distributor.is_none()
            && self.is_active.is_none()
    }
}
