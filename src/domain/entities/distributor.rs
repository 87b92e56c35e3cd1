//! Distributor entity: the hub an order is routed through.

use chrono::{DateTime, Utc};

/// A distributor through which products are made available to shoppers.
///
/// A cart is bound to exactly one distributor once it holds items. Inactive
/// distributors stay resolvable so existing carts keep working, but they are
/// hidden from the public listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Distributor {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub pickup_address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new distributor.
#[derive(Debug, Clone)]
pub struct NewDistributor {
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub pickup_address: Option<String>,
}

/// Partial update of a distributor. `None` leaves a field unchanged.
///
/// Nullable fields use a double option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateDistributor {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub pickup_address: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl UpdateDistributor {
    /// Applies the patch to an existing distributor in place.
    pub fn apply_to(self, distributor: &mut Distributor) {
        if let Some(name) = self.name {
            distributor.name = name;
        }
        if let Some(description) = self.description {
            distributor.description = description;
        }
        if let Some(email) = self.email {
            distributor.email = email;
        }
        if let Some(pickup_address) = self.pickup_address {
            distributor.pickup_address = pickup_address;
        }
        if let Some(is_active) = self.is_active {
            distributor.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Distributor {
        let now = Utc::now();
        Distributor {
            id: 1,
            name: "Green Grocers".to_string(),
            description: Some("Weekly veg boxes".to_string()),
            email: None,
            pickup_address: Some("12 Market St".to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_update_leaves_unset_fields() {
        let mut d = sample();
        UpdateDistributor {
            is_active: Some(false),
            ..Default::default()
        }
        .apply_to(&mut d);

        assert!(!d.is_active);
        assert_eq!(d.name, "Green Grocers");
        assert_eq!(d.pickup_address.as_deref(), Some("12 Market St"));
    }

    #[test]
    fn test_update_clears_nullable_field() {
        let mut d = sample();
        UpdateDistributor {
            description: Some(None),
            ..Default::default()
        }
        .apply_to(&mut d);

        assert!(d.description.is_none());
    }
}
