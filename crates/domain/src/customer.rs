use chrono::{DateTime, Utc};
use common::{BasketId, CustomerId, StoreLocation};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AgeGroup, CustomerType};

/// A shopper. Knows where it was last seen and which basket it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    first_name: String,
    last_name: String,
    customer_type: CustomerType,
    email: String,
    address: String,
    age_group: Option<AgeGroup>,
    last_seen: Option<DateTime<Utc>>,
    location: Option<StoreLocation>,
    basket_id: Option<BasketId>,
}

impl Customer {
    pub fn new(
        id: impl Into<CustomerId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        customer_type: CustomerType,
        email: impl Into<String>,
        address: impl Into<String>,
        age_group: Option<AgeGroup>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            customer_type,
            email: email.into(),
            address: address.into(),
            age_group,
            last_seen: None,
            location: None,
            basket_id: None,
        }
    }

    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn customer_type(&self) -> CustomerType {
        self.customer_type
    }

    pub fn is_guest(&self) -> bool {
        self.customer_type == CustomerType::Guest
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        self.age_group
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    pub fn location(&self) -> Option<&StoreLocation> {
        self.location.as_ref()
    }

    pub fn basket_id(&self) -> Option<&BasketId> {
        self.basket_id.as_ref()
    }

    /// Records the customer at `location`.
    pub fn move_to(&mut self, location: StoreLocation, seen_at: DateTime<Utc>) {
        self.location = Some(location);
        self.last_seen = Some(seen_at);
    }

    /// Clears the location, e.g. when the store is deleted.
    pub fn leave_store(&mut self) {
        self.location = None;
    }

    pub fn assign_basket(&mut self, basket_id: BasketId) {
        self.basket_id = Some(basket_id);
    }

    pub fn release_basket(&mut self) -> Option<BasketId> {
        self.basket_id.take()
    }
}
