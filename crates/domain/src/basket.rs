use std::collections::BTreeMap;

use common::{BasketId, CustomerId, ProductId, StoreId};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, StoreError, StoreResult};

/// A customer's in-progress collection of product quantities.
///
/// Every held quantity is positive; a product with nothing held has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    id: BasketId,
    customer_id: Option<CustomerId>,
    store_id: Option<StoreId>,
    items: BTreeMap<ProductId, i64>,
}

impl Basket {
    pub fn new(id: impl Into<BasketId>) -> Self {
        Self {
            id: id.into(),
            customer_id: None,
            store_id: None,
            items: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &BasketId {
        &self.id
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref()
    }

    pub fn store_id(&self) -> Option<&StoreId> {
        self.store_id.as_ref()
    }

    /// Quantity held for `product_id`, zero when absent.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items.get(product_id).copied().unwrap_or(0)
    }

    pub fn items(&self) -> impl Iterator<Item = (&ProductId, i64)> {
        self.items.iter().map(|(p, q)| (p, *q))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Binds the basket to a customer in a store.
    pub fn assign(&mut self, customer_id: CustomerId, store_id: StoreId) {
        self.customer_id = Some(customer_id);
        self.store_id = Some(store_id);
    }

    /// Drops the customer reference; the basket stays in its store.
    pub fn detach_customer(&mut self) -> Option<CustomerId> {
        self.customer_id.take()
    }

    /// Detaches the basket from both customer and store.
    pub fn unassign(&mut self) {
        self.customer_id = None;
        self.store_id = None;
    }

    /// Adds `quantity` of a product.
    pub fn hold(&mut self, product_id: ProductId, quantity: i64) -> StoreResult<i64> {
        if quantity <= 0 {
            return Err(StoreError::invalid_quantity(
                "Add Product To Basket",
                "Quantity Must Be Greater Than 0",
            ));
        }
        let held = self
            .quantity_of(product_id.as_str())
            .checked_add(quantity)
            .ok_or_else(|| {
                StoreError::invalid_quantity("Add Product To Basket", "Quantity Is Too Large")
            })?;
        self.items.insert(product_id, held);
        Ok(held)
    }

    /// Removes `quantity` of a product, dropping the entry when it reaches zero.
    pub fn release(&mut self, product_id: &ProductId, quantity: i64) -> StoreResult<i64> {
        if quantity <= 0 {
            return Err(StoreError::invalid_quantity(
                "Remove Product From Basket",
                "Quantity Must Be Greater Than 0",
            ));
        }
        let held = self.quantity_of(product_id.as_str());
        if quantity > held {
            return Err(StoreError::new(
                ErrorKind::RemoveExceedsHeld,
                "Remove Product From Basket",
                "Trying To Remove More Quantity Than Exists",
            ));
        }
        let remaining = held - quantity;
        if remaining == 0 {
            self.items.remove(product_id);
        } else {
            self.items.insert(product_id.clone(), remaining);
        }
        Ok(remaining)
    }

    /// Empties the basket, returning what it held.
    pub fn drain(&mut self) -> BTreeMap<ProductId, i64> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_accumulates() {
        let mut basket = Basket::new("B1");
        assert_eq!(basket.hold("P1".into(), 2).unwrap(), 2);
        assert_eq!(basket.hold("P1".into(), 3).unwrap(), 5);
        assert_eq!(basket.quantity_of("P1"), 5);
        assert_eq!(basket.quantity_of("P2"), 0);
    }

    #[test]
    fn test_hold_rejects_non_positive() {
        let mut basket = Basket::new("B1");
        assert_eq!(
            basket.hold("P1".into(), 0).unwrap_err().kind,
            ErrorKind::InvalidQuantity
        );
        assert!(basket.is_empty());
    }

    #[test]
    fn test_hold_rejects_overflowing_total() {
        let mut basket = Basket::new("B1");
        basket.hold("P1".into(), i64::MAX - 1).unwrap();
        let err = basket.hold("P1".into(), 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidQuantity);
        assert_eq!(basket.quantity_of("P1"), i64::MAX - 1);
    }

    #[test]
    fn test_release_removes_entry_at_zero() {
        let mut basket = Basket::new("B1");
        let p1 = ProductId::new("P1");
        basket.hold(p1.clone(), 4).unwrap();
        assert_eq!(basket.release(&p1, 1).unwrap(), 3);
        assert_eq!(basket.release(&p1, 3).unwrap(), 0);
        assert!(basket.is_empty());
    }

    #[test]
    fn test_release_more_than_held_fails() {
        let mut basket = Basket::new("B1");
        let p1 = ProductId::new("P1");
        basket.hold(p1.clone(), 2).unwrap();
        let err = basket.release(&p1, 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RemoveExceedsHeld);
        assert_eq!(basket.quantity_of("P1"), 2);
    }

    #[test]
    fn test_drain_and_detach() {
        let mut basket = Basket::new("B1");
        basket.assign("C1".into(), "S1".into());
        basket.hold("P1".into(), 2).unwrap();

        let drained = basket.drain();
        assert_eq!(drained.get("P1"), Some(&2));
        assert!(basket.is_empty());

        assert_eq!(basket.detach_customer(), Some(CustomerId::new("C1")));
        assert_eq!(basket.store_id(), Some(&StoreId::new("S1")));
        basket.unassign();
        assert!(basket.store_id().is_none());
    }
}
