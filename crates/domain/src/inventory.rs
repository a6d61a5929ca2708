//! Inventory records: a product's stock on one shelf.

use common::{InventoryId, InventoryLocation, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, StoreError, StoreResult};
use crate::value_objects::InventoryType;

pub(crate) const COUNT_OUT_OF_RANGE: &str =
    "Inventory Is Smaller Than 0 or Larger Than Shelf Capacity";
pub(crate) const NOT_ENOUGH_INVENTORY: &str = "There Is Not Enough Inventory on the Shelf";
pub(crate) const NOT_ENOUGH_CAPACITY: &str = "There Is Not Enough Capacity on the Shelf";

/// Stock of one product on one shelf.
///
/// `0 <= count <= capacity` holds for every value of this type: the
/// constructor rejects counts outside the range and every mutation either
/// keeps the count inside it or fails without changing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    id: InventoryId,
    location: InventoryLocation,
    capacity: i64,
    count: i64,
    product_id: ProductId,
    inventory_type: InventoryType,
}

impl Inventory {
    pub fn new(
        id: impl Into<InventoryId>,
        location: InventoryLocation,
        capacity: i64,
        count: i64,
        product_id: impl Into<ProductId>,
        inventory_type: InventoryType,
    ) -> StoreResult<Self> {
        if capacity < 0 || count < 0 || count > capacity {
            return Err(StoreError::invalid_quantity(
                "Add Inventory",
                COUNT_OUT_OF_RANGE,
            ));
        }

        Ok(Self {
            id: id.into(),
            location,
            capacity,
            count,
            product_id: product_id.into(),
            inventory_type,
        })
    }

    pub fn id(&self) -> &InventoryId {
        &self.id
    }

    pub fn location(&self) -> &InventoryLocation {
        &self.location
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn inventory_type(&self) -> InventoryType {
        self.inventory_type
    }

    /// Room left on the shelf for this record.
    pub fn available_capacity(&self) -> i64 {
        self.capacity - self.count
    }

    /// Takes `quantity` units off the shelf.
    pub fn withdraw(&mut self, quantity: i64) -> StoreResult<()> {
        ensure_non_negative("Withdraw Inventory", quantity)?;
        if quantity > self.count {
            return Err(StoreError::new(
                ErrorKind::InsufficientInventory,
                "Withdraw Inventory",
                NOT_ENOUGH_INVENTORY,
            ));
        }
        self.count -= quantity;
        Ok(())
    }

    /// Puts `quantity` units back on the shelf.
    pub fn restock(&mut self, quantity: i64) -> StoreResult<()> {
        ensure_non_negative("Restock Inventory", quantity)?;
        if quantity > self.available_capacity() {
            return Err(StoreError::new(
                ErrorKind::CapacityExceeded,
                "Restock Inventory",
                NOT_ENOUGH_CAPACITY,
            ));
        }
        self.count += quantity;
        Ok(())
    }

    /// Changes the count by a signed delta and returns the new count.
    pub fn adjust(&mut self, delta: i64) -> StoreResult<i64> {
        let updated = self
            .count
            .checked_add(delta)
            .filter(|c| (0..=self.capacity).contains(c))
            .ok_or_else(|| StoreError::invalid_quantity("Update Inventory", COUNT_OUT_OF_RANGE))?;
        self.count = updated;
        Ok(updated)
    }
}

fn ensure_non_negative(action: &str, quantity: i64) -> StoreResult<()> {
    if quantity < 0 {
        return Err(StoreError::invalid_quantity(
            action,
            format!("Quantity Must Not Be Negative: {quantity}"),
        ));
    }
    Ok(())
}
