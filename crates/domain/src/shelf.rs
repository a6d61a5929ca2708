use std::collections::BTreeMap;

use common::{InventoryId, InventoryLocation, ProductId, ShelfId};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, StoreError, StoreResult};
use crate::inventory::Inventory;
use crate::product::Product;
use crate::value_objects::{InventoryType, ShelfLevel, Temperature};

pub(crate) const INVENTORY_EXISTS: &str = "Inventory Already Exists";

/// A shelf inside an aisle. Owns the inventory records placed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    id: ShelfId,
    name: String,
    level: ShelfLevel,
    description: String,
    temperature: Temperature,
    inventory: BTreeMap<InventoryId, Inventory>,
}

impl Shelf {
    pub fn new(
        id: impl Into<ShelfId>,
        name: impl Into<String>,
        level: ShelfLevel,
        description: impl Into<String>,
        temperature: Temperature,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            description: description.into(),
            temperature,
            inventory: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &ShelfId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> ShelfLevel {
        self.level
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn update(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.name = name.into();
        self.description = description.into();
    }

    /// Places an already constructed inventory record on this shelf.
    pub fn add_inventory(&mut self, inventory: Inventory) -> StoreResult<&Inventory> {
        if self.inventory.contains_key(inventory.id()) {
            return Err(StoreError::duplicate("Add Inventory", INVENTORY_EXISTS));
        }
        let id = inventory.id().clone();
        Ok(self.inventory.entry(id).or_insert(inventory))
    }

    /// Creates an inventory record for `product` on this shelf.
    ///
    /// Fails with `TemperatureMismatch` when the shelf zone differs from the
    /// zone the product requires.
    pub fn stock(
        &mut self,
        id: impl Into<InventoryId>,
        location: InventoryLocation,
        capacity: i64,
        count: i64,
        product: &Product,
        inventory_type: InventoryType,
    ) -> StoreResult<&Inventory> {
        if product.temperature() != self.temperature {
            return Err(StoreError::new(
                ErrorKind::TemperatureMismatch,
                "Add Inventory",
                format!(
                    "Shelf Temperature {} Does Not Match Product Temperature {}",
                    self.temperature,
                    product.temperature()
                ),
            ));
        }
        let inventory = Inventory::new(
            id,
            location,
            capacity,
            count,
            product.id().clone(),
            inventory_type,
        )?;
        self.add_inventory(inventory)
    }

    pub fn inventory(&self, id: &str) -> Option<&Inventory> {
        self.inventory.get(id)
    }

    pub(crate) fn inventory_mut(&mut self, id: &str) -> Option<&mut Inventory> {
        self.inventory.get_mut(id)
    }

    pub fn inventories(&self) -> impl Iterator<Item = &Inventory> {
        self.inventory.values()
    }

    /// Inventory records on this shelf holding `product_id`.
    pub fn inventory_for_product(&self, product_id: &ProductId) -> impl Iterator<Item = &Inventory> {
        self.inventory
            .values()
            .filter(move |inv| inv.product_id() == product_id)
    }

    pub fn remove_inventory(&mut self, id: &str) -> Option<Inventory> {
        self.inventory.remove(id)
    }
}
