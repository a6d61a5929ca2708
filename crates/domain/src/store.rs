//! The store aggregate root.

use std::collections::BTreeMap;

use common::{
    AisleNumber, BasketId, CustomerId, DeviceId, InventoryId, InventoryLocation, ProductId,
    ShelfId, StoreId, StoreLocation,
};
use serde::{Deserialize, Serialize};

use crate::aisle::Aisle;
use crate::basket::Basket;
use crate::customer::Customer;
use crate::device::Device;
use crate::error::{ErrorKind, StoreError, StoreResult};
use crate::inventory::Inventory;
use crate::product::Product;
use crate::shelf::{INVENTORY_EXISTS, Shelf};
use crate::value_objects::{AisleLocation, DeviceKind, InventoryType, ShelfLevel, Temperature};

pub(crate) const AISLE_MISSING: &str = "Aisle Does Not Exist";
const INVENTORY_HELD: &str = "Inventory Is Held In A Basket";

/// Ids dropped from a store by a cascading removal.
///
/// Callers that keep their own indices over inventory or devices use this to
/// purge the entries that no longer resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cascade {
    pub inventory_ids: Vec<InventoryId>,
    pub device_ids: Vec<DeviceId>,
}

/// A physical store.
///
/// Owns its aisles (and through them shelves and inventory), its devices,
/// the baskets in use in it and the customers currently inside it. The
/// store-wide inventory index resolves an inventory id to the shelf holding
/// the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    id: StoreId,
    name: String,
    address: String,
    description: String,
    aisles: BTreeMap<AisleNumber, Aisle>,
    devices: BTreeMap<DeviceId, Device>,
    baskets: BTreeMap<BasketId, Basket>,
    customers: BTreeMap<CustomerId, Customer>,
    inventory_index: BTreeMap<InventoryId, InventoryLocation>,
}

impl Store {
    pub fn new(id: impl Into<StoreId>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            description: String::new(),
            aisles: BTreeMap::new(),
            devices: BTreeMap::new(),
            baskets: BTreeMap::new(),
            customers: BTreeMap::new(),
            inventory_index: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &StoreId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn update(&mut self, description: impl Into<String>, address: impl Into<String>) {
        self.description = description.into();
        self.address = address.into();
    }

    // Aisles

    pub fn add_aisle(
        &mut self,
        number: impl Into<AisleNumber>,
        name: impl Into<String>,
        description: impl Into<String>,
        location: AisleLocation,
    ) -> StoreResult<&Aisle> {
        let number = number.into();
        if self.aisles.contains_key(&number) {
            return Err(StoreError::duplicate("Add Aisle", "Aisle Already Exists"));
        }
        let aisle = Aisle::new(number.clone(), name, description, location);
        Ok(self.aisles.entry(number).or_insert(aisle))
    }

    pub fn aisle(&self, number: &str) -> Option<&Aisle> {
        self.aisles.get(number)
    }

    pub fn aisles(&self) -> impl Iterator<Item = &Aisle> {
        self.aisles.values()
    }

    pub fn update_aisle(
        &mut self,
        number: &str,
        name: impl Into<String>,
        description: impl Into<String>,
        location: AisleLocation,
    ) -> StoreResult<&Aisle> {
        let aisle = self
            .aisles
            .get_mut(number)
            .ok_or_else(|| StoreError::not_found("Update Aisle", AISLE_MISSING))?;
        aisle.update(name, description, location);
        Ok(&*aisle)
    }

    /// Removes an aisle with its shelves, inventory and the devices placed in it.
    ///
    /// Refused while a basket in this store holds a product stocked in the aisle.
    pub fn remove_aisle(&mut self, number: &str) -> StoreResult<Cascade> {
        const ACTION: &str = "Delete Aisle";
        let aisle = self
            .aisles
            .get(number)
            .ok_or_else(|| StoreError::not_found(ACTION, AISLE_MISSING))?;
        self.ensure_not_held(
            ACTION,
            aisle
                .shelves()
                .flat_map(Shelf::inventories)
                .map(Inventory::product_id),
        )?;

        let Some(aisle) = self.aisles.remove(number) else {
            return Err(StoreError::not_found(ACTION, AISLE_MISSING));
        };
        let inventory_ids = aisle.inventory_ids();
        for id in &inventory_ids {
            self.inventory_index.remove(id);
        }

        let device_ids: Vec<DeviceId> = self
            .devices
            .values()
            .filter(|d| d.location().aisle_number.as_str() == number)
            .map(|d| d.id().clone())
            .collect();
        for id in &device_ids {
            self.devices.remove(id);
        }

        Ok(Cascade {
            inventory_ids,
            device_ids,
        })
    }

    // Shelves

    pub fn add_shelf(
        &mut self,
        aisle_number: &str,
        id: impl Into<ShelfId>,
        name: impl Into<String>,
        level: ShelfLevel,
        description: impl Into<String>,
        temperature: Temperature,
    ) -> StoreResult<&Shelf> {
        self.aisles
            .get_mut(aisle_number)
            .ok_or_else(|| StoreError::not_found("Add Shelf", AISLE_MISSING))?
            .add_shelf(id, name, level, description, temperature)
    }

    pub fn shelf(&self, aisle_number: &str, shelf_id: &str) -> Option<&Shelf> {
        self.aisle(aisle_number)?.shelf(shelf_id)
    }

    fn shelf_mut(&mut self, action: &str, aisle_number: &str, shelf_id: &str) -> StoreResult<&mut Shelf> {
        self.aisles
            .get_mut(aisle_number)
            .ok_or_else(|| StoreError::not_found(action, AISLE_MISSING))?
            .shelf_mut(shelf_id)
            .ok_or_else(|| StoreError::not_found(action, "Shelf Does Not Exist"))
    }

    pub fn update_shelf(
        &mut self,
        aisle_number: &str,
        shelf_id: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> StoreResult<&Shelf> {
        let shelf = self.shelf_mut("Update Shelf", aisle_number, shelf_id)?;
        shelf.update(name, description);
        Ok(&*shelf)
    }

    /// Removes a shelf with its inventory.
    ///
    /// Refused while a basket in this store holds a product stocked on the shelf.
    pub fn remove_shelf(&mut self, aisle_number: &str, shelf_id: &str) -> StoreResult<Cascade> {
        const ACTION: &str = "Delete Shelf";
        const SHELF_MISSING: &str = "Shelf Does Not Exist";
        let aisle = self
            .aisles
            .get(aisle_number)
            .ok_or_else(|| StoreError::not_found(ACTION, AISLE_MISSING))?;
        let shelf = aisle
            .shelf(shelf_id)
            .ok_or_else(|| StoreError::not_found(ACTION, SHELF_MISSING))?;
        self.ensure_not_held(ACTION, shelf.inventories().map(Inventory::product_id))?;

        let shelf = self
            .aisles
            .get_mut(aisle_number)
            .and_then(|aisle| aisle.remove_shelf(shelf_id))
            .ok_or_else(|| StoreError::not_found(ACTION, SHELF_MISSING))?;

        let inventory_ids: Vec<InventoryId> =
            shelf.inventories().map(|inv| inv.id().clone()).collect();
        for id in &inventory_ids {
            self.inventory_index.remove(id);
        }
        Ok(Cascade {
            inventory_ids,
            device_ids: Vec::new(),
        })
    }

    // Inventory

    /// Creates an inventory record on a shelf of this store.
    #[allow(clippy::too_many_arguments)]
    pub fn add_inventory(
        &mut self,
        id: impl Into<InventoryId>,
        aisle_number: &str,
        shelf_id: &str,
        capacity: i64,
        count: i64,
        product: &Product,
        inventory_type: InventoryType,
    ) -> StoreResult<&Inventory> {
        let id = id.into();
        if self.inventory_index.contains_key(&id) {
            return Err(StoreError::duplicate("Add Inventory", INVENTORY_EXISTS));
        }
        let location = InventoryLocation::new(self.id.clone(), aisle_number, shelf_id);

        let shelf = self
            .aisles
            .get_mut(aisle_number)
            .ok_or_else(|| StoreError::not_found("Add Inventory", AISLE_MISSING))?
            .shelf_mut(shelf_id)
            .ok_or_else(|| StoreError::not_found("Add Inventory", "Shelf Does Not Exist"))?;
        let inventory = shelf.stock(
            id.clone(),
            location.clone(),
            capacity,
            count,
            product,
            inventory_type,
        )?;
        self.inventory_index.insert(id, location);
        Ok(inventory)
    }

    pub fn inventory(&self, id: &str) -> Option<&Inventory> {
        let location = self.inventory_index.get(id)?;
        self.shelf(location.aisle_number.as_str(), location.shelf_id.as_str())?
            .inventory(id)
    }

    /// All inventory records of this store, ordered by id.
    pub fn inventories(&self) -> impl Iterator<Item = &Inventory> {
        self.inventory_index
            .keys()
            .filter_map(|id| self.inventory(id.as_str()))
    }

    pub fn inventory_ids(&self) -> impl Iterator<Item = &InventoryId> {
        self.inventory_index.keys()
    }

    fn inventory_mut(&mut self, action: &str, id: &str) -> StoreResult<&mut Inventory> {
        let location = self
            .inventory_index
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(action, "Inventory Does Not Exist"))?;
        self.shelf_mut(action, location.aisle_number.as_str(), location.shelf_id.as_str())?
            .inventory_mut(id)
            .ok_or_else(|| StoreError::not_found(action, "Inventory Does Not Exist"))
    }

    /// Inventory of `product_id` reachable from an aisle of this store.
    pub fn inventory_near(&self, aisle_number: &str, product_id: &ProductId) -> StoreResult<Vec<&Inventory>> {
        self.aisle(aisle_number)
            .map(|aisle| aisle.inventory_for_product(product_id))
            .ok_or_else(|| StoreError::new(ErrorKind::AisleNotFound, "Locate Product", AISLE_MISSING))
    }

    pub fn withdraw_inventory(&mut self, id: &str, quantity: i64) -> StoreResult<&Inventory> {
        let inventory = self.inventory_mut("Withdraw Inventory", id)?;
        inventory.withdraw(quantity)?;
        Ok(&*inventory)
    }

    pub fn restock_inventory(&mut self, id: &str, quantity: i64) -> StoreResult<&Inventory> {
        let inventory = self.inventory_mut("Restock Inventory", id)?;
        inventory.restock(quantity)?;
        Ok(&*inventory)
    }

    pub fn adjust_inventory(&mut self, id: &str, delta: i64) -> StoreResult<&Inventory> {
        let inventory = self.inventory_mut("Update Inventory", id)?;
        inventory.adjust(delta)?;
        Ok(&*inventory)
    }

    /// Removes an inventory record. `Ok(None)` when the id is unknown.
    ///
    /// Refused while a basket in this store holds the inventory's product.
    pub fn remove_inventory(&mut self, id: &str) -> StoreResult<Option<Inventory>> {
        let Some(inventory) = self.inventory(id) else {
            return Ok(None);
        };
        self.ensure_not_held("Delete Inventory", std::iter::once(inventory.product_id()))?;

        let Some(location) = self.inventory_index.remove(id) else {
            return Ok(None);
        };
        Ok(self
            .aisles
            .get_mut(location.aisle_number.as_str())
            .and_then(|aisle| aisle.shelf_mut(location.shelf_id.as_str()))
            .and_then(|shelf| shelf.remove_inventory(id)))
    }

    /// Fails when any basket in this store holds one of `products`.
    fn ensure_not_held<'a>(
        &self,
        action: &str,
        mut products: impl Iterator<Item = &'a ProductId>,
    ) -> StoreResult<()> {
        let held = products.any(|product| {
            self.baskets
                .values()
                .any(|basket| basket.quantity_of(product.as_str()) > 0)
        });
        if held {
            return Err(StoreError::new(ErrorKind::InventoryHeld, action, INVENTORY_HELD));
        }
        Ok(())
    }

    // Devices

    pub fn add_device(
        &mut self,
        id: impl Into<DeviceId>,
        name: impl Into<String>,
        kind: DeviceKind,
        aisle_number: &str,
    ) -> StoreResult<&Device> {
        let id = id.into();
        if self.devices.contains_key(&id) {
            return Err(StoreError::duplicate("Add Device", "Device Already Exists"));
        }
        if !self.aisles.contains_key(aisle_number) {
            return Err(StoreError::not_found("Add Device", AISLE_MISSING));
        }
        let location = StoreLocation::new(self.id.clone(), aisle_number);
        let device = Device::new(id.clone(), name, kind, location);
        Ok(self.devices.entry(id).or_insert(device))
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn device_mut(&mut self, id: &str) -> Option<&mut Device> {
        self.devices.get_mut(id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn remove_device(&mut self, id: &str) -> Option<Device> {
        self.devices.remove(id)
    }

    // Baskets

    pub fn add_basket(&mut self, basket: Basket) -> StoreResult<&Basket> {
        if self.baskets.contains_key(basket.id()) {
            return Err(StoreError::duplicate("Add Basket", "Basket Already Exists"));
        }
        let id = basket.id().clone();
        Ok(self.baskets.entry(id).or_insert(basket))
    }

    pub fn basket(&self, id: &str) -> Option<&Basket> {
        self.baskets.get(id)
    }

    pub fn basket_mut(&mut self, id: &str) -> Option<&mut Basket> {
        self.baskets.get_mut(id)
    }

    pub fn baskets(&self) -> impl Iterator<Item = &Basket> {
        self.baskets.values()
    }

    pub fn remove_basket(&mut self, id: &str) -> Option<Basket> {
        self.baskets.remove(id)
    }

    // Customers

    pub fn add_customer(&mut self, customer: Customer) -> StoreResult<&Customer> {
        if self.customers.contains_key(customer.id()) {
            return Err(StoreError::duplicate("Add Customer", "Customer Already Exists"));
        }
        let id = customer.id().clone();
        Ok(self.customers.entry(id).or_insert(customer))
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.get(id)
    }

    pub fn customer_mut(&mut self, id: &str) -> Option<&mut Customer> {
        self.customers.get_mut(id)
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn remove_customer(&mut self, id: &str) -> Option<Customer> {
        self.customers.remove(id)
    }

    /// Removes every customer and basket, for tearing the store down.
    pub fn evacuate(&mut self) -> (Vec<Customer>, Vec<Basket>) {
        let customers = std::mem::take(&mut self.customers).into_values().collect();
        let baskets = std::mem::take(&mut self.baskets).into_values().collect();
        (customers, baskets)
    }
}
