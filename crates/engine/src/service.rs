//! Store service: the entry point for every engine operation.

use std::sync::Arc;

use common::{InventoryId, StoreId};
use data_store::{DataStore, InMemoryDataStore};
use domain::{
    Aisle, AisleLocation, Basket, Cascade, Customer, Inventory, InventoryType, Money, Product,
    Shelf, ShelfLevel, Store, StoreError, StoreResult, Temperature,
};
use parking_lot::{Mutex, RwLock};

use crate::placement::Placement;

pub(crate) const STORE_MISSING: &str = "Store Does Not Exist";
pub(crate) const AISLE_MISSING: &str = "Aisle Does Not Exist";
pub(crate) const SHELF_MISSING: &str = "Shelf Does Not Exist";
pub(crate) const PRODUCT_MISSING: &str = "Product Does Not Exist";
pub(crate) const INVENTORY_MISSING: &str = "Inventory Does Not Exist";

/// Shared handle to one store. The mutex is the store's critical section.
pub(crate) type StoreHandle = Arc<Mutex<Store>>;

/// Service for provisioning and operating smart stores.
///
/// Each store sits behind its own mutex; every check-then-act sequence
/// confined to one store runs while holding it. The placement guard orders
/// work that crosses stores or touches the global registries: single-store
/// operations take it shared, moves and index changes take it exclusive.
/// The guard is always taken before any store mutex.
pub struct StoreService {
    pub(crate) stores: InMemoryDataStore<StoreHandle>,
    pub(crate) products: InMemoryDataStore<Product>,
    pub(crate) customers: InMemoryDataStore<Placement<Customer>>,
    pub(crate) baskets: InMemoryDataStore<Placement<Basket>>,
    pub(crate) inventory_index: InMemoryDataStore<StoreId>,
    pub(crate) device_index: InMemoryDataStore<StoreId>,
    pub(crate) placement: RwLock<()>,
}

impl Default for StoreService {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreService {
    /// Creates an empty service with no stores, products or customers.
    pub fn new() -> Self {
        Self {
            stores: InMemoryDataStore::new(),
            products: InMemoryDataStore::new(),
            customers: InMemoryDataStore::new(),
            baskets: InMemoryDataStore::new(),
            inventory_index: InMemoryDataStore::new(),
            device_index: InMemoryDataStore::new(),
            placement: RwLock::new(()),
        }
    }

    pub(crate) fn store_handle(&self, action: &str, store_id: &str) -> StoreResult<StoreHandle> {
        self.stores
            .get(store_id)
            .ok_or_else(|| StoreError::not_found(action, STORE_MISSING))
    }

    /// Runs `f` inside the critical section of one store.
    pub(crate) fn with_store<T>(
        &self,
        action: &str,
        store_id: &str,
        f: impl FnOnce(&mut Store) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _placement = self.placement.read();
        let handle = observe(self.store_handle(action, store_id))?;
        let mut store = handle.lock();
        observe(f(&mut store))
    }

    fn drop_indexed(&self, cascade: &Cascade) {
        for id in &cascade.inventory_ids {
            self.inventory_index.remove(id.as_str());
        }
        for id in &cascade.device_ids {
            self.device_index.remove(id.as_str());
        }
    }

    // Stores

    #[tracing::instrument(skip(self))]
    pub fn provision_store(&self, store_id: &str, name: &str, address: &str) -> StoreResult<Store> {
        let _placement = self.placement.write();
        if self.stores.contains_key(store_id) {
            return observe(Err(StoreError::duplicate(
                "Provision Store",
                "Store Already Exists",
            )));
        }
        let store = Store::new(store_id, name, address);
        self.stores
            .put(store_id, Arc::new(Mutex::new(store.clone())));
        tracing::info!(store_id, "store provisioned");
        Ok(store)
    }

    #[tracing::instrument(skip(self))]
    pub fn show_store(&self, store_id: &str) -> StoreResult<Store> {
        self.with_store("Show Store", store_id, |store| Ok(store.clone()))
    }

    /// Snapshots of every store, ordered by id.
    pub fn list_stores(&self) -> Vec<Store> {
        let _placement = self.placement.read();
        self.stores
            .values()
            .iter()
            .map(|handle| handle.lock().clone())
            .collect()
    }

    #[tracing::instrument(skip(self))]
    pub fn update_store(
        &self,
        store_id: &str,
        description: &str,
        address: &str,
    ) -> StoreResult<Store> {
        self.with_store("Update Store", store_id, |store| {
            store.update(description, address);
            Ok(store.clone())
        })
    }

    /// Deletes a store and everything in it.
    ///
    /// Inventory and device ids are purged from the global indices, customers
    /// inside are detached (no location, no basket) and its baskets are
    /// destroyed. Returns the store as it was before deletion.
    #[tracing::instrument(skip(self))]
    pub fn delete_store(&self, store_id: &str) -> StoreResult<Store> {
        let _placement = self.placement.write();
        let handle = observe(
            self.stores
                .remove(store_id)
                .ok_or_else(|| StoreError::not_found("Delete Store", STORE_MISSING)),
        )?;
        let mut store = handle.lock();
        let snapshot = store.clone();

        for id in store.inventory_ids() {
            self.inventory_index.remove(id.as_str());
        }
        for device in store.devices() {
            self.device_index.remove(device.id().as_str());
        }

        let (customers, baskets) = store.evacuate();
        for mut customer in customers {
            customer.leave_store();
            customer.release_basket();
            let customer_id = customer.id().to_string();
            self.customers
                .put(&customer_id, Placement::Detached(customer));
        }
        for basket in baskets {
            self.baskets.remove(basket.id().as_str());
        }

        tracing::info!(store_id, "store deleted");
        Ok(snapshot)
    }

    // Aisles

    #[tracing::instrument(skip(self))]
    pub fn provision_aisle(
        &self,
        store_id: &str,
        aisle_number: &str,
        name: &str,
        description: &str,
        location: AisleLocation,
    ) -> StoreResult<Aisle> {
        self.with_store("Provision Aisle", store_id, |store| {
            store
                .add_aisle(aisle_number, name, description, location)
                .cloned()
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn show_aisle(&self, store_id: &str, aisle_number: &str) -> StoreResult<Aisle> {
        self.with_store("Show Aisle", store_id, |store| {
            store
                .aisle(aisle_number)
                .cloned()
                .ok_or_else(|| StoreError::not_found("Show Aisle", AISLE_MISSING))
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn update_aisle(
        &self,
        store_id: &str,
        aisle_number: &str,
        name: &str,
        description: &str,
        location: AisleLocation,
    ) -> StoreResult<Aisle> {
        self.with_store("Update Aisle", store_id, |store| {
            store
                .update_aisle(aisle_number, name, description, location)
                .cloned()
        })
    }

    /// Deletes an aisle with its shelves, inventory and devices.
    #[tracing::instrument(skip(self))]
    pub fn delete_aisle(&self, store_id: &str, aisle_number: &str) -> StoreResult<Aisle> {
        let _placement = self.placement.write();
        let handle = observe(self.store_handle("Delete Aisle", store_id))?;
        let mut store = handle.lock();
        let snapshot = observe(
            store
                .aisle(aisle_number)
                .cloned()
                .ok_or_else(|| StoreError::not_found("Delete Aisle", AISLE_MISSING)),
        )?;
        let cascade = observe(store.remove_aisle(aisle_number))?;
        self.drop_indexed(&cascade);
        tracing::info!(store_id, aisle_number, "aisle deleted");
        Ok(snapshot)
    }

    // Shelves

    #[tracing::instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub fn provision_shelf(
        &self,
        store_id: &str,
        aisle_number: &str,
        shelf_id: &str,
        name: &str,
        level: ShelfLevel,
        description: &str,
        temperature: Temperature,
    ) -> StoreResult<Shelf> {
        self.with_store("Provision Shelf", store_id, |store| {
            store
                .add_shelf(aisle_number, shelf_id, name, level, description, temperature)
                .cloned()
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn show_shelf(&self, store_id: &str, aisle_number: &str, shelf_id: &str) -> StoreResult<Shelf> {
        self.with_store("Show Shelf", store_id, |store| {
            let aisle = store
                .aisle(aisle_number)
                .ok_or_else(|| StoreError::not_found("Show Shelf", AISLE_MISSING))?;
            aisle
                .shelf(shelf_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found("Show Shelf", SHELF_MISSING))
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn update_shelf(
        &self,
        store_id: &str,
        aisle_number: &str,
        shelf_id: &str,
        name: &str,
        description: &str,
    ) -> StoreResult<Shelf> {
        self.with_store("Update Shelf", store_id, |store| {
            store
                .update_shelf(aisle_number, shelf_id, name, description)
                .cloned()
        })
    }

    /// Deletes a shelf with its inventory.
    #[tracing::instrument(skip(self))]
    pub fn delete_shelf(
        &self,
        store_id: &str,
        aisle_number: &str,
        shelf_id: &str,
    ) -> StoreResult<Shelf> {
        let _placement = self.placement.write();
        let handle = observe(self.store_handle("Delete Shelf", store_id))?;
        let mut store = handle.lock();
        let snapshot = observe(
            store
                .shelf(aisle_number, shelf_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found("Delete Shelf", SHELF_MISSING)),
        )?;
        let cascade = observe(store.remove_shelf(aisle_number, shelf_id))?;
        self.drop_indexed(&cascade);
        tracing::info!(store_id, aisle_number, shelf_id, "shelf deleted");
        Ok(snapshot)
    }

    // Products

    #[tracing::instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub fn provision_product(
        &self,
        product_id: &str,
        name: &str,
        description: &str,
        size: &str,
        category: &str,
        price: Money,
        temperature: Temperature,
    ) -> StoreResult<Product> {
        let _placement = self.placement.write();
        if self.products.contains_key(product_id) {
            return observe(Err(StoreError::duplicate(
                "Provision Product",
                "Product Already Exists",
            )));
        }
        let product = Product::new(product_id, name, description, size, category, price, temperature);
        self.products.put(product_id, product.clone());
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    pub fn show_product(&self, product_id: &str) -> StoreResult<Product> {
        observe(
            self.products
                .get(product_id)
                .ok_or_else(|| StoreError::not_found("Show Product", PRODUCT_MISSING)),
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn update_product(
        &self,
        product_id: &str,
        name: &str,
        description: &str,
        size: &str,
        category: &str,
        price: Money,
    ) -> StoreResult<Product> {
        let _placement = self.placement.write();
        let mut product = observe(
            self.products
                .get(product_id)
                .ok_or_else(|| StoreError::not_found("Update Product", PRODUCT_MISSING)),
        )?;
        product.update(name, description, size, category, price);
        self.products.put(product_id, product.clone());
        Ok(product)
    }

    /// Deletes a product definition. Inventory records keep their product id.
    #[tracing::instrument(skip(self))]
    pub fn delete_product(&self, product_id: &str) -> StoreResult<Product> {
        let _placement = self.placement.write();
        observe(
            self.products
                .remove(product_id)
                .ok_or_else(|| StoreError::not_found("Delete Product", PRODUCT_MISSING)),
        )
    }

    // Inventory

    /// Creates an inventory record on a shelf.
    ///
    /// Inventory ids are unique across all stores. The product must exist
    /// and its temperature zone must match the shelf's.
    #[tracing::instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub fn provision_inventory(
        &self,
        inventory_id: &str,
        store_id: &str,
        aisle_number: &str,
        shelf_id: &str,
        capacity: i64,
        count: i64,
        product_id: &str,
        inventory_type: InventoryType,
    ) -> StoreResult<Inventory> {
        const ACTION: &str = "Provision Inventory";
        let _placement = self.placement.write();
        if self.inventory_index.contains_key(inventory_id) {
            return observe(Err(StoreError::duplicate(ACTION, "Inventory Already Exists")));
        }
        let product = observe(
            self.products
                .get(product_id)
                .ok_or_else(|| StoreError::not_found(ACTION, PRODUCT_MISSING)),
        )?;
        let handle = observe(self.store_handle(ACTION, store_id))?;
        let mut store = handle.lock();
        let inventory = observe(
            store
                .add_inventory(
                    inventory_id,
                    aisle_number,
                    shelf_id,
                    capacity,
                    count,
                    &product,
                    inventory_type,
                )
                .cloned()
                .map_err(|e| e.with_action(ACTION)),
        )?;
        self.inventory_index
            .put(inventory_id, StoreId::new(store_id));
        tracing::info!(inventory_id, store_id, "inventory provisioned");
        Ok(inventory)
    }

    fn inventory_handle(&self, action: &str, inventory_id: &str) -> StoreResult<StoreHandle> {
        let store_id = self
            .inventory_index
            .get(inventory_id)
            .ok_or_else(|| StoreError::not_found(action, INVENTORY_MISSING))?;
        self.store_handle(action, store_id.as_str())
    }

    #[tracing::instrument(skip(self))]
    pub fn show_inventory(&self, inventory_id: &str) -> StoreResult<Inventory> {
        const ACTION: &str = "Show Inventory";
        let _placement = self.placement.read();
        let handle = observe(self.inventory_handle(ACTION, inventory_id))?;
        let store = handle.lock();
        observe(
            store
                .inventory(inventory_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(ACTION, INVENTORY_MISSING)),
        )
    }

    /// Changes an inventory count by `delta`, keeping it within `[0, capacity]`.
    #[tracing::instrument(skip(self))]
    pub fn update_inventory(&self, inventory_id: &str, delta: i64) -> StoreResult<Inventory> {
        const ACTION: &str = "Update Inventory";
        let _placement = self.placement.read();
        let handle = observe(self.inventory_handle(ACTION, inventory_id))?;
        let mut store = handle.lock();
        observe(
            store
                .adjust_inventory(inventory_id, delta)
                .cloned()
                .map_err(|e| e.with_action(ACTION)),
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_inventory(&self, inventory_id: &str) -> StoreResult<Inventory> {
        const ACTION: &str = "Delete Inventory";
        let _placement = self.placement.write();
        let handle = observe(self.inventory_handle(ACTION, inventory_id))?;
        let mut store = handle.lock();
        let inventory = observe(store.remove_inventory(inventory_id).and_then(|removed| {
            removed.ok_or_else(|| StoreError::not_found(ACTION, INVENTORY_MISSING))
        }))?;
        self.inventory_index.remove(inventory_id);
        tracing::info!(inventory_id, "inventory deleted");
        Ok(inventory)
    }

    /// Number of inventory records indexed across all stores.
    pub fn inventory_count(&self) -> usize {
        self.inventory_index.size()
    }

    /// Ids of all indexed inventory records, sorted.
    pub fn inventory_ids(&self) -> Vec<InventoryId> {
        self.inventory_index
            .keys()
            .into_iter()
            .map(InventoryId::from)
            .collect()
    }
}

/// Counts and logs a failed operation, passing the result through.
pub(crate) fn observe<T>(result: StoreResult<T>) -> StoreResult<T> {
    if let Err(err) = &result {
        metrics::counter!("store_operation_failures_total", "kind" => err.kind.as_str())
            .increment(1);
        tracing::debug!(
            kind = %err.kind,
            action = %err.action,
            reason = %err.reason,
            "store operation failed"
        );
    }
    result
}
