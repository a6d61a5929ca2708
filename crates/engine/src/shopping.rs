//! Basket transactions: moving stock between shelves and baskets.
//!
//! Every operation here runs under one store's mutex, so the availability
//! or capacity check and the count update it guards are applied together.

use chrono::Utc;
use common::{AisleNumber, InventoryId, ProductId, StoreId, StoreLocation};
use data_store::DataStore;
use domain::{Basket, Customer, ErrorKind, Inventory, Store, StoreError, StoreResult};

use crate::customers::{BASKET_MISSING, CUSTOMER_MISSING, CUSTOMER_NOT_IN_STORE};
use crate::placement::Placement;
use crate::service::{AISLE_MISSING, StoreHandle, StoreService, observe};

const BASKET_HAS_NO_CUSTOMER: &str = "Basket Has No Customer";

impl StoreService {
    /// Moves `quantity` of a product from the shelf near the basket's
    /// customer into the basket.
    #[tracing::instrument(skip(self))]
    pub fn add_product_to_basket(
        &self,
        basket_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> StoreResult<Basket> {
        const ACTION: &str = "Add Product To Basket";
        let _placement = self.placement.read();
        let handle = observe(self.shopping_store(ACTION, basket_id))?;
        let mut store = handle.lock();
        let basket = observe(add_in_store(
            &mut store,
            basket_id,
            &ProductId::new(product_id),
            quantity,
        ))?;
        metrics::counter!("store_basket_operations_total", "operation" => "add").increment(1);
        Ok(basket)
    }

    /// Moves `quantity` of a product from the basket back to its shelf.
    #[tracing::instrument(skip(self))]
    pub fn remove_product_from_basket(
        &self,
        basket_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> StoreResult<Basket> {
        const ACTION: &str = "Remove Product From Basket";
        let _placement = self.placement.read();
        let handle = observe(self.shopping_store(ACTION, basket_id))?;
        let mut store = handle.lock();
        let basket = observe(remove_in_store(
            &mut store,
            basket_id,
            &ProductId::new(product_id),
            quantity,
        ))?;
        metrics::counter!("store_basket_operations_total", "operation" => "remove").increment(1);
        Ok(basket)
    }

    /// Returns everything in the basket to the shelves and detaches it from
    /// its customer. Clearing an already cleared basket changes nothing.
    #[tracing::instrument(skip(self))]
    pub fn clear_basket(&self, basket_id: &str) -> StoreResult<Basket> {
        const ACTION: &str = "Clear Basket";
        let _placement = self.placement.read();
        let basket = match observe(self.basket_placement(ACTION, basket_id))? {
            Placement::Detached(basket) => basket,
            Placement::InStore(store_id) => {
                let handle = observe(self.store_handle(ACTION, store_id.as_str()))?;
                let mut store = handle.lock();
                observe(empty_basket(&mut store, ACTION, basket_id))?
            }
        };
        metrics::counter!("store_basket_operations_total", "operation" => "clear").increment(1);
        Ok(basket)
    }

    /// Moves a customer to an aisle of a store.
    ///
    /// A held basket is cleared and returned to the unassigned pool first, so
    /// the customer arrives without a basket. `last_seen` is set to now.
    #[tracing::instrument(skip(self))]
    pub fn update_customer(
        &self,
        customer_id: &str,
        store_id: &str,
        aisle_number: &str,
    ) -> StoreResult<Customer> {
        let _placement = self.placement.write();
        let customer = observe(self.move_customer(customer_id, store_id, aisle_number))?;
        tracing::info!(customer_id, store_id, aisle_number, "customer moved");
        Ok(customer)
    }

    fn move_customer(
        &self,
        customer_id: &str,
        store_id: &str,
        aisle_number: &str,
    ) -> StoreResult<Customer> {
        const ACTION: &str = "Update Customer";
        let placement = self.customer_placement(ACTION, customer_id)?;
        let target = self.store_handle(ACTION, store_id)?;
        if target.lock().aisle(aisle_number).is_none() {
            return Err(StoreError::not_found(ACTION, AISLE_MISSING));
        }

        let mut customer = match placement {
            Placement::Detached(customer) => customer,
            Placement::InStore(current) => {
                let handle = self.store_handle(ACTION, current.as_str())?;
                let mut store = handle.lock();
                self.release_held_basket(&mut store, ACTION, customer_id)?;
                store
                    .remove_customer(customer_id)
                    .ok_or_else(|| StoreError::not_found(ACTION, CUSTOMER_MISSING))?
            }
        };

        customer.move_to(StoreLocation::new(store_id, aisle_number), Utc::now());
        let snapshot = customer.clone();
        target.lock().add_customer(customer)?;
        self.customers
            .put(customer_id, Placement::InStore(StoreId::new(store_id)));
        Ok(snapshot)
    }

    /// The store owning a basket that can be shopped with.
    fn shopping_store(&self, action: &str, basket_id: &str) -> StoreResult<StoreHandle> {
        match self.basket_placement(action, basket_id)? {
            Placement::Detached(_) => Err(StoreError::not_found(action, BASKET_HAS_NO_CUSTOMER)),
            Placement::InStore(store_id) => self.store_handle(action, store_id.as_str()),
        }
    }
}

fn add_in_store(
    store: &mut Store,
    basket_id: &str,
    product_id: &ProductId,
    quantity: i64,
) -> StoreResult<Basket> {
    const ACTION: &str = "Add Product To Basket";
    let basket = find_basket(store, ACTION, basket_id)?;
    let aisle = shopper_aisle(store, ACTION, basket)?;
    ensure_positive(ACTION, quantity)?;
    let inventory = locate_inventory(store, ACTION, &aisle, product_id)?;
    if quantity > inventory.count() {
        return Err(StoreError::new(
            ErrorKind::InsufficientInventory,
            ACTION,
            "There Is Not Enough Inventory on the Shelf",
        ));
    }
    let inventory_id = inventory.id().clone();

    // the count check above guarantees the withdraw succeeds
    let basket = basket_mut(store, ACTION, basket_id)?;
    basket.hold(product_id.clone(), quantity)?;
    let snapshot = basket.clone();
    store
        .withdraw_inventory(inventory_id.as_str(), quantity)
        .map_err(|e| e.with_action(ACTION))?;
    Ok(snapshot)
}

fn remove_in_store(
    store: &mut Store,
    basket_id: &str,
    product_id: &ProductId,
    quantity: i64,
) -> StoreResult<Basket> {
    const ACTION: &str = "Remove Product From Basket";
    let basket = find_basket(store, ACTION, basket_id)?;
    let aisle = shopper_aisle(store, ACTION, basket)?;
    ensure_positive(ACTION, quantity)?;
    let inventory = locate_inventory(store, ACTION, &aisle, product_id)?;
    if quantity > basket.quantity_of(product_id.as_str()) {
        return Err(StoreError::new(
            ErrorKind::RemoveExceedsHeld,
            ACTION,
            "Trying To Remove More Quantity Than Exists",
        ));
    }
    if quantity > inventory.available_capacity() {
        return Err(StoreError::new(
            ErrorKind::CapacityExceeded,
            ACTION,
            "There Is Not Enough Capacity on the Shelf",
        ));
    }
    let inventory_id = inventory.id().clone();

    store
        .restock_inventory(inventory_id.as_str(), quantity)
        .map_err(|e| e.with_action(ACTION))?;
    let basket = basket_mut(store, ACTION, basket_id)?;
    basket.release(product_id, quantity)?;
    Ok(basket.clone())
}

/// Returns every held quantity to its shelf, empties the basket and detaches
/// it from its customer. The basket stays in the store.
///
/// All returns are resolved and checked before any is applied; on failure
/// neither the basket nor any inventory changes.
pub(crate) fn empty_basket(store: &mut Store, action: &str, basket_id: &str) -> StoreResult<Basket> {
    let basket = find_basket(store, action, basket_id)?;
    let customer_id = basket.customer_id().cloned();

    let mut returns: Vec<(InventoryId, i64)> = Vec::new();
    if !basket.is_empty() {
        let aisle = shopper_aisle(store, action, basket)?;
        for (product_id, quantity) in basket.items() {
            let inventory = locate_inventory(store, action, &aisle, product_id)?;
            if quantity > inventory.available_capacity() {
                return Err(StoreError::new(
                    ErrorKind::CapacityExceeded,
                    action,
                    "There Is Not Enough Capacity on the Shelf",
                ));
            }
            returns.push((inventory.id().clone(), quantity));
        }
    }

    for (inventory_id, quantity) in &returns {
        store
            .restock_inventory(inventory_id.as_str(), *quantity)
            .map_err(|e| e.with_action(action))?;
    }

    let basket = basket_mut(store, action, basket_id)?;
    basket.drain();
    basket.detach_customer();
    let snapshot = basket.clone();

    if let Some(customer) = customer_id.and_then(|id| store.customer_mut(id.as_str())) {
        customer.release_basket();
    }
    Ok(snapshot)
}

fn find_basket<'a>(store: &'a Store, action: &str, basket_id: &str) -> StoreResult<&'a Basket> {
    store
        .basket(basket_id)
        .ok_or_else(|| StoreError::not_found(action, BASKET_MISSING))
}

fn basket_mut<'a>(store: &'a mut Store, action: &str, basket_id: &str) -> StoreResult<&'a mut Basket> {
    store
        .basket_mut(basket_id)
        .ok_or_else(|| StoreError::not_found(action, BASKET_MISSING))
}

fn ensure_positive(action: &str, quantity: i64) -> StoreResult<()> {
    if quantity <= 0 {
        return Err(StoreError::invalid_quantity(
            action,
            "Quantity Must Be Greater Than 0",
        ));
    }
    Ok(())
}

/// The aisle where the basket's customer stands. Guests may not shop.
fn shopper_aisle(store: &Store, action: &str, basket: &Basket) -> StoreResult<AisleNumber> {
    let customer_id = basket
        .customer_id()
        .ok_or_else(|| StoreError::not_found(action, BASKET_HAS_NO_CUSTOMER))?;
    let customer = store
        .customer(customer_id.as_str())
        .ok_or_else(|| StoreError::not_found(action, CUSTOMER_NOT_IN_STORE))?;
    if customer.is_guest() {
        return Err(StoreError::new(
            ErrorKind::GuestNotAllowed,
            action,
            "Guests Are Not Allowed to Shop",
        ));
    }
    customer
        .location()
        .map(|location| location.aisle_number.clone())
        .ok_or_else(|| StoreError::not_found(action, CUSTOMER_NOT_IN_STORE))
}

/// The single inventory record of `product_id` reachable from `aisle`.
fn locate_inventory<'a>(
    store: &'a Store,
    action: &str,
    aisle: &AisleNumber,
    product_id: &ProductId,
) -> StoreResult<&'a Inventory> {
    let candidates = store
        .inventory_near(aisle.as_str(), product_id)
        .map_err(|e| e.with_action(action))?;
    match candidates.as_slice() {
        [] => Err(StoreError::new(
            ErrorKind::CustomerNotNearProduct,
            action,
            "Customer Is Not Near Product",
        )),
        [inventory] => Ok(*inventory),
        _ => Err(StoreError::new(
            ErrorKind::AmbiguousProductLocation,
            action,
            "There Are Several Products In the Aisle",
        )),
    }
}
