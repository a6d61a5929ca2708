//! Customer and basket lifecycle: provisioning, lookup, assignment, deletion.

use common::{BasketId, CustomerId, StoreId};
use data_store::DataStore;
use domain::{AgeGroup, Basket, Customer, CustomerType, Store, StoreError, StoreResult};

use crate::placement::Placement;
use crate::service::{StoreService, observe};
use crate::shopping::empty_basket;

pub(crate) const CUSTOMER_MISSING: &str = "Customer Does Not Exist";
pub(crate) const CUSTOMER_NOT_IN_STORE: &str = "Customer Is Not In A Store";
pub(crate) const BASKET_MISSING: &str = "Basket Does Not Exist";

impl StoreService {
    /// Registers a customer. New customers are not in any store.
    #[tracing::instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub fn provision_customer(
        &self,
        customer_id: &str,
        first_name: &str,
        last_name: &str,
        customer_type: CustomerType,
        email: &str,
        address: &str,
        age_group: Option<AgeGroup>,
    ) -> StoreResult<Customer> {
        let _placement = self.placement.write();
        if self.customers.contains_key(customer_id) {
            return observe(Err(StoreError::duplicate(
                "Provision Customer",
                "Customer Already Exists",
            )));
        }
        let customer = Customer::new(
            customer_id,
            first_name,
            last_name,
            customer_type,
            email,
            address,
            age_group,
        );
        self.customers
            .put(customer_id, Placement::Detached(customer.clone()));
        tracing::info!(customer_id, "customer provisioned");
        Ok(customer)
    }

    #[tracing::instrument(skip(self))]
    pub fn show_customer(&self, customer_id: &str) -> StoreResult<Customer> {
        const ACTION: &str = "Show Customer";
        let _placement = self.placement.read();
        match observe(self.customer_placement(ACTION, customer_id))? {
            Placement::Detached(customer) => Ok(customer),
            Placement::InStore(store_id) => {
                let handle = observe(self.store_handle(ACTION, store_id.as_str()))?;
                let store = handle.lock();
                observe(
                    store
                        .customer(customer_id)
                        .cloned()
                        .ok_or_else(|| StoreError::not_found(ACTION, CUSTOMER_MISSING)),
                )
            }
        }
    }

    /// Deletes a customer. A held basket is cleared and returned to the pool.
    #[tracing::instrument(skip(self))]
    pub fn delete_customer(&self, customer_id: &str) -> StoreResult<Customer> {
        const ACTION: &str = "Delete Customer";
        let _placement = self.placement.write();
        let customer = match observe(self.customer_placement(ACTION, customer_id))? {
            Placement::Detached(customer) => customer,
            Placement::InStore(store_id) => {
                let handle = observe(self.store_handle(ACTION, store_id.as_str()))?;
                let mut store = handle.lock();
                observe(self.release_held_basket(&mut store, ACTION, customer_id))?;
                observe(
                    store
                        .remove_customer(customer_id)
                        .ok_or_else(|| StoreError::not_found(ACTION, CUSTOMER_MISSING)),
                )?
            }
        };
        self.customers.remove(customer_id);
        tracing::info!(customer_id, "customer deleted");
        Ok(customer)
    }

    /// Registers an unassigned basket.
    #[tracing::instrument(skip(self))]
    pub fn provision_basket(&self, basket_id: &str) -> StoreResult<Basket> {
        let _placement = self.placement.write();
        if self.baskets.contains_key(basket_id) {
            return observe(Err(StoreError::duplicate(
                "Provision Basket",
                "Basket Already Exists",
            )));
        }
        let basket = Basket::new(basket_id);
        self.baskets
            .put(basket_id, Placement::Detached(basket.clone()));
        Ok(basket)
    }

    #[tracing::instrument(skip(self))]
    pub fn show_basket(&self, basket_id: &str) -> StoreResult<Basket> {
        const ACTION: &str = "Show Basket";
        let _placement = self.placement.read();
        match observe(self.basket_placement(ACTION, basket_id))? {
            Placement::Detached(basket) => Ok(basket),
            Placement::InStore(store_id) => {
                let handle = observe(self.store_handle(ACTION, store_id.as_str()))?;
                let store = handle.lock();
                observe(
                    store
                        .basket(basket_id)
                        .cloned()
                        .ok_or_else(|| StoreError::not_found(ACTION, BASKET_MISSING)),
                )
            }
        }
    }

    /// Deletes a basket, first returning anything it holds to the shelves.
    #[tracing::instrument(skip(self))]
    pub fn delete_basket(&self, basket_id: &str) -> StoreResult<Basket> {
        const ACTION: &str = "Delete Basket";
        let _placement = self.placement.write();
        let basket = match observe(self.basket_placement(ACTION, basket_id))? {
            Placement::Detached(basket) => basket,
            Placement::InStore(store_id) => {
                let handle = observe(self.store_handle(ACTION, store_id.as_str()))?;
                let mut store = handle.lock();
                observe(empty_basket(&mut store, ACTION, basket_id))?;
                observe(
                    store
                        .remove_basket(basket_id)
                        .ok_or_else(|| StoreError::not_found(ACTION, BASKET_MISSING)),
                )?
            }
        };
        self.baskets.remove(basket_id);
        tracing::info!(basket_id, "basket deleted");
        Ok(basket)
    }

    /// Gives a customer a basket.
    ///
    /// The customer must be in a store and hold no basket. The basket must be
    /// unassigned, or sit unclaimed in the customer's store; it joins that store.
    #[tracing::instrument(skip(self))]
    pub fn assign_customer_basket(&self, customer_id: &str, basket_id: &str) -> StoreResult<Basket> {
        let _placement = self.placement.write();
        let basket = observe(self.assign_basket(customer_id, basket_id))?;
        tracing::info!(customer_id, basket_id, "basket assigned");
        Ok(basket)
    }

    /// The basket currently held by a customer.
    #[tracing::instrument(skip(self))]
    pub fn get_customer_basket(&self, customer_id: &str) -> StoreResult<Basket> {
        const ACTION: &str = "Get Customer Basket";
        let _placement = self.placement.read();
        let store_id = observe(self.customer_store(ACTION, customer_id))?;
        let handle = observe(self.store_handle(ACTION, store_id.as_str()))?;
        let store = handle.lock();
        observe(
            store
                .customer(customer_id)
                .and_then(|c| c.basket_id())
                .and_then(|basket_id| store.basket(basket_id.as_str()))
                .cloned()
                .ok_or_else(|| StoreError::not_found(ACTION, "Customer Has No Basket")),
        )
    }

    fn assign_basket(&self, customer_id: &str, basket_id: &str) -> StoreResult<Basket> {
        const ACTION: &str = "Assign Customer Basket";
        let store_id = self.customer_store(ACTION, customer_id)?;
        let handle = self.store_handle(ACTION, store_id.as_str())?;
        let mut store = handle.lock();

        let customer = store
            .customer(customer_id)
            .ok_or_else(|| StoreError::not_found(ACTION, CUSTOMER_MISSING))?;
        if customer.basket_id().is_some() {
            return Err(StoreError::duplicate(ACTION, "Customer Already Has A Basket"));
        }

        let owner = CustomerId::new(customer_id);
        match self.basket_placement(ACTION, basket_id)? {
            Placement::Detached(mut basket) => {
                basket.assign(owner, store_id.clone());
                store.add_basket(basket)?;
            }
            Placement::InStore(basket_store)
                if basket_store == store_id
                    && store
                        .basket(basket_id)
                        .is_some_and(|b| b.customer_id().is_none()) =>
            {
                if let Some(basket) = store.basket_mut(basket_id) {
                    basket.assign(owner, store_id.clone());
                }
            }
            Placement::InStore(_) => {
                return Err(StoreError::duplicate(ACTION, "Basket Is Already Assigned"));
            }
        }

        if let Some(customer) = store.customer_mut(customer_id) {
            customer.assign_basket(BasketId::new(basket_id));
        }
        self.baskets
            .put(basket_id, Placement::InStore(store_id));
        store
            .basket(basket_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(ACTION, BASKET_MISSING))
    }

    /// Clears the customer's basket and sends it back to the unassigned pool.
    pub(crate) fn release_held_basket(
        &self,
        store: &mut Store,
        action: &str,
        customer_id: &str,
    ) -> StoreResult<()> {
        let Some(basket_id) = store
            .customer(customer_id)
            .and_then(|c| c.basket_id().cloned())
        else {
            return Ok(());
        };
        empty_basket(store, action, basket_id.as_str())?;
        if let Some(mut basket) = store.remove_basket(basket_id.as_str()) {
            basket.unassign();
            self.baskets
                .put(basket_id.as_str(), Placement::Detached(basket));
        }
        Ok(())
    }

    pub(crate) fn customer_placement(
        &self,
        action: &str,
        customer_id: &str,
    ) -> StoreResult<Placement<Customer>> {
        self.customers
            .get(customer_id)
            .ok_or_else(|| StoreError::not_found(action, CUSTOMER_MISSING))
    }

    /// The store a customer is in, or `NotFound` when it is in none.
    fn customer_store(&self, action: &str, customer_id: &str) -> StoreResult<StoreId> {
        self.customer_placement(action, customer_id)?
            .store_id()
            .cloned()
            .ok_or_else(|| StoreError::not_found(action, CUSTOMER_NOT_IN_STORE))
    }

    pub(crate) fn basket_placement(
        &self,
        action: &str,
        basket_id: &str,
    ) -> StoreResult<Placement<Basket>> {
        self.baskets
            .get(basket_id)
            .ok_or_else(|| StoreError::not_found(action, BASKET_MISSING))
    }
}
