//! Inventory and basket transaction engine.
//!
//! [`StoreService`] owns every store, product, customer and basket and
//! exposes provision/show/update/delete operations per entity plus the
//! shopping transactions that move stock between shelves and baskets.
//! All operations are synchronous and return owned snapshots.

mod customers;
mod devices;
mod placement;
mod service;
mod shopping;

pub use service::StoreService;
