//! Domain layer for the smart store.
//!
//! This crate provides the entity hierarchy and its local invariants:
//! - `Store` aggregate root owning aisles, devices, baskets and present customers
//! - `Aisle`, `Shelf` and `Inventory` with duplicate and slot checks
//! - `Product`, `Customer`, `Basket` and `Device`
//! - `StoreError` carrying the kind, action and reason of every failure

pub mod aisle;
pub mod basket;
pub mod customer;
pub mod device;
pub mod error;
pub mod inventory;
pub mod product;
pub mod shelf;
pub mod store;
pub mod value_objects;

pub use aisle::Aisle;
pub use basket::Basket;
pub use customer::Customer;
pub use device::{Device, DeviceCommand, DeviceEvent};
pub use error::{ErrorKind, ParseError, StoreError, StoreResult};
pub use inventory::Inventory;
pub use product::Product;
pub use shelf::Shelf;
pub use store::{Cascade, Store};
pub use value_objects::{
    AgeGroup, AisleLocation, CustomerType, DeviceClass, DeviceKind, InventoryType, Money,
    ShelfLevel, Temperature,
};
