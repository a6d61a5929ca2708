//! Shared identifiers and location value objects for the smart store.

pub mod types;

pub use types::{
    AisleNumber, BasketId, CustomerId, DeviceId, InventoryId, InventoryLocation, ProductId,
    ShelfId, StoreId, StoreLocation,
};
