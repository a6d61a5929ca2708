pub mod memory;
pub mod store;

pub use memory::InMemoryDataStore;
pub use store::DataStore;
