use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a store (the aggregate root).
    StoreId
);
string_id!(
    /// Aisle number, unique within its store.
    AisleNumber
);
string_id!(
    /// Identifier of a shelf within an aisle.
    ShelfId
);
string_id!(
    /// Product identifier (SKU).
    ProductId
);
string_id!(
    /// Identifier of an inventory record.
    InventoryId
);
string_id!(
    /// Identifier of a customer.
    CustomerId
);
string_id!(
    /// Identifier of a basket.
    BasketId
);
string_id!(
    /// Identifier of an in-store device.
    DeviceId
);

/// A position inside a store: the store and one of its aisles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreLocation {
    pub store_id: StoreId,
    pub aisle_number: AisleNumber,
}

impl StoreLocation {
    pub fn new(store_id: impl Into<StoreId>, aisle_number: impl Into<AisleNumber>) -> Self {
        Self {
            store_id: store_id.into(),
            aisle_number: aisle_number.into(),
        }
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.store_id, self.aisle_number)
    }
}

/// Where an inventory record sits: store, aisle and shelf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryLocation {
    pub store_id: StoreId,
    pub aisle_number: AisleNumber,
    pub shelf_id: ShelfId,
}

impl InventoryLocation {
    pub fn new(
        store_id: impl Into<StoreId>,
        aisle_number: impl Into<AisleNumber>,
        shelf_id: impl Into<ShelfId>,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            aisle_number: aisle_number.into(),
            shelf_id: shelf_id.into(),
        }
    }

    /// Returns the store/aisle part of this location.
    pub fn store_location(&self) -> StoreLocation {
        StoreLocation::new(self.store_id.clone(), self.aisle_number.clone())
    }
}

impl std::fmt::Display for InventoryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.store_id, self.aisle_number, self.shelf_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_id_conversions() {
        let id = ProductId::new("SKU-001");
        assert_eq!(id.as_str(), "SKU-001");

        let id2: ProductId = "SKU-002".into();
        assert_eq!(id2.to_string(), "SKU-002");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = StoreId::new("store_123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"store_123\"");
    }

    #[test]
    fn string_id_borrows_as_str_for_map_lookups() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(AisleNumber::new("A1"), 1);
        assert_eq!(map.get("A1"), Some(&1));
    }

    #[test]
    fn locations_display_colon_separated() {
        let loc = InventoryLocation::new("S1", "A1", "SH1");
        assert_eq!(loc.to_string(), "S1:A1:SH1");
        assert_eq!(loc.store_location(), StoreLocation::new("S1", "A1"));
        assert_eq!(loc.store_location().to_string(), "S1:A1");
    }
}
