use std::collections::BTreeMap;

use common::{AisleNumber, InventoryId, ProductId, ShelfId};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::inventory::Inventory;
use crate::shelf::Shelf;
use crate::value_objects::{AisleLocation, ShelfLevel, Temperature};

/// An aisle of a store. Owns its shelves; at most one shelf per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aisle {
    number: AisleNumber,
    name: String,
    description: String,
    location: AisleLocation,
    shelves: BTreeMap<ShelfId, Shelf>,
}

impl Aisle {
    pub fn new(
        number: impl Into<AisleNumber>,
        name: impl Into<String>,
        description: impl Into<String>,
        location: AisleLocation,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            description: description.into(),
            location,
            shelves: BTreeMap::new(),
        }
    }

    pub fn number(&self) -> &AisleNumber {
        &self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> AisleLocation {
        self.location
    }

    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        location: AisleLocation,
    ) {
        self.name = name.into();
        self.description = description.into();
        self.location = location;
    }

    /// Adds a shelf. Both the id and the level must be unused in this aisle.
    pub fn add_shelf(
        &mut self,
        id: impl Into<ShelfId>,
        name: impl Into<String>,
        level: ShelfLevel,
        description: impl Into<String>,
        temperature: Temperature,
    ) -> StoreResult<&Shelf> {
        let id = id.into();
        if self.shelves.contains_key(&id) || self.shelves.values().any(|s| s.level() == level) {
            return Err(StoreError::duplicate("Add Shelf", "Shelf Already Exists"));
        }
        let shelf = Shelf::new(id.clone(), name, level, description, temperature);
        Ok(self.shelves.entry(id).or_insert(shelf))
    }

    pub fn shelf(&self, id: &str) -> Option<&Shelf> {
        self.shelves.get(id)
    }

    pub(crate) fn shelf_mut(&mut self, id: &str) -> Option<&mut Shelf> {
        self.shelves.get_mut(id)
    }

    pub fn shelves(&self) -> impl Iterator<Item = &Shelf> {
        self.shelves.values()
    }

    pub fn remove_shelf(&mut self, id: &str) -> Option<Shelf> {
        self.shelves.remove(id)
    }

    /// Every inventory record of `product_id` reachable from this aisle.
    pub fn inventory_for_product(&self, product_id: &ProductId) -> Vec<&Inventory> {
        self.shelves
            .values()
            .flat_map(|shelf| shelf.inventory_for_product(product_id))
            .collect()
    }

    /// Ids of all inventory records on all shelves of this aisle.
    pub fn inventory_ids(&self) -> Vec<InventoryId> {
        self.shelves
            .values()
            .flat_map(|shelf| shelf.inventories().map(|inv| inv.id().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn aisle() -> Aisle {
        Aisle::new("A1", "Produce", "fresh fruit", AisleLocation::Floor)
    }

    #[test]
    fn test_add_shelf() {
        let mut aisle = aisle();
        let shelf = aisle
            .add_shelf("SH1", "Top", ShelfLevel::High, "apples", Temperature::Ambient)
            .unwrap();
        assert_eq!(shelf.id().as_str(), "SH1");
        assert!(aisle.shelf("SH1").is_some());
    }

    #[test]
    fn test_add_shelf_rejects_duplicate_id() {
        let mut aisle = aisle();
        aisle
            .add_shelf("SH1", "Top", ShelfLevel::High, "apples", Temperature::Ambient)
            .unwrap();
        let err = aisle
            .add_shelf("SH1", "Bottom", ShelfLevel::Low, "pears", Temperature::Ambient)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateEntity);
        assert_eq!(err.reason, "Shelf Already Exists");
        assert_eq!(aisle.shelf("SH1").unwrap().name(), "Top");
    }

    #[test]
    fn test_add_shelf_rejects_occupied_level() {
        let mut aisle = aisle();
        aisle
            .add_shelf("SH1", "Top", ShelfLevel::High, "apples", Temperature::Ambient)
            .unwrap();
        let err = aisle
            .add_shelf("SH2", "Also top", ShelfLevel::High, "pears", Temperature::Ambient)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateEntity);
        assert!(aisle.shelf("SH2").is_none());
        assert_eq!(aisle.shelves().count(), 1);
    }

    #[test]
    fn test_update_changes_location() {
        let mut aisle = aisle();
        aisle.update("Back room", "overflow", AisleLocation::StoreRoom);
        assert_eq!(aisle.location(), AisleLocation::StoreRoom);
        assert_eq!(aisle.name(), "Back room");
    }
}
