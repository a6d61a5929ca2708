use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::value_objects::{Money, Temperature};

/// A sellable product. Inventory and baskets refer to it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    size: String,
    category: String,
    price: Money,
    temperature: Temperature,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        description: impl Into<String>,
        size: impl Into<String>,
        category: impl Into<String>,
        price: Money,
        temperature: Temperature,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            size: size.into(),
            category: category.into(),
            price,
            temperature,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    /// The temperature zone a shelf must have to stock this product.
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Replaces the descriptive attributes. The id and temperature are fixed.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        size: impl Into<String>,
        category: impl Into<String>,
        price: Money,
    ) {
        self.name = name.into();
        self.description = description.into();
        self.size = size.into();
        self.category = category.into();
        self.price = price;
    }
}
