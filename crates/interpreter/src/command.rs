//! Parsed script commands.

use std::str::FromStr;

use domain::{
    AgeGroup, AisleLocation, CustomerType, DeviceKind, InventoryType, Money, ParseError,
    ShelfLevel, Temperature,
};

use crate::error::SyntaxError;

/// One script command with its arguments parsed into domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DefineStore { store: String, name: String, address: String },
    ShowStore { store: String },
    ListStores,
    UpdateStore { store: String, description: String, address: String },
    DeleteStore { store: String },

    DefineAisle {
        store: String,
        aisle: String,
        name: String,
        description: String,
        location: AisleLocation,
    },
    ShowAisle { store: String, aisle: String },
    UpdateAisle {
        store: String,
        aisle: String,
        name: String,
        description: String,
        location: AisleLocation,
    },
    DeleteAisle { store: String, aisle: String },

    DefineShelf {
        store: String,
        aisle: String,
        shelf: String,
        name: String,
        level: ShelfLevel,
        description: String,
        temperature: Temperature,
    },
    ShowShelf { store: String, aisle: String, shelf: String },
    UpdateShelf { store: String, aisle: String, shelf: String, name: String, description: String },
    DeleteShelf { store: String, aisle: String, shelf: String },

    DefineProduct {
        product: String,
        name: String,
        description: String,
        size: String,
        category: String,
        price: Money,
        temperature: Temperature,
    },
    ShowProduct { product: String },
    UpdateProduct {
        product: String,
        name: String,
        description: String,
        size: String,
        category: String,
        price: Money,
    },
    DeleteProduct { product: String },

    DefineInventory {
        inventory: String,
        store: String,
        aisle: String,
        shelf: String,
        capacity: i64,
        count: i64,
        product: String,
        inventory_type: InventoryType,
    },
    ShowInventory { inventory: String },
    UpdateInventory { inventory: String, delta: i64 },
    DeleteInventory { inventory: String },

    DefineCustomer {
        customer: String,
        first_name: String,
        last_name: String,
        customer_type: CustomerType,
        email: String,
        address: String,
        age_group: Option<AgeGroup>,
    },
    ShowCustomer { customer: String },
    UpdateCustomer { customer: String, store: String, aisle: String },
    DeleteCustomer { customer: String },

    DefineBasket { basket: String },
    ShowBasket { basket: String },
    AssignBasket { customer: String, basket: String },
    GetCustomerBasket { customer: String },
    AddBasketItem { basket: String, product: String, quantity: i64 },
    RemoveBasketItem { basket: String, product: String, quantity: i64 },
    ClearBasket { basket: String },
    DeleteBasket { basket: String },

    DefineDevice { device: String, name: String, kind: DeviceKind, store: String, aisle: String },
    ShowDevice { device: String },
    UpdateDevice { device: String, name: String },
    DeleteDevice { device: String },
    RaiseEvent { device: String, text: String },
    IssueCommand { device: String, text: String },
}

/// Argument list of one command, checked for arity before it is read.
struct Args<'a> {
    keyword: &'a str,
    values: &'a [String],
}

impl Args<'_> {
    fn exactly(&self, n: usize) -> Result<(), SyntaxError> {
        self.between(n, n)
    }

    fn between(&self, min: usize, max: usize) -> Result<(), SyntaxError> {
        if (min..=max).contains(&self.values.len()) {
            return Ok(());
        }
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        Err(self.count_error(expected))
    }

    fn at_least(&self, n: usize) -> Result<(), SyntaxError> {
        if self.values.len() >= n {
            Ok(())
        } else {
            Err(self.count_error(format!("at least {n}")))
        }
    }

    fn count_error(&self, expected: String) -> SyntaxError {
        SyntaxError::ArgumentCount {
            command: self.keyword.to_string(),
            expected,
            found: self.values.len(),
        }
    }

    fn text(&self, index: usize) -> String {
        self.values.get(index).cloned().unwrap_or_default()
    }

    fn rest(&self, from: usize) -> String {
        self.values.get(from..).map(|v| v.join(" ")).unwrap_or_default()
    }

    fn integer(&self, index: usize, field: &'static str) -> Result<i64, SyntaxError> {
        let raw = self.text(index);
        raw.parse().map_err(|_| SyntaxError::InvalidNumber { field, value: raw })
    }

    fn value<T: FromStr<Err = ParseError>>(&self, index: usize) -> Result<T, SyntaxError> {
        Ok(self.text(index).parse()?)
    }
}

impl Command {
    /// Parses a tokenized line. The keyword is case-insensitive.
    pub fn parse(tokens: &[String]) -> Result<Self, SyntaxError> {
        let Some((keyword, values)) = tokens.split_first() else {
            return Err(SyntaxError::UnknownCommand(String::new()));
        };
        let keyword = keyword.to_ascii_lowercase();
        let a = Args { keyword: &keyword, values };

        let command = match keyword.as_str() {
            "define-store" => {
                a.exactly(3)?;
                Command::DefineStore { store: a.text(0), name: a.text(1), address: a.text(2) }
            }
            "show-store" => {
                a.exactly(1)?;
                Command::ShowStore { store: a.text(0) }
            }
            "list-stores" => {
                a.exactly(0)?;
                Command::ListStores
            }
            "update-store" => {
                a.exactly(3)?;
                Command::UpdateStore {
                    store: a.text(0),
                    description: a.text(1),
                    address: a.text(2),
                }
            }
            "delete-store" => {
                a.exactly(1)?;
                Command::DeleteStore { store: a.text(0) }
            }
            "define-aisle" => {
                a.exactly(5)?;
                Command::DefineAisle {
                    store: a.text(0),
                    aisle: a.text(1),
                    name: a.text(2),
                    description: a.text(3),
                    location: a.value(4)?,
                }
            }
            "show-aisle" => {
                a.exactly(2)?;
                Command::ShowAisle { store: a.text(0), aisle: a.text(1) }
            }
            "update-aisle" => {
                a.exactly(5)?;
                Command::UpdateAisle {
                    store: a.text(0),
                    aisle: a.text(1),
                    name: a.text(2),
                    description: a.text(3),
                    location: a.value(4)?,
                }
            }
            "delete-aisle" => {
                a.exactly(2)?;
                Command::DeleteAisle { store: a.text(0), aisle: a.text(1) }
            }
            "define-shelf" => {
                a.exactly(7)?;
                Command::DefineShelf {
                    store: a.text(0),
                    aisle: a.text(1),
                    shelf: a.text(2),
                    name: a.text(3),
                    level: a.value(4)?,
                    description: a.text(5),
                    temperature: a.value(6)?,
                }
            }
            "show-shelf" => {
                a.exactly(3)?;
                Command::ShowShelf { store: a.text(0), aisle: a.text(1), shelf: a.text(2) }
            }
            "update-shelf" => {
                a.exactly(5)?;
                Command::UpdateShelf {
                    store: a.text(0),
                    aisle: a.text(1),
                    shelf: a.text(2),
                    name: a.text(3),
                    description: a.text(4),
                }
            }
            "delete-shelf" => {
                a.exactly(3)?;
                Command::DeleteShelf { store: a.text(0), aisle: a.text(1), shelf: a.text(2) }
            }
            "define-product" => {
                a.exactly(7)?;
                Command::DefineProduct {
                    product: a.text(0),
                    name: a.text(1),
                    description: a.text(2),
                    size: a.text(3),
                    category: a.text(4),
                    price: a.value(5)?,
                    temperature: a.value(6)?,
                }
            }
            "show-product" => {
                a.exactly(1)?;
                Command::ShowProduct { product: a.text(0) }
            }
            "update-product" => {
                a.exactly(6)?;
                Command::UpdateProduct {
                    product: a.text(0),
                    name: a.text(1),
                    description: a.text(2),
                    size: a.text(3),
                    category: a.text(4),
                    price: a.value(5)?,
                }
            }
            "delete-product" => {
                a.exactly(1)?;
                Command::DeleteProduct { product: a.text(0) }
            }
            "define-inventory" => {
                a.exactly(8)?;
                Command::DefineInventory {
                    inventory: a.text(0),
                    store: a.text(1),
                    aisle: a.text(2),
                    shelf: a.text(3),
                    capacity: a.integer(4, "capacity")?,
                    count: a.integer(5, "count")?,
                    product: a.text(6),
                    inventory_type: a.value(7)?,
                }
            }
            "show-inventory" => {
                a.exactly(1)?;
                Command::ShowInventory { inventory: a.text(0) }
            }
            "update-inventory" => {
                a.exactly(2)?;
                Command::UpdateInventory { inventory: a.text(0), delta: a.integer(1, "delta")? }
            }
            "delete-inventory" => {
                a.exactly(1)?;
                Command::DeleteInventory { inventory: a.text(0) }
            }
            "define-customer" => {
                a.between(6, 7)?;
                let age_group = match values.get(6) {
                    Some(_) => Some(a.value(6)?),
                    None => None,
                };
                Command::DefineCustomer {
                    customer: a.text(0),
                    first_name: a.text(1),
                    last_name: a.text(2),
                    customer_type: a.value(3)?,
                    email: a.text(4),
                    address: a.text(5),
                    age_group,
                }
            }
            "show-customer" => {
                a.exactly(1)?;
                Command::ShowCustomer { customer: a.text(0) }
            }
            "update-customer" => {
                a.exactly(3)?;
                Command::UpdateCustomer { customer: a.text(0), store: a.text(1), aisle: a.text(2) }
            }
            "delete-customer" => {
                a.exactly(1)?;
                Command::DeleteCustomer { customer: a.text(0) }
            }
            "define-basket" => {
                a.exactly(1)?;
                Command::DefineBasket { basket: a.text(0) }
            }
            "show-basket" => {
                a.exactly(1)?;
                Command::ShowBasket { basket: a.text(0) }
            }
            "assign-basket" => {
                a.exactly(2)?;
                Command::AssignBasket { customer: a.text(0), basket: a.text(1) }
            }
            "get-customer-basket" => {
                a.exactly(1)?;
                Command::GetCustomerBasket { customer: a.text(0) }
            }
            "add-basket-item" => {
                a.exactly(3)?;
                Command::AddBasketItem {
                    basket: a.text(0),
                    product: a.text(1),
                    quantity: a.integer(2, "quantity")?,
                }
            }
            "remove-basket-item" => {
                a.exactly(3)?;
                Command::RemoveBasketItem {
                    basket: a.text(0),
                    product: a.text(1),
                    quantity: a.integer(2, "quantity")?,
                }
            }
            "clear-basket" => {
                a.exactly(1)?;
                Command::ClearBasket { basket: a.text(0) }
            }
            "delete-basket" => {
                a.exactly(1)?;
                Command::DeleteBasket { basket: a.text(0) }
            }
            "define-device" => {
                a.exactly(5)?;
                Command::DefineDevice {
                    device: a.text(0),
                    name: a.text(1),
                    kind: a.value(2)?,
                    store: a.text(3),
                    aisle: a.text(4),
                }
            }
            "show-device" => {
                a.exactly(1)?;
                Command::ShowDevice { device: a.text(0) }
            }
            "update-device" => {
                a.exactly(2)?;
                Command::UpdateDevice { device: a.text(0), name: a.text(1) }
            }
            "delete-device" => {
                a.exactly(1)?;
                Command::DeleteDevice { device: a.text(0) }
            }
            "raise-event" => {
                a.at_least(2)?;
                Command::RaiseEvent { device: a.text(0), text: a.rest(1) }
            }
            "issue-command" => {
                a.at_least(2)?;
                Command::IssueCommand { device: a.text(0), text: a.rest(1) }
            }
            _ => return Err(SyntaxError::UnknownCommand(keyword)),
        };
        Ok(command)
    }

    /// The keyword this command is written with.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::DefineStore { .. } => "define-store",
            Command::ShowStore { .. } => "show-store",
            Command::ListStores => "list-stores",
            Command::UpdateStore { .. } => "update-store",
            Command::DeleteStore { .. } => "delete-store",
            Command::DefineAisle { .. } => "define-aisle",
            Command::ShowAisle { .. } => "show-aisle",
            Command::UpdateAisle { .. } => "update-aisle",
            Command::DeleteAisle { .. } => "delete-aisle",
            Command::DefineShelf { .. } => "define-shelf",
            Command::ShowShelf { .. } => "show-shelf",
            Command::UpdateShelf { .. } => "update-shelf",
            Command::DeleteShelf { .. } => "delete-shelf",
            Command::DefineProduct { .. } => "define-product",
            Command::ShowProduct { .. } => "show-product",
            Command::UpdateProduct { .. } => "update-product",
            Command::DeleteProduct { .. } => "delete-product",
            Command::DefineInventory { .. } => "define-inventory",
            Command::ShowInventory { .. } => "show-inventory",
            Command::UpdateInventory { .. } => "update-inventory",
            Command::DeleteInventory { .. } => "delete-inventory",
            Command::DefineCustomer { .. } => "define-customer",
            Command::ShowCustomer { .. } => "show-customer",
            Command::UpdateCustomer { .. } => "update-customer",
            Command::DeleteCustomer { .. } => "delete-customer",
            Command::DefineBasket { .. } => "define-basket",
            Command::ShowBasket { .. } => "show-basket",
            Command::AssignBasket { .. } => "assign-basket",
            Command::GetCustomerBasket { .. } => "get-customer-basket",
            Command::AddBasketItem { .. } => "add-basket-item",
            Command::RemoveBasketItem { .. } => "remove-basket-item",
            Command::ClearBasket { .. } => "clear-basket",
            Command::DeleteBasket { .. } => "delete-basket",
            Command::DefineDevice { .. } => "define-device",
            Command::ShowDevice { .. } => "show-device",
            Command::UpdateDevice { .. } => "update-device",
            Command::DeleteDevice { .. } => "delete-device",
            Command::RaiseEvent { .. } => "raise-event",
            Command::IssueCommand { .. } => "issue-command",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse(line: &str) -> Result<Command, SyntaxError> {
        Command::parse(&tokenize(line).unwrap())
    }

    #[test]
    fn test_parse_define_shelf() {
        let command = parse(r#"define-shelf S1 A1 SH1 "Top Shelf" high "Dry goods" ambient"#).unwrap();
        assert_eq!(
            command,
            Command::DefineShelf {
                store: "S1".into(),
                aisle: "A1".into(),
                shelf: "SH1".into(),
                name: "Top Shelf".into(),
                level: ShelfLevel::High,
                description: "Dry goods".into(),
                temperature: Temperature::Ambient,
            }
        );
        assert_eq!(command.keyword(), "define-shelf");
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(
            parse("SHOW-STORE S1").unwrap(),
            Command::ShowStore { store: "S1".into() }
        );
    }

    #[test]
    fn test_parse_price_and_enums() {
        let command = parse("define-product P1 Milk Whole 1L dairy 3.49 refrigerated").unwrap();
        let Command::DefineProduct { price, temperature, .. } = command else {
            panic!("expected define-product");
        };
        assert_eq!(price, Money::from_cents(349));
        assert_eq!(temperature, Temperature::Refrigerated);
    }

    #[test]
    fn test_customer_age_group_is_optional() {
        let without = parse("define-customer C1 Ada Lovelace registered ada@x.io Home").unwrap();
        let with = parse("define-customer C1 Ada Lovelace registered ada@x.io Home child").unwrap();
        assert!(matches!(without, Command::DefineCustomer { age_group: None, .. }));
        assert!(matches!(with, Command::DefineCustomer { age_group: Some(AgeGroup::Child), .. }));
    }

    #[test]
    fn test_event_text_takes_rest_of_line() {
        assert_eq!(
            parse("raise-event CAM1 customer entered aisle A1").unwrap(),
            Command::RaiseEvent { device: "CAM1".into(), text: "customer entered aisle A1".into() }
        );
    }

    #[test]
    fn test_unknown_keyword() {
        assert_eq!(
            parse("teleport C1 S2").unwrap_err(),
            SyntaxError::UnknownCommand("teleport".into())
        );
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = parse("show-store").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::ArgumentCount { command: "show-store".into(), expected: "1".into(), found: 0 }
        );
        let err = parse("define-customer C1 Ada").unwrap_err();
        assert_eq!(err.to_string(), "define-customer expects 6 to 7 argument(s), found 2");
    }

    #[test]
    fn test_bad_number_and_enum() {
        assert_eq!(
            parse("add-basket-item B1 P1 lots").unwrap_err(),
            SyntaxError::InvalidNumber { field: "quantity", value: "lots".into() }
        );
        assert!(matches!(
            parse("define-aisle S1 A1 Main Front basement").unwrap_err(),
            SyntaxError::InvalidValue(_)
        ));
    }
}
