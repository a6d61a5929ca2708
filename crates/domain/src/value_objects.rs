//! Value objects for the store domain.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Declares a fieldless enum parsed case-insensitively from its snake_case name.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $expected:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Returns the snake_case name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseError::new($expected, s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

text_enum!(
    /// Temperature zone of a shelf, and the zone a product requires.
    Temperature, "temperature" {
        Frozen => "frozen",
        Refrigerated => "refrigerated",
        Ambient => "ambient",
        Warm => "warm",
        Hot => "hot",
    }
);

text_enum!(
    /// Vertical slot of a shelf within its aisle.
    ShelfLevel, "shelf level" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

text_enum!(
    /// Where an aisle is located.
    AisleLocation, "aisle location" {
        Floor => "floor",
        StoreRoom => "store_room",
    }
);

text_enum!(
    InventoryType, "inventory type" {
        Standard => "standard",
        Flexible => "flexible",
    }
);

text_enum!(
    /// Guests may browse but not shop.
    CustomerType, "customer type" {
        Guest => "guest",
        Registered => "registered",
    }
);

text_enum!(
    AgeGroup, "age group" {
        Adult => "adult",
        Child => "child",
    }
);

text_enum!(
    /// Sensors raise events; appliances accept commands.
    DeviceClass, "device class" {
        Sensor => "sensor",
        Appliance => "appliance",
    }
);

text_enum!(
    DeviceKind, "device kind" {
        Camera => "camera",
        Microphone => "microphone",
        Robot => "robot",
        Speaker => "speaker",
    }
);

impl DeviceKind {
    /// Returns whether this kind of device is a sensor or an appliance.
    pub fn class(&self) -> DeviceClass {
        match self {
            DeviceKind::Camera | DeviceKind::Microphone => DeviceClass::Sensor,
            DeviceKind::Robot | DeviceKind::Speaker => DeviceClass::Appliance,
        }
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 249 = $2.49)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.dollars(), self.cents_part())
    }
}

/// Parses a non-negative decimal amount such as `2.49`, `3` or `0.5`.
impl FromStr for Money {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::new("price", s);
        let text = s.trim().trim_start_matches('$');
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Money::from_cents)
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_parse_case_insensitively() {
        assert_eq!("Ambient".parse::<Temperature>(), Ok(Temperature::Ambient));
        assert_eq!("HIGH".parse::<ShelfLevel>(), Ok(ShelfLevel::High));
        assert_eq!("store_room".parse::<AisleLocation>(), Ok(AisleLocation::StoreRoom));
        assert_eq!("registered".parse::<CustomerType>(), Ok(CustomerType::Registered));
        assert_eq!("flexible".parse::<InventoryType>(), Ok(InventoryType::Flexible));
        assert_eq!("child".parse::<AgeGroup>(), Ok(AgeGroup::Child));
    }

    #[test]
    fn test_enum_parse_rejects_unknown_value() {
        let err = "lukewarm".parse::<Temperature>().unwrap_err();
        assert_eq!(err.expected, "temperature");
        assert_eq!(err.value, "lukewarm");
    }

    #[test]
    fn test_enum_display_matches_serialized_name() {
        assert_eq!(AisleLocation::StoreRoom.to_string(), "store_room");
        let json = serde_json::to_string(&AisleLocation::StoreRoom).unwrap();
        assert_eq!(json, "\"store_room\"");
    }

    #[test]
    fn test_device_kind_class() {
        assert_eq!(DeviceKind::Camera.class(), DeviceClass::Sensor);
        assert_eq!(DeviceKind::Microphone.class(), DeviceClass::Sensor);
        assert_eq!(DeviceKind::Robot.class(), DeviceClass::Appliance);
        assert_eq!(DeviceKind::Speaker.class(), DeviceClass::Appliance);
    }

    #[test]
    fn test_money_parse() {
        assert_eq!("2.49".parse::<Money>().unwrap().cents(), 249);
        assert_eq!("3".parse::<Money>().unwrap().cents(), 300);
        assert_eq!("0.5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
        assert_eq!("$10.00".parse::<Money>().unwrap().cents(), 1000);
    }

    #[test]
    fn test_money_parse_rejects_malformed() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("-1.00".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }
}
