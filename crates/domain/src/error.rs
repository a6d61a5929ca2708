//! Domain error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the store domain.
pub type StoreResult<T> = Result<T, StoreError>;

/// Classifies a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Identifier or positional slot already occupied.
    DuplicateEntity,

    /// A referenced entity does not exist.
    NotFound,

    /// Count outside `[0, capacity]`, or a non-positive quantity argument.
    InvalidQuantity,

    /// Shelf and product temperature zones differ.
    TemperatureMismatch,

    /// A guest customer attempted a basket mutation.
    GuestNotAllowed,

    /// The customer's recorded aisle does not exist in their store.
    AisleNotFound,

    /// No inventory of the product is reachable from the customer's aisle.
    CustomerNotNearProduct,

    /// More than one inventory of the product is reachable from the customer's aisle.
    AmbiguousProductLocation,

    /// Requested quantity exceeds the shelf count.
    InsufficientInventory,

    /// Requested remove quantity exceeds what the basket holds.
    RemoveExceedsHeld,

    /// Returning quantity would push the shelf above capacity.
    CapacityExceeded,

    /// The device class does not support the requested operation.
    UnsupportedDeviceOperation,

    /// Inventory cannot be deleted while a basket in the store holds its product.
    InventoryHeld,
}

impl ErrorKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateEntity => "DuplicateEntity",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidQuantity => "InvalidQuantity",
            ErrorKind::TemperatureMismatch => "TemperatureMismatch",
            ErrorKind::GuestNotAllowed => "GuestNotAllowed",
            ErrorKind::AisleNotFound => "AisleNotFound",
            ErrorKind::CustomerNotNearProduct => "CustomerNotNearProduct",
            ErrorKind::AmbiguousProductLocation => "AmbiguousProductLocation",
            ErrorKind::InsufficientInventory => "InsufficientInventory",
            ErrorKind::RemoveExceedsHeld => "RemoveExceedsHeld",
            ErrorKind::CapacityExceeded => "CapacityExceeded",
            ErrorKind::UnsupportedDeviceOperation => "UnsupportedDeviceOperation",
            ErrorKind::InventoryHeld => "InventoryHeld",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed failure raised by a store operation.
///
/// `action` names the operation that failed (e.g. "Add Shelf") and `reason`
/// is the human-readable explanation (e.g. "Shelf Already Exists").
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{action}: {reason}")]
pub struct StoreError {
    pub kind: ErrorKind,
    pub action: String,
    pub reason: String,
}

impl StoreError {
    pub fn new(kind: ErrorKind, action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            action: action.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateEntity, action, reason)
    }

    pub fn not_found(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, action, reason)
    }

    pub fn invalid_quantity(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidQuantity, action, reason)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Re-labels the error with the operation the caller was performing.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

/// Failure to parse a domain value from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {expected}: '{value}'")]
pub struct ParseError {
    /// Name of the type that was expected (e.g. "temperature").
    pub expected: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseError {
    pub fn new(expected: &'static str, value: impl Into<String>) -> Self {
        Self {
            expected,
            value: value.into(),
        }
    }
}
