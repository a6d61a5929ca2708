//! In-store devices: sensors that raise events and appliances that take commands.

use chrono::{DateTime, Utc};
use common::{DeviceId, StoreLocation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorKind, StoreError, StoreResult};
use crate::value_objects::{DeviceClass, DeviceKind};

/// Something a sensor observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub event_id: Uuid,
    pub device_id: DeviceId,
    pub location: StoreLocation,
    pub text: String,
    pub occurred_at: DateTime<Utc>,
}

/// An instruction sent to an appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCommand {
    pub command_id: Uuid,
    pub device_id: DeviceId,
    pub location: StoreLocation,
    pub text: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    id: DeviceId,
    name: String,
    kind: DeviceKind,
    location: StoreLocation,
    events: Vec<DeviceEvent>,
    commands: Vec<DeviceCommand>,
}

impl Device {
    pub fn new(
        id: impl Into<DeviceId>,
        name: impl Into<String>,
        kind: DeviceKind,
        location: StoreLocation,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            location,
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn class(&self) -> DeviceClass {
        self.kind.class()
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn events(&self) -> &[DeviceEvent] {
        &self.events
    }

    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Records an observation. Only sensors raise events.
    pub fn raise_event(&mut self, text: impl Into<String>) -> StoreResult<DeviceEvent> {
        if self.class() != DeviceClass::Sensor {
            return Err(StoreError::new(
                ErrorKind::UnsupportedDeviceOperation,
                "Raise Event",
                format!("Device {} Is Not A Sensor", self.id),
            ));
        }
        let event = DeviceEvent {
            event_id: Uuid::new_v4(),
            device_id: self.id.clone(),
            location: self.location.clone(),
            text: text.into(),
            occurred_at: Utc::now(),
        };
        self.events.push(event.clone());
        Ok(event)
    }

    /// Records an instruction. Only appliances accept commands.
    pub fn issue_command(&mut self, text: impl Into<String>) -> StoreResult<DeviceCommand> {
        if self.class() != DeviceClass::Appliance {
            return Err(StoreError::new(
                ErrorKind::UnsupportedDeviceOperation,
                "Issue Command",
                format!("Device {} Is Not An Appliance", self.id),
            ));
        }
        let command = DeviceCommand {
            command_id: Uuid::new_v4(),
            device_id: self.id.clone(),
            location: self.location.clone(),
            text: text.into(),
            issued_at: Utc::now(),
        };
        self.commands.push(command.clone());
        Ok(command)
    }
}
