//! Device provisioning and messaging.

use common::StoreId;
use data_store::DataStore;
use domain::{Device, DeviceCommand, DeviceEvent, DeviceKind, StoreError, StoreResult};

use crate::service::{StoreHandle, StoreService, observe};

const DEVICE_MISSING: &str = "Device Does Not Exist";

impl StoreService {
    /// Places a device in an aisle. Device ids are unique across all stores.
    #[tracing::instrument(skip(self))]
    pub fn provision_device(
        &self,
        device_id: &str,
        name: &str,
        kind: DeviceKind,
        store_id: &str,
        aisle_number: &str,
    ) -> StoreResult<Device> {
        const ACTION: &str = "Provision Device";
        let _placement = self.placement.write();
        if self.device_index.contains_key(device_id) {
            return observe(Err(StoreError::duplicate(ACTION, "Device Already Exists")));
        }
        let handle = observe(self.store_handle(ACTION, store_id))?;
        let mut store = handle.lock();
        let device = observe(
            store
                .add_device(device_id, name, kind, aisle_number)
                .cloned()
                .map_err(|e| e.with_action(ACTION)),
        )?;
        self.device_index.put(device_id, StoreId::new(store_id));
        tracing::info!(device_id, store_id, aisle_number, %kind, "device provisioned");
        Ok(device)
    }

    #[tracing::instrument(skip(self))]
    pub fn show_device(&self, device_id: &str) -> StoreResult<Device> {
        self.with_device("Show Device", device_id, |device| Ok(device.clone()))
    }

    #[tracing::instrument(skip(self))]
    pub fn update_device(&self, device_id: &str, name: &str) -> StoreResult<Device> {
        self.with_device("Update Device", device_id, |device| {
            device.rename(name);
            Ok(device.clone())
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_device(&self, device_id: &str) -> StoreResult<Device> {
        const ACTION: &str = "Delete Device";
        let _placement = self.placement.write();
        let handle = observe(self.device_handle(ACTION, device_id))?;
        let mut store = handle.lock();
        let device = observe(
            store
                .remove_device(device_id)
                .ok_or_else(|| StoreError::not_found(ACTION, DEVICE_MISSING)),
        )?;
        self.device_index.remove(device_id);
        tracing::info!(device_id, "device deleted");
        Ok(device)
    }

    /// Records an event observed by a sensor.
    #[tracing::instrument(skip(self))]
    pub fn raise_event(&self, device_id: &str, event: &str) -> StoreResult<DeviceEvent> {
        let event = self.with_device("Raise Event", device_id, |device| device.raise_event(event))?;
        tracing::info!(
            device_id,
            event_id = %event.event_id,
            location = %event.location,
            text = %event.text,
            "device event"
        );
        Ok(event)
    }

    /// Sends a command to an appliance.
    #[tracing::instrument(skip(self))]
    pub fn issue_command(&self, device_id: &str, command: &str) -> StoreResult<DeviceCommand> {
        let command =
            self.with_device("Issue Command", device_id, |device| device.issue_command(command))?;
        tracing::info!(
            device_id,
            command_id = %command.command_id,
            location = %command.location,
            text = %command.text,
            "device command"
        );
        Ok(command)
    }

    fn device_handle(&self, action: &str, device_id: &str) -> StoreResult<StoreHandle> {
        let store_id = self
            .device_index
            .get(device_id)
            .ok_or_else(|| StoreError::not_found(action, DEVICE_MISSING))?;
        self.store_handle(action, store_id.as_str())
    }

    fn with_device<T>(
        &self,
        action: &str,
        device_id: &str,
        f: impl FnOnce(&mut Device) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _placement = self.placement.read();
        let handle = observe(self.device_handle(action, device_id))?;
        let mut store = handle.lock();
        let device = observe(
            store
                .device_mut(device_id)
                .ok_or_else(|| StoreError::not_found(action, DEVICE_MISSING)),
        )?;
        observe(f(device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{AisleLocation, ErrorKind};

    fn service() -> StoreService {
        let service = StoreService::new();
        service.provision_store("S1", "Corner", "1 Main St").unwrap();
        service
            .provision_aisle("S1", "A1", "Entry", "front", AisleLocation::Floor)
            .unwrap();
        service
            .provision_device("CAM1", "Door camera", DeviceKind::Camera, "S1", "A1")
            .unwrap();
        service
            .provision_device("BOT1", "Cleaner", DeviceKind::Robot, "S1", "A1")
            .unwrap();
        service
    }

    #[test]
    fn test_device_ids_are_global() {
        let service = service();
        service.provision_store("S2", "Mall", "9 Mall Rd").unwrap();
        service
            .provision_aisle("S2", "A1", "Entry", "front", AisleLocation::Floor)
            .unwrap();
        let err = service
            .provision_device("CAM1", "Other", DeviceKind::Microphone, "S2", "A1")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateEntity);
        assert_eq!(service.show_device("CAM1").unwrap().name(), "Door camera");
    }

    #[test]
    fn test_provision_device_requires_aisle() {
        let service = service();
        let err = service
            .provision_device("MIC1", "Mic", DeviceKind::Microphone, "S1", "A9")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.action, "Provision Device");
        assert!(service.show_device("MIC1").is_err());
    }

    #[test]
    fn test_sensor_events_and_appliance_commands() {
        let service = service();
        let event = service.raise_event("CAM1", "customer entered").unwrap();
        assert_eq!(event.text, "customer entered");

        let err = service.issue_command("CAM1", "turn left").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedDeviceOperation);

        service.issue_command("BOT1", "clean aisle A1").unwrap();
        let err = service.raise_event("BOT1", "bump").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedDeviceOperation);

        assert_eq!(service.show_device("CAM1").unwrap().events().len(), 1);
        assert_eq!(service.show_device("BOT1").unwrap().commands().len(), 1);
    }

    #[test]
    fn test_update_and_delete_device() {
        let service = service();
        assert_eq!(service.update_device("BOT1", "Mopper").unwrap().name(), "Mopper");
        service.delete_device("BOT1").unwrap();
        assert_eq!(service.show_device("BOT1").unwrap_err().kind, ErrorKind::NotFound);
        // id is free again
        service
            .provision_device("BOT1", "Cleaner 2", DeviceKind::Robot, "S1", "A1")
            .unwrap();
    }

    #[test]
    fn test_delete_store_purges_device_index() {
        let service = service();
        service.delete_store("S1").unwrap();
        assert_eq!(service.show_device("CAM1").unwrap_err().kind, ErrorKind::NotFound);
    }
}
