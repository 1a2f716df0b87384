//! Scripted in-memory MyQ client for tests.

use async_trait::async_trait;
use myq_bridge_core::DeviceId;
use parking_lot::Mutex;

use crate::client::MyqClient;
use crate::error::{MyqError, Operation, Result};
use crate::types::{DesiredDoorState, Device, DoorAttribute, SecurityToken, WriteAck};
use crate::Credentials;

/// Token handed out by [`MockMyqClient::authenticate`].
pub const MOCK_TOKEN: &str = "mock-security-token";

/// A call recorded by [`MockMyqClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `authenticate` was called with this username.
    Authenticate {
        /// Username passed in.
        username: String,
    },
    /// `list_devices` was called.
    ListDevices,
    /// `read_door_attribute` was called for this device.
    ReadDoorAttribute {
        /// Device addressed.
        device_id: DeviceId,
    },
    /// `write_door_attribute` was called for this device.
    WriteDoorAttribute {
        /// Device addressed.
        device_id: DeviceId,
        /// State requested.
        desired: DesiredDoorState,
    },
}

/// A mock MyQ client that returns scripted results and records calls.
#[derive(Debug, Default)]
pub struct MockMyqClient {
    /// Devices returned by `list_devices`.
    pub devices: Vec<Device>,
    /// Value returned by `read_door_attribute`.
    pub door_value: String,
    /// Operations that fail when called.
    pub failing: Vec<Operation>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockMyqClient {
    /// Create a mock that succeeds on every call and has no devices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these devices from `list_devices`.
    #[must_use]
    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    /// Return this value from `read_door_attribute`.
    #[must_use]
    pub fn with_door_value(mut self, value: impl Into<String>) -> Self {
        self.door_value = value.into();
        self
    }

    /// Make the given operation fail.
    #[must_use]
    pub fn failing(mut self, operation: Operation) -> Self {
        self.failing.push(operation);
        self
    }

    /// Calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: MockCall, operation: Operation) -> Result<()> {
        self.calls.lock().push(call);
        if !self.failing.contains(&operation) {
            return Ok(());
        }
        Err(match operation {
            Operation::Authenticate => MyqError::Auth("scripted failure".to_string()),
            other => MyqError::Upstream {
                operation: other,
                status: Some(503),
                message: "scripted failure".to_string(),
            },
        })
    }
}

#[async_trait]
impl MyqClient for MockMyqClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SecurityToken> {
        self.record(
            MockCall::Authenticate {
                username: credentials.username.clone(),
            },
            Operation::Authenticate,
        )?;
        Ok(SecurityToken::new(MOCK_TOKEN))
    }

    async fn list_devices(&self, _token: &SecurityToken) -> Result<Vec<Device>> {
        self.record(MockCall::ListDevices, Operation::ListDevices)?;
        Ok(self.devices.clone())
    }

    async fn read_door_attribute(
        &self,
        _token: &SecurityToken,
        device_id: &DeviceId,
    ) -> Result<DoorAttribute> {
        self.record(
            MockCall::ReadDoorAttribute {
                device_id: device_id.clone(),
            },
            Operation::ReadDoorAttribute,
        )?;
        Ok(DoorAttribute {
            value: self.door_value.clone(),
            updated_time: None,
        })
    }

    async fn write_door_attribute(
        &self,
        _token: &SecurityToken,
        device_id: &DeviceId,
        desired: DesiredDoorState,
    ) -> Result<WriteAck> {
        self.record(
            MockCall::WriteDoorAttribute {
                device_id: device_id.clone(),
                desired,
            },
            Operation::WriteDoorAttribute,
        )?;
        Ok(WriteAck::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DoorState;

    fn credentials() -> Credentials {
        Credentials::new("owner@example.com", "hunter2".to_string())
    }

    #[tokio::test]
    async fn mock_records_calls() {
        let client = MockMyqClient::new().with_door_value("1");
        let device_id = DeviceId::new("D1").unwrap();

        let token = client.authenticate(&credentials()).await.unwrap();
        assert_eq!(token.as_str(), MOCK_TOKEN);

        let door = client.read_door_attribute(&token, &device_id).await.unwrap();
        assert_eq!(door.door_state(), Some(DoorState::Open));

        assert_eq!(
            client.calls(),
            vec![
                MockCall::Authenticate {
                    username: "owner@example.com".to_string()
                },
                MockCall::ReadDoorAttribute { device_id },
            ]
        );
    }

    #[tokio::test]
    async fn mock_scripted_failures() {
        let client = MockMyqClient::new()
            .failing(Operation::Authenticate)
            .failing(Operation::ListDevices);

        let err = client.authenticate(&credentials()).await.unwrap_err();
        assert!(err.is_auth());

        let token = SecurityToken::new("t");
        let err = client.list_devices(&token).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
        assert_eq!(client.calls().len(), 2);
    }
}
