//! Inbound event types and skill configuration.
//!
//! These types mirror the smart home payload v2 request shapes that the
//! bridge consumes. Fields it never reads are ignored on deserialization.

use myq_bridge_client::DesiredDoorState;
use myq_bridge_core::{DeviceId, MessageId};
use serde::{Deserialize, Serialize};

/// Namespace of device discovery requests.
pub const DISCOVERY_NAMESPACE: &str = "Alexa.ConnectedHome.Discovery";

/// Namespace of device control requests.
pub const CONTROL_NAMESPACE: &str = "Alexa.ConnectedHome.Control";

/// Request namespaces the skill handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Enumerate the account's appliances.
    Discovery,
    /// Act on a single appliance.
    Control,
}

impl Namespace {
    /// Match a header namespace against the supported set.
    #[must_use]
    pub fn parse(namespace: &str) -> Option<Self> {
        match namespace {
            DISCOVERY_NAMESPACE => Some(Self::Discovery),
            CONTROL_NAMESPACE => Some(Self::Control),
            _ => None,
        }
    }

    /// The wire form of this namespace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => DISCOVERY_NAMESPACE,
            Self::Control => CONTROL_NAMESPACE,
        }
    }
}

/// A single inbound request from the voice assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Routing information.
    pub header: EventHeader,
    /// Request-specific body; only Control requests carry one we read.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Header of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHeader {
    /// Request namespace, e.g. `Alexa.ConnectedHome.Control`.
    pub namespace: String,
    /// Request name, e.g. `TurnOnRequest`.
    #[serde(default)]
    pub name: String,
    /// Identifier echoed back in the response header.
    #[serde(default)]
    pub message_id: MessageId,
    /// Payload version of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_version: Option<String>,
}

/// Body of a Control request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPayload {
    /// The appliance being acted on.
    pub appliance: ApplianceRef,
}

/// The appliance a Control request targets, as returned by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceRef {
    /// Appliance id handed out at discovery.
    #[serde(default)]
    pub appliance_id: Option<String>,
    /// Metadata handed out at discovery, returned verbatim.
    pub additional_appliance_details: ApplianceDetails,
}

/// Opaque per-appliance metadata.
///
/// Emitted at discovery and returned unchanged by the assistant with every
/// Control request, so the device can be addressed without listing devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceDetails {
    /// The MyQ device id.
    pub device_id: DeviceId,
}

/// A supported Control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Open the door.
    TurnOn,
    /// Close the door.
    TurnOff,
}

impl ControlCommand {
    /// Match a request name such as `TurnOnRequest`.
    #[must_use]
    pub fn from_request_name(name: &str) -> Option<Self> {
        match name {
            "TurnOnRequest" => Some(Self::TurnOn),
            "TurnOffRequest" => Some(Self::TurnOff),
            _ => None,
        }
    }

    /// The door state to write for this command.
    #[must_use]
    pub const fn desired_state(self) -> DesiredDoorState {
        match self {
            Self::TurnOn => DesiredDoorState::Open,
            Self::TurnOff => DesiredDoorState::Closed,
        }
    }

    /// The response name confirming this command.
    #[must_use]
    pub const fn confirmation_name(self) -> &'static str {
        match self {
            Self::TurnOn => "TurnOnConfirmation",
            Self::TurnOff => "TurnOffConfirmation",
        }
    }
}

/// Configuration for the skill translator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConfig {
    /// MyQ device type ids surfaced at discovery.
    #[serde(default = "SkillConfig::default_device_types")]
    pub recognized_device_types: Vec<i64>,
    /// Manufacturer reported for every appliance.
    #[serde(default = "SkillConfig::default_manufacturer")]
    pub manufacturer_name: String,
    /// Version string reported for every appliance.
    #[serde(default = "SkillConfig::default_version")]
    pub appliance_version: String,
    /// Service named in `DependentServiceUnavailableError` responses.
    #[serde(default = "SkillConfig::default_service_name")]
    pub dependent_service_name: String,
}

impl SkillConfig {
    fn default_device_types() -> Vec<i64> {
        vec![17] // garage door opener
    }

    fn default_manufacturer() -> String {
        "Liftmaster".to_string()
    }

    fn default_version() -> String {
        "VER01".to_string()
    }

    fn default_service_name() -> String {
        "Liftmaster MyQ".to_string()
    }

    /// Whether devices of this type are surfaced to the assistant.
    #[must_use]
    pub fn is_recognized(&self, device_type_id: i64) -> bool {
        self.recognized_device_types.contains(&device_type_id)
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            recognized_device_types: Self::default_device_types(),
            manufacturer_name: Self::default_manufacturer(),
            appliance_version: Self::default_version(),
            dependent_service_name: Self::default_service_name(),
        }
    }
}
