//! Outbound response envelopes.
//!
//! Every response is `{header, payload}` with payload version `"2"`.

use myq_bridge_core::{DeviceId, MessageId};
use serde::{Deserialize, Serialize};

use crate::types::{ApplianceDetails, ControlCommand, Namespace};

/// Payload version of every response.
pub const PAYLOAD_VERSION: &str = "2";

/// Response name for a successful discovery.
pub const DISCOVER_RESPONSE_NAME: &str = "DiscoverAppliancesResponse";

/// Error name when MyQ could not carry out a control request.
pub const DEPENDENT_SERVICE_UNAVAILABLE: &str = "DependentServiceUnavailableError";

/// Error name when the device cannot act in its current mode.
pub const NOT_SUPPORTED_IN_CURRENT_MODE: &str = "NotSupportedInCurrentModeError";

/// A response to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Routing information.
    pub header: ResponseHeader,
    /// Response body.
    pub payload: ResponsePayload,
}

/// Header of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    /// The inbound event's message id.
    pub message_id: MessageId,
    /// Namespace of the response.
    pub namespace: String,
    /// Response or error name.
    pub name: String,
    /// Always `"2"`.
    pub payload_version: String,
}

impl ResponseHeader {
    fn new(message_id: MessageId, namespace: Namespace, name: &str) -> Self {
        Self {
            message_id,
            namespace: namespace.as_str().to_string(),
            name: name.to_string(),
            payload_version: PAYLOAD_VERSION.to_string(),
        }
    }
}

/// Response body variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// Appliances found at discovery.
    Discovery {
        /// The recognized appliances.
        #[serde(rename = "discoveredAppliances")]
        discovered_appliances: Vec<ApplianceDescriptor>,
    },
    /// MyQ could not be reached or refused the request.
    DependentServiceUnavailable {
        /// Name of the unavailable service.
        #[serde(rename = "dependentServiceName")]
        dependent_service_name: String,
    },
    /// The device cannot act in its current mode.
    NotSupportedInCurrentMode {
        /// The device's mode.
        #[serde(rename = "currentDeviceMode")]
        current_device_mode: String,
    },
    /// No body, as in control confirmations.
    Empty {},
}

/// The assistant-facing view of a MyQ device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceDescriptor {
    /// Appliance id (the MyQ device id).
    pub appliance_id: DeviceId,
    /// Manufacturer name.
    pub manufacturer_name: String,
    /// Model, from the device's `name` attribute.
    pub model_name: String,
    /// Fixed version string.
    pub version: String,
    /// Name spoken by the user, from the `desc` attribute.
    pub friendly_name: String,
    /// Description, also from the `desc` attribute.
    pub friendly_description: String,
    /// Whether MyQ reports the device online.
    pub is_reachable: bool,
    /// Supported actions.
    pub actions: Vec<ApplianceAction>,
    /// Metadata returned verbatim on control requests.
    pub additional_appliance_details: ApplianceDetails,
}

/// Actions an appliance supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplianceAction {
    /// `turnOn` (open the door).
    TurnOn,
    /// `turnOff` (close the door).
    TurnOff,
}

impl Response {
    /// Successful discovery response.
    #[must_use]
    pub fn discovery(message_id: MessageId, appliances: Vec<ApplianceDescriptor>) -> Self {
        Self {
            header: ResponseHeader::new(message_id, Namespace::Discovery, DISCOVER_RESPONSE_NAME),
            payload: ResponsePayload::Discovery {
                discovered_appliances: appliances,
            },
        }
    }

    /// Confirmation that a control command was carried out.
    #[must_use]
    pub fn confirmation(message_id: MessageId, command: ControlCommand) -> Self {
        Self {
            header: ResponseHeader::new(
                message_id,
                Namespace::Control,
                command.confirmation_name(),
            ),
            payload: ResponsePayload::Empty {},
        }
    }

    /// Control error: the dependent service failed.
    #[must_use]
    pub fn dependent_service_unavailable(
        message_id: MessageId,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            header: ResponseHeader::new(
                message_id,
                Namespace::Control,
                DEPENDENT_SERVICE_UNAVAILABLE,
            ),
            payload: ResponsePayload::DependentServiceUnavailable {
                dependent_service_name: service_name.into(),
            },
        }
    }

    /// Control error: the device cannot act in its current mode.
    #[must_use]
    pub fn not_supported_in_current_mode(message_id: MessageId) -> Self {
        Self {
            header: ResponseHeader::new(
                message_id,
                Namespace::Control,
                NOT_SUPPORTED_IN_CURRENT_MODE,
            ),
            payload: ResponsePayload::NotSupportedInCurrentMode {
                current_device_mode: "OTHER".to_string(),
            },
        }
    }
}
