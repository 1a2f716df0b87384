//! MyQ data types.
//!
//! Field names follow the MyQ v4 wire format (`MyQDeviceId`,
//! `AttributeDisplayName`, ...) via serde renames.

use std::fmt;

use myq_bridge_core::DeviceId;
use serde::{Deserialize, Serialize};

/// Short-lived token returned by credential validation.
///
/// Valid for the request that obtained it; never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct SecurityToken(String);

impl SecurityToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Return the raw token for use in request parameters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurityToken([REDACTED])")
    }
}

/// A named attribute reported for a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Display name, e.g. `desc`, `name`, `online`, `doorstate`.
    #[serde(rename = "AttributeDisplayName", default)]
    pub display_name: String,
    /// Attribute value; `null` on the wire reads as empty.
    #[serde(rename = "Value", default, deserialize_with = "null_as_empty")]
    pub value: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Attribute {
    /// Create an attribute.
    #[must_use]
    pub fn new(display_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            value: value.into(),
        }
    }
}

/// A device registered to the MyQ account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Opaque device identifier.
    #[serde(rename = "MyQDeviceId")]
    pub device_id: DeviceId,
    /// Device category; garage door openers are type 17.
    #[serde(rename = "MyQDeviceTypeId")]
    pub device_type_id: i64,
    /// Attributes in the order MyQ reported them.
    #[serde(rename = "Attributes", default)]
    pub attributes: Vec<Attribute>,
}

impl Device {
    /// Look up an attribute value by display name.
    ///
    /// The first attribute with a matching name wins.
    #[must_use]
    pub fn attribute(&self, display_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.display_name == display_name)
            .map(|a| a.value.as_str())
    }

    /// Whether MyQ reports the device as online.
    ///
    /// Only the exact value `"True"` counts; anything else, including a
    /// missing `online` attribute, is offline.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.attribute("online") == Some("True")
    }
}

/// Reported state of a garage door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    /// Fully open.
    Open,
    /// Fully closed.
    Closed,
    /// Moving towards open.
    Opening,
    /// Moving towards closed.
    Closing,
}

impl DoorState {
    /// Decode a MyQ `doorstate` code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Open),
            2 => Some(Self::Closed),
            4 => Some(Self::Opening),
            5 => Some(Self::Closing),
            _ => None,
        }
    }

    /// The MyQ code for this state.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Closed => 2,
            Self::Opening => 4,
            Self::Closing => 5,
        }
    }
}

/// Door state written through `desireddoorstate`.
///
/// The write side uses its own encoding: closed is `0`, not `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesiredDoorState {
    /// Open the door.
    Open,
    /// Close the door.
    Closed,
}

impl DesiredDoorState {
    /// The value sent as `AttributeValue`.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Closed => 0,
        }
    }
}

/// Result of reading the `doorstate` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorAttribute {
    /// Raw attribute value.
    pub value: String,
    /// When MyQ last saw the value change, as reported (epoch millis).
    pub updated_time: Option<String>,
}

impl DoorAttribute {
    /// Decode the value into a door state, if it is a known code.
    #[must_use]
    pub fn door_state(&self) -> Option<DoorState> {
        self.value.trim().parse().ok().and_then(DoorState::from_code)
    }
}

/// Acknowledgement of a desired door state write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteAck {
    /// When MyQ accepted the write, as reported (epoch millis).
    pub updated_time: Option<String>,
}
