//! Identifier types for myq-bridge.
//!
//! Both identifiers are opaque: they are never parsed or normalized, only
//! carried from one side of the bridge to the other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when constructing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The identifier was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// A MyQ device identifier.
///
/// MyQ returns device ids as JSON numbers; the voice assistant hands them
/// back as strings inside `additionalApplianceDetails`. Both forms are
/// accepted and stored as their exact textual representation, so a value
/// emitted at discovery comes back byte-for-byte identical on control.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDeviceId", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a `DeviceId` from its textual form.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is empty or only whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IdError::Empty("device id"));
        }
        Ok(Self(value))
    }

    /// Return the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

/// Wire form of a device id: MyQ sends numbers, the assistant sends strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeviceId {
    Number(u64),
    Text(String),
}

impl TryFrom<RawDeviceId> for DeviceId {
    type Error = IdError;

    fn try_from(raw: RawDeviceId) -> Result<Self, Self::Error> {
        match raw {
            RawDeviceId::Number(n) => Self::new(n.to_string()),
            RawDeviceId::Text(s) => Self::new(s),
        }
    }
}

/// The assistant's message identifier for a single request.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Return the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
