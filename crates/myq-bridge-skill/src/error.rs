//! Error types for the skill translator.
//!
//! Every error ends the invocation. [`SkillError::failure`] gives the value
//! reported back to the assistant: a plain message, or a structured error
//! envelope for control failures.

use myq_bridge_client::MyqError;
use myq_bridge_core::{DeviceId, MessageId};
use thiserror::Error;

use crate::envelope::Response;

/// A result type using `SkillError`.
pub type Result<T> = std::result::Result<T, SkillError>;

/// Reported when the event cannot be routed or parsed.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Reported when credential validation fails.
pub const LOGIN_FAILURE_MESSAGE: &str = "Could not log in to your account";

/// Reported when discovery fails.
pub const DISCOVERY_FAILURE_MESSAGE: &str = "There was a problem discovering your devices";

/// Reported for a control request other than turn on or turn off.
pub const UNSUPPORTED_COMMAND_MESSAGE: &str = "That request is not supported";

/// Errors that end a skill invocation.
#[derive(Debug, Error)]
pub enum SkillError {
    /// The event's namespace is neither Discovery nor Control.
    #[error("unsupported namespace: {0}")]
    UnsupportedNamespace(String),

    /// The Control request name maps to no command.
    #[error("unsupported control request: {0}")]
    UnsupportedCommand(String),

    /// The event is missing fields the request kind requires.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Logging in to MyQ failed.
    #[error("login failed: {0}")]
    Login(#[source] MyqError),

    /// Listing devices failed.
    #[error("device discovery failed: {0}")]
    Discovery(#[source] MyqError),

    /// A recognized device lacks an attribute needed to describe it.
    #[error("device {device_id} has no {attribute} attribute")]
    AttributeNotFound {
        /// The device being described.
        device_id: DeviceId,
        /// The missing attribute's display name.
        attribute: &'static str,
    },

    /// Writing the door state failed.
    #[error("door control failed: {source}")]
    DependentServiceUnavailable {
        /// The inbound event's message id, for the error envelope.
        message_id: MessageId,
        /// Service named in the error envelope.
        service_name: String,
        /// The MyQ failure.
        #[source]
        source: MyqError,
    },
}

/// What the assistant is told when an invocation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A plain failure message.
    Message(&'static str),
    /// A structured error envelope.
    Envelope(Response),
}

impl SkillError {
    /// The failure reported to the assistant.
    #[must_use]
    pub fn failure(&self) -> Failure {
        match self {
            Self::UnsupportedNamespace(_) | Self::MalformedEvent(_) => {
                Failure::Message(GENERIC_FAILURE_MESSAGE)
            }
            Self::UnsupportedCommand(_) => Failure::Message(UNSUPPORTED_COMMAND_MESSAGE),
            Self::Login(_) => Failure::Message(LOGIN_FAILURE_MESSAGE),
            Self::Discovery(_) | Self::AttributeNotFound { .. } => {
                Failure::Message(DISCOVERY_FAILURE_MESSAGE)
            }
            Self::DependentServiceUnavailable {
                message_id,
                service_name,
                ..
            } => Failure::Envelope(Response::dependent_service_unavailable(
                message_id.clone(),
                service_name.clone(),
            )),
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::UnsupportedNamespace(_)
            | Self::UnsupportedCommand(_)
            | Self::MalformedEvent(_) => 400,
            Self::Login(_)
            | Self::Discovery(_)
            | Self::AttributeNotFound { .. }
            | Self::DependentServiceUnavailable { .. } => 502,
        }
    }
}
