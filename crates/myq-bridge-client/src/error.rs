//! MyQ client error types.

use std::fmt;

use thiserror::Error;

/// A result type using `MyqError`.
pub type Result<T> = std::result::Result<T, MyqError>;

/// The MyQ operation that was in flight when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `POST /user/validate`.
    Authenticate,
    /// `GET /userdevicedetails/get`.
    ListDevices,
    /// `GET /DeviceAttribute/GetDeviceAttribute`.
    ReadDoorAttribute,
    /// `PUT /DeviceAttribute/PutDeviceAttribute`.
    WriteDoorAttribute,
}

impl Operation {
    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::ListDevices => "list devices",
            Self::ReadDoorAttribute => "read door attribute",
            Self::WriteDoorAttribute => "write door attribute",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when calling MyQ.
#[derive(Debug, Error)]
pub enum MyqError {
    /// Credential validation failed.
    ///
    /// Wrong credentials and an unreachable service are reported the same way.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Any other MyQ call failed.
    #[error("{operation} failed: {message}")]
    Upstream {
        /// The operation that failed.
        operation: Operation,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// What went wrong.
        message: String,
    },

    /// The client could not be built from its configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl MyqError {
    pub(crate) fn upstream(
        operation: Operation,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Upstream {
            operation,
            status,
            message: message.into(),
        }
    }

    /// Collapse any failure during credential validation into `Auth`.
    #[must_use]
    pub(crate) fn into_auth(self) -> Self {
        match self {
            Self::Upstream { message, .. } => Self::Auth(message),
            other => other,
        }
    }

    /// Returns `true` if this is an authentication failure.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// HTTP status returned by MyQ, if the failure came from a response.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::Auth(_) | Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display() {
        let err = MyqError::upstream(Operation::ListDevices, Some(500), "HTTP 500");
        assert_eq!(err.to_string(), "list devices failed: HTTP 500");
        assert_eq!(err.upstream_status(), Some(500));
        assert!(!err.is_auth());
    }

    #[test]
    fn into_auth_keeps_message() {
        let err = MyqError::upstream(Operation::Authenticate, Some(401), "HTTP 401").into_auth();
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "authentication failed: HTTP 401");
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn into_auth_leaves_config_errors() {
        let err = MyqError::Config("bad header".into()).into_auth();
        assert!(matches!(err, MyqError::Config(_)));
    }
}
