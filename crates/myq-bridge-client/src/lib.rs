//! HTTP client for the Liftmaster MyQ cloud API.
//!
//! This crate wraps the four MyQ operations the bridge needs:
//!
//! - Credential validation (`authenticate`), yielding a per-request security token
//! - Device listing (`list_devices`)
//! - Door state read (`read_door_attribute`)
//! - Desired door state write (`write_door_attribute`)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Skill          │────▶│   MyqClient      │
//! │   (translator)   │     │   (trait)        │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │  HttpMyqClient   │
//!                          │  (impl)          │
//!                          └────────┬─────────┘
//!                                   │ HTTPS + fixed
//!                                   │ identity headers
//!                          ┌────────▼─────────┐
//!                          │   MyQ cloud      │
//!                          │   /api/v4        │
//!                          └──────────────────┘
//! ```
//!
//! Nothing is cached: a token obtained from `authenticate` is meant to be
//! used for the remainder of one request and then dropped.
//!
//! # Example
//!
//! ```no_run
//! use myq_bridge_client::{Credentials, HttpMyqClient, MyqClient, MyqConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpMyqClient::new(MyqConfig::default())?;
//! let credentials = Credentials::new("owner@example.com", "hunter2".to_string());
//!
//! let token = client.authenticate(&credentials).await?;
//! for device in client.list_devices(&token).await? {
//!     println!("{} (type {})", device.device_id, device.device_type_id);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod types;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::SecretString;

pub use client::{HttpMyqClient, MyqClient};
pub use error::{MyqError, Operation, Result};
pub use types::{
    Attribute, DesiredDoorState, Device, DoorAttribute, DoorState, SecurityToken, WriteAck,
};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockCall, MockMyqClient, MOCK_TOKEN};

/// Base endpoint of the MyQ v4 API.
pub const DEFAULT_BASE_URL: &str = "https://myqexternal.myqdevice.com/api/v4";

/// Application id of the official Liftmaster mobile app.
pub const LIFTMASTER_APP_ID: &str =
    "NWknvuBd7LoFHfXmKNMBcgajXtZEgKUh4V7WNzMidrpUUluDpVYVZx+xT4PCM5Kx";

/// Fixed configuration for talking to MyQ.
///
/// Every request carries the same identity headers; none of these values
/// vary per call.
#[derive(Debug, Clone)]
pub struct MyqConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Value of the `ApiVersion` header.
    pub api_version: String,
    /// Value of the `BrandId` header.
    pub brand_id: String,
    /// Value of the `Culture` header.
    pub culture: String,
    /// Value of the `MyQApplicationId` header and the `appId` write parameter.
    pub application_id: String,
}

impl MyqConfig {
    /// Replace the base URL (staging endpoints, mock servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the full URL for an API route such as `/user/validate`.
    #[must_use]
    pub fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url.trim_end_matches('/'))
    }

    /// Build the identity headers attached to every request.
    ///
    /// # Errors
    ///
    /// Returns `MyqError::Config` if a value is not a legal header value.
    pub fn identity_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            ("ApiVersion", &self.api_version),
            ("BrandId", &self.brand_id),
            ("Culture", &self.culture),
            ("MyQApplicationId", &self.application_id),
        ] {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| MyqError::Config(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| MyqError::Config(format!("invalid {name} header: {e}")))?;
            headers.insert(header, value);
        }
        Ok(headers)
    }
}

impl Default for MyqConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: "4.1".to_string(),
            brand_id: "2".to_string(),
            culture: "en".to_string(),
            application_id: LIFTMASTER_APP_ID.to_string(),
        }
    }
}

/// MyQ account credentials, supplied by the hosting environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account username (an email address).
    pub username: String,
    /// Account password.
    pub password: SecretString,
}

impl Credentials {
    /// Create credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
