//! MyQ client trait and HTTP implementation.
//!
//! Each call is a single request/response. There are no retries and no
//! explicit timeout: the transport default applies.

use async_trait::async_trait;
use myq_bridge_core::DeviceId;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{MyqError, Operation, Result};
use crate::types::{DesiredDoorState, Device, DoorAttribute, SecurityToken, WriteAck};
use crate::{Credentials, MyqConfig};

const VALIDATE_ROUTE: &str = "/user/validate";
const DEVICE_LIST_ROUTE: &str = "/userdevicedetails/get";
const ATTRIBUTE_READ_ROUTE: &str = "/DeviceAttribute/GetDeviceAttribute";
const ATTRIBUTE_WRITE_ROUTE: &str = "/DeviceAttribute/PutDeviceAttribute";

const DOOR_STATE_ATTRIBUTE: &str = "doorstate";
const DESIRED_DOOR_STATE_ATTRIBUTE: &str = "desireddoorstate";

/// Trait for MyQ communication.
///
/// This trait abstracts the cloud API, allowing for mock implementations
/// in tests.
#[async_trait]
pub trait MyqClient: Send + Sync {
    /// Validate credentials and obtain a security token.
    ///
    /// # Errors
    ///
    /// Returns `MyqError::Auth` for any failure, whether the credentials
    /// were rejected or MyQ could not be reached.
    async fn authenticate(&self, credentials: &Credentials) -> Result<SecurityToken>;

    /// List every device registered to the account, of any type.
    ///
    /// # Errors
    ///
    /// Returns `MyqError::Upstream` if the request fails.
    async fn list_devices(&self, token: &SecurityToken) -> Result<Vec<Device>>;

    /// Read the `doorstate` attribute of a device.
    ///
    /// # Errors
    ///
    /// Returns `MyqError::Upstream` if the request fails.
    async fn read_door_attribute(
        &self,
        token: &SecurityToken,
        device_id: &DeviceId,
    ) -> Result<DoorAttribute>;

    /// Write the `desireddoorstate` attribute of a device.
    ///
    /// # Errors
    ///
    /// Returns `MyqError::Upstream` if the request fails.
    async fn write_door_attribute(
        &self,
        token: &SecurityToken,
        device_id: &DeviceId,
        desired: DesiredDoorState,
    ) -> Result<WriteAck>;
}

/// Fields MyQ includes in every reply body.
///
/// A reply can be HTTP 200 and still carry a non-zero `ReturnCode`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReplyStatus {
    #[serde(default)]
    return_code: Option<serde_json::Value>,
    #[serde(default)]
    error_message: Option<String>,
}

impl ReplyStatus {
    /// Returns the failure message if the reply reports an error.
    fn failure(&self) -> Option<String> {
        let ok = match &self.return_code {
            None => true,
            Some(serde_json::Value::String(code)) => code.trim() == "0",
            Some(serde_json::Value::Number(code)) => code.as_i64() == Some(0),
            Some(_) => false,
        };
        if ok {
            return None;
        }
        let code = match &self.return_code {
            Some(serde_json::Value::String(code)) => code.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Some(match self.error_message.as_deref() {
            Some(message) if !message.is_empty() => format!("return code {code}: {message}"),
            _ => format!("return code {code}"),
        })
    }
}

/// Decode each listed device on its own.
///
/// An entry that is not a device (no id, wrong shapes) is logged and
/// skipped so it cannot fail the listing for the devices around it.
fn decode_devices(entries: Vec<serde_json::Value>) -> Vec<Device> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let device_type_id = entry.get("MyQDeviceTypeId").cloned();
            serde_json::from_value::<Device>(entry)
                .inspect_err(|e| {
                    tracing::warn!(
                        index,
                        device_type_id = ?device_type_id,
                        error = %e,
                        "Skipping undecodable MyQ device"
                    );
                })
                .ok()
        })
        .collect()
}

trait Reply: DeserializeOwned {
    fn status(&self) -> &ReplyStatus;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ValidateReply {
    #[serde(flatten)]
    status: ReplyStatus,
    #[serde(default)]
    security_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DeviceListReply {
    #[serde(flatten)]
    status: ReplyStatus,
    #[serde(default)]
    devices: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeReply {
    #[serde(flatten)]
    status: ReplyStatus,
    #[serde(default)]
    attribute_value: Option<String>,
    #[serde(default)]
    updated_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WriteReply {
    #[serde(flatten)]
    status: ReplyStatus,
    #[serde(default)]
    updated_time: Option<String>,
}

impl Reply for ValidateReply {
    fn status(&self) -> &ReplyStatus {
        &self.status
    }
}

impl Reply for DeviceListReply {
    fn status(&self) -> &ReplyStatus {
        &self.status
    }
}

impl Reply for AttributeReply {
    fn status(&self) -> &ReplyStatus {
        &self.status
    }
}

impl Reply for WriteReply {
    fn status(&self) -> &ReplyStatus {
        &self.status
    }
}

/// Request body for credential validation.
#[derive(Serialize)]
struct ValidateRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Request body for an attribute write.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WriteRequest<'a> {
    attribute_name: &'a str,
    attribute_value: u8,
    #[serde(rename = "MyQDeviceId")]
    myq_device_id: &'a DeviceId,
    security_token: &'a str,
}

/// HTTP client for the MyQ cloud API.
///
/// The identity headers from [`MyqConfig`] are installed as default headers,
/// so every request carries them.
#[derive(Debug, Clone)]
pub struct HttpMyqClient {
    client: reqwest::Client,
    config: MyqConfig,
}

impl HttpMyqClient {
    /// Create a new MyQ client.
    ///
    /// # Errors
    ///
    /// Returns `MyqError::Config` if the identity headers are invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: MyqConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(config.identity_headers()?)
            .build()
            .map_err(|e| MyqError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get the configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &MyqConfig {
        &self.config
    }

    /// Send a request and decode the reply, mapping every failure to
    /// `MyqError::Upstream` for the given operation.
    async fn execute<T: Reply>(
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(operation = %operation, error = %e, "MyQ request failed");
            MyqError::upstream(operation, None, format!("request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                operation = %operation,
                status = %status,
                body = %body,
                "MyQ returned an error status"
            );
            return Err(MyqError::upstream(
                operation,
                Some(status.as_u16()),
                format!("HTTP {status}"),
            ));
        }

        let reply: T = response.json().await.map_err(|e| {
            tracing::error!(operation = %operation, error = %e, "MyQ reply could not be decoded");
            MyqError::upstream(
                operation,
                Some(status.as_u16()),
                format!("invalid response: {e}"),
            )
        })?;

        if let Some(message) = reply.status().failure() {
            tracing::error!(operation = %operation, error = %message, "MyQ reported an error");
            return Err(MyqError::upstream(
                operation,
                Some(status.as_u16()),
                message,
            ));
        }

        Ok(reply)
    }
}

#[async_trait]
impl MyqClient for HttpMyqClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SecurityToken> {
        let body = ValidateRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };
        let request = self.client.post(self.config.url(VALIDATE_ROUTE)).json(&body);

        let reply: ValidateReply = Self::execute(Operation::Authenticate, request)
            .await
            .map_err(MyqError::into_auth)?;

        match reply.security_token {
            Some(token) if !token.is_empty() => {
                tracing::debug!(username = %credentials.username, "Validated MyQ credentials");
                Ok(SecurityToken::new(token))
            }
            _ => Err(MyqError::Auth("no security token in response".to_string())),
        }
    }

    async fn list_devices(&self, token: &SecurityToken) -> Result<Vec<Device>> {
        let request = self
            .client
            .get(self.config.url(DEVICE_LIST_ROUTE))
            .query(&[("securityToken", token.as_str())]);

        let reply: DeviceListReply = Self::execute(Operation::ListDevices, request).await?;

        let listed = reply.devices.len();
        let devices = decode_devices(reply.devices);
        tracing::debug!(listed, decoded = devices.len(), "Listed MyQ devices");
        Ok(devices)
    }

    async fn read_door_attribute(
        &self,
        token: &SecurityToken,
        device_id: &DeviceId,
    ) -> Result<DoorAttribute> {
        let request = self
            .client
            .get(self.config.url(ATTRIBUTE_READ_ROUTE))
            .query(&[
                ("AttributeName", DOOR_STATE_ATTRIBUTE),
                ("MyQDeviceId", device_id.as_str()),
                ("SecurityToken", token.as_str()),
            ]);

        let reply: AttributeReply = Self::execute(Operation::ReadDoorAttribute, request).await?;

        let value = reply.attribute_value.ok_or_else(|| {
            MyqError::upstream(
                Operation::ReadDoorAttribute,
                None,
                "no attribute value in response",
            )
        })?;

        tracing::debug!(device_id = %device_id, value = %value, "Read door state");
        Ok(DoorAttribute {
            value,
            updated_time: reply.updated_time,
        })
    }

    async fn write_door_attribute(
        &self,
        token: &SecurityToken,
        device_id: &DeviceId,
        desired: DesiredDoorState,
    ) -> Result<WriteAck> {
        let body = WriteRequest {
            attribute_name: DESIRED_DOOR_STATE_ATTRIBUTE,
            attribute_value: desired.code(),
            myq_device_id: device_id,
            security_token: token.as_str(),
        };
        let request = self
            .client
            .put(self.config.url(ATTRIBUTE_WRITE_ROUTE))
            .query(&[
                ("appId", self.config.application_id.as_str()),
                ("SecurityToken", token.as_str()),
            ])
            .json(&body);

        let reply: WriteReply = Self::execute(Operation::WriteDoorAttribute, request).await?;

        tracing::debug!(device_id = %device_id, desired = ?desired, "Wrote desired door state");
        Ok(WriteAck {
            updated_time: reply.updated_time,
        })
    }
}
