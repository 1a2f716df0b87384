//! Skill service implementation.
//!
//! This module provides the `Skill` trait and the `SkillService` that routes
//! each inbound event to the Discovery or Control flow.

use std::sync::Arc;

use async_trait::async_trait;
use myq_bridge_client::{Credentials, MyqClient, SecurityToken};
use myq_bridge_core::MessageId;

use crate::appliance;
use crate::envelope::Response;
use crate::error::{Result, SkillError};
use crate::types::{ControlCommand, ControlPayload, Event, Namespace, SkillConfig};

/// Trait for handling inbound events.
///
/// One call is one invocation: nothing carries over between calls.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Translate one event into one response.
    ///
    /// # Errors
    ///
    /// Returns a `SkillError` if the event is not supported or MyQ fails;
    /// [`SkillError::failure`] gives the value to report.
    async fn handle(&self, event: Event) -> Result<Response>;
}

/// The skill translator backed by a MyQ client.
pub struct SkillService<C: MyqClient> {
    client: Arc<C>,
    credentials: Credentials,
    config: SkillConfig,
}

impl<C: MyqClient> SkillService<C> {
    /// Create a new skill service.
    #[must_use]
    pub fn new(client: Arc<C>, credentials: Credentials, config: SkillConfig) -> Self {
        Self {
            client,
            credentials,
            config,
        }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(client: Arc<C>, credentials: Credentials) -> Self {
        Self::new(client, credentials, SkillConfig::default())
    }

    /// Get the skill configuration.
    #[must_use]
    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    /// Log in to MyQ. Called once per event; tokens are never reused.
    async fn login(&self) -> Result<SecurityToken> {
        self.client
            .authenticate(&self.credentials)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "MyQ login failed");
                SkillError::Login(e)
            })
    }

    /// Discovery: login, list devices, describe the recognized ones.
    async fn discover(&self, message_id: MessageId) -> Result<Response> {
        let token = self.login().await?;

        let devices = self.client.list_devices(&token).await.map_err(|e| {
            tracing::error!(error = %e, "Listing MyQ devices failed");
            SkillError::Discovery(e)
        })?;

        let appliances = appliance::discover(&devices, &self.config).inspect_err(|e| {
            tracing::error!(error = %e, "Could not describe device");
        })?;

        tracing::info!(
            message_id = %message_id,
            devices = devices.len(),
            appliances = appliances.len(),
            "Discovered appliances"
        );
        Ok(Response::discovery(message_id, appliances))
    }

    /// Control: decode the command, login, write the desired door state.
    ///
    /// The request name and appliance are checked before logging in, so a
    /// request that cannot be carried out reports that failure even while
    /// MyQ login is failing, and makes no MyQ calls.
    async fn control(&self, event: Event) -> Result<Response> {
        let Event { header, payload } = event;

        let command = ControlCommand::from_request_name(&header.name).ok_or_else(|| {
            tracing::warn!(name = %header.name, "Unsupported control request");
            SkillError::UnsupportedCommand(header.name.clone())
        })?;

        let payload: ControlPayload = serde_json::from_value(payload).map_err(|e| {
            tracing::warn!(error = %e, "Control event has no usable appliance");
            SkillError::MalformedEvent(e.to_string())
        })?;
        let device_id = payload.appliance.additional_appliance_details.device_id;

        let token = self.login().await?;

        let desired = command.desired_state();
        self.client
            .write_door_attribute(&token, &device_id, desired)
            .await
            .map_err(|source| {
                tracing::error!(
                    device_id = %device_id,
                    appliance_id = ?payload.appliance.appliance_id,
                    error = %source,
                    "Setting door state failed"
                );
                SkillError::DependentServiceUnavailable {
                    message_id: header.message_id.clone(),
                    service_name: self.config.dependent_service_name.clone(),
                    source,
                }
            })?;

        tracing::info!(
            message_id = %header.message_id,
            device_id = %device_id,
            desired = ?desired,
            "Door command accepted"
        );
        Ok(Response::confirmation(header.message_id, command))
    }
}

#[async_trait]
impl<C: MyqClient> Skill for SkillService<C> {
    async fn handle(&self, event: Event) -> Result<Response> {
        // Header only: the payload holds the assistant's access token.
        tracing::debug!(header = ?event.header, "Received event");

        match Namespace::parse(&event.header.namespace) {
            Some(Namespace::Discovery) => self.discover(event.header.message_id).await,
            Some(Namespace::Control) => self.control(event).await,
            None => {
                tracing::warn!(namespace = %event.header.namespace, "No supported namespace");
                Err(SkillError::UnsupportedNamespace(event.header.namespace))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myq_bridge_client::{
        Attribute, DesiredDoorState, Device, MockCall, MockMyqClient, Operation,
    };
    use myq_bridge_core::DeviceId;
    use serde_json::json;

    use crate::envelope::ResponsePayload;
    use crate::error::Failure;

    fn setup(client: MockMyqClient) -> (SkillService<MockMyqClient>, Arc<MockMyqClient>) {
        let client = Arc::new(client);
        let credentials = Credentials::new("owner@example.com", "hunter2".to_string());
        let service = SkillService::with_defaults(Arc::clone(&client), credentials);
        (service, client)
    }

    fn device(id: &str, type_id: i64, attributes: &[(&str, &str)]) -> Device {
        Device {
            device_id: DeviceId::new(id).unwrap(),
            device_type_id: type_id,
            attributes: attributes
                .iter()
                .map(|(name, value)| Attribute::new(*name, *value))
                .collect(),
        }
    }

    fn discovery_event() -> Event {
        serde_json::from_value(json!({
            "header": {
                "namespace": "Alexa.ConnectedHome.Discovery",
                "name": "DiscoverAppliancesRequest",
                "messageId": "msg-discovery",
                "payloadVersion": "2"
            },
            "payload": { "accessToken": "assistant-token" }
        }))
        .unwrap()
    }

    fn control_event(name: &str, device_id: &str) -> Event {
        serde_json::from_value(json!({
            "header": {
                "namespace": "Alexa.ConnectedHome.Control",
                "name": name,
                "messageId": "msg-control",
                "payloadVersion": "2"
            },
            "payload": {
                "accessToken": "assistant-token",
                "appliance": {
                    "applianceId": device_id,
                    "additionalApplianceDetails": { "deviceId": device_id }
                }
            }
        }))
        .unwrap()
    }

    fn authenticate_call() -> MockCall {
        MockCall::Authenticate {
            username: "owner@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn discovery_returns_recognized_devices() {
        let (service, client) = setup(MockMyqClient::new().with_devices(vec![
            device(
                "D1",
                17,
                &[("desc", "Garage 1"), ("name", "LMxxx"), ("online", "True")],
            ),
            device("H1", 1, &[("desc", "Hub")]),
        ]));

        let response = service.handle(discovery_event()).await.unwrap();

        assert_eq!(response.header.name, "DiscoverAppliancesResponse");
        assert_eq!(response.header.namespace, "Alexa.ConnectedHome.Discovery");
        assert_eq!(response.header.message_id, MessageId::from("msg-discovery"));
        assert_eq!(response.header.payload_version, "2");

        let ResponsePayload::Discovery {
            discovered_appliances,
        } = response.payload
        else {
            panic!("expected discovery payload");
        };
        assert_eq!(discovered_appliances.len(), 1);
        assert_eq!(discovered_appliances[0].friendly_name, "Garage 1");
        assert!(discovered_appliances[0].is_reachable);

        assert_eq!(client.calls(), vec![authenticate_call(), MockCall::ListDevices]);
    }

    #[tokio::test]
    async fn discovery_login_failure_never_lists_devices() {
        let (service, client) = setup(MockMyqClient::new().failing(Operation::Authenticate));

        let err = service.handle(discovery_event()).await.unwrap_err();

        assert!(matches!(err, SkillError::Login(_)));
        assert_eq!(
            err.failure(),
            Failure::Message("Could not log in to your account")
        );
        assert_eq!(client.calls(), vec![authenticate_call()]);
    }

    #[tokio::test]
    async fn discovery_list_failure() {
        let (service, _client) = setup(MockMyqClient::new().failing(Operation::ListDevices));

        let err = service.handle(discovery_event()).await.unwrap_err();

        assert!(matches!(err, SkillError::Discovery(_)));
        assert_eq!(
            err.failure(),
            Failure::Message("There was a problem discovering your devices")
        );
    }

    #[tokio::test]
    async fn discovery_missing_attribute_fails_whole_request() {
        let (service, _client) = setup(MockMyqClient::new().with_devices(vec![
            device("D1", 17, &[("desc", "Garage 1"), ("name", "LMxxx")]),
            device("D2", 17, &[("name", "LMxxx")]),
        ]));

        let err = service.handle(discovery_event()).await.unwrap_err();

        assert!(matches!(
            err,
            SkillError::AttributeNotFound {
                attribute: "desc",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn turn_on_writes_open() {
        let (service, client) = setup(MockMyqClient::new());

        let response = service
            .handle(control_event("TurnOnRequest", "D1"))
            .await
            .unwrap();

        assert_eq!(response.header.name, "TurnOnConfirmation");
        assert_eq!(response.header.namespace, "Alexa.ConnectedHome.Control");
        assert_eq!(response.header.message_id, MessageId::from("msg-control"));
        assert_eq!(response.payload, ResponsePayload::Empty {});
        assert_eq!(
            client.calls(),
            vec![
                authenticate_call(),
                MockCall::WriteDoorAttribute {
                    device_id: DeviceId::new("D1").unwrap(),
                    desired: DesiredDoorState::Open,
                },
            ]
        );
    }

    #[tokio::test]
    async fn turn_off_writes_closed() {
        let (service, client) = setup(MockMyqClient::new());

        let response = service
            .handle(control_event("TurnOffRequest", "2204578"))
            .await
            .unwrap();

        assert_eq!(response.header.name, "TurnOffConfirmation");
        assert_eq!(
            client.calls()[1],
            MockCall::WriteDoorAttribute {
                device_id: DeviceId::new("2204578").unwrap(),
                desired: DesiredDoorState::Closed,
            }
        );
    }

    #[tokio::test]
    async fn control_write_failure_is_dependent_service_error() {
        let (service, _client) =
            setup(MockMyqClient::new().failing(Operation::WriteDoorAttribute));

        let err = service
            .handle(control_event("TurnOffRequest", "D1"))
            .await
            .unwrap_err();

        let Failure::Envelope(response) = err.failure() else {
            panic!("expected envelope, got {err:?}");
        };
        assert_eq!(response.header.name, "DependentServiceUnavailableError");
        assert_eq!(response.header.message_id, MessageId::from("msg-control"));
        assert_eq!(
            response.payload,
            ResponsePayload::DependentServiceUnavailable {
                dependent_service_name: "Liftmaster MyQ".to_string()
            }
        );
    }

    #[tokio::test]
    async fn control_login_failure_never_writes() {
        let (service, client) = setup(MockMyqClient::new().failing(Operation::Authenticate));

        let err = service
            .handle(control_event("TurnOnRequest", "D1"))
            .await
            .unwrap_err();

        assert!(matches!(err, SkillError::Login(_)));
        assert_eq!(client.calls(), vec![authenticate_call()]);
    }

    #[tokio::test]
    async fn unsupported_command_is_rejected_before_any_call() {
        let (service, client) = setup(MockMyqClient::new());

        let err = service
            .handle(control_event("SetPercentageRequest", "D1"))
            .await
            .unwrap_err();

        let SkillError::UnsupportedCommand(name) = &err else {
            panic!("expected unsupported command, got {err:?}");
        };
        assert_eq!(name, "SetPercentageRequest");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn unsupported_command_wins_over_failing_login() {
        let (service, client) = setup(MockMyqClient::new().failing(Operation::Authenticate));

        let err = service
            .handle(control_event("SetPercentageRequest", "D1"))
            .await
            .unwrap_err();

        assert_eq!(err.failure(), Failure::Message("That request is not supported"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn control_without_device_is_malformed() {
        let (service, client) = setup(MockMyqClient::new());
        let event: Event = serde_json::from_value(json!({
            "header": {
                "namespace": "Alexa.ConnectedHome.Control",
                "name": "TurnOnRequest",
                "messageId": "msg-control"
            },
            "payload": { "appliance": { "applianceId": "D1" } }
        }))
        .unwrap();

        let err = service.handle(event).await.unwrap_err();

        assert!(matches!(err, SkillError::MalformedEvent(_)));
        assert!(client.calls().is_empty());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn inbound_access_token_is_not_logged() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (service, _client) = setup(MockMyqClient::new());
        service
            .handle(control_event("TurnOnRequest", "D1"))
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().clone()).unwrap();
        assert!(output.contains("Received event"));
        assert!(output.contains("msg-control"));
        assert!(!output.contains("assistant-token"));
    }

    #[tokio::test]
    async fn unknown_namespace_makes_no_calls() {
        let (service, client) = setup(MockMyqClient::new());
        let event: Event = serde_json::from_value(json!({
            "header": { "namespace": "Something.Unknown", "messageId": "m" }
        }))
        .unwrap();

        let err = service.handle(event).await.unwrap_err();

        let SkillError::UnsupportedNamespace(namespace) = &err else {
            panic!("expected unsupported namespace, got {err:?}");
        };
        assert_eq!(namespace, "Something.Unknown");
        assert_eq!(err.failure(), Failure::Message("Something went wrong"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn every_event_logs_in_again() {
        let (service, client) = setup(MockMyqClient::new());

        service
            .handle(control_event("TurnOnRequest", "D1"))
            .await
            .unwrap();
        service
            .handle(control_event("TurnOffRequest", "D1"))
            .await
            .unwrap();

        let logins = client
            .calls()
            .into_iter()
            .filter(|call| matches!(call, MockCall::Authenticate { .. }))
            .count();
        assert_eq!(logins, 2);
    }

    #[tokio::test]
    async fn discovered_device_id_drives_control() {
        let (service, client) = setup(MockMyqClient::new().with_devices(vec![device(
            "2204578",
            17,
            &[("desc", "Garage 1"), ("name", "LMxxx"), ("online", "True")],
        )]));

        let response = service.handle(discovery_event()).await.unwrap();
        let ResponsePayload::Discovery {
            discovered_appliances,
        } = response.payload
        else {
            panic!("expected discovery payload");
        };

        // Feed the emitted details back exactly as the assistant would.
        let details =
            serde_json::to_value(&discovered_appliances[0].additional_appliance_details).unwrap();
        let event: Event = serde_json::from_value(json!({
            "header": {
                "namespace": "Alexa.ConnectedHome.Control",
                "name": "TurnOnRequest",
                "messageId": "m"
            },
            "payload": {
                "appliance": {
                    "applianceId": discovered_appliances[0].appliance_id,
                    "additionalApplianceDetails": details
                }
            }
        }))
        .unwrap();
        service.handle(event).await.unwrap();

        assert_eq!(
            client.calls().last(),
            Some(&MockCall::WriteDoorAttribute {
                device_id: DeviceId::new("2204578").unwrap(),
                desired: DesiredDoorState::Open,
            })
        );
    }
}
