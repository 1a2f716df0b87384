//! Inbound event endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use myq_bridge_skill::{Event, Response, Skill, SkillError};

use crate::error::ApiError;
use crate::state::GatewayState;

/// Handle one inbound event.
///
/// A body that is not a valid event fails with the generic message and
/// status `400`.
///
/// # Example
///
/// ```text
/// POST /v1/events
/// {"header": {"namespace": "Alexa.ConnectedHome.Discovery", ...}}
///
/// Response: 200 OK
/// {"header": {"name": "DiscoverAppliancesResponse", ...}, "payload": {...}}
/// ```
pub async fn handle_event<S>(
    State(state): State<Arc<GatewayState<S>>>,
    body: Bytes,
) -> Result<Json<Response>, ApiError>
where
    S: Skill + 'static,
{
    let event: Event = serde_json::from_slice(&body)
        .map_err(|e| SkillError::MalformedEvent(e.to_string()))?;

    tracing::info!(
        namespace = %event.header.namespace,
        name = %event.header.name,
        message_id = %event.header.message_id,
        "Handling event"
    );

    let response = state.skill.handle(event).await?;
    Ok(Json(response))
}
