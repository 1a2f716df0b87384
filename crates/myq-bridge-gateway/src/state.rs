//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use myq_bridge_skill::Skill;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// Immutable once built; concurrent requests share it through an `Arc`.
pub struct GatewayState<S>
where
    S: Skill,
{
    /// The skill that answers inbound events.
    pub skill: Arc<S>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<S> GatewayState<S>
where
    S: Skill,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(skill: Arc<S>, config: GatewayConfig) -> Self {
        Self { skill, config }
    }
}

impl<S> Clone for GatewayState<S>
where
    S: Skill,
{
    fn clone(&self) -> Self {
        Self {
            skill: Arc::clone(&self.skill),
            config: self.config.clone(),
        }
    }
}
