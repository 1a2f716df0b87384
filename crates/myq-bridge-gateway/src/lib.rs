//! HTTP webhook gateway for the MyQ voice-assistant bridge.
//!
//! This crate exposes the skill over HTTP. It handles:
//!
//! - Parsing inbound events from the assistant integration
//! - Mapping skill failures onto HTTP responses
//! - Request tracing and body limits
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Voice assistant integration                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  POST /v1/events
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    myq-bridge-gateway                        │
//! │        Router + Handlers  ──▶  SkillService  ──▶  MyQ        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use myq_bridge_client::{Credentials, HttpMyqClient, MyqConfig};
//! use myq_bridge_gateway::{create_router, GatewayConfig, GatewayState};
//! use myq_bridge_skill::SkillService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(HttpMyqClient::new(MyqConfig::default())?);
//! let credentials = Credentials::new("owner@example.com", "secret".to_string());
//! let skill = Arc::new(SkillService::with_defaults(client, credentials));
//!
//! let state = GatewayState::new(skill, GatewayConfig::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
