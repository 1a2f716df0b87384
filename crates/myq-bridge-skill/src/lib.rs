//! Voice-assistant skill for Liftmaster MyQ garage doors.
//!
//! This crate turns smart home Discovery and Control events into MyQ cloud
//! calls and builds the response envelopes the assistant expects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Gateway (HTTP webhook)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  Event
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SkillService                          │
//! │  ┌─────────────────────────┐ ┌─────────────────────────┐    │
//! │  │  Discovery              │ │  Control                │    │
//! │  │  login → list → filter  │ │  login → write state    │    │
//! │  └─────────────────────────┘ └─────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                    ┌───────────────────┐
//!                    │  MyqClient (HTTP) │
//!                    └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use myq_bridge_client::{Credentials, HttpMyqClient, MyqConfig};
//! use myq_bridge_skill::{Event, Skill, SkillService};
//!
//! # async fn example(event: Event) -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(HttpMyqClient::new(MyqConfig::default())?);
//! let credentials = Credentials::new("owner@example.com", "secret".to_string());
//! let skill = SkillService::with_defaults(client, credentials);
//!
//! let response = skill.handle(event).await?;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```
//!
//! Each call to [`Skill::handle`] logs in to MyQ afresh. Nothing is cached
//! between events.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod appliance;
pub mod envelope;
pub mod error;
pub mod service;
pub mod types;

pub use envelope::{ApplianceAction, ApplianceDescriptor, Response, ResponseHeader, ResponsePayload};
pub use error::{Failure, Result, SkillError};
pub use service::{Skill, SkillService};
pub use types::{ControlCommand, Event, EventHeader, Namespace, SkillConfig};

// Re-export commonly used types from dependencies for convenience
pub use myq_bridge_core::{DeviceId, MessageId};
