//! Core types for myq-bridge.
//!
//! This crate provides the identifiers shared by the MyQ client and the
//! skill translator:
//!
//! - **`DeviceId`**: the opaque MyQ device identifier that is handed to the
//!   voice assistant at discovery and handed back on every control request
//! - **`MessageId`**: the assistant's per-request message identifier, echoed
//!   in every response header
//!
//! # Example
//!
//! ```
//! use myq_bridge_core::{DeviceId, MessageId};
//!
//! let device_id = DeviceId::new("1234567").unwrap();
//! assert_eq!(device_id.as_str(), "1234567");
//!
//! let message_id = MessageId::from("6d6d6e14-8aee-473e-8c24-0d31ff9c17a2");
//! assert_eq!(message_id.to_string(), "6d6d6e14-8aee-473e-8c24-0d31ff9c17a2");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;

pub use ids::{DeviceId, IdError, MessageId};
