//! Outbound provider clients.
//!
//! Both clients hold an optional credential so the server can boot without
//! one; the orchestrator checks configuration before dispatching. Non-2xx
//! provider responses are mirrored into [`crate::error::ExtractError`] with
//! the provider's status code and body.

pub mod vision;
pub mod workflow;
