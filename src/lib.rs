//! OCR extraction relay server.
//!
//! Accepts an uploaded image, extracts its text through an external OCR
//! provider, forwards the text to an external workflow provider that returns
//! a structured summary, and normalizes both providers' responses into one
//! JSON contract.
//!
//! The pipeline per request is strictly sequential: prepare the image, call
//! the OCR provider, call the workflow provider with the detected text. No
//! state outlives a request and nothing is retried.

pub mod config;
pub mod error;
pub mod image_prep;
pub mod orchestrator;
pub mod providers;
pub mod server;
