//! Gridlens API library
//!
//! HTTP surface for the image ingestion pipeline. Exposed as a library
//! so integration tests can build the router against injected backends.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
