//! HTTP surface of clipstream: routing, extractors, services, and setup.
//!
//! Exposed as a library so integration tests can build the router against
//! in-memory backends.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;
