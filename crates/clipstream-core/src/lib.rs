//! Core domain types for clipstream: the video catalog model, the byte-range
//! model, collaborator traits, configuration, and the shared error taxonomy.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod range;

pub use auth::{CallerContext, CallerRole};
pub use catalog::{TagIndex, VideoCatalog};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
