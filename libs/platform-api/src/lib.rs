//! Platform gateway API
//!
//! Request and response models exchanged with the container platform
//! gateway: task definition registration, services and their event feed,
//! blue/green deployments and post-failure diagnostics.

pub mod models;

pub use models::*;
