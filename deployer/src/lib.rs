//! Oni Deployer Library
//!
//! Registers container workload specs and rolls them out to a container
//! service, either in place or through a blue/green rollout.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod logs;
pub mod notify;
pub mod platform;
pub mod profile;
pub mod utils;
pub mod workload;
