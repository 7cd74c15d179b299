//! API models

use serde::{Deserialize, Serialize};

pub mod deployment;
pub mod diagnostics;
pub mod service;
pub mod task_definition;

pub use deployment::*;
pub use diagnostics::*;
pub use service::*;
pub use task_definition::*;

/// Error document returned by the gateway on a non-success status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
