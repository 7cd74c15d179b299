//! Service models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Update service request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub task_definition: String,
}

/// Service description, returned by both update and describe calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub events: Vec<ServiceEvent>,
    #[serde(default)]
    pub task_arns: Vec<String>,
}

/// Progress message emitted by the platform for a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEvent {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
}
