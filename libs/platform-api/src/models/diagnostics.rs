//! Task and log diagnostics models

use serde::{Deserialize, Serialize};

/// Task details response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    #[serde(default)]
    pub task_arn: String,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub containers: Vec<TaskContainer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContainer {
    pub name: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

/// Log events response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEvents {
    #[serde(default)]
    pub events: Vec<LogEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub message: String,
}
