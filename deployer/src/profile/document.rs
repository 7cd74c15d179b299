//! Profile document as written by operators
//!
//! The document is keyed by environment, then by application key:
//!
//! ```json
//! { "development": { "APP_DEFAULT": { "APP_NAME": "api", "...": "..." } } }
//! ```
//!
//! Environment sections may carry keys that are not applications (for
//! example registry settings); only the requested application entry is
//! deserialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DeployError;
use crate::filesys::file::File;

/// Whole profile document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileDocument {
    pub environments: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl ProfileDocument {
    /// Load the document from a JSON file
    pub async fn load(file: &File) -> Result<Self, DeployError> {
        file.read_json().await
    }

    /// Extract one application entry of one environment
    pub fn application(&self, env: &str, app_key: &str) -> Result<RawProfile, DeployError> {
        let section = self.environments.get(env).ok_or_else(|| {
            DeployError::ConfigError(format!("environment '{}' not found in profile", env))
        })?;
        let entry = section.get(app_key).ok_or_else(|| {
            DeployError::ConfigError(format!(
                "application '{}' not found in environment '{}'",
                app_key, env
            ))
        })?;
        serde_json::from_value(entry.clone()).map_err(|e| {
            DeployError::ConfigError(format!("invalid entry for '{}': {}", app_key, e))
        })
    }
}

/// One application entry, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawProfile {
    pub app_image: Option<String>,
    pub app_name: Option<String>,
    pub app_memory: Option<u32>,
    pub app_cpu: Option<u32>,
    pub app_memory_reservation: Option<u32>,
    pub app_ports: Option<Vec<u16>>,
    pub app_region: Option<String>,
    pub app_account: Option<String>,

    /// List of single-key maps, `[{"KEY": "VALUE"}]`
    #[serde(default)]
    pub app_variables: Vec<BTreeMap<String, serde_json::Value>>,

    /// List of single-key maps from variable name to secret ARN
    #[serde(default)]
    pub app_secrets: Vec<BTreeMap<String, String>>,

    #[serde(default)]
    pub app_command: Vec<serde_json::Value>,

    #[serde(default)]
    pub app_ulimits: Vec<RawUlimit>,

    pub cluster_name: Option<String>,

    /// `"source-volume:container-path"` pairs
    #[serde(default)]
    pub app_mountpoints: Vec<String>,

    #[serde(default)]
    pub efs_config: Vec<RawVolume>,

    /// `[expression, type]` pairs
    #[serde(default)]
    pub constraints: Vec<(String, String)>,

    pub task_arn: Option<String>,
    pub execution_role_arn: Option<String>,
    pub network_mode: Option<String>,
    pub app_capacity_providers: Option<Vec<RawCapacityProvider>>,

    /// Deploy timeout budget in seconds
    pub app_deploy_timeout: Option<u64>,

    #[serde(default)]
    pub extra_config: RawExtraConfig,

    pub webhook_teams: Option<String>,
    pub webhook_google: Option<String>,
    pub webhook_slack: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUlimit {
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "SOFTLIMIT")]
    pub soft_limit: i64,
    #[serde(rename = "HARDLIMIT")]
    pub hard_limit: i64,
}

/// Volume entry. `BIND_HOST` selects a host bind, otherwise the entry
/// describes a network filesystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawVolume {
    pub volume_name: String,
    pub filesystem_id: Option<String>,
    pub root_directory: Option<String>,
    pub access_point_id: Option<String>,
    pub bind_host: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawCapacityProvider {
    pub name: String,
    #[serde(default)]
    pub base: u32,
    #[serde(default)]
    pub weight: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawExtraConfig {
    pub datadog_agent: Option<RawDatadogAgent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDatadogAgent {
    #[serde(rename = "ECS_FARGATE")]
    pub ecs_fargate: Option<serde_json::Value>,
    #[serde(rename = "SITE")]
    pub site: Option<String>,
    #[serde(rename = "LOGS_ENABLED")]
    pub logs_enabled: Option<serde_json::Value>,
    #[serde(rename = "DD_API_KEY")]
    pub api_key: Option<String>,
    #[serde(rename = "APP_MEMORY")]
    pub memory: Option<u32>,
    #[serde(rename = "APP_MEMORY_RESERVATION")]
    pub memory_reservation: Option<u32>,
}
