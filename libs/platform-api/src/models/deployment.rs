//! Blue/green deployment models

use serde::{Deserialize, Serialize};

/// Create deployment request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    pub application_name: String,
    pub deployment_group_name: String,
    pub deployment_config_name: String,
    pub description: String,
    pub revision: Revision,
    pub auto_rollback_configuration: AutoRollbackConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub revision_type: String,
    pub app_spec_content: AppSpecContent,
}

/// Serialized AppSpec document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSpecContent {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoRollbackConfiguration {
    pub enabled: bool,
    pub events: Vec<String>,
}

/// Create deployment response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentResponse {
    pub deployment_id: String,
}

/// Get deployment response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeploymentResponse {
    pub deployment_info: DeploymentInfo,
}

/// Deployment status as reported by the platform.
///
/// Every field besides the status is kept verbatim so that failure
/// reports can carry the full payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInfo {
    #[serde(default)]
    pub deployment_id: String,
    pub status: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Stop deployment request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDeploymentRequest {
    pub auto_rollback_enabled: bool,
}

/// Stop deployment response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDeploymentResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// AppSpec document for an ECS blue/green deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSpec {
    pub version: u32,
    #[serde(rename = "Resources")]
    pub resources: Vec<AppSpecResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSpecResource {
    pub target_service: TargetService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetService {
    #[serde(rename = "Type")]
    pub service_type: String,
    pub properties: TargetServiceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetServiceProperties {
    pub task_definition: String,
    pub load_balancer_info: LoadBalancerInfo,
    pub capacity_provider_strategy: Vec<CapacityProviderStrategyItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerInfo {
    pub container_name: String,
    pub container_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapacityProviderStrategyItem {
    pub capacity_provider: String,
    pub base: u32,
    pub weight: u32,
}
