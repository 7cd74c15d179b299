//! Application profiles
//!
//! [`RawProfile`] is what the operator wrote; [`ApplicationProfile`] is the
//! validated, immutable view the deploy components consume. Resolution
//! checks every field the requested [`DeployMode`] needs and reports all
//! missing ones at once, before anything is sent to the platform.

pub mod document;
pub mod sample;

use std::time::Duration;

use crate::app::options::DeployMode;
use crate::errors::DeployError;
use crate::notify::Channel;
use crate::utils::json_scalar_to_string;
use crate::workload::LaunchClass;

pub use document::{ProfileDocument, RawProfile};

/// Deploy timeout applied when the profile does not set one
pub const DEFAULT_DEPLOY_TIMEOUT: Duration = Duration::from_secs(600);

/// Resolved application profile
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationProfile {
    /// Key of the entry in the profile document, e.g. `APP_DEFAULT`
    pub key: String,
    pub name: String,
    pub image: String,
    pub region: String,
    pub account: String,
    pub cluster: String,
    pub memory: u32,
    pub memory_reservation: Option<u32>,
    /// vCPU units, 0 when unset
    pub cpu: u32,
    pub ports: Vec<u16>,
    pub environment: Vec<(String, String)>,
    pub secrets: Vec<(String, String)>,
    pub command: Vec<String>,
    pub ulimits: Vec<UlimitConfig>,
    pub mount_points: Vec<String>,
    pub volumes: Vec<VolumeConfig>,
    pub constraints: Vec<(String, String)>,
    pub task_role_arn: Option<String>,
    pub execution_role_arn: Option<String>,
    pub network_mode: Option<String>,
    pub capacity_providers: Vec<CapacityProvider>,
    pub deploy_timeout: Duration,
    pub datadog_agent: Option<DatadogAgentConfig>,
    pub webhooks: Webhooks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlimitConfig {
    pub name: String,
    pub soft_limit: i64,
    pub hard_limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeConfig {
    pub name: String,
    pub source: VolumeSource,
}

/// Backing store of a volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeSource {
    /// Path on the container host
    HostBind { source_path: String },
    /// Managed network filesystem
    NetworkFilesystem {
        file_system_id: String,
        root_directory: String,
        access_point_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityProvider {
    pub name: String,
    pub base: u32,
    pub weight: u32,
}

/// Observability agent sidecar settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatadogAgentConfig {
    /// Value for `ECS_FARGATE`; follows the launch class when not set
    pub ecs_fargate: Option<String>,
    pub site: String,
    pub logs_enabled: String,
    /// Secret ARN holding the API key
    pub api_key: String,
    pub memory: Option<u32>,
    pub memory_reservation: Option<u32>,
}

/// Notification webhook URLs, one per channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Webhooks {
    pub teams: Option<String>,
    pub google: Option<String>,
    pub slack: Option<String>,
}

impl Webhooks {
    pub fn for_channel(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Teams => self.teams.as_deref(),
            Channel::Google => self.google.as_deref(),
            Channel::Slack => self.slack.as_deref(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawProfile {
    /// Validate against the deploy mode and build the resolved profile
    pub fn resolve(self, key: &str, mode: &DeployMode) -> Result<ApplicationProfile, DeployError> {
        let mut missing: Vec<String> = Vec::new();
        let mut require = |field: &str, present: bool| {
            if !present {
                missing.push(field.to_string());
            }
        };

        let image = non_empty(self.app_image);
        let name = non_empty(self.app_name);
        let region = non_empty(self.app_region);
        let account = non_empty(self.app_account);
        let cluster = non_empty(self.cluster_name);

        require("APP_IMAGE", image.is_some());
        require("APP_NAME", name.is_some());
        require("APP_MEMORY", self.app_memory.is_some());
        require("APP_REGION", region.is_some());
        require("APP_ACCOUNT", account.is_some());
        require("CLUSTER_NAME", cluster.is_some());
        require("APP_CAPACITY_PROVIDERS", self.app_capacity_providers.is_some());

        if mode.load_balanced {
            require(
                "APP_PORTS",
                self.app_ports.as_ref().is_some_and(|ports| !ports.is_empty()),
            );
        }

        match mode.launch {
            LaunchClass::ManagedServerless => require("APP_CPU", self.app_cpu.is_some()),
            LaunchClass::SelfManaged => {
                require("APP_MEMORY_RESERVATION", self.app_memory_reservation.is_some())
            }
        }

        let webhooks = Webhooks {
            teams: non_empty(self.webhook_teams),
            google: non_empty(self.webhook_google),
            slack: non_empty(self.webhook_slack),
        };
        if let Some(channel) = mode.channel {
            require(
                &format!("WEBHOOK_{}", channel.as_str().to_uppercase()),
                webhooks.for_channel(channel).is_some(),
            );
        }

        let mut volumes = Vec::with_capacity(self.efs_config.len());
        for (idx, volume) in self.efs_config.into_iter().enumerate() {
            let source = match non_empty(volume.bind_host) {
                Some(source_path) => VolumeSource::HostBind { source_path },
                None => match non_empty(volume.filesystem_id) {
                    Some(file_system_id) => VolumeSource::NetworkFilesystem {
                        file_system_id,
                        root_directory: non_empty(volume.root_directory)
                            .unwrap_or_else(|| "/".to_string()),
                        access_point_id: non_empty(volume.access_point_id),
                    },
                    None => {
                        require(&format!("EFS_CONFIG[{}].FILESYSTEM_ID", idx), false);
                        continue;
                    }
                },
            };
            volumes.push(VolumeConfig {
                name: volume.volume_name,
                source,
            });
        }

        let datadog_agent = match self.extra_config.datadog_agent {
            Some(agent) => {
                let site = non_empty(agent.site);
                let api_key = non_empty(agent.api_key);
                require("EXTRA_CONFIG.DATADOG_AGENT.SITE", site.is_some());
                require("EXTRA_CONFIG.DATADOG_AGENT.DD_API_KEY", api_key.is_some());
                Some(DatadogAgentConfig {
                    ecs_fargate: agent.ecs_fargate.as_ref().map(json_scalar_to_string),
                    site: site.unwrap_or_default(),
                    logs_enabled: agent
                        .logs_enabled
                        .as_ref()
                        .map(json_scalar_to_string)
                        .unwrap_or_else(|| "true".to_string()),
                    api_key: api_key.unwrap_or_default(),
                    memory: agent.memory,
                    memory_reservation: agent.memory_reservation,
                })
            }
            None => None,
        };

        for (idx, pair) in self.app_mountpoints.iter().enumerate() {
            require(&format!("APP_MOUNTPOINTS[{}] as source:path", idx), pair.contains(':'));
        }

        if !missing.is_empty() {
            return Err(DeployError::ValidationError { missing });
        }

        let environment = self
            .app_variables
            .iter()
            .flat_map(|item| item.iter())
            .map(|(k, v)| (k.clone(), json_scalar_to_string(v)))
            .collect();
        let secrets = self
            .app_secrets
            .into_iter()
            .flat_map(|item| item.into_iter())
            .collect();

        Ok(ApplicationProfile {
            key: key.to_string(),
            name: name.unwrap_or_default(),
            image: image.unwrap_or_default(),
            region: region.unwrap_or_default(),
            account: account.unwrap_or_default(),
            cluster: cluster.unwrap_or_default(),
            memory: self.app_memory.unwrap_or_default(),
            memory_reservation: self.app_memory_reservation,
            cpu: self.app_cpu.unwrap_or(0),
            ports: self.app_ports.unwrap_or_default(),
            environment,
            secrets,
            command: self.app_command.iter().map(json_scalar_to_string).collect(),
            ulimits: self
                .app_ulimits
                .into_iter()
                .map(|u| UlimitConfig {
                    name: u.name,
                    soft_limit: u.soft_limit,
                    hard_limit: u.hard_limit,
                })
                .collect(),
            mount_points: self.app_mountpoints,
            volumes,
            constraints: self.constraints,
            task_role_arn: non_empty(self.task_arn),
            execution_role_arn: non_empty(self.execution_role_arn),
            network_mode: non_empty(self.network_mode),
            capacity_providers: self
                .app_capacity_providers
                .unwrap_or_default()
                .into_iter()
                .map(|c| CapacityProvider {
                    name: c.name,
                    base: c.base,
                    weight: c.weight,
                })
                .collect(),
            deploy_timeout: self
                .app_deploy_timeout
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_DEPLOY_TIMEOUT),
            datadog_agent,
            webhooks,
        })
    }
}
