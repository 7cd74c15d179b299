//! Workload specifications
//!
//! A [`WorkloadSpec`] is the task definition registered with the platform:
//! the primary container first, sidecars after it, plus the task-level
//! volumes, placement and sizing. Sizing differs by [`LaunchClass`] and is
//! carried as enum variants rather than optional fields.

pub mod builder;
pub mod sidecars;
pub mod wire;

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::profile::{UlimitConfig, VolumeConfig};

pub use builder::WorkloadSpecBuilder;

/// Where the workload's capacity comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchClass {
    /// Container instances run by the operator; resources sized per container
    #[default]
    SelfManaged,
    /// Serverless capacity (Fargate); resources sized per workload
    ManagedServerless,
}

impl LaunchClass {
    pub fn is_serverless(&self) -> bool {
        matches!(self, LaunchClass::ManagedServerless)
    }
}

/// Opaque identifier of a registered workload spec
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecIdentifier(String);

impl SpecIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete workload specification
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadSpec {
    pub family: String,
    /// Primary container first, sidecars appended
    pub containers: Vec<ContainerSpec>,
    pub volumes: Vec<VolumeConfig>,
    pub placement_constraints: Vec<PlacementConstraint>,
    pub network_mode: Option<String>,
    pub task_role_arn: String,
    pub execution_role_arn: String,
    pub launch: WorkloadLaunch,
}

impl WorkloadSpec {
    pub fn primary(&self) -> Option<&ContainerSpec> {
        self.containers.first()
    }
}

/// Workload-level sizing and capability flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadLaunch {
    /// Containers carry their own limits
    SelfManaged,
    /// Sizing declared once for the whole workload
    ManagedServerless {
        memory: u32,
        cpu: Option<NonZeroU32>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementConstraint {
    pub expression: String,
    pub constraint_type: String,
}

/// One container of a workload
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSpec {
    pub name: String,
    /// `image:tag`
    pub image: String,
    pub essential: bool,
    pub resources: ContainerResources,
    pub command: Vec<String>,
    pub environment: Vec<(String, String)>,
    pub secrets: Vec<SecretRef>,
    pub port_mappings: Vec<u16>,
    pub mount_points: Vec<MountPoint>,
    pub ulimits: Vec<UlimitConfig>,
    pub log_routing: Option<LogRouting>,
}

impl ContainerSpec {
    /// Essential container with no limits and nothing attached
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            essential: true,
            resources: ContainerResources::Unbounded,
            command: Vec::new(),
            environment: Vec::new(),
            secrets: Vec::new(),
            port_mappings: Vec::new(),
            mount_points: Vec::new(),
            ulimits: Vec::new(),
            log_routing: None,
        }
    }
}

/// Per-container resource limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerResources {
    /// Explicit limits, only used on self-managed capacity
    SelfManaged(SelfManagedResources),
    /// No per-container limits; inherited from the workload or unconstrained
    Unbounded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelfManagedResources {
    pub memory: Option<u32>,
    pub memory_reservation: Option<u32>,
    /// Never zero: a zero vCPU setting is omitted
    pub cpu: Option<NonZeroU32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub name: String,
    pub value_from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub source_volume: String,
    pub container_path: String,
}

impl MountPoint {
    /// Parse `source:container-path`, splitting on the first colon
    pub fn parse(pair: &str) -> Self {
        let (source, path) = pair.split_once(':').unwrap_or((pair, ""));
        Self {
            source_volume: source.to_string(),
            container_path: path.to_string(),
        }
    }
}

/// Log destination of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRouting {
    pub group: String,
    pub region: String,
    pub stream_prefix: String,
}

impl LogRouting {
    /// Per-application destination: `/ecs/{cluster}/{app}`
    pub fn for_application(cluster: &str, app: &str, region: &str) -> Self {
        Self {
            group: format!("/ecs/{}/{}", cluster, app),
            region: region.to_string(),
            stream_prefix: app.to_string(),
        }
    }
}
