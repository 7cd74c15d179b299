//! Conversion of workload specs into platform registration requests

use std::collections::BTreeMap;

use platform_api::{
    ContainerDefinition, EfsAuthorizationConfig, EfsVolumeConfiguration, HostVolumeProperties,
    KeyValuePair, LogConfiguration, PortMapping, RegisterTaskDefinitionRequest, Secret, Ulimit,
    Volume,
};

use crate::profile::{VolumeConfig, VolumeSource};
use crate::workload::{ContainerResources, ContainerSpec, LogRouting, WorkloadLaunch, WorkloadSpec};

const LOG_DRIVER: &str = "awslogs";
const FARGATE_COMPATIBILITY: &str = "FARGATE";

impl WorkloadSpec {
    /// Registration request for this spec
    pub fn to_request(&self) -> RegisterTaskDefinitionRequest {
        let (memory, cpu, requires_compatibilities) = match &self.launch {
            WorkloadLaunch::SelfManaged => (None, None, Vec::new()),
            WorkloadLaunch::ManagedServerless { memory, cpu } => (
                Some(*memory),
                cpu.map(|c| c.get()),
                vec![FARGATE_COMPATIBILITY.to_string()],
            ),
        };

        RegisterTaskDefinitionRequest {
            family: self.family.clone(),
            container_definitions: self
                .containers
                .iter()
                .map(ContainerSpec::to_definition)
                .collect(),
            execution_role_arn: self.execution_role_arn.clone(),
            task_role_arn: self.task_role_arn.clone(),
            placement_constraints: self
                .placement_constraints
                .iter()
                .map(|c| platform_api::PlacementConstraint {
                    expression: c.expression.clone(),
                    constraint_type: c.constraint_type.clone(),
                })
                .collect(),
            volumes: self.volumes.iter().map(volume_to_wire).collect(),
            network_mode: self.network_mode.clone(),
            memory,
            cpu,
            requires_compatibilities,
        }
    }
}

impl ContainerSpec {
    pub fn to_definition(&self) -> ContainerDefinition {
        let (memory, memory_reservation, cpu) = match &self.resources {
            ContainerResources::SelfManaged(res) => {
                (res.memory, res.memory_reservation, res.cpu.map(|c| c.get()))
            }
            ContainerResources::Unbounded => (None, None, None),
        };

        ContainerDefinition {
            name: self.name.clone(),
            image: self.image.clone(),
            essential: self.essential,
            memory,
            memory_reservation,
            cpu,
            command: self.command.clone(),
            environment: self
                .environment
                .iter()
                .map(|(name, value)| KeyValuePair {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
            secrets: self
                .secrets
                .iter()
                .map(|s| Secret {
                    name: s.name.clone(),
                    value_from: s.value_from.clone(),
                })
                .collect(),
            port_mappings: self
                .port_mappings
                .iter()
                .map(|&container_port| PortMapping { container_port })
                .collect(),
            mount_points: self
                .mount_points
                .iter()
                .map(|mp| platform_api::MountPoint {
                    source_volume: mp.source_volume.clone(),
                    container_path: mp.container_path.clone(),
                })
                .collect(),
            ulimits: self
                .ulimits
                .iter()
                .map(|u| Ulimit {
                    name: u.name.clone(),
                    soft_limit: u.soft_limit,
                    hard_limit: u.hard_limit,
                })
                .collect(),
            log_configuration: self.log_routing.as_ref().map(log_configuration),
        }
    }
}

fn log_configuration(routing: &LogRouting) -> LogConfiguration {
    let mut options = BTreeMap::new();
    options.insert("awslogs-group".to_string(), routing.group.clone());
    options.insert("awslogs-region".to_string(), routing.region.clone());
    options.insert("awslogs-stream-prefix".to_string(), routing.stream_prefix.clone());
    LogConfiguration {
        log_driver: LOG_DRIVER.to_string(),
        options,
    }
}

fn volume_to_wire(volume: &VolumeConfig) -> Volume {
    match &volume.source {
        VolumeSource::HostBind { source_path } => Volume {
            name: volume.name.clone(),
            host: Some(HostVolumeProperties {
                source_path: source_path.clone(),
            }),
            efs_volume_configuration: None,
        },
        VolumeSource::NetworkFilesystem {
            file_system_id,
            root_directory,
            access_point_id,
        } => Volume {
            name: volume.name.clone(),
            host: None,
            efs_volume_configuration: Some(EfsVolumeConfiguration {
                file_system_id: file_system_id.clone(),
                root_directory: root_directory.clone(),
                transit_encryption: "ENABLED".to_string(),
                authorization_config: EfsAuthorizationConfig {
                    access_point_id: access_point_id.clone(),
                },
            }),
        },
    }
}
