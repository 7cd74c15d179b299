//! Workload spec construction from a resolved profile

use std::num::NonZeroU32;

use tracing::debug;

use crate::profile::ApplicationProfile;
use crate::workload::sidecars;
use crate::workload::{
    ContainerResources, ContainerSpec, LaunchClass, LogRouting, MountPoint, PlacementConstraint,
    SecretRef, SelfManagedResources, WorkloadLaunch, WorkloadSpec,
};

/// Builds the workload spec for one application and image tag.
///
/// The profile is expected to be resolved already; nothing is validated
/// here.
#[derive(Debug, Clone)]
pub struct WorkloadSpecBuilder<'a> {
    profile: &'a ApplicationProfile,
    launch: LaunchClass,
    tag: String,
    tracing_sidecars: bool,
}

impl<'a> WorkloadSpecBuilder<'a> {
    pub fn new(
        profile: &'a ApplicationProfile,
        launch: LaunchClass,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            launch,
            tag: tag.into(),
            tracing_sidecars: false,
        }
    }

    /// Append the trace collector and metrics agent sidecars
    pub fn with_tracing_sidecars(mut self, enabled: bool) -> Self {
        self.tracing_sidecars = enabled;
        self
    }

    pub fn build(&self) -> WorkloadSpec {
        let profile = self.profile;

        let mut containers = vec![self.primary_container()];
        if let Some(agent) = &profile.datadog_agent {
            containers.push(sidecars::observability_agent(agent, self.launch));
        }
        if self.tracing_sidecars {
            containers.extend(sidecars::tracing_pair(profile));
        }

        let default_role = format!(
            "arn:aws:iam::{}:role/ecs-task-{}-{}",
            profile.account, profile.cluster, profile.region
        );

        let launch = match self.launch {
            LaunchClass::SelfManaged => WorkloadLaunch::SelfManaged,
            LaunchClass::ManagedServerless => WorkloadLaunch::ManagedServerless {
                memory: profile.memory,
                cpu: NonZeroU32::new(profile.cpu),
            },
        };

        let spec = WorkloadSpec {
            family: format!("{}-{}", profile.cluster, profile.name),
            containers,
            volumes: profile.volumes.clone(),
            placement_constraints: profile
                .constraints
                .iter()
                .map(|(expression, constraint_type)| PlacementConstraint {
                    expression: expression.clone(),
                    constraint_type: constraint_type.clone(),
                })
                .collect(),
            network_mode: profile.network_mode.clone(),
            task_role_arn: profile
                .task_role_arn
                .clone()
                .unwrap_or_else(|| default_role.clone()),
            execution_role_arn: profile.execution_role_arn.clone().unwrap_or(default_role),
            launch,
        };
        debug!(
            family = %spec.family,
            containers = spec.containers.len(),
            "built workload spec"
        );
        spec
    }

    fn primary_container(&self) -> ContainerSpec {
        let profile = self.profile;

        let resources = match self.launch {
            LaunchClass::SelfManaged => ContainerResources::SelfManaged(SelfManagedResources {
                memory: Some(profile.memory),
                memory_reservation: profile.memory_reservation,
                cpu: NonZeroU32::new(profile.cpu),
            }),
            LaunchClass::ManagedServerless => ContainerResources::Unbounded,
        };

        ContainerSpec {
            name: profile.name.clone(),
            image: format!("{}:{}", profile.image, self.tag),
            essential: true,
            resources,
            command: profile.command.clone(),
            environment: profile.environment.clone(),
            secrets: profile
                .secrets
                .iter()
                .map(|(name, value_from)| SecretRef {
                    name: name.clone(),
                    value_from: value_from.clone(),
                })
                .collect(),
            port_mappings: profile.ports.clone(),
            mount_points: profile
                .mount_points
                .iter()
                .map(|pair| MountPoint::parse(pair))
                .collect(),
            ulimits: profile.ulimits.clone(),
            log_routing: Some(LogRouting::for_application(
                &profile.cluster,
                &profile.name,
                &profile.region,
            )),
        }
    }
}
