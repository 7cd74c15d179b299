//! Per-run rollout context

use crate::app::options::{ControllerSettings, DeployMode};
use crate::profile::ApplicationProfile;

/// Immutable inputs of one deploy run, handed to every component
#[derive(Debug, Clone)]
pub struct RolloutContext {
    pub profile: ApplicationProfile,
    pub mode: DeployMode,
    pub tag: String,
    pub settings: ControllerSettings,
}

impl RolloutContext {
    pub fn new(
        profile: ApplicationProfile,
        mode: DeployMode,
        tag: impl Into<String>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            profile,
            mode,
            tag: tag.into(),
            settings,
        }
    }

    pub fn cluster(&self) -> &str {
        &self.profile.cluster
    }

    /// Service name, which is the application name
    pub fn service(&self) -> &str {
        &self.profile.name
    }

    /// Application and deployment group name used by blue/green rollouts
    pub fn rollout_group(&self) -> String {
        format!("{}-{}", self.profile.cluster, self.profile.name)
    }

    /// Port the load balancer targets, the first profile port
    pub fn target_port(&self) -> Option<u16> {
        self.profile.ports.first().copied()
    }
}
