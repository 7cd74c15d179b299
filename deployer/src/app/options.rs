//! Deploy run options

use std::time::Duration;

use crate::notify::Channel;
use crate::workload::LaunchClass;

/// What the caller asked for on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployMode {
    pub launch: LaunchClass,

    /// Service sits behind a load balancer; selects the progressive rollout
    pub load_balanced: bool,

    /// Stop after registering the workload spec
    pub register_only: bool,

    /// Append the trace collector and metrics agent sidecars
    pub tracing_sidecars: bool,

    /// Notification channel, none when notifications are off
    pub channel: Option<Channel>,
}

impl Default for DeployMode {
    fn default() -> Self {
        Self {
            launch: LaunchClass::SelfManaged,
            load_balanced: true,
            register_only: false,
            tracing_sidecars: false,
            channel: None,
        }
    }
}

/// Progressive rollout controller settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Delay between two status polls
    pub poll_interval: Duration,

    /// Delay between the timeout stop and the diagnostics fetch
    pub drain_interval: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            drain_interval: Duration::from_secs(10),
        }
    }
}

/// Everything needed to deploy one application
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Key of the application in the profile document
    pub app_key: String,

    /// Image tag to deploy
    pub tag: String,

    pub mode: DeployMode,

    pub controller: ControllerSettings,
}
