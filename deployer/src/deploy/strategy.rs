//! Rollout strategy selection

use crate::app::options::DeployMode;

/// How a registered workload spec reaches the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutStrategy {
    /// Registration only; the service is left untouched
    RegisterOnly,
    /// In-place service update
    DirectUpdate,
    /// Blue/green rollout behind the load balancer
    Progressive,
}

impl RolloutStrategy {
    pub fn select(mode: &DeployMode) -> Self {
        match (mode.register_only, mode.load_balanced) {
            (true, _) => RolloutStrategy::RegisterOnly,
            (false, false) => RolloutStrategy::DirectUpdate,
            (false, true) => RolloutStrategy::Progressive,
        }
    }
}
