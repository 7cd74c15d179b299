//! Finite state machine for a progressive rollout attempt

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::workload::SpecIdentifier;

/// Rollout status as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutStatus {
    /// Accepted, not started yet
    Created,

    /// Traffic shifting in progress
    InProgress,

    /// Completed successfully
    Succeeded,

    /// Failed on the platform side
    Failed,

    /// Stopped, by the controller or an operator
    Stopped,

    /// Any other status string the platform reports
    Unknown(String),
}

impl RolloutStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "Created" => RolloutStatus::Created,
            "InProgress" => RolloutStatus::InProgress,
            "Succeeded" => RolloutStatus::Succeeded,
            "Failed" => RolloutStatus::Failed,
            "Stopped" => RolloutStatus::Stopped,
            other => RolloutStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RolloutStatus::Created => "Created",
            RolloutStatus::InProgress => "InProgress",
            RolloutStatus::Succeeded => "Succeeded",
            RolloutStatus::Failed => "Failed",
            RolloutStatus::Stopped => "Stopped",
            RolloutStatus::Unknown(s) => s,
        }
    }

    /// Still being worked on; the controller keeps polling
    pub fn is_active(&self) -> bool {
        matches!(self, RolloutStatus::Created | RolloutStatus::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for RolloutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rollout attempt, tracked from creation until a terminal status
#[derive(Debug, Clone)]
pub struct RolloutAttempt {
    id: String,
    spec_id: SpecIdentifier,
    status: RolloutStatus,
    elapsed: Duration,
    timeout: Duration,
}

impl RolloutAttempt {
    /// Create a new attempt in created state
    pub fn new(id: impl Into<String>, spec_id: SpecIdentifier, timeout: Duration) -> Self {
        Self {
            id: id.into(),
            spec_id,
            status: RolloutStatus::Created,
            elapsed: Duration::ZERO,
            timeout,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spec_id(&self) -> &SpecIdentifier {
        &self.spec_id
    }

    /// Get current status
    pub fn status(&self) -> &RolloutStatus {
        &self.status
    }

    /// Time accumulated over poll intervals, not wall-clock time
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Account for one poll interval
    pub fn advance(&mut self, interval: Duration) {
        self.elapsed += interval;
    }

    /// Timeout budget exceeded while the platform is still working
    pub fn is_timed_out(&self) -> bool {
        self.elapsed > self.timeout && self.status.is_active()
    }

    /// Record a status observed on the platform
    pub fn observe(&mut self, observed: RolloutStatus) -> Result<(), String> {
        // Terminal states are final; active ones follow the latest fetch
        let valid = self.status.is_active() || self.status == observed;

        if !valid {
            return Err(format!(
                "Invalid transition: {} -> {}",
                self.status, observed
            ));
        }

        self.status = observed;
        Ok(())
    }

    /// Controller-side stop after the timeout budget ran out
    pub fn mark_stopped(&mut self) -> Result<(), String> {
        if self.status.is_terminal() {
            return Err(format!("Invalid transition: {} -> Stopped", self.status));
        }
        self.status = RolloutStatus::Stopped;
        Ok(())
    }
}
