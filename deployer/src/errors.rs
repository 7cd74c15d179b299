//! Error types for the deployer

use thiserror::Error;

/// Main error type for the deployer
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The platform gateway answered with a non-success status
    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Profile is missing fields required by the requested deploy mode
    #[error("Validation error: required in profile: {}", .missing.join(", "))]
    ValidationError { missing: Vec<String> },

    #[error("Registration error: {0}")]
    RegistrationError(String),

    /// Direct service update did not leave the service active
    #[error("Update rejected: service status is {status}")]
    UpdateRejected { status: String },

    /// Platform reported a terminal non-success status for the rollout
    #[error("Rollout failed with status {status}")]
    RolloutFailed {
        status: String,
        payload: serde_json::Value,
    },

    /// Controller-side deploy timeout budget exceeded
    #[error("Rollout {deployment_id} timed out after {elapsed_secs}s")]
    RolloutTimeout {
        deployment_id: String,
        elapsed_secs: u64,
    },

    #[error("Diagnostics unavailable: {0}")]
    DiagnosticsUnavailable(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployError {
    /// Detail line used for the failure notification of this error
    pub fn notification_detail(&self) -> String {
        match self {
            DeployError::UpdateRejected { .. } => "Failed deploy. Check pipeline logs".to_string(),
            DeployError::RolloutTimeout { .. } => {
                "Timeout in deployment. Stop current deployment".to_string()
            }
            DeployError::RolloutFailed { payload, .. } => payload.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether a failure notification is sent for this error
    pub fn is_notified(&self) -> bool {
        !matches!(
            self,
            DeployError::ValidationError { .. } | DeployError::ConfigError(_)
        )
    }
}

impl From<anyhow::Error> for DeployError {
    fn from(err: anyhow::Error) -> Self {
        DeployError::Internal(err.to_string())
    }
}
