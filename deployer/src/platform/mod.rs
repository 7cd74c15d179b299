//! Container platform collaborators
//!
//! The deploy components only talk to the platform through these traits.
//! [`client::HttpPlatformClient`] implements all of them against the
//! platform gateway; tests substitute recording fakes.

pub mod api;
pub mod client;
pub mod credentials;

use async_trait::async_trait;
use platform_api::{
    CreateDeploymentRequest, DeploymentInfo, LogEvents, ServiceDescription,
    StopDeploymentResponse, TaskDetails,
};

use crate::errors::DeployError;
use crate::workload::{SpecIdentifier, WorkloadSpec};

pub use client::HttpPlatformClient;
pub use credentials::CredentialBundle;

/// Task definition registration and in-place service updates
#[async_trait]
pub trait WorkloadRegistry: Send + Sync {
    /// Register a spec; the returned identifier is immutable
    async fn register(&self, spec: &WorkloadSpec) -> Result<SpecIdentifier, DeployError>;

    /// Point a service at a registered spec
    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        spec_id: &SpecIdentifier,
    ) -> Result<ServiceDescription, DeployError>;
}

/// Blue/green deployments
#[async_trait]
pub trait RolloutApi: Send + Sync {
    /// Submit a deployment, returning its identifier
    async fn create_rollout(&self, request: &CreateDeploymentRequest)
        -> Result<String, DeployError>;

    async fn get_rollout(&self, rollout_id: &str) -> Result<DeploymentInfo, DeployError>;

    async fn stop_rollout(
        &self,
        rollout_id: &str,
        auto_rollback: bool,
    ) -> Result<StopDeploymentResponse, DeployError>;
}

/// Service event feed
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceDescription, DeployError>;
}

/// Post-failure task inspection
#[async_trait]
pub trait DiagnosticsApi: Send + Sync {
    async fn task_details(&self, cluster: &str, task_arn: &str)
        -> Result<TaskDetails, DeployError>;

    async fn log_events(
        &self,
        group: &str,
        stream: &str,
        limit: u32,
        from_tail: bool,
    ) -> Result<LogEvents, DeployError>;
}

/// Everything a deploy run needs from the platform
pub trait Platform: WorkloadRegistry + RolloutApi + EventFeed + DiagnosticsApi {}

impl<T> Platform for T where T: WorkloadRegistry + RolloutApi + EventFeed + DiagnosticsApi {}
