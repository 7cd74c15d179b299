//! Platform gateway endpoints

use async_trait::async_trait;
use platform_api::{
    CreateDeploymentRequest, CreateDeploymentResponse, DeploymentInfo, GetDeploymentResponse,
    LogEvents, RegisterTaskDefinitionResponse, ServiceDescription, StopDeploymentRequest,
    StopDeploymentResponse, TaskDetails, UpdateServiceRequest,
};
use tracing::debug;

use crate::errors::DeployError;
use crate::platform::client::HttpPlatformClient;
use crate::platform::{DiagnosticsApi, EventFeed, RolloutApi, WorkloadRegistry};
use crate::workload::{SpecIdentifier, WorkloadSpec};

#[async_trait]
impl WorkloadRegistry for HttpPlatformClient {
    async fn register(&self, spec: &WorkloadSpec) -> Result<SpecIdentifier, DeployError> {
        let url = self.endpoint(&["task-definitions"]);
        let response: RegisterTaskDefinitionResponse = self
            .post(url, &spec.to_request())
            .await
            .map_err(|e| DeployError::RegistrationError(e.to_string()))?;
        debug!("Registered {} as {}", spec.family, response.task_definition_arn);
        Ok(SpecIdentifier::new(response.task_definition_arn))
    }

    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        spec_id: &SpecIdentifier,
    ) -> Result<ServiceDescription, DeployError> {
        let url = self.endpoint(&["clusters", cluster, "services", service]);
        let request = UpdateServiceRequest {
            task_definition: spec_id.as_str().to_string(),
        };
        self.put(url, &request).await
    }
}

#[async_trait]
impl RolloutApi for HttpPlatformClient {
    async fn create_rollout(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<String, DeployError> {
        let url = self.endpoint(&["deployments"]);
        let response: CreateDeploymentResponse = self.post(url, request).await?;
        Ok(response.deployment_id)
    }

    async fn get_rollout(&self, rollout_id: &str) -> Result<DeploymentInfo, DeployError> {
        let url = self.endpoint(&["deployments", rollout_id]);
        let response: GetDeploymentResponse = self.get(url, &[]).await?;
        Ok(response.deployment_info)
    }

    async fn stop_rollout(
        &self,
        rollout_id: &str,
        auto_rollback: bool,
    ) -> Result<StopDeploymentResponse, DeployError> {
        let url = self.endpoint(&["deployments", rollout_id, "stop"]);
        let request = StopDeploymentRequest {
            auto_rollback_enabled: auto_rollback,
        };
        self.post(url, &request).await
    }
}

#[async_trait]
impl EventFeed for HttpPlatformClient {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceDescription, DeployError> {
        let url = self.endpoint(&["clusters", cluster, "services", service]);
        self.get(url, &[]).await
    }
}

#[async_trait]
impl DiagnosticsApi for HttpPlatformClient {
    async fn task_details(
        &self,
        cluster: &str,
        task_arn: &str,
    ) -> Result<TaskDetails, DeployError> {
        let url = self.endpoint(&["clusters", cluster, "tasks"]);
        self.get(url, &[("arn", task_arn.to_string())]).await
    }

    async fn log_events(
        &self,
        group: &str,
        stream: &str,
        limit: u32,
        from_tail: bool,
    ) -> Result<LogEvents, DeployError> {
        let url = self.endpoint(&["log-groups", "events"]);
        let query = [
            ("group", group.to_string()),
            ("stream", stream.to_string()),
            ("limit", limit.to_string()),
            ("from_tail", from_tail.to_string()),
        ];
        self.get(url, &query).await
    }
}
