//! In-place service update

use colored::Colorize;
use platform_api::ServiceDescription;
use tracing::{error, info};

use crate::app::context::RolloutContext;
use crate::errors::DeployError;
use crate::platform::WorkloadRegistry;
use crate::workload::SpecIdentifier;

const ACTIVE: &str = "ACTIVE";

/// Points the service at the new spec in a single call
pub struct DirectUpdateExecutor<'a> {
    ctx: &'a RolloutContext,
}

impl<'a> DirectUpdateExecutor<'a> {
    pub fn new(ctx: &'a RolloutContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(
        &self,
        registry: &dyn WorkloadRegistry,
        spec_id: &SpecIdentifier,
    ) -> Result<ServiceDescription, DeployError> {
        info!(
            "Updating service {} in cluster {} to {}",
            self.ctx.service(),
            self.ctx.cluster(),
            spec_id
        );

        let service = registry
            .update_service(self.ctx.cluster(), self.ctx.service(), spec_id)
            .await?;

        if service.status != ACTIVE {
            error!("Service {} update rejected: {}", self.ctx.service(), service.status);
            eprintln!(
                "{}",
                format!("Update rejected, service status: {}", service.status).red()
            );
            return Err(DeployError::UpdateRejected {
                status: service.status,
            });
        }

        println!("{}", format!("Service {} updated", self.ctx.service()).green());
        Ok(service)
    }
}
