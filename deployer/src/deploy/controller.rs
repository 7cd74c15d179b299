//! Progressive (blue/green) rollout controller

use std::future::Future;
use std::time::Duration;

use colored::Colorize;
use platform_api::{
    AppSpec, AppSpecContent, AppSpecResource, AutoRollbackConfiguration,
    CapacityProviderStrategyItem, CreateDeploymentRequest, DeploymentInfo, LoadBalancerInfo,
    Revision, TargetService, TargetServiceProperties,
};
use tracing::{debug, error, info, warn};

use crate::app::context::RolloutContext;
use crate::deploy::diagnostics::DiagnosticsCollector;
use crate::deploy::events::EventStreamMonitor;
use crate::deploy::fsm::{RolloutAttempt, RolloutStatus};
use crate::errors::DeployError;
use crate::platform::Platform;
use crate::workload::SpecIdentifier;

pub const DEPLOYMENT_CONFIG: &str = "CodeDeployDefault.ECSAllAtOnce";
const REVISION_TYPE: &str = "AppSpecContent";
const SERVICE_TYPE: &str = "AWS::ECS::Service";
const ROLLBACK_EVENTS: [&str; 1] = ["DEPLOYMENT_FAILURE"];

/// Console page of a rollout
pub fn console_link(region: &str, rollout_id: &str) -> String {
    format!(
        "https://{}.console.aws.amazon.com/codesuite/codedeploy/deployments/{}",
        region, rollout_id
    )
}

/// Drives one blue/green rollout from creation to a terminal status
pub struct ProgressiveRolloutController<'a, S> {
    ctx: &'a RolloutContext,
    sleep_fn: S,
}

impl<'a, S, F> ProgressiveRolloutController<'a, S>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    pub fn new(ctx: &'a RolloutContext, sleep_fn: S) -> Self {
        Self { ctx, sleep_fn }
    }

    /// AppSpec document targeting the primary container
    pub fn app_spec(&self, spec_id: &SpecIdentifier) -> Result<AppSpec, DeployError> {
        let profile = &self.ctx.profile;
        let container_port = self.ctx.target_port().ok_or_else(|| DeployError::ValidationError {
            missing: vec!["APP_PORTS".to_string()],
        })?;

        Ok(AppSpec {
            version: 1,
            resources: vec![AppSpecResource {
                target_service: TargetService {
                    service_type: SERVICE_TYPE.to_string(),
                    properties: TargetServiceProperties {
                        task_definition: spec_id.as_str().to_string(),
                        load_balancer_info: LoadBalancerInfo {
                            container_name: profile.name.clone(),
                            container_port,
                        },
                        capacity_provider_strategy: profile
                            .capacity_providers
                            .iter()
                            .map(|p| CapacityProviderStrategyItem {
                                capacity_provider: p.name.clone(),
                                base: p.base,
                                weight: p.weight,
                            })
                            .collect(),
                    },
                },
            }],
        })
    }

    pub fn rollout_request(
        &self,
        spec_id: &SpecIdentifier,
    ) -> Result<CreateDeploymentRequest, DeployError> {
        let content = serde_json::to_string(&self.app_spec(spec_id)?)?;
        let group = self.ctx.rollout_group();

        Ok(CreateDeploymentRequest {
            application_name: group.clone(),
            deployment_group_name: group,
            deployment_config_name: DEPLOYMENT_CONFIG.to_string(),
            description: "Deployment".to_string(),
            revision: Revision {
                revision_type: REVISION_TYPE.to_string(),
                app_spec_content: AppSpecContent { content },
            },
            auto_rollback_configuration: AutoRollbackConfiguration {
                enabled: true,
                events: ROLLBACK_EVENTS.iter().map(|e| e.to_string()).collect(),
            },
        })
    }

    /// Create the rollout and poll it until it leaves the active states.
    ///
    /// Exceeding the deploy timeout stops the rollout with auto-rollback,
    /// collects diagnostics and returns [`DeployError::RolloutTimeout`].
    pub async fn execute<P: Platform>(
        &self,
        platform: &P,
        spec_id: &SpecIdentifier,
    ) -> Result<RolloutAttempt, DeployError> {
        let profile = &self.ctx.profile;
        let request = self.rollout_request(spec_id)?;

        println!("{}", format!("Init deploy app {}", profile.name).cyan());
        debug!("AppSpec: {}", request.revision.app_spec_content.content);

        let rollout_id = platform.create_rollout(&request).await?;
        info!("Created rollout {} for {}", rollout_id, spec_id);
        println!("{}", "Deployment created!".green());
        println!(
            "{}",
            format!("For more info: {}", console_link(&profile.region, &rollout_id)).cyan()
        );

        let mut attempt = RolloutAttempt::new(rollout_id, spec_id.clone(), profile.deploy_timeout);
        let mut monitor = EventStreamMonitor::new();
        let poll_interval = self.ctx.settings.poll_interval;

        let mut status_info = platform.get_rollout(attempt.id()).await?;
        observe(&mut attempt, &status_info)?;

        while attempt.status().is_active() {
            (self.sleep_fn)(poll_interval).await;
            attempt.advance(poll_interval);

            monitor
                .poll(platform, self.ctx.cluster(), self.ctx.service())
                .await?;

            status_info = platform.get_rollout(attempt.id()).await?;
            observe(&mut attempt, &status_info)?;

            if attempt.is_timed_out() {
                return Err(self.abort(platform, &mut attempt, &monitor).await);
            }
        }

        match attempt.status() {
            RolloutStatus::Succeeded => {
                println!("{}", "Finished deploy".green());
                Ok(attempt)
            }
            status => {
                let payload = serde_json::to_value(&status_info)?;
                error!("Rollout {} ended with status {}", attempt.id(), status);
                eprintln!(
                    "{}",
                    format!("Deployment failed, status: {}", status).red()
                );
                eprintln!("{}", payload);
                Err(DeployError::RolloutFailed {
                    status: status.to_string(),
                    payload,
                })
            }
        }
    }

    async fn abort<P: Platform>(
        &self,
        platform: &P,
        attempt: &mut RolloutAttempt,
        monitor: &EventStreamMonitor,
    ) -> DeployError {
        warn!(
            "Rollout {} exceeded {}s, stopping",
            attempt.id(),
            attempt.timeout().as_secs()
        );
        eprintln!("{}", "Stopping deployment by timeout".red());

        match platform.stop_rollout(attempt.id(), true).await {
            Ok(response) => {
                debug!("Stop response: {:?}", response);
                eprintln!("{}", "Deployment stopped".red());
            }
            Err(e) => warn!("Failed to stop rollout {}: {}", attempt.id(), e),
        }
        if let Err(e) = attempt.mark_stopped() {
            warn!("{}", e);
        }

        (self.sleep_fn)(self.ctx.settings.drain_interval).await;
        let report = DiagnosticsCollector::new(self.ctx)
            .collect(platform, monitor.task_ref())
            .await;
        info!(
            "Rollout {} diagnostics: stop reason {:?}, {} log lines",
            attempt.id(),
            report.stop_reason,
            report.log_lines.len()
        );

        DeployError::RolloutTimeout {
            deployment_id: attempt.id().to_string(),
            elapsed_secs: attempt.elapsed().as_secs(),
        }
    }
}

fn observe(attempt: &mut RolloutAttempt, status_info: &DeploymentInfo) -> Result<(), DeployError> {
    debug!("Rollout {} status: {}", attempt.id(), status_info.status);
    attempt
        .observe(RolloutStatus::parse(&status_info.status))
        .map_err(DeployError::Internal)
}
