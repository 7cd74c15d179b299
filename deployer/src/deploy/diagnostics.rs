//! Best-effort diagnostics for a stopped rollout

use colored::Colorize;
use platform_api::{LogEvents, TaskDetails};
use tracing::warn;

use crate::app::context::RolloutContext;
use crate::deploy::events::DiagnosticTaskRef;
use crate::errors::DeployError;
use crate::platform::DiagnosticsApi;

/// Number of log lines fetched from the failed task
pub const LOG_LIMIT: u32 = 200;

/// What could be gathered about the failed task
#[derive(Debug, Default)]
pub struct DiagnosticsReport {
    pub stop_reason: Option<String>,
    pub log_lines: Vec<String>,
}

/// Fetches the stop reason and recent logs of a task
pub struct DiagnosticsCollector<'a> {
    ctx: &'a RolloutContext,
}

impl<'a> DiagnosticsCollector<'a> {
    pub fn new(ctx: &'a RolloutContext) -> Self {
        Self { ctx }
    }

    pub fn task_arn(&self, task: &DiagnosticTaskRef) -> String {
        let profile = &self.ctx.profile;
        format!(
            "arn:aws:ecs:{}:{}:task/{}/{}",
            profile.region, profile.account, profile.cluster, task
        )
    }

    pub fn log_group(&self) -> String {
        format!("/ecs/{}/{}", self.ctx.profile.cluster, self.ctx.profile.name)
    }

    pub fn log_stream(&self, task: &DiagnosticTaskRef) -> String {
        let name = &self.ctx.profile.name;
        format!("{}/{}/{}", name, name, task)
    }

    /// Collect and print diagnostics. Never fails; problems are logged.
    pub async fn collect(
        &self,
        api: &dyn DiagnosticsApi,
        task: Option<&DiagnosticTaskRef>,
    ) -> DiagnosticsReport {
        let Some(task) = task else {
            warn!(
                "{}",
                DeployError::DiagnosticsUnavailable("no task launch seen in service events".into())
            );
            return DiagnosticsReport::default();
        };

        let mut report = DiagnosticsReport::default();

        match api.task_details(self.ctx.cluster(), &self.task_arn(task)).await {
            Ok(details) => {
                report.stop_reason = stop_reason(&details);
                if let Some(reason) = &report.stop_reason {
                    println!("Stopped reason: {}", reason);
                }
            }
            Err(e) => warn!("{}", DeployError::DiagnosticsUnavailable(e.to_string())),
        }

        match api
            .log_events(&self.log_group(), &self.log_stream(task), LOG_LIMIT, true)
            .await
        {
            Ok(LogEvents { events }) => {
                println!("{}", "Log from stopped container".yellow());
                for event in events {
                    println!("{}", event.message);
                    report.log_lines.push(event.message);
                }
            }
            Err(e) => {
                warn!("{}", DeployError::DiagnosticsUnavailable(e.to_string()));
                eprintln!("{}", "No additional info found in the task logs.".red());
            }
        }

        report
    }
}

/// Reason reported on the first container, falling back to the task's
fn stop_reason(details: &TaskDetails) -> Option<String> {
    details
        .containers
        .first()
        .and_then(|c| c.reason.clone())
        .or_else(|| details.stop_reason.clone())
}
