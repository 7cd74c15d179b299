//! Deploy pipeline
//!
//! resolve profile → build spec → register → roll out → notify once

use std::future::Future;
use std::time::Duration;

use colored::Colorize;
use tracing::{error, info, warn};

use crate::app::context::RolloutContext;
use crate::app::options::DeployOptions;
use crate::deploy::controller::ProgressiveRolloutController;
use crate::deploy::direct::DirectUpdateExecutor;
use crate::deploy::strategy::RolloutStrategy;
use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::notify::{Notification, NotificationDispatcher, Outcome};
use crate::platform::Platform;
use crate::profile::ProfileDocument;
use crate::workload::{SpecIdentifier, WorkloadSpec, WorkloadSpecBuilder};

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub spec_id: SpecIdentifier,
    pub strategy: RolloutStrategy,
}

/// Load the profile document and resolve the application for this run.
///
/// Fails with [`DeployError::ValidationError`] before anything reaches the
/// platform when the profile lacks a field the mode requires.
pub async fn prepare(
    profile_file: &File,
    env: &str,
    options: DeployOptions,
) -> Result<RolloutContext, DeployError> {
    let document = ProfileDocument::load(profile_file).await?;
    let profile = document
        .application(env, &options.app_key)?
        .resolve(&options.app_key, &options.mode)?;
    info!(
        "Resolved {} ({}) for environment {}",
        options.app_key, profile.name, env
    );
    Ok(RolloutContext::new(
        profile,
        options.mode,
        options.tag,
        options.controller,
    ))
}

/// Run a deploy for a resolved context
pub async fn deploy<P, S, F>(
    ctx: &RolloutContext,
    platform: &P,
    notifier: &dyn NotificationDispatcher,
    sleep_fn: S,
) -> Result<DeployReport, DeployError>
where
    P: Platform,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let spec = WorkloadSpecBuilder::new(&ctx.profile, ctx.mode.launch, ctx.tag.as_str())
        .with_tracing_sidecars(ctx.mode.tracing_sidecars)
        .build();
    let strategy = RolloutStrategy::select(&ctx.mode);
    info!("Deploying {} with strategy {:?}", spec.family, strategy);

    let result = execute(ctx, platform, &spec, strategy, sleep_fn).await;

    if let Err(e) = &result {
        error!("Deploy of {} failed: {}", ctx.profile.name, e);
    }
    if strategy != RolloutStrategy::RegisterOnly {
        notify(ctx, notifier, &result).await;
    }

    result
}

async fn execute<P, S, F>(
    ctx: &RolloutContext,
    platform: &P,
    spec: &WorkloadSpec,
    strategy: RolloutStrategy,
    sleep_fn: S,
) -> Result<DeployReport, DeployError>
where
    P: Platform,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let spec_id = platform.register(spec).await?;
    println!("{}", format!("Task definition: {}", spec_id).cyan());

    match strategy {
        RolloutStrategy::RegisterOnly => {
            info!("Register only, leaving service {} untouched", ctx.service());
        }
        RolloutStrategy::DirectUpdate => {
            DirectUpdateExecutor::new(ctx).execute(platform, &spec_id).await?;
        }
        RolloutStrategy::Progressive => {
            ProgressiveRolloutController::new(ctx, sleep_fn)
                .execute(platform, &spec_id)
                .await?;
        }
    }

    Ok(DeployReport { spec_id, strategy })
}

/// Send the single notification of a run, if a channel is selected
async fn notify(
    ctx: &RolloutContext,
    notifier: &dyn NotificationDispatcher,
    result: &Result<DeployReport, DeployError>,
) {
    let Some(channel) = ctx.mode.channel else {
        return;
    };
    let Some(webhook) = ctx.profile.webhooks.for_channel(channel) else {
        warn!("No {} webhook configured, skipping notification", channel);
        return;
    };

    let (outcome, detail) = match result {
        Ok(_) => (Outcome::Ok, String::new()),
        Err(e) if e.is_notified() => (Outcome::Nok, e.notification_detail()),
        Err(_) => return,
    };

    let notification = Notification::for_profile(&ctx.profile, outcome, &detail);
    notifier.send(channel, webhook, &notification).await;
}
