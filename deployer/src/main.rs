//! Oni - Entry Point
//!
//! Deploys container workloads described in an `oni.json` profile.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};

use oni::app::options::{ControllerSettings, DeployMode, DeployOptions};
use oni::app::run::{deploy, prepare};
use oni::filesys::file::File;
use oni::logs::{init_logging, LogLevel, LogOptions};
use oni::notify::{Channel, WebhookNotifier};
use oni::platform::client::ENDPOINT_VAR;
use oni::platform::{CredentialBundle, HttpPlatformClient};
use oni::profile::sample::{write_sample, SAMPLE_FILE_NAME};
use oni::utils::version_info;
use oni::workload::LaunchClass;

#[derive(Parser)]
#[command(
    name = "oni",
    about = "Container workload deployer",
    disable_version_flag = true
)]
struct Cli {
    /// Print version information as JSON and exit
    #[arg(long)]
    version: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(
        long,
        global = true,
        env = "ONI_LOG_LEVEL",
        default_value = "warn",
        value_enum,
        ignore_case = true
    )]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a task definition and deploy it to the service
    EcsDeploy(EcsDeployArgs),
    /// Write a sample profile document
    Init {
        #[arg(long, default_value = SAMPLE_FILE_NAME)]
        path: PathBuf,
    },
}

#[derive(Args)]
struct EcsDeployArgs {
    /// Application key in the profile document
    #[arg(short = 'n', long, default_value = "APP_DEFAULT")]
    name: String,

    /// Image tag
    #[arg(short = 't', long)]
    tag: String,

    /// Service has no load balancer; update it in place
    #[arg(short = 'w', long = "without-loadbalance")]
    without_loadbalance: bool,

    /// Run on managed serverless capacity
    #[arg(short = 'f', long)]
    fargate: bool,

    /// Register the task definition only
    #[arg(short = 'd', long = "disable-deploy")]
    disable_deploy: bool,

    /// Add the trace collector and metrics agent containers
    #[arg(short = 'x', long)]
    xray: bool,

    /// Send a notification to this channel after the deploy
    #[arg(short = 'c', long = "channel-notification", value_enum)]
    channel: Option<Channel>,

    /// Profile document
    #[arg(long, default_value = "oni.json")]
    profile: PathBuf,

    /// Profile environment
    #[arg(long, env = "ONI_ENV", default_value = "development")]
    env: String,

    /// Platform gateway base URL
    #[arg(long, env = ENDPOINT_VAR)]
    endpoint: String,
}

impl EcsDeployArgs {
    fn deploy_options(&self) -> DeployOptions {
        DeployOptions {
            app_key: self.name.clone(),
            tag: self.tag.clone(),
            mode: DeployMode {
                launch: if self.fargate {
                    LaunchClass::ManagedServerless
                } else {
                    LaunchClass::SelfManaged
                },
                load_balanced: !self.without_loadbalance,
                register_only: self.disable_deploy,
                tracing_sidecars: self.xray,
                channel: self.channel,
            },
            controller: ControllerSettings::default(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if cli.version {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    let log_options = LogOptions {
        log_level: cli.log_level,
        json_format: cli.log_json,
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let result = match cli.command {
        Some(Commands::EcsDeploy(args)) => ecs_deploy(args).await,
        Some(Commands::Init { path }) => init(path).await,
        None => Err(anyhow::anyhow!("no command given, see `oni --help`")),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("{}", format!("Error: {:#}", e).red());
        process::exit(1);
    }
}

async fn ecs_deploy(args: EcsDeployArgs) -> anyhow::Result<()> {
    let ctx = prepare(&File::new(&args.profile), &args.env, args.deploy_options())
        .await
        .with_context(|| format!("profile {}", args.profile.display()))?;

    let credentials = CredentialBundle::from_env(&ctx.profile.region);
    if credentials.is_none() {
        info!("No credential bundle in the environment, using gateway credentials and region");
    }
    let platform =
        HttpPlatformClient::new(&args.endpoint, credentials).context("platform client")?;
    let notifier = WebhookNotifier::new().context("webhook notifier")?;

    let report = deploy(&ctx, &platform, &notifier, tokio::time::sleep).await?;
    info!("Deployed {} via {:?}", report.spec_id, report.strategy);
    Ok(())
}

async fn init(path: PathBuf) -> anyhow::Result<()> {
    let file = File::new(path);
    write_sample(&file)
        .await
        .with_context(|| format!("writing {}", file.path().display()))?;
    println!("{}", format!("Sample profile written to {}", file.path().display()).green());
    Ok(())
}
