//! Sidecar containers appended to the primary container

use crate::profile::{ApplicationProfile, DatadogAgentConfig};
use crate::workload::{
    ContainerResources, ContainerSpec, LaunchClass, LogRouting, SecretRef, SelfManagedResources,
};

pub const DATADOG_AGENT_IMAGE: &str = "public.ecr.aws/datadog/agent:latest";
pub const XRAY_DAEMON_IMAGE: &str = "public.ecr.aws/xray/aws-xray-daemon:latest";
pub const CLOUDWATCH_AGENT_IMAGE: &str = "public.ecr.aws/cloudwatch-agent/cloudwatch-agent:latest";

/// Log group shared by the tracing sidecars of every application
pub const TRACING_LOG_GROUP: &str = "/ecs/ecs-cwagent-fargate";

/// Observability agent sidecar
pub fn observability_agent(config: &DatadogAgentConfig, launch: LaunchClass) -> ContainerSpec {
    let resources = match launch {
        LaunchClass::SelfManaged => ContainerResources::SelfManaged(SelfManagedResources {
            memory: config.memory,
            memory_reservation: config.memory_reservation,
            cpu: None,
        }),
        LaunchClass::ManagedServerless => ContainerResources::Unbounded,
    };

    let ecs_fargate = config
        .ecs_fargate
        .clone()
        .unwrap_or_else(|| launch.is_serverless().to_string());

    ContainerSpec {
        resources,
        environment: vec![
            ("ECS_FARGATE".to_string(), ecs_fargate),
            ("DD_SITE".to_string(), config.site.clone()),
            ("DD_LOGS_ENABLED".to_string(), config.logs_enabled.clone()),
        ],
        secrets: vec![SecretRef {
            name: "DD_API_KEY".to_string(),
            value_from: config.api_key.clone(),
        }],
        ..ContainerSpec::new("datadog-agent", DATADOG_AGENT_IMAGE)
    }
}

/// Trace collector daemon and metrics agent. Neither carries limits.
pub fn tracing_pair(profile: &ApplicationProfile) -> [ContainerSpec; 2] {
    let routing = LogRouting {
        group: TRACING_LOG_GROUP.to_string(),
        region: profile.region.clone(),
        stream_prefix: profile.name.clone(),
    };

    let xray = ContainerSpec {
        log_routing: Some(routing.clone()),
        ..ContainerSpec::new("xray-daemon", XRAY_DAEMON_IMAGE)
    };

    let cloudwatch = ContainerSpec {
        secrets: vec![SecretRef {
            name: "CW_CONFIG_CONTENT".to_string(),
            value_from: format!(
                "arn:aws:ssm:{}:{}:parameter/ecs-cwagent",
                profile.region, profile.account
            ),
        }],
        log_routing: Some(routing),
        ..ContainerSpec::new("cloudwatch-agent", CLOUDWATCH_AGENT_IMAGE)
    };

    [xray, cloudwatch]
}
