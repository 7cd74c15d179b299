//! Sample profile written by `oni init`

use serde_json::{json, Value};

use crate::errors::DeployError;
use crate::filesys::file::File;

/// File name of the generated sample
pub const SAMPLE_FILE_NAME: &str = "oni.sample.json";

/// Sample document covering every supported key
pub fn sample_document() -> Value {
    json!({
        "development": {
            "APP_DEFAULT": {
                "WEBHOOK_TEAMS": "https://example.webhook.office.com/webhook",
                "WEBHOOK_GOOGLE": "https://chat.googleapis.com/v1/spaces/space/messages",
                "WEBHOOK_SLACK": "https://hooks.slack.com/services/T000/B000/XXXX",
                "APP_REGION": "us-east-1",
                "APP_ACCOUNT": "111111111111",

                "APP_IMAGE": "app",
                "APP_NAME": "app",
                "APP_MEMORY": 512,
                "APP_CPU": 256,
                "APP_MEMORY_RESERVATION": 512,
                "APP_PORTS": [8080],
                "APP_VARIABLES": [{"KEY": "VALUE"}],
                "APP_SECRETS": [{"VARIABLE_NAME": "arn:aws:ssm:us-east-1:111111111111:parameter/name"}],
                "APP_COMMAND": ["/bin/sh", "-c", "ls"],
                "APP_ULIMITS": [{"NAME": "nofile", "SOFTLIMIT": 1024, "HARDLIMIT": 4096}],
                "CLUSTER_NAME": "cluster",
                "APP_MOUNTPOINTS": ["data:/var/data"],
                "EFS_CONFIG": [
                    {
                        "VOLUME_NAME": "data",
                        "FILESYSTEM_ID": "fs-00000000",
                        "ROOT_DIRECTORY": "/",
                        "ACCESS_POINT_ID": "fsap-00000000"
                    }
                ],
                "CONSTRAINTS": [["attribute:ecs.availability-zone in [us-east-1a]", "memberOf"]],
                "TASK_ARN": null,
                "EXECUTION_ROLE_ARN": null,
                "NETWORK_MODE": "bridge",
                "APP_CAPACITY_PROVIDERS": [{"NAME": "provider", "BASE": 1, "WEIGHT": 1}],
                "APP_DEPLOY_TIMEOUT": 600,
                "EXTRA_CONFIG": {
                    "DATADOG_AGENT": {
                        "ECS_FARGATE": false,
                        "SITE": "datadoghq.com",
                        "LOGS_ENABLED": true,
                        "DD_API_KEY": "arn:aws:secretsmanager:us-east-1:111111111111:secret:datadog",
                        "APP_MEMORY": 256,
                        "APP_MEMORY_RESERVATION": 128
                    }
                }
            }
        }
    })
}

/// Write the sample document, refusing to overwrite an existing file
pub async fn write_sample(file: &File) -> Result<(), DeployError> {
    if file.exists().await {
        return Err(DeployError::ConfigError(format!(
            "{} already exists",
            file.path().display()
        )));
    }
    file.write_json(&sample_document()).await
}
