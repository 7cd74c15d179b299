//! End-to-end deploy pipeline scenarios with a scripted platform

use std::time::Duration;

use oni::app::options::{ControllerSettings, DeployMode, DeployOptions};
use oni::app::run::{deploy, prepare};
use oni::deploy::strategy::RolloutStrategy;
use oni::errors::DeployError;
use oni::filesys::file::File;
use oni::notify::{Channel, Outcome};
use oni::workload::LaunchClass;

use crate::support::{
    context, event, profile_json, recording_sleep, slack_mode, FakePlatform, RecordingNotifier,
    ROLLOUT_ID, SPEC_ARN,
};

#[tokio::test]
async fn test_progressive_rollout_succeeds() {
    let ctx = context(slack_mode(), Some(600));
    let platform = FakePlatform::new(&["Created", "InProgress", "InProgress", "Succeeded"]);
    let notifier = RecordingNotifier::default();
    let (slept, sleep_fn) = recording_sleep();

    let report = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap();

    assert_eq!(report.spec_id.as_str(), SPEC_ARN);
    assert_eq!(report.strategy, RolloutStrategy::Progressive);
    assert_eq!(platform.count("register"), 1);
    assert_eq!(platform.count("create_rollout"), 1);
    assert_eq!(platform.count("get_rollout"), 4);
    assert_eq!(platform.count("stop_rollout"), 0);
    assert_eq!(platform.count("update_service"), 0);
    assert_eq!(slept.lock().unwrap().len(), 3);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    let (channel, webhook, notification) = &sent[0];
    assert_eq!(*channel, Channel::Slack);
    assert_eq!(webhook, "https://hooks.slack.test/services/T0/B0/X");
    assert_eq!(notification.outcome, Outcome::Ok);
    assert_eq!(notification.workload_name, "api");
    assert_eq!(notification.account, "111111111111");
}

#[tokio::test]
async fn test_progressive_rollout_times_out() {
    let ctx = context(slack_mode(), Some(10));
    let platform = FakePlatform::new(&["InProgress"]).with_events(vec![
        event("e1", 10, "(service api) has started 1 tasks: (task aaaa)."),
        event("e2", 20, "(service api) has started 1 tasks: (task bbbb)."),
    ]);
    let notifier = RecordingNotifier::default();
    let (slept, sleep_fn) = recording_sleep();

    let err = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap_err();

    match err {
        DeployError::RolloutTimeout {
            deployment_id,
            elapsed_secs,
        } => {
            assert_eq!(deployment_id, ROLLOUT_ID);
            assert_eq!(elapsed_secs, 15);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(platform.count("stop_rollout"), 1);
    // Initial status fetch plus one per poll at t=5, 10 and 15
    assert_eq!(platform.count("get_rollout"), 4);
    let calls = platform.calls();
    assert_eq!(calls.last().map(String::as_str), Some("log_events"));
    assert_eq!(
        platform.task_arns(),
        vec!["arn:aws:ecs:us-east-1:111111111111:task/main/aaaa".to_string()]
    );

    let settings = ControllerSettings::default();
    assert_eq!(
        *slept.lock().unwrap(),
        vec![
            settings.poll_interval,
            settings.poll_interval,
            settings.poll_interval,
            settings.drain_interval
        ]
    );

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].2.outcome, Outcome::Nok);
    assert_eq!(sent[0].2.detail, "Timeout in deployment. Stop current deployment");
}

#[tokio::test]
async fn test_rollout_back_to_created_keeps_polling() {
    let ctx = context(slack_mode(), Some(600));
    let platform = FakePlatform::new(&["InProgress", "Created", "InProgress", "Succeeded"]);
    let notifier = RecordingNotifier::default();
    let (slept, sleep_fn) = recording_sleep();

    let report = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap();

    assert_eq!(report.strategy, RolloutStrategy::Progressive);
    assert_eq!(platform.count("get_rollout"), 4);
    assert_eq!(platform.count("stop_rollout"), 0);
    assert_eq!(slept.lock().unwrap().len(), 3);
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].2.outcome, Outcome::Ok);
}

#[tokio::test]
async fn test_timeout_survives_failing_stop_and_diagnostics() {
    let ctx = context(slack_mode(), Some(10));
    let platform = FakePlatform::new(&["InProgress"])
        .with_events(vec![
            event("e1", 10, "(service api) has started 1 tasks: (task aaaa)."),
            event("e2", 20, "(service api) has started 1 tasks: (task bbbb)."),
        ])
        .with_failing_stop()
        .with_failing_diagnostics();
    let notifier = RecordingNotifier::default();
    let (slept, sleep_fn) = recording_sleep();

    let err = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap_err();

    assert!(matches!(
        err,
        DeployError::RolloutTimeout { ref deployment_id, elapsed_secs: 15 }
            if deployment_id == ROLLOUT_ID
    ));
    assert_eq!(platform.count("stop_rollout"), 1);
    assert_eq!(platform.count("task_details"), 1);
    assert_eq!(platform.count("log_events"), 1);
    assert_eq!(
        slept.lock().unwrap().last(),
        Some(&ControllerSettings::default().drain_interval)
    );

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].2.outcome, Outcome::Nok);
    assert_eq!(sent[0].2.detail, "Timeout in deployment. Stop current deployment");
}

#[tokio::test]
async fn test_progressive_rollout_fails() {
    let ctx = context(slack_mode(), None);
    let platform = FakePlatform::new(&["InProgress", "Failed"]);
    let notifier = RecordingNotifier::default();
    let (_, sleep_fn) = recording_sleep();

    let err = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap_err();

    let payload = match err {
        DeployError::RolloutFailed { status, payload } => {
            assert_eq!(status, "Failed");
            assert_eq!(payload["status"], "Failed");
            assert_eq!(payload["applicationName"], "main-api");
            payload
        }
        other => panic!("unexpected error: {other}"),
    };

    assert_eq!(platform.count("stop_rollout"), 0);
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].2.outcome, Outcome::Nok);
    assert_eq!(sent[0].2.detail, payload.to_string());
}

#[tokio::test]
async fn test_register_only_stops_after_registration() {
    let mode = DeployMode {
        register_only: true,
        ..slack_mode()
    };
    let ctx = context(mode, None);
    let platform = FakePlatform::new(&["Succeeded"]);
    let notifier = RecordingNotifier::default();
    let (slept, sleep_fn) = recording_sleep();

    let report = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap();

    assert_eq!(report.strategy, RolloutStrategy::RegisterOnly);
    assert_eq!(platform.calls(), vec!["register".to_string()]);
    assert!(slept.lock().unwrap().is_empty());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_direct_update() {
    let mode = DeployMode {
        load_balanced: false,
        ..slack_mode()
    };
    let ctx = context(mode, None);
    let platform = FakePlatform::new(&["Succeeded"]);
    let notifier = RecordingNotifier::default();
    let (_, sleep_fn) = recording_sleep();

    let report = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap();

    assert_eq!(report.strategy, RolloutStrategy::DirectUpdate);
    assert_eq!(
        platform.calls(),
        vec!["register".to_string(), "update_service".to_string()]
    );
    assert_eq!(notifier.sent()[0].2.outcome, Outcome::Ok);
}

#[tokio::test]
async fn test_direct_update_rejected() {
    let mode = DeployMode {
        load_balanced: false,
        ..slack_mode()
    };
    let ctx = context(mode, None);
    let platform = FakePlatform::new(&["Succeeded"]).with_service_status("DRAINING");
    let notifier = RecordingNotifier::default();
    let (_, sleep_fn) = recording_sleep();

    let err = deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap_err();

    assert!(matches!(err, DeployError::UpdateRejected { ref status } if status == "DRAINING"));
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].2.detail, "Failed deploy. Check pipeline logs");
}

#[tokio::test]
async fn test_no_channel_no_notification() {
    let ctx = context(DeployMode::default(), None);
    let platform = FakePlatform::new(&["Succeeded"]);
    let notifier = RecordingNotifier::default();
    let (_, sleep_fn) = recording_sleep();

    deploy(&ctx, &platform, &notifier, sleep_fn).await.unwrap();
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_serverless_registration_shape() {
    let mode = DeployMode {
        launch: LaunchClass::ManagedServerless,
        tracing_sidecars: true,
        ..Default::default()
    };
    let mut json = profile_json();
    json["APP_CPU"] = serde_json::json!(256);
    let raw: oni::profile::RawProfile = serde_json::from_value(json).unwrap();
    let profile = raw.resolve("APP_DEFAULT", &mode).unwrap();
    let ctx = oni::app::context::RolloutContext::new(
        profile,
        mode,
        "9.9.9",
        ControllerSettings::default(),
    );
    let platform = FakePlatform::new(&["Succeeded"]);
    let (_, sleep_fn) = recording_sleep();

    deploy(&ctx, &platform, &RecordingNotifier::default(), sleep_fn)
        .await
        .unwrap();

    let registered = platform.registered();
    let request = registered[0].to_request();
    assert_eq!(request.family, "main-api");
    assert_eq!(request.requires_compatibilities, vec!["FARGATE".to_string()]);
    assert_eq!(request.memory, Some(512));
    assert_eq!(request.cpu, Some(256));
    let names: Vec<&str> = request
        .container_definitions
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["api", "xray-daemon", "cloudwatch-agent"]);
    assert_eq!(
        request.container_definitions[0].image,
        "registry.example.com/api:9.9.9"
    );
}

#[tokio::test]
async fn test_validation_fails_before_registration() {
    let path = std::env::temp_dir().join(format!("oni-validation-{}.json", std::process::id()));
    let file = File::new(&path);
    let mut entry = profile_json();
    entry.as_object_mut().unwrap().remove("APP_PORTS");
    entry.as_object_mut().unwrap().remove("APP_MEMORY_RESERVATION");
    file.write_json(&serde_json::json!({"development": {"APP_DEFAULT": entry}}))
        .await
        .unwrap();

    let options = DeployOptions {
        app_key: "APP_DEFAULT".to_string(),
        tag: "1.0.0".to_string(),
        mode: slack_mode(),
        controller: ControllerSettings {
            poll_interval: Duration::from_millis(1),
            drain_interval: Duration::from_millis(1),
        },
    };
    let err = prepare(&file, "development", options).await.unwrap_err();
    let _ = tokio::fs::remove_file(&path).await;

    match err {
        DeployError::ValidationError { missing } => {
            assert_eq!(missing, vec!["APP_PORTS", "APP_MEMORY_RESERVATION"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unknown_environment() {
    let path = std::env::temp_dir().join(format!("oni-env-{}.json", std::process::id()));
    let file = File::new(&path);
    file.write_json(&serde_json::json!({"production": {"APP_DEFAULT": profile_json()}}))
        .await
        .unwrap();

    let options = DeployOptions {
        app_key: "APP_DEFAULT".to_string(),
        tag: "1.0.0".to_string(),
        mode: DeployMode::default(),
        controller: ControllerSettings::default(),
    };
    let err = prepare(&file, "development", options).await.unwrap_err();
    let _ = tokio::fs::remove_file(&path).await;

    assert!(matches!(err, DeployError::ConfigError(_)));
    assert!(!err.is_notified());
}
