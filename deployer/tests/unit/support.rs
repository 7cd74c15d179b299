//! Recording fakes of the platform and notification collaborators

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use oni::app::context::RolloutContext;
use oni::app::options::{ControllerSettings, DeployMode};
use oni::errors::DeployError;
use oni::notify::{Channel, Notification, NotificationDispatcher};
use oni::platform::{DiagnosticsApi, EventFeed, RolloutApi, WorkloadRegistry};
use oni::profile::RawProfile;
use oni::workload::{SpecIdentifier, WorkloadSpec};
use platform_api::{
    CreateDeploymentRequest, DeploymentInfo, LogEvent, LogEvents, ServiceDescription,
    ServiceEvent, StopDeploymentResponse, TaskContainer, TaskDetails,
};

pub const SPEC_ARN: &str = "arn:aws:ecs:us-east-1:111111111111:task-definition/main-api:42";
pub const ROLLOUT_ID: &str = "d-TEST123";

/// Profile used by the scenarios: one port, self-managed, slack webhook
pub fn profile_json() -> serde_json::Value {
    serde_json::json!({
        "APP_IMAGE": "registry.example.com/api",
        "APP_NAME": "api",
        "APP_MEMORY": 512,
        "APP_MEMORY_RESERVATION": 256,
        "APP_REGION": "us-east-1",
        "APP_ACCOUNT": "111111111111",
        "CLUSTER_NAME": "main",
        "APP_PORTS": [8080],
        "APP_CAPACITY_PROVIDERS": [{"NAME": "main-capacity", "BASE": 1, "WEIGHT": 1}],
        "WEBHOOK_SLACK": "https://hooks.slack.test/services/T0/B0/X"
    })
}

pub fn context(mode: DeployMode, timeout_secs: Option<u64>) -> RolloutContext {
    let mut json = profile_json();
    if let Some(secs) = timeout_secs {
        json["APP_DEPLOY_TIMEOUT"] = serde_json::json!(secs);
    }
    let raw: RawProfile = serde_json::from_value(json).unwrap();
    let profile = raw.resolve("APP_DEFAULT", &mode).unwrap();
    RolloutContext::new(profile, mode, "1.2.3", ControllerSettings::default())
}

pub fn slack_mode() -> DeployMode {
    DeployMode {
        channel: Some(Channel::Slack),
        ..Default::default()
    }
}

pub fn event(id: &str, offset_secs: i64, message: &str) -> ServiceEvent {
    ServiceEvent {
        id: id.to_string(),
        created_at: Utc.timestamp_opt(1_700_000_000 + offset_secs, 0).unwrap(),
        message: message.to_string(),
    }
}

/// Scripted platform that records every call by name
pub struct FakePlatform {
    calls: Mutex<Vec<String>>,
    statuses: Mutex<VecDeque<String>>,
    events: Vec<ServiceEvent>,
    service_status: String,
    registered: Mutex<Vec<WorkloadSpec>>,
    task_arns: Mutex<Vec<String>>,
    failing_stop: bool,
    failing_diagnostics: bool,
}

impl FakePlatform {
    /// Rollout statuses are served in order; the last one repeats
    pub fn new(statuses: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            statuses: Mutex::new(statuses.iter().map(|s| s.to_string()).collect()),
            events: Vec::new(),
            service_status: "ACTIVE".to_string(),
            registered: Mutex::new(Vec::new()),
            task_arns: Mutex::new(Vec::new()),
            failing_stop: false,
            failing_diagnostics: false,
        }
    }

    pub fn with_events(mut self, events: Vec<ServiceEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_service_status(mut self, status: &str) -> Self {
        self.service_status = status.to_string();
        self
    }

    /// Stop calls are recorded, then rejected by the gateway
    pub fn with_failing_stop(mut self) -> Self {
        self.failing_stop = true;
        self
    }

    /// Task detail and log lookups are recorded, then rejected
    pub fn with_failing_diagnostics(mut self) -> Self {
        self.failing_diagnostics = true;
        self
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn registered(&self) -> Vec<WorkloadSpec> {
        self.registered.lock().unwrap().clone()
    }

    pub fn task_arns(&self) -> Vec<String> {
        self.task_arns.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkloadRegistry for FakePlatform {
    async fn register(&self, spec: &WorkloadSpec) -> Result<SpecIdentifier, DeployError> {
        self.record("register");
        self.registered.lock().unwrap().push(spec.clone());
        Ok(SpecIdentifier::new(SPEC_ARN))
    }

    async fn update_service(
        &self,
        _cluster: &str,
        service: &str,
        _spec_id: &SpecIdentifier,
    ) -> Result<ServiceDescription, DeployError> {
        self.record("update_service");
        Ok(ServiceDescription {
            service_name: service.to_string(),
            status: self.service_status.clone(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl RolloutApi for FakePlatform {
    async fn create_rollout(
        &self,
        _request: &CreateDeploymentRequest,
    ) -> Result<String, DeployError> {
        self.record("create_rollout");
        Ok(ROLLOUT_ID.to_string())
    }

    async fn get_rollout(&self, rollout_id: &str) -> Result<DeploymentInfo, DeployError> {
        self.record("get_rollout");
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        }
        .unwrap_or_else(|| "InProgress".to_string());

        let mut details = serde_json::Map::new();
        details.insert("applicationName".to_string(), serde_json::json!("main-api"));
        Ok(DeploymentInfo {
            deployment_id: rollout_id.to_string(),
            status,
            details,
        })
    }

    async fn stop_rollout(
        &self,
        _rollout_id: &str,
        auto_rollback: bool,
    ) -> Result<StopDeploymentResponse, DeployError> {
        assert!(auto_rollback);
        self.record("stop_rollout");
        if self.failing_stop {
            return Err(DeployError::PlatformError("409 Conflict: already stopping".into()));
        }
        Ok(StopDeploymentResponse {
            status: Some("Pending".to_string()),
            status_message: None,
        })
    }
}

#[async_trait]
impl EventFeed for FakePlatform {
    async fn describe_service(
        &self,
        _cluster: &str,
        service: &str,
    ) -> Result<ServiceDescription, DeployError> {
        self.record("describe_service");
        Ok(ServiceDescription {
            service_name: service.to_string(),
            status: self.service_status.clone(),
            events: self.events.clone(),
            task_arns: Vec::new(),
        })
    }
}

#[async_trait]
impl DiagnosticsApi for FakePlatform {
    async fn task_details(
        &self,
        _cluster: &str,
        task_arn: &str,
    ) -> Result<TaskDetails, DeployError> {
        self.record("task_details");
        self.task_arns.lock().unwrap().push(task_arn.to_string());
        if self.failing_diagnostics {
            return Err(DeployError::PlatformError("404 Not Found: task expired".into()));
        }
        Ok(TaskDetails {
            task_arn: task_arn.to_string(),
            stop_reason: None,
            containers: vec![TaskContainer {
                name: "api".to_string(),
                reason: Some("Essential container exited".to_string()),
                exit_code: Some(1),
            }],
        })
    }

    async fn log_events(
        &self,
        _group: &str,
        _stream: &str,
        limit: u32,
        from_tail: bool,
    ) -> Result<LogEvents, DeployError> {
        assert_eq!(limit, 200);
        assert!(from_tail);
        self.record("log_events");
        if self.failing_diagnostics {
            return Err(DeployError::PlatformError("404 Not Found: log stream".into()));
        }
        Ok(LogEvents {
            events: vec![LogEvent {
                timestamp: None,
                message: "panic: connection refused".to_string(),
            }],
        })
    }
}

/// Notifier that keeps every notification it is asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Channel, String, Notification)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(Channel, String, Notification)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn send(&self, channel: Channel, webhook: &str, notification: &Notification) {
        self.sent
            .lock()
            .unwrap()
            .push((channel, webhook.to_string(), notification.clone()));
    }
}

/// Sleep function that records requested durations and returns at once
pub fn recording_sleep() -> (
    Arc<Mutex<Vec<Duration>>>,
    impl Fn(Duration) -> std::future::Ready<()>,
) {
    let slept = Arc::new(Mutex::new(Vec::new()));
    let log = slept.clone();
    let sleep_fn = move |d: Duration| {
        log.lock().unwrap().push(d);
        std::future::ready(())
    };
    (slept, sleep_fn)
}
