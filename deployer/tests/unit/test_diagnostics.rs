//! Diagnostics collection against a scripted platform

use oni::app::options::DeployMode;
use oni::deploy::diagnostics::DiagnosticsCollector;
use oni::deploy::events::DiagnosticTaskRef;

use crate::support::{context, FakePlatform};

#[tokio::test]
async fn test_collects_reason_and_logs() {
    let ctx = context(DeployMode::default(), None);
    let platform = FakePlatform::new(&["Stopped"]);
    let task = DiagnosticTaskRef::new("aaaa");

    let report = DiagnosticsCollector::new(&ctx).collect(&platform, Some(&task)).await;

    assert_eq!(report.stop_reason.as_deref(), Some("Essential container exited"));
    assert_eq!(report.log_lines, vec!["panic: connection refused".to_string()]);
    assert_eq!(
        platform.task_arns(),
        vec!["arn:aws:ecs:us-east-1:111111111111:task/main/aaaa".to_string()]
    );
}

#[tokio::test]
async fn test_unavailable_diagnostics_are_empty() {
    let ctx = context(DeployMode::default(), None);
    let platform = FakePlatform::new(&["Stopped"]).with_failing_diagnostics();
    let task = DiagnosticTaskRef::new("aaaa");

    let report = DiagnosticsCollector::new(&ctx).collect(&platform, Some(&task)).await;

    assert!(report.stop_reason.is_none());
    assert!(report.log_lines.is_empty());
    assert_eq!(platform.calls(), vec!["task_details", "log_events"]);
}

#[tokio::test]
async fn test_no_task_ref_skips_lookups() {
    let ctx = context(DeployMode::default(), None);
    let platform = FakePlatform::new(&["Stopped"]);

    let report = DiagnosticsCollector::new(&ctx).collect(&platform, None).await;

    assert!(report.stop_reason.is_none());
    assert!(platform.calls().is_empty());
}
