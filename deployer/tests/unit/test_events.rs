//! Event stream monitor tests against a fake event feed

use oni::deploy::events::{diagnostic_task_ref, EventStreamMonitor};

use crate::support::{event, FakePlatform};

#[tokio::test]
async fn test_repoll_never_prints_twice() {
    let platform = FakePlatform::new(&["InProgress"]).with_events(vec![
        event("e2", 20, "(service api) registered 1 targets"),
        event("e1", 10, "(service api) has started 1 tasks: (task t1)."),
    ]);
    let mut monitor = EventStreamMonitor::new();

    let first = monitor.poll(&platform, "main", "api").await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, "e2");

    for _ in 0..3 {
        let again = monitor.poll(&platform, "main", "api").await.unwrap();
        assert!(again.is_empty());
    }
    assert_eq!(platform.count("describe_service"), 4);
}

#[tokio::test]
async fn test_earlier_of_two_launches_is_tracked() {
    let platform = FakePlatform::new(&["InProgress"]).with_events(vec![
        event("e1", 10, "(service api) has started 1 tasks: (task 1111)."),
        event("e2", 20, "(service api) (task 1111) failed container health checks."),
        event("e3", 30, "(service api) has started 1 tasks: (task 2222)."),
    ]);
    let mut monitor = EventStreamMonitor::new();
    monitor.poll(&platform, "main", "api").await.unwrap();

    assert_eq!(monitor.task_ref().unwrap().task_id(), "1111");
}

#[tokio::test]
async fn test_empty_feed_does_not_fail() {
    let platform = FakePlatform::new(&["InProgress"]);
    let mut monitor = EventStreamMonitor::new();

    let printed = monitor.poll(&platform, "main", "api").await.unwrap();
    assert!(printed.is_empty());
    assert!(monitor.task_ref().is_none());
    assert!(monitor.last_seen().is_none());
}

#[test]
fn test_single_launch_gives_no_ref() {
    let events = vec![event("e1", 10, "(service api) has started 1 tasks: (task 1111).")];
    assert!(diagnostic_task_ref(&events).is_none());
}

#[test]
fn test_poll_outside_runtime() {
    let platform = FakePlatform::new(&["InProgress"])
        .with_events(vec![event("e1", 10, "(service api) has reached a steady state.")]);
    let mut monitor = EventStreamMonitor::new();

    let printed = tokio_test::block_on(monitor.poll(&platform, "main", "api")).unwrap();
    assert_eq!(printed[0].message, "(service api) has reached a steady state.");
    assert_eq!(monitor.last_seen(), Some("e1"));
}
