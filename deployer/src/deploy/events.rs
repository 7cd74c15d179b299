//! Service event stream monitor
//!
//! Prints platform progress messages as they appear during a rollout and
//! remembers which task to inspect if the rollout has to be stopped.

use std::fmt;

use colored::Colorize;
use platform_api::ServiceEvent;
use tracing::debug;

use crate::errors::DeployError;
use crate::platform::EventFeed;

/// Marker of the platform message announcing a task launch
const STARTED_TASK_MARKER: &str = "has started 1 tasks: (task";

/// Task whose stop reason and logs are fetched after a timeout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticTaskRef(String);

impl DiagnosticTaskRef {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self(task_id.into())
    }

    pub fn task_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosticTaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull a task id out of a "has started 1 tasks: (task <id>)." message.
///
/// Relies on the platform's current wording: the id sits after the second
/// opening parenthesis.
pub fn extract_started_task_id(message: &str) -> Option<String> {
    let tail = message.split('(').nth(2)?;
    let id = tail.replacen("task ", "", 1).replacen(").", "", 1);
    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Task of the second most recent launch message in a chronologically
/// sorted event list.
///
/// The most recent launch is usually the replacement that is still
/// starting; the one before it is the task that already failed.
pub fn diagnostic_task_ref(events: &[ServiceEvent]) -> Option<DiagnosticTaskRef> {
    events
        .iter()
        .rev()
        .filter(|e| e.message.contains(STARTED_TASK_MARKER))
        .nth(1)
        .and_then(|e| extract_started_task_id(&e.message))
        .map(DiagnosticTaskRef::new)
}

/// Tracks printed events across polls
#[derive(Debug, Default)]
pub struct EventStreamMonitor {
    last_seen: Option<String>,
    task_ref: Option<DiagnosticTaskRef>,
}

impl EventStreamMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the newest event seen so far
    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    pub fn task_ref(&self) -> Option<&DiagnosticTaskRef> {
        self.task_ref.as_ref()
    }

    /// Fetch the service events, print the new ones and return them
    pub async fn poll(
        &mut self,
        feed: &dyn EventFeed,
        cluster: &str,
        service: &str,
    ) -> Result<Vec<ServiceEvent>, DeployError> {
        let description = feed.describe_service(cluster, service).await?;
        let fresh = self.ingest(description.events);
        for event in &fresh {
            println!(
                "{}",
                format!("{} => {}", event.created_at.to_rfc3339(), event.message).magenta()
            );
        }
        Ok(fresh)
    }

    /// Update tracking state from an event list and return the events to print
    pub fn ingest(&mut self, mut events: Vec<ServiceEvent>) -> Vec<ServiceEvent> {
        if events.is_empty() {
            debug!("No service events yet");
            return Vec::new();
        }

        // sort_by_key is stable; events sharing a timestamp keep feed order
        events.sort_by_key(|e| e.created_at);

        let fresh = match self
            .last_seen
            .as_deref()
            .and_then(|id| events.iter().position(|e| e.id == id))
        {
            Some(idx) => events[idx + 1..].to_vec(),
            None => events[events.len() - 1..].to_vec(),
        };

        if let Some(task_ref) = diagnostic_task_ref(&events) {
            debug!("Tracking task {} for diagnostics", task_ref);
            self.task_ref = Some(task_ref);
        }

        self.last_seen = events.last().map(|e| e.id.clone());
        fresh
    }
}
