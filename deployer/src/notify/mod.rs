//! Deployment notifications
//!
//! At most one notification goes out per run. Delivery is fire-and-forget:
//! a dispatcher logs failures and never reports them back to the run.

pub mod cards;
pub mod webhook;

use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::profile::ApplicationProfile;

pub use webhook::WebhookNotifier;

/// Category shown on cards for container service deploys
pub const ECS_CATEGORY: &str = "ECS";

/// Chat webhook flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Teams,
    Google,
    Slack,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Teams => "teams",
            Channel::Google => "google",
            Channel::Slack => "slack",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result reported to the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOK")]
    Nok,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "OK",
            Outcome::Nok => "NOK",
        }
    }
}

/// Content of one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Profile key of the application
    pub app_id: String,
    pub workload_name: String,
    pub account: String,
    pub category: String,
    pub outcome: Outcome,
    pub detail: String,
}

impl Notification {
    pub fn for_profile(profile: &ApplicationProfile, outcome: Outcome, detail: &str) -> Self {
        Self {
            app_id: profile.key.clone(),
            workload_name: profile.name.clone(),
            account: profile.account.clone(),
            category: ECS_CATEGORY.to_string(),
            outcome,
            detail: detail.to_string(),
        }
    }

    /// Text of the "additional information" field
    pub fn info_text(&self) -> String {
        match self.outcome {
            Outcome::Ok => format!("successfully deployed in {}", self.category),
            Outcome::Nok => self.detail.clone(),
        }
    }
}

/// Delivers notifications to a chat webhook
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, channel: Channel, webhook: &str, notification: &Notification);
}
