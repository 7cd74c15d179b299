//! Card payloads for each chat channel

use serde_json::{json, Value};

use crate::notify::{Channel, Notification, Outcome};

const COLOR_OK: &str = "#66bb6a";
const COLOR_NOK: &str = "#ef5350";

const ECS_ICON: &str = "https://github.com/awslabs/aws-icons-for-plantuml/raw/main/dist/Containers/ElasticContainerService.png?raw=true";
const EMOJI_OK: &str = "https://github.githubassets.com/images/icons/emoji/unicode/1f49a.png";
const EMOJI_NOK: &str = "https://github.githubassets.com/images/icons/emoji/unicode/1f494.png";

const TITLE: &str = "Pipeline Notification";
const INFO_LABEL: &str = "Additional information";

fn color(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Ok => COLOR_OK,
        Outcome::Nok => COLOR_NOK,
    }
}

fn status_word(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Ok => "Successfully",
        Outcome::Nok => "Failed",
    }
}

/// Build the card for a channel
pub fn render(channel: Channel, notification: &Notification) -> Value {
    match channel {
        Channel::Teams => teams_card(notification),
        Channel::Google => google_card(notification),
        Channel::Slack => slack_card(notification),
    }
}

pub fn teams_card(n: &Notification) -> Value {
    let subtitle = match n.outcome {
        Outcome::Ok => "<strong style=\"color:green;\">Successfully</strong>",
        Outcome::Nok => "<strong style=\"color:red;\">Failed</strong>",
    };
    json!({
        "@type": "MessageCard",
        "@context": "http://schema.org/extensions",
        "themeColor": color(n.outcome),
        "summary": TITLE,
        "sections": [{
            "activityTitle": TITLE,
            "activitySubtitle": subtitle,
            "activityImage": ECS_ICON,
            "facts": [
                { "name": "Account", "value": n.account },
                { "name": "Application", "value": n.workload_name },
                { "name": INFO_LABEL, "value": n.info_text() }
            ],
            "markdown": true
        }]
    })
}

pub fn google_card(n: &Notification) -> Value {
    let emoji = match n.outcome {
        Outcome::Ok => EMOJI_OK,
        Outcome::Nok => EMOJI_NOK,
    };
    let text = format!(
        "<font color=\"#9aa0a6\">Account</font><br>{}<br><font color=\"#9aa0a6\">Application</font><br>{}<br><font color=\"#9aa0a6\">{}</font><br>{}",
        n.account,
        n.workload_name,
        INFO_LABEL,
        n.info_text()
    );
    json!({
        "cards": [{
            "header": {
                "title": TITLE,
                "imageUrl": ECS_ICON
            },
            "sections": [{
                "widgets": [
                    { "keyValue": { "content": status_word(n.outcome), "iconUrl": emoji } },
                    { "textParagraph": { "text": text } }
                ]
            }]
        }]
    })
}

pub fn slack_card(n: &Notification) -> Value {
    let pretext = match n.outcome {
        Outcome::Ok => ":green_heart: Successfully",
        Outcome::Nok => ":broken_heart: Failed",
    };
    json!({
        "mrkdwn_in": ["text", "pretext"],
        "text": format!("*{}*", TITLE),
        "attachments": [{
            "pretext": pretext,
            "thumb_url": ECS_ICON,
            "color": color(n.outcome),
            "fields": [
                { "title": "Account", "value": n.account, "short": true },
                { "title": "Application", "value": n.workload_name, "short": false },
                { "title": INFO_LABEL, "value": n.info_text(), "short": false }
            ]
        }]
    })
}
