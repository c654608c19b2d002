use serde::Deserialize;

use super::builder::{Digest, ReviewAgeRecord};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Slack mrkdwn, ready to post from a scheduled job.
    #[default]
    Slack,
    Markdown,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slack" | "mrkdwn" => Ok(OutputFormat::Slack),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub struct DigestFormatter {
    format: OutputFormat,
}

impl DigestFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, digest: &Digest) -> Result<String> {
        match self.format {
            OutputFormat::Slack => Ok(self.render_slack(digest)),
            OutputFormat::Markdown => Ok(self.render_markdown(digest)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(digest)?),
        }
    }

    fn render_slack(&self, digest: &Digest) -> String {
        let mut lines = vec![format!("*{} reviews*", digest.repo)];
        lines.extend(digest.records.iter().map(|record| {
            let marker = if record.slo_violated {
                ":rotating_light:"
            } else {
                ":warning:"
            };
            format!(
                "{} <{}|{}> - {}",
                marker,
                record.url,
                escape_slack(&record.title),
                record.age
            )
        }));
        lines.join("\n")
    }

    fn render_markdown(&self, digest: &Digest) -> String {
        let mut lines = vec![format!("**{} reviews**", digest.repo)];
        lines.extend(digest.records.iter().map(|record| {
            format!(
                "- {} [{}]({}) - {}",
                markdown_marker(record),
                escape_markdown_link_text(&record.title),
                record.url,
                record.age
            )
        }));
        lines.join("\n")
    }
}

fn markdown_marker(record: &ReviewAgeRecord) -> &'static str {
    if record.slo_violated {
        "🚨"
    } else {
        "⚠️"
    }
}

// Slack only requires these three to be escaped inside message text.
fn escape_slack(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_markdown_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
