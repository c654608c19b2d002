use chrono::Duration;
use serde::Deserialize;

use crate::digest::formatter::OutputFormat;

/// Settings for a single run, resolved from flags, environment and the
/// optional config file, and validated before any request is made.
#[derive(Debug, Clone)]
pub struct Config {
    pub github: GithubConfig,
    pub thresholds: Thresholds,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub team: String,
    pub api_url: Option<String>,
    pub max_concurrent_requests: usize,
}

/// Ages after which a pending review shows up in the digest (`warn`) or is
/// escalated (`slo`). `warn <= slo` always holds once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub warn: Duration,
    pub slo: Duration,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// On-disk TOML layout. The access token is deliberately not accepted here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub github: FileGithubConfig,
    #[serde(default)]
    pub thresholds: FileThresholds,
    #[serde(default)]
    pub output: FileOutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileGithubConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub team: Option<String>,
    pub api_url: Option<String>,
    pub max_concurrent_requests: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileThresholds {
    pub warn_hours: Option<f64>,
    pub slo_hours: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
}

/// Values taken from command-line flags or their environment variables.
/// Anything set here wins over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub team: Option<String>,
    pub api_url: Option<String>,
    pub warn_hours: Option<f64>,
    pub slo_hours: Option<f64>,
    pub max_concurrent_requests: Option<usize>,
    pub format: Option<OutputFormat>,
}
