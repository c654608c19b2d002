pub mod types;

pub use types::{Config, FileConfig, GithubConfig, OutputConfig, Overrides, Thresholds};

use chrono::Duration;
use std::path::Path;
use tracing::debug;

use crate::error::{DigestError, Result};

pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

// 100 years keeps `now - threshold` well inside chrono's range.
const MAX_THRESHOLD_HOURS: f64 = 100.0 * 365.25 * 24.0;

/// Read and parse a TOML config file.
pub fn load_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| DigestError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str(&content).map_err(|source| DigestError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Merge overrides on top of the file config and validate the result.
///
/// All problems are collected so a misconfigured job reports everything it
/// needs fixed in one run.
pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Config> {
    let mut errors = Vec::new();

    let token = required(overrides.token, "access token", "--token / ACCESS_TOKEN", &mut errors);
    let owner = required(
        overrides.owner.or(file.github.owner),
        "repository owner",
        "--owner / OWNER / github.owner",
        &mut errors,
    );
    let repo = required(
        overrides.repo.or(file.github.repo),
        "repository name",
        "--repo / REPO / github.repo",
        &mut errors,
    );
    let team = required(
        overrides.team.or(file.github.team),
        "team identifier",
        "--team / TEAM_IDENTIFIER / github.team",
        &mut errors,
    );

    let warn = hours(
        overrides.warn_hours.or(file.thresholds.warn_hours),
        "warn threshold",
        "--warn-hours / WARN_THRESHOLD_IN_HOURS / thresholds.warn_hours",
        &mut errors,
    );
    let slo = hours(
        overrides.slo_hours.or(file.thresholds.slo_hours),
        "SLO threshold",
        "--slo-hours / SLO_THRESHOLD_IN_HOURS / thresholds.slo_hours",
        &mut errors,
    );
    if let (Some(warn), Some(slo)) = (warn, slo) {
        if warn > slo {
            errors.push(format!(
                "warn threshold ({}h) must not exceed SLO threshold ({}h)",
                warn.num_minutes() as f64 / 60.0,
                slo.num_minutes() as f64 / 60.0
            ));
        }
    }

    let max_concurrent_requests = overrides
        .max_concurrent_requests
        .or(file.github.max_concurrent_requests)
        .unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS);
    if max_concurrent_requests == 0 {
        errors.push("max concurrent requests must be at least 1".to_string());
    }

    let api_url = overrides
        .api_url
        .or(file.github.api_url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let format = overrides.format.or(file.output.format).unwrap_or_default();

    match (warn, slo) {
        (Some(warn), Some(slo)) if errors.is_empty() => Ok(Config {
            github: GithubConfig {
                token,
                owner,
                repo,
                team,
                api_url,
                max_concurrent_requests,
            },
            thresholds: Thresholds { warn, slo },
            output: OutputConfig { format },
        }),
        _ => Err(DigestError::Config(errors)),
    }
}

fn required(value: Option<String>, name: &str, hint: &str, errors: &mut Vec<String>) -> String {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            errors.push(format!("missing {} (set {})", name, hint));
            String::new()
        }
    }
}

fn hours(value: Option<f64>, name: &str, hint: &str, errors: &mut Vec<String>) -> Option<Duration> {
    match value {
        None => {
            errors.push(format!("missing {} (set {})", name, hint));
            None
        }
        Some(h) if !h.is_finite() || h < 0.0 => {
            errors.push(format!("{} must be a non-negative number of hours, got {}", name, h));
            None
        }
        Some(h) if h > MAX_THRESHOLD_HOURS => {
            errors.push(format!("{} of {}h is out of range", name, h));
            None
        }
        Some(h) => Some(Duration::milliseconds((h * 3_600_000.0).round() as i64)),
    }
}
