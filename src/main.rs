use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod digest;
mod error;
mod github;

use config::{FileConfig, Overrides};
use digest::OutputFormat;

#[derive(Parser)]
#[command(name = "review-digest")]
#[command(about = "Report pull requests that have waited too long for a team's review")]
#[command(version)]
struct Cli {
    /// GitHub token (can also be set via ACCESS_TOKEN or GITHUB_TOKEN)
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Fallback token, as exported by GitHub Actions
    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    github_token: Option<String>,

    /// Repository owner or organization
    #[arg(short, long, env = "OWNER")]
    owner: Option<String>,

    /// Repository name
    #[arg(short, long, env = "REPO")]
    repo: Option<String>,

    /// Team slug whose pending review requests are reported
    #[arg(short, long, env = "TEAM_IDENTIFIER")]
    team: Option<String>,

    /// Hours a review may wait before it is listed
    #[arg(long, env = "WARN_THRESHOLD_IN_HOURS")]
    warn_hours: Option<f64>,

    /// Hours a review may wait before it is escalated
    #[arg(long, env = "SLO_THRESHOLD_IN_HOURS")]
    slo_hours: Option<f64>,

    /// GitHub API base URL, for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Maximum number of issue-event lookups in flight
    #[arg(long, env = "MAX_CONCURRENT_REQUESTS")]
    concurrency: Option<usize>,

    /// Output format: slack, markdown or json
    #[arg(short = 'f', long, env = "DIGEST_FORMAT")]
    format: Option<OutputFormat>,

    /// Optional TOML config file; flags and environment take precedence
    #[arg(short, long, env = "REVIEW_DIGEST_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            token: self.token.clone().or_else(|| self.github_token.clone()),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            team: self.team.clone(),
            api_url: self.api_url.clone(),
            warn_hours: self.warn_hours,
            slo_hours: self.slo_hours,
            max_concurrent_requests: self.concurrency,
            format: self.format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the digest
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => FileConfig::default(),
    };
    let config = config::resolve(cli.overrides(), file)?;

    let now = chrono::Utc::now();
    let output = digest::generate(&config, now).await.with_context(|| {
        format!(
            "review digest for {}/{} failed",
            config.github.owner, config.github.repo
        )
    })?;

    println!("{}", output);

    Ok(())
}
