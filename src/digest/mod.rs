pub mod age;
pub mod builder;
pub mod cutoffs;
pub mod formatter;

pub use builder::DigestBuilder;
pub use cutoffs::Cutoffs;
pub use formatter::{DigestFormatter, OutputFormat};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubClient;

/// Fetch, date, filter and render the review digest for one repository.
pub async fn generate(config: &Config, now: DateTime<Utc>) -> Result<String> {
    let client = GitHubClient::new(&config.github)?;
    let cutoffs = Cutoffs::new(now, &config.thresholds);
    info!(
        owner = %config.github.owner,
        repo = %config.github.repo,
        warn_cutoff = %cutoffs.warn,
        slo_cutoff = %cutoffs.slo,
        "building review digest"
    );

    let pull_requests = client.list_open_pull_requests().await?;

    let team = config.github.team.as_str();
    let digest = DigestBuilder::new(team, cutoffs, config.github.max_concurrent_requests)
        .build(client.repo(), pull_requests, |number| client.review_requested_at(number, team))
        .await?;

    DigestFormatter::new(config.output.format).render(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GithubConfig, OutputConfig, Thresholds};
    use chrono::{Duration, TimeZone};
    use mockito::{Matcher, Server, ServerGuard};
    use pretty_assertions::assert_eq;

    fn config_for(server: &ServerGuard, format: OutputFormat) -> Config {
        Config {
            github: GithubConfig {
                token: "test-token".to_string(),
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
                team: "platform".to_string(),
                api_url: Some(server.url()),
                max_concurrent_requests: 2,
            },
            thresholds: Thresholds {
                warn: Duration::hours(72),
                slo: Duration::hours(168),
            },
            output: OutputConfig { format },
        }
    }

    async fn mock_events(server: &mut ServerGuard, number: u64, body: &str) -> mockito::Mock {
        server
            .mock("GET", format!("/repos/acme/widgets/issues/{}/events", number).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    async fn mock_repository(server: &mut ServerGuard) -> Vec<mockito::Mock> {
        let pulls = server
            .mock("GET", "/repos/acme/widgets/pulls")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"number": 42, "html_url": "https://github.com/acme/widgets/pull/42",
                     "title": "Rework storage", "requested_teams": [{"slug": "platform"}]},
                    {"number": 7, "html_url": "https://github.com/acme/widgets/pull/7",
                     "title": "Tweak logging", "requested_teams": [{"slug": "platform"}]},
                    {"number": 9, "html_url": "https://github.com/acme/widgets/pull/9",
                     "title": "Orphaned request", "requested_teams": [{"slug": "platform"}]},
                    {"number": 5, "html_url": "https://github.com/acme/widgets/pull/5",
                     "title": "Bump deps", "requested_teams": [{"slug": "platform"}]},
                    {"number": 3, "html_url": "https://github.com/acme/widgets/pull/3",
                     "title": "Frontend only", "requested_teams": [{"slug": "frontend"}]}
                ]"#,
            )
            .expect(1)
            .create_async()
            .await;

        vec![
            pulls,
            mock_events(
                server,
                42,
                r#"[{"event": "review_requested", "created_at": "2024-01-01T00:00:00Z",
                     "requested_team": {"slug": "platform"}}]"#,
            )
            .await,
            mock_events(
                server,
                7,
                r#"[{"event": "review_requested", "created_at": "2024-01-10T12:00:00Z",
                     "requested_team": {"slug": "platform"}}]"#,
            )
            .await,
            mock_events(
                server,
                9,
                r#"[{"event": "review_requested", "created_at": "2024-01-02T00:00:00Z",
                     "requested_reviewer": {"login": "octocat"}}]"#,
            )
            .await,
            mock_events(
                server,
                5,
                r#"[{"event": "review_requested", "created_at": "2024-01-06T00:00:00Z",
                     "requested_team": {"slug": "platform"}},
                    {"event": "labeled", "created_at": "2024-01-06T01:00:00Z"}]"#,
            )
            .await,
        ]
    }

    #[tokio::test]
    async fn test_generate_slack_digest() {
        let mut server = Server::new_async().await;
        let mocks = mock_repository(&mut server).await;
        let now = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();

        let output = generate(&config_for(&server, OutputFormat::Slack), now)
            .await
            .unwrap();

        for mock in &mocks {
            mock.assert_async().await;
        }
        assert_eq!(
            output,
            "*widgets reviews*\n\
             :rotating_light: <https://github.com/acme/widgets/pull/9|Orphaned request> - unknown\n\
             :rotating_light: <https://github.com/acme/widgets/pull/42|Rework storage> - 10 days\n\
             :warning: <https://github.com/acme/widgets/pull/5|Bump deps> - 5 days"
        );
    }

    #[tokio::test]
    async fn test_generate_is_repeatable() {
        let mut server = Server::new_async().await;
        let now = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
        let config = config_for(&server, OutputFormat::Markdown);

        let _mocks = mock_repository(&mut server).await;

        let first = generate(&config, now).await.unwrap();
        let second = generate(&config, now).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_generate_fails_when_listing_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/acme/widgets/pulls")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Resource not accessible by integration", "documentation_url": "https://docs.github.com/rest"}"#)
            .create_async()
            .await;

        let now = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
        let result = generate(&config_for(&server, OutputFormat::Slack), now).await;

        assert!(matches!(
            result,
            Err(crate::error::DigestError::ListPullRequests { .. })
        ));
    }
}
