use chrono::{DateTime, Utc};
use octocrab::{Octocrab, Page};
use tracing::debug;

use super::types::{latest_team_review_request, IssueEvent, PullRequest};
use crate::config::GithubConfig;
use crate::error::{DigestError, Result};

const PER_PAGE: &str = "100";

pub struct GitHubClient {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(config.token.clone());
        if let Some(api_url) = &config.api_url {
            builder = builder.base_uri(api_url.as_str()).map_err(DigestError::Client)?;
        }
        let client = builder.build().map_err(DigestError::Client)?;

        Ok(Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        })
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Every open pull request in the repository, following pagination.
    pub async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let route = format!("/repos/{}/{}/pulls", self.owner, self.repo);
        let params = [("state", "open"), ("per_page", PER_PAGE)];

        let pulls = async {
            let first: Page<PullRequest> = self.client.get(&route, Some(&params)).await?;
            self.client.all_pages(first).await
        }
        .await
        .map_err(|source| DigestError::ListPullRequests {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            source,
        })?;

        debug!(count = pulls.len(), "fetched open pull requests");
        Ok(pulls)
    }

    pub async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>> {
        let route = format!("/repos/{}/{}/issues/{}/events", self.owner, self.repo, number);
        let params = [("per_page", PER_PAGE)];

        let events = async {
            let first: Page<IssueEvent> = self.client.get(&route, Some(&params)).await?;
            self.client.all_pages(first).await
        }
        .await
        .map_err(|source| DigestError::ListIssueEvents {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            number,
            source,
        })?;

        debug!(number, count = events.len(), "fetched issue events");
        Ok(events)
    }

    /// When `team` was last asked to review pull request `number`.
    pub async fn review_requested_at(
        &self,
        number: u64,
        team: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let events = self.list_issue_events(number).await?;
        Ok(latest_team_review_request(&events, team))
    }
}
