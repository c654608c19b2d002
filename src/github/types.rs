use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub slug: String,
}

/// The subset of `GET /repos/{owner}/{repo}/pulls` needed for the digest.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub requested_teams: Vec<Team>,
}

impl PullRequest {
    pub fn requests_team(&self, slug: &str) -> bool {
        self.requested_teams.iter().any(|team| team.slug == slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ReviewRequested,
    #[serde(other)]
    Other,
}

/// One entry of `GET /repos/{owner}/{repo}/issues/{number}/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEvent {
    pub event: EventKind,
    #[serde(default)]
    pub requested_team: Option<Team>,
    pub created_at: DateTime<Utc>,
}

/// Most recent instant at which `team` was asked to review, if ever.
pub fn latest_team_review_request(events: &[IssueEvent], team: &str) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter(|e| e.event == EventKind::ReviewRequested)
        .filter(|e| e.requested_team.as_ref().is_some_and(|t| t.slug == team))
        .map(|e| e.created_at)
        .max()
}
