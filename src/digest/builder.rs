use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::future::Future;
use tracing::{debug, info, warn};

use super::age::{format_distance, UNKNOWN_AGE};
use super::cutoffs::Cutoffs;
use crate::error::{DigestError, Result};
use crate::github::PullRequest;

/// A pull request waiting on the team, with how long it has waited.
///
/// `requested_at` is `None` when the pull request lists the team as a
/// reviewer but no matching `review_requested` event exists. Such records are
/// treated as infinitely old: always overdue, always in SLO violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewAgeRecord {
    pub number: u64,
    pub url: String,
    pub title: String,
    pub requested_at: Option<DateTime<Utc>>,
    pub age: String,
    pub slo_violated: bool,
}

impl ReviewAgeRecord {
    fn new(pr: PullRequest, requested_at: Option<DateTime<Utc>>, cutoffs: &Cutoffs) -> Self {
        let (age, slo_violated) = match requested_at {
            Some(at) => (format_distance(cutoffs.now - at), cutoffs.violates_slo(at)),
            None => (UNKNOWN_AGE.to_string(), true),
        };

        Self {
            number: pr.number,
            url: pr.html_url,
            title: pr.title,
            requested_at,
            age,
            slo_violated,
        }
    }

    fn is_overdue(&self, cutoffs: &Cutoffs) -> bool {
        self.requested_at.map_or(true, |at| cutoffs.is_overdue(at))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub repo: String,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ReviewAgeRecord>,
}

pub struct DigestBuilder {
    team: String,
    cutoffs: Cutoffs,
    max_concurrent_requests: usize,
}

impl DigestBuilder {
    /// `max_concurrent_requests` must be at least 1; `config::resolve`
    /// rejects zero, so callers pass the validated value straight through.
    pub fn new(team: impl Into<String>, cutoffs: Cutoffs, max_concurrent_requests: usize) -> Self {
        debug_assert!(max_concurrent_requests >= 1, "concurrency limit must be at least 1");
        Self {
            team: team.into(),
            cutoffs,
            max_concurrent_requests,
        }
    }

    /// Keep the pull requests waiting on the team, date each one through
    /// `resolve`, and return the overdue ones oldest first.
    ///
    /// At most `max_concurrent_requests` lookups run at once. The first
    /// failed lookup aborts the build.
    pub async fn build<F, Fut>(
        &self,
        repo: &str,
        pull_requests: Vec<PullRequest>,
        resolve: F,
    ) -> Result<Digest>
    where
        F: Fn(u64) -> Fut,
        Fut: Future<Output = Result<Option<DateTime<Utc>>>>,
    {
        let total = pull_requests.len();
        let relevant: Vec<PullRequest> = pull_requests
            .into_iter()
            .filter(|pr| pr.requests_team(&self.team))
            .collect();
        info!(total, relevant = relevant.len(), team = %self.team, "resolving review requests");

        let cutoffs = self.cutoffs;
        let records: Vec<ReviewAgeRecord> = stream::iter(relevant)
            .map(|pr| {
                let lookup = resolve(pr.number);
                async move {
                    let requested_at = lookup.await?;
                    match requested_at {
                        Some(at) => debug!(
                            number = pr.number,
                            requested_at = %at,
                            "resolved review request"
                        ),
                        None => warn!(
                            number = pr.number,
                            "team is requested but no review_requested event was found"
                        ),
                    }
                    Ok::<_, DigestError>(ReviewAgeRecord::new(pr, requested_at, &cutoffs))
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .try_collect()
            .await?;

        let mut records: Vec<ReviewAgeRecord> = records
            .into_iter()
            .filter(|record| record.is_overdue(&cutoffs))
            .collect();

        // Completion order is arbitrary; the number tie-break keeps output stable.
        records.sort_by(|a, b| {
            a.requested_at
                .cmp(&b.requested_at)
                .then(a.number.cmp(&b.number))
        });

        info!(overdue = records.len(), "digest built");

        Ok(Digest {
            repo: repo.to_string(),
            generated_at: cutoffs.now,
            records,
        })
    }
}
