use chrono::{DateTime, Utc};

use crate::config::Thresholds;

/// Absolute staleness boundaries derived from `now` and the configured
/// thresholds. Anything requested before `warn` is overdue, before `slo`
/// is in violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoffs {
    pub now: DateTime<Utc>,
    pub warn: DateTime<Utc>,
    pub slo: DateTime<Utc>,
}

impl Cutoffs {
    pub fn new(now: DateTime<Utc>, thresholds: &Thresholds) -> Self {
        Self {
            now,
            warn: now - thresholds.warn,
            slo: now - thresholds.slo,
        }
    }

    pub fn is_overdue(&self, requested_at: DateTime<Utc>) -> bool {
        requested_at < self.warn
    }

    pub fn violates_slo(&self, requested_at: DateTime<Utc>) -> bool {
        requested_at < self.slo
    }
}
