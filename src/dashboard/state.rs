use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::ApiError;
use crate::models::Submission;

use super::DashboardStats;

/// Non-blocking indicator shown next to the data.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ListStatus {
    /// No fetch has resolved yet.
    Loading,
    Live,
    /// The latest fetch failed; the rows are from the last good fetch.
    Stale { error: String, since: DateTime<Utc> },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub submissions: Vec<Submission>,
    pub stats: DashboardStats,
    pub status: ListStatus,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            submissions: Vec::new(),
            stats: DashboardStats::default(),
            status: ListStatus::Loading,
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Replaced,
    MarkedStale,
    /// An equal or newer response was already applied.
    Discarded,
}

/// Dashboard data plus the sequence watermark that orders responses.
#[derive(Debug, Default)]
pub struct DashboardState {
    snapshot: DashboardSnapshot,
    last_applied_seq: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    /// Applies the result of request `seq`. Results older than the last
    /// applied one are dropped, whether they succeeded or failed.
    pub fn apply(
        &mut self,
        seq: u64,
        result: Result<Vec<Submission>, ApiError>,
        now: DateTime<Utc>,
    ) -> ApplyOutcome {
        if seq <= self.last_applied_seq {
            return ApplyOutcome::Discarded;
        }
        self.last_applied_seq = seq;

        match result {
            Ok(submissions) => {
                self.snapshot = DashboardSnapshot {
                    stats: DashboardStats::compute(&submissions),
                    submissions,
                    status: ListStatus::Live,
                    last_updated: Some(now),
                };
                ApplyOutcome::Replaced
            }
            Err(err) => {
                let since = match &self.snapshot.status {
                    ListStatus::Stale { since, .. } => *since,
                    _ => now,
                };
                self.snapshot.status = ListStatus::Stale {
                    error: err.to_string(),
                    since,
                };
                ApplyOutcome::MarkedStale
            }
        }
    }
}
