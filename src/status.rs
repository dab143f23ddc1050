//! Run status aggregation.
//!
//! A run has no status of its own; it is derived from the states of its
//! steps every time the run is displayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{StepInfo, StepStatus};

/// Aggregate status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The run hasn't started or was stopped early.
    Incomplete,
    /// Some steps are still running.
    Running,
    /// All cacheable steps completed successfully.
    Completed,
    /// At least one step failed.
    Failed,
    /// All steps are uncacheable, so there is no status.
    Uncacheable,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Incomplete => "incomplete",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Uncacheable => "uncacheable",
        };
        f.write_str(s)
    }
}

/// Per-status step counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounts {
    pub running: usize,
    pub failed: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub uncacheable: usize,
}

impl StepCounts {
    pub fn record(&mut self, status: StepStatus) {
        match status {
            StepStatus::Running => self.running += 1,
            StepStatus::Failed => self.failed += 1,
            StepStatus::Completed => self.completed += 1,
            StepStatus::Incomplete => self.incomplete += 1,
            StepStatus::Uncacheable => self.uncacheable += 1,
        }
    }

    /// Human readable summary, e.g. `"2 running, 1 failed"`.
    ///
    /// Uncacheable steps are left out.
    pub fn summary(&self) -> String {
        [
            (self.running, "running"),
            (self.failed, "failed"),
            (self.completed, "completed"),
            (self.incomplete, "incomplete"),
        ]
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// First matching rule wins. A failed step keeps the run `Running`.
    pub fn status(&self) -> RunStatus {
        if self.failed > 0 {
            RunStatus::Running
        } else if self.running > 0 {
            RunStatus::Running
        } else if self.incomplete > 0 {
            RunStatus::Incomplete
        } else if self.completed > 0 {
            RunStatus::Completed
        } else if self.uncacheable > 0 {
            RunStatus::Uncacheable
        } else {
            RunStatus::Completed
        }
    }

    /// A run with running or incomplete steps has not ended.
    pub fn is_unfinished(&self) -> bool {
        self.running > 0 || self.incomplete > 0
    }
}

/// Result of aggregating a run's steps.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub step_status: String,
    pub ended: Option<DateTime<Utc>>,
    pub counts: StepCounts,
}

/// Aggregate the steps of a run into a status, a summary line and an end time.
pub fn summarize<'a, I>(steps: I) -> RunSummary
where
    I: IntoIterator<Item = &'a StepInfo>,
{
    let mut counts = StepCounts::default();
    let mut ended: Option<DateTime<Utc>> = None;

    for step in steps {
        counts.record(step.status);
        if let Some(end) = step.end_time {
            ended = Some(ended.map_or(end, |e| e.max(end)));
        }
    }

    if counts.is_unfinished() {
        ended = None;
    }

    RunSummary {
        status: counts.status(),
        step_status: counts.summary(),
        ended,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 10, 20, hour, 0, 0).unwrap()
    }

    fn step(id: &str, status: StepStatus, end: Option<DateTime<Utc>>) -> StepInfo {
        StepInfo::new(id, status).with_times(None, end)
    }

    #[test]
    fn test_empty_run_is_completed() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary.status, RunStatus::Completed);
        assert_eq!(summary.step_status, "");
        assert!(summary.ended.is_none());
    }

    #[test]
    fn test_failed_keeps_run_running() {
        let steps = vec![
            step("a", StepStatus::Failed, Some(at(1))),
            step("b", StepStatus::Completed, Some(at(2))),
            step("c", StepStatus::Completed, Some(at(3))),
        ];
        let summary = summarize(&steps);
        assert_eq!(summary.status, RunStatus::Running);
        assert_eq!(summary.step_status, "1 failed, 2 completed");
        assert_eq!(summary.ended, Some(at(3)));
    }

    #[test]
    fn test_summary_bucket_order() {
        let steps = vec![
            step("a", StepStatus::Incomplete, None),
            step("b", StepStatus::Completed, None),
            step("c", StepStatus::Failed, None),
            step("d", StepStatus::Running, None),
            step("e", StepStatus::Running, None),
        ];
        let summary = summarize(&steps);
        assert_eq!(
            summary.step_status,
            "2 running, 1 failed, 1 completed, 1 incomplete"
        );
    }

    #[test]
    fn test_uncacheable_never_in_summary() {
        let steps = vec![
            step("a", StepStatus::Uncacheable, Some(at(4))),
            step("b", StepStatus::Uncacheable, None),
        ];
        let summary = summarize(&steps);
        assert_eq!(summary.status, RunStatus::Uncacheable);
        assert_eq!(summary.step_status, "");
        assert_eq!(summary.ended, Some(at(4)));

        let mixed = vec![
            step("a", StepStatus::Uncacheable, None),
            step("b", StepStatus::Completed, None),
        ];
        let summary = summarize(&mixed);
        assert_eq!(summary.status, RunStatus::Completed);
        assert_eq!(summary.step_status, "1 completed");
    }

    #[test]
    fn test_running_or_incomplete_clears_end() {
        let running = vec![
            step("a", StepStatus::Completed, Some(at(5))),
            step("b", StepStatus::Running, Some(at(6))),
        ];
        assert!(summarize(&running).ended.is_none());

        let incomplete = vec![
            step("a", StepStatus::Completed, Some(at(5))),
            step("b", StepStatus::Incomplete, Some(at(6))),
        ];
        let summary = summarize(&incomplete);
        assert!(summary.ended.is_none());
        assert_eq!(summary.status, RunStatus::Incomplete);
    }

    #[test]
    fn test_all_completed_ends_at_latest() {
        let steps = vec![
            step("a", StepStatus::Completed, Some(at(7))),
            step("b", StepStatus::Completed, Some(at(9))),
            step("c", StepStatus::Completed, Some(at(8))),
        ];
        let summary = summarize(&steps);
        assert_eq!(summary.status, RunStatus::Completed);
        assert_eq!(summary.ended, Some(at(9)));
        assert_eq!(summary.counts.completed, 3);
    }

    #[test]
    fn test_summary_lists_each_nonzero_bucket_once() {
        let statuses = [
            StepStatus::Running,
            StepStatus::Failed,
            StepStatus::Completed,
            StepStatus::Incomplete,
            StepStatus::Uncacheable,
        ];
        // every subset of statuses, each present status appearing once
        for mask in 0u32..(1 << statuses.len()) {
            let steps: Vec<StepInfo> = statuses
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(i, s)| step(&i.to_string(), *s, None))
                .collect();
            let summary = summarize(&steps);
            let parts: Vec<&str> = if summary.step_status.is_empty() {
                Vec::new()
            } else {
                summary.step_status.split(", ").collect()
            };
            let expected: Vec<String> = statuses[..4]
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| format!("1 {}", s))
                .collect();
            assert_eq!(parts, expected, "mask {:05b}", mask);
            assert!(!summary.step_status.contains("uncacheable"));
        }
    }
}
