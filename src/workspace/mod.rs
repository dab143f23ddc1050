//! Read interface to the tracking workspace.
//!
//! The workspace owns all run and step state. This crate only reads it
//! through the [`Workspace`] trait; handles are obtained from a
//! [`WorkspaceOpener`] and shared through the workspace cache.

pub mod memory;
pub mod snapshot;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

use crate::types::{Run, StepInfo, StepStatus};

pub use memory::{InMemoryOpener, InMemoryWorkspace};
pub use snapshot::{SnapshotOpener, SnapshotWorkspace, WorkspaceSnapshot};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Workspace '{0}' not found")]
    WorkspaceNotFound(String),
    #[error("Run '{0}' not found")]
    RunNotFound(String),
    #[error("Step '{0}' not found")]
    StepNotFound(String),
    #[error("Invalid workspace identifier: {0}")]
    InvalidIdentifier(String),
    /// The backend cannot serve this sort/filter combination.
    #[error("{0}")]
    Unsupported(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt workspace data: {0}")]
    Corrupt(String),
}

impl WorkspaceError {
    /// Short name of the failure, reported alongside internal errors.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkspaceError::WorkspaceNotFound(_) => "WorkspaceNotFound",
            WorkspaceError::RunNotFound(_) => "RunNotFound",
            WorkspaceError::StepNotFound(_) => "StepNotFound",
            WorkspaceError::InvalidIdentifier(_) => "InvalidIdentifier",
            WorkspaceError::Unsupported(_) => "Unsupported",
            WorkspaceError::Io(_) => "IoError",
            WorkspaceError::Corrupt(_) => "CorruptWorkspace",
        }
    }
}

impl From<serde_json::Error> for WorkspaceError {
    fn from(e: serde_json::Error) -> Self {
        WorkspaceError::Corrupt(e.to_string())
    }
}

/// Sort keys for run searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunSort {
    Name,
    #[default]
    StartDate,
}

/// Sort keys for step searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepInfoSort {
    UniqueId,
    #[default]
    StartTime,
}

/// One page of a run search.
#[derive(Debug, Clone, Default)]
pub struct RunQuery {
    pub sort_by: RunSort,
    pub sort_descending: bool,
    /// Only runs whose name contains this string
    pub matching: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

/// One page of a step search.
#[derive(Debug, Clone, Default)]
pub struct StepQuery {
    pub sort_by: StepInfoSort,
    pub sort_descending: bool,
    /// Only steps whose unique id contains this string
    pub matching: Option<String>,
    pub status: Option<StepStatus>,
    pub offset: usize,
    pub limit: usize,
}

fn run_matches(run: &Run, matching: Option<&str>) -> bool {
    matching.map_or(true, |m| run.name.contains(m))
}

fn step_matches(step: &StepInfo, matching: Option<&str>, status: Option<StepStatus>) -> bool {
    matching.map_or(true, |m| step.unique_id.contains(m))
        && status.map_or(true, |s| step.status == s)
}

fn directed(ordering: Ordering, descending: bool) -> Ordering {
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Read access to one workspace.
///
/// The search and count methods have in-memory implementations built on the
/// listing methods; backends with native querying should override them and
/// may return [`WorkspaceError::Unsupported`] for combinations they cannot
/// serve.
pub trait Workspace: Send + Sync {
    /// Identifier the workspace was opened with
    fn url(&self) -> &str;

    fn list_runs(&self) -> Result<Vec<Run>, WorkspaceError>;

    fn get_run(&self, name: &str) -> Result<Run, WorkspaceError>;

    fn list_steps(&self) -> Result<Vec<StepInfo>, WorkspaceError>;

    fn get_step(&self, unique_id: &str) -> Result<StepInfo, WorkspaceError>;

    fn search_runs(&self, query: &RunQuery) -> Result<Vec<Run>, WorkspaceError> {
        let mut runs: Vec<Run> = self
            .list_runs()?
            .into_iter()
            .filter(|r| run_matches(r, query.matching.as_deref()))
            .collect();

        runs.sort_by(|a, b| {
            let ord = match query.sort_by {
                RunSort::Name => a.name.cmp(&b.name),
                RunSort::StartDate => a.start_date.cmp(&b.start_date),
            };
            directed(ord, query.sort_descending)
        });

        Ok(runs.into_iter().skip(query.offset).take(query.limit).collect())
    }

    fn count_runs(&self, matching: Option<&str>) -> Result<usize, WorkspaceError> {
        Ok(self
            .list_runs()?
            .iter()
            .filter(|r| run_matches(r, matching))
            .count())
    }

    fn search_steps(&self, query: &StepQuery) -> Result<Vec<StepInfo>, WorkspaceError> {
        let mut steps: Vec<StepInfo> = self
            .list_steps()?
            .into_iter()
            .filter(|s| step_matches(s, query.matching.as_deref(), query.status))
            .collect();

        steps.sort_by(|a, b| {
            let ord = match query.sort_by {
                StepInfoSort::UniqueId => a.unique_id.cmp(&b.unique_id),
                StepInfoSort::StartTime => a.start_time.cmp(&b.start_time),
            };
            directed(ord, query.sort_descending)
        });

        Ok(steps.into_iter().skip(query.offset).take(query.limit).collect())
    }

    fn count_steps(
        &self,
        matching: Option<&str>,
        status: Option<StepStatus>,
    ) -> Result<usize, WorkspaceError> {
        Ok(self
            .list_steps()?
            .iter()
            .filter(|s| step_matches(s, matching, status))
            .count())
    }

    /// Runs that include the step with this unique id.
    fn runs_containing_step(&self, unique_id: &str) -> Result<Vec<Run>, WorkspaceError> {
        Ok(self
            .list_runs()?
            .into_iter()
            .filter(|r| r.contains_step(unique_id))
            .collect())
    }
}

/// Opens workspaces by identifier.
#[async_trait]
pub trait WorkspaceOpener: Send + Sync {
    async fn open(&self, id: &str) -> Result<Arc<dyn Workspace>, WorkspaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn workspace() -> InMemoryWorkspace {
        let mut ws = InMemoryWorkspace::new("mem://test");
        for (i, name) in ["delta", "alpha", "charlie", "bravo", "echo"].iter().enumerate() {
            let start = Utc.with_ymd_and_hms(2022, 10, 1 + i as u32, 0, 0, 0).unwrap();
            let step = StepInfo::new(format!("{}-step", name), StepStatus::Completed)
                .with_times(Some(start), None);
            ws = ws.with_run(Run::new(*name, start).with_step("only", step));
        }
        ws.with_step(StepInfo::new("orphan-running", StepStatus::Running))
    }

    #[test]
    fn test_search_runs_by_name_ascending() {
        let ws = workspace();
        let runs = ws
            .search_runs(&RunQuery {
                sort_by: RunSort::Name,
                sort_descending: false,
                matching: None,
                offset: 1,
                limit: 2,
            })
            .unwrap();
        let names: Vec<_> = runs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bravo", "charlie"]);
    }

    #[test]
    fn test_search_runs_by_start_date_descending() {
        let ws = workspace();
        let runs = ws
            .search_runs(&RunQuery {
                sort_descending: true,
                limit: 10,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(runs.first().unwrap().name, "echo");
        assert_eq!(runs.last().unwrap().name, "delta");
    }

    #[test]
    fn test_run_match_filter_and_count() {
        let ws = workspace();
        assert_eq!(ws.count_runs(Some("ha")).unwrap(), 2);
        assert_eq!(ws.count_runs(None).unwrap(), 5);
    }

    #[test]
    fn test_step_status_filter() {
        let ws = workspace();
        let steps = ws
            .search_steps(&StepQuery {
                status: Some(StepStatus::Running),
                limit: 10,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].unique_id, "orphan-running");
        assert_eq!(ws.count_steps(Some("step"), None).unwrap(), 5);
        assert_eq!(
            ws.count_steps(Some("step"), Some(StepStatus::Running)).unwrap(),
            0
        );
    }

    #[test]
    fn test_runs_containing_step() {
        let ws = workspace();
        let runs = ws.runs_containing_step("bravo-step").unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].name, "bravo");
        assert!(ws.runs_containing_step("orphan-running").unwrap().is_empty());
    }

    #[test]
    fn test_sort_keys_deserialize_snake_case() {
        let sort: RunSort = serde_json::from_str("\"start_date\"").unwrap();
        assert_eq!(sort, RunSort::StartDate);
        let sort: StepInfoSort = serde_json::from_str("\"unique_id\"").unwrap();
        assert_eq!(sort, StepInfoSort::UniqueId);
        assert!(serde_json::from_str::<RunSort>("\"status\"").is_err());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            WorkspaceError::RunNotFound("x".into()).kind(),
            "RunNotFound"
        );
        let err: WorkspaceError = serde_json::from_str::<RunSort>("{").unwrap_err().into();
        assert_eq!(err.kind(), "CorruptWorkspace");
    }
}
