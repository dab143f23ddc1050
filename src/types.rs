//! Workspace record types.
//!
//! These mirror what the tracking workspace stores for each run and step.
//! They are read-only views: the workspace stays the source of truth.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not started yet, or stopped before finishing.
    #[serde(alias = "INCOMPLETE")]
    Incomplete,
    #[serde(alias = "RUNNING")]
    Running,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "FAILED")]
    Failed,
    /// Results are never cached, so the step has no lasting state.
    #[serde(alias = "UNCACHEABLE")]
    Uncacheable,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Incomplete => "incomplete",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Uncacheable => "uncacheable",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step as recorded by the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Workspace-wide identifier
    pub unique_id: String,
    /// Name the step was given inside the run that registered it
    #[serde(default)]
    pub step_name: Option<String>,
    #[serde(alias = "state")]
    pub status: StepStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result_location: Option<String>,
    /// Unique ids of the steps this one consumes
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl StepInfo {
    pub fn new(unique_id: impl Into<String>, status: StepStatus) -> Self {
        Self {
            unique_id: unique_id.into(),
            step_name: None,
            status,
            start_time: None,
            end_time: None,
            result_location: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.step_name = Some(name.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dep in deps {
            let dep = dep.into();
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }

    pub fn with_times(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    pub fn with_result_location(mut self, location: impl Into<String>) -> Self {
        self.result_location = Some(location.into());
        self
    }
}

/// A named execution of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub name: String,
    pub start_date: DateTime<Utc>,
    /// Step name within the run -> step record, in registration order
    pub steps: IndexMap<String, StepInfo>,
}

impl Run {
    pub fn new(name: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            start_date,
            steps: IndexMap::new(),
        }
    }

    pub fn with_step(mut self, step_name: impl Into<String>, step: StepInfo) -> Self {
        self.steps.insert(step_name.into(), step);
        self
    }

    /// Whether a step with this unique id belongs to the run.
    pub fn contains_step(&self, unique_id: &str) -> bool {
        self.steps.values().any(|s| s.unique_id == unique_id)
    }
}
