//! Request and response types for the dashboard API.
//!
//! Field names are part of the contract with the dashboard front end
//! (`stepStatus`, `runStepInfos`, `match`, ...) and must not be renamed.

use chrono::{DateTime, Utc};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::ordering::{ordered_step_infos, OrderingError};
use crate::status::{summarize, RunStatus};
use crate::types::{Run, StepInfo, StepStatus};
use crate::workspace::{RunSort, StepInfoSort};

/// Page size used when the request does not give one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page a single request may ask for
pub const MAX_PAGE_SIZE: usize = 1000;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

/// The dashboard sends `sort_by=` before a column is picked.
fn empty_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(v) => T::deserialize(v.to_string().into_deserializer()),
    }
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => T::deserialize(v.to_string().into_deserializer()).map(Some),
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Query for `GET /api/workspace/{wsid}/runs`
#[derive(Debug, Clone, Deserialize)]
pub struct RunPageQuery {
    /// Zero-based page index
    #[serde(default)]
    pub current_page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub sort_by: RunSort,
    #[serde(default = "default_true")]
    pub sort_descending: bool,
    /// Only runs whose name contains this string
    #[serde(default, rename = "match", deserialize_with = "empty_as_none")]
    pub matching: Option<String>,
}

/// Query for `GET /api/workspace/{wsid}/steps`
#[derive(Debug, Clone, Deserialize)]
pub struct StepPageQuery {
    #[serde(default)]
    pub current_page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub sort_by: StepInfoSort,
    #[serde(default = "default_true")]
    pub sort_descending: bool,
    #[serde(default, rename = "match", deserialize_with = "empty_as_none")]
    pub matching: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<StepStatus>,
}

/// Output of `GET /api/workspace/{wsid}/runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetWorkspaceRunsOutput {
    pub current_page: usize,
    pub page_size: usize,
    pub sort_by: RunSort,
    pub sort_descending: bool,
    #[serde(rename = "match")]
    pub matching: Option<String>,
    pub data: Vec<PartialRunInfo>,
    pub total_items: usize,
}

/// Output of `GET /api/workspace/{wsid}/steps`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetWorkspaceStepsOutput {
    pub current_page: usize,
    pub page_size: usize,
    pub sort_by: StepInfoSort,
    pub sort_descending: bool,
    #[serde(rename = "match")]
    pub matching: Option<String>,
    pub status: Option<StepStatus>,
    pub data: Vec<StepInfoOutput>,
    pub total_items: usize,
}

// ============================================================================
// ENTITIES
// ============================================================================

/// Output of `GET /api/workspace/{wsid}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetWorkspaceOutput {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialRunInfo {
    pub name: String,
    pub started: Option<DateTime<Utc>>,
}

impl From<&Run> for PartialRunInfo {
    fn from(run: &Run) -> Self {
        Self {
            name: run.name.clone(),
            started: Some(run.start_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub name: String,
    pub status: RunStatus,
    /// Aggregated step counts, e.g. "2 running, 1 completed"
    #[serde(rename = "stepStatus")]
    pub step_status: String,
    pub started: DateTime<Utc>,
    pub ended: Option<DateTime<Utc>>,
}

impl From<&Run> for RunInfo {
    fn from(run: &Run) -> Self {
        let summary = summarize(run.steps.values());
        Self {
            name: run.name.clone(),
            status: summary.status,
            step_status: summary.step_status,
            started: run.start_date,
            ended: summary.ended,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfoOutput {
    pub id: String,
    pub status: StepStatus,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    /// Where the step's result is stored
    pub results: Option<String>,
    pub dependencies: Vec<String>,
}

impl From<&StepInfo> for StepInfoOutput {
    fn from(step: &StepInfo) -> Self {
        Self {
            id: step.unique_id.clone(),
            status: step.status,
            started: step.start_time,
            ended: step.end_time,
            results: step.result_location.clone(),
            dependencies: step.dependencies.clone(),
        }
    }
}

/// A step as listed inside a run, with its display position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStepInfo {
    #[serde(flatten)]
    pub step: StepInfoOutput,
    pub name: String,
    /// 1-based position in dependency order
    pub order: usize,
}

/// Output of `GET /api/workspace/{wsid}/run/{rid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRunOutput {
    #[serde(flatten)]
    pub run: RunInfo,
    #[serde(rename = "runStepInfos")]
    pub run_step_infos: Vec<RunStepInfo>,
}

impl GetRunOutput {
    pub fn from_run(run: &Run) -> Result<Self, OrderingError> {
        // step name inside the run, keyed by unique id
        let names: HashMap<&str, &str> = run
            .steps
            .iter()
            .map(|(name, step)| (step.unique_id.as_str(), name.as_str()))
            .collect();

        let run_step_infos = ordered_step_infos(run.steps.values())?
            .into_iter()
            .enumerate()
            .map(|(i, step)| RunStepInfo {
                step: StepInfoOutput::from(step),
                name: step
                    .step_name
                    .clone()
                    .or_else(|| names.get(step.unique_id.as_str()).map(|n| n.to_string()))
                    .unwrap_or_default(),
                order: i + 1,
            })
            .collect();

        Ok(Self {
            run: RunInfo::from(run),
            run_step_infos,
        })
    }
}

/// Output of `GET /api/workspace/{wsid}/step/{sid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetStepOutput {
    #[serde(flatten)]
    pub step: StepInfoOutput,
    /// Runs that include this step
    pub runs: Vec<RunInfo>,
}

/// Output of `GET /api/workspace/{wsid}/artifact/{aid}`
///
/// Artifact download is not served yet; only the request is echoed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub id: String,
    pub workspace: String,
    pub available: bool,
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: Option<String>,
}
