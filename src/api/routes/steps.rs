//! Step endpoints.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use super::page_window;
use crate::api::errors::ApiError;
use crate::api::state::ApiState;
use crate::api::types::{
    GetStepOutput, GetWorkspaceStepsOutput, RunInfo, StepInfoOutput, StepPageQuery,
};
use crate::util::decode_identifier;
use crate::workspace::StepQuery;

/// GET /api/workspace/{wsid}/steps
///
/// One page of steps, filtered by `match` on the unique id and optionally
/// by `status`, plus the total number of matching steps.
pub async fn list_steps(
    State(state): State<Arc<ApiState>>,
    Path(wsid): Path<String>,
    query: Result<Query<StepPageQuery>, QueryRejection>,
) -> Result<Json<GetWorkspaceStepsOutput>, ApiError> {
    let Query(page) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (offset, limit) = page_window(page.current_page, page.page_size)?;
    let workspace = state.workspace(&wsid).await?;

    let steps = workspace.search_steps(&StepQuery {
        sort_by: page.sort_by,
        sort_descending: page.sort_descending,
        matching: page.matching.clone(),
        status: page.status,
        offset,
        limit,
    })?;
    let total_items = workspace.count_steps(page.matching.as_deref(), page.status)?;
    debug!(workspace = %wsid, returned = steps.len(), total_items, "Listed steps");

    Ok(Json(GetWorkspaceStepsOutput {
        current_page: page.current_page,
        page_size: page.page_size,
        sort_by: page.sort_by,
        sort_descending: page.sort_descending,
        matching: page.matching,
        status: page.status,
        data: steps.iter().map(StepInfoOutput::from).collect(),
        total_items,
    }))
}

/// GET /api/workspace/{wsid}/step/{sid}
///
/// `sid` is the base64 encoded step unique id.
pub async fn get_step(
    State(state): State<Arc<ApiState>>,
    Path((wsid, sid)): Path<(String, String)>,
) -> Result<Json<GetStepOutput>, ApiError> {
    let unique_id = decode_identifier(&sid)?;
    let workspace = state.workspace(&wsid).await?;
    let step = workspace.get_step(&unique_id)?;
    let runs = workspace.runs_containing_step(&unique_id)?;

    Ok(Json(GetStepOutput {
        step: StepInfoOutput::from(&step),
        runs: runs.iter().map(RunInfo::from).collect(),
    }))
}
