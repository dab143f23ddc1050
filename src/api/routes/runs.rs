//! Run endpoints.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use super::page_window;
use crate::api::errors::ApiError;
use crate::api::state::ApiState;
use crate::api::types::{GetRunOutput, GetWorkspaceRunsOutput, PartialRunInfo, RunPageQuery};
use crate::util::decode_identifier;
use crate::workspace::RunQuery;

/// GET /api/workspace/{wsid}/runs
///
/// One page of runs, filtered by `match` on the run name and sorted by
/// `sort_by`, plus the total number of matching runs.
pub async fn list_runs(
    State(state): State<Arc<ApiState>>,
    Path(wsid): Path<String>,
    query: Result<Query<RunPageQuery>, QueryRejection>,
) -> Result<Json<GetWorkspaceRunsOutput>, ApiError> {
    let Query(page) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (offset, limit) = page_window(page.current_page, page.page_size)?;
    let workspace = state.workspace(&wsid).await?;

    let runs = workspace.search_runs(&RunQuery {
        sort_by: page.sort_by,
        sort_descending: page.sort_descending,
        matching: page.matching.clone(),
        offset,
        limit,
    })?;
    let total_items = workspace.count_runs(page.matching.as_deref())?;
    debug!(workspace = %wsid, returned = runs.len(), total_items, "Listed runs");

    Ok(Json(GetWorkspaceRunsOutput {
        current_page: page.current_page,
        page_size: page.page_size,
        sort_by: page.sort_by,
        sort_descending: page.sort_descending,
        matching: page.matching,
        data: runs.iter().map(PartialRunInfo::from).collect(),
        total_items,
    }))
}

/// GET /api/workspace/{wsid}/run/{rid}
///
/// `rid` is the base64 encoded run name. Returns the run with its derived
/// status and its steps in dependency order.
pub async fn get_run(
    State(state): State<Arc<ApiState>>,
    Path((wsid, rid)): Path<(String, String)>,
) -> Result<Json<GetRunOutput>, ApiError> {
    let name = decode_identifier(&rid)?;
    let workspace = state.workspace(&wsid).await?;
    let run = workspace.get_run(&name)?;
    Ok(Json(GetRunOutput::from_run(&run)?))
}
