//! Fixture workspace shared by the integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tango_viz::{
    build_router, ApiState, InMemoryOpener, InMemoryWorkspace, Run, StepInfo, StepStatus,
    WorkspaceOpener,
};
use tower::ServiceExt;

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 10, day, hour, 0, 0).unwrap()
}

/// Five runs:
/// - `train`: prepare <- pretrain <- eval, registered out of order, all completed
/// - `mixed`: one failed, two completed
/// - `live`: one running step
/// - `tangled`: two steps depending on each other
/// - `empty`: no steps
pub fn demo_workspace() -> InMemoryWorkspace {
    let prepare = StepInfo::new("Preparing-002", StepStatus::Completed)
        .with_times(Some(at(1, 1)), Some(at(1, 2)))
        .with_result_location("local:///cache/Preparing-002");
    let pretrain = StepInfo::new("Pretraining-002", StepStatus::Completed)
        .with_dependencies(["Preparing-002"])
        .with_times(Some(at(1, 2)), Some(at(1, 5)));
    let eval = StepInfo::new("Eval-002", StepStatus::Completed)
        .with_dependencies(["Preparing-002", "Pretraining-002"])
        .with_times(Some(at(1, 5)), Some(at(1, 6)));
    let train = Run::new("train", at(1, 0))
        .with_step("eval", eval)
        .with_step("prepare", prepare)
        .with_step("pretrain", pretrain);

    let mixed = Run::new("mixed", at(2, 0))
        .with_step(
            "load",
            StepInfo::new("Load-7", StepStatus::Completed).with_times(Some(at(2, 1)), Some(at(2, 2))),
        )
        .with_step(
            "fit",
            StepInfo::new("Fit-7", StepStatus::Failed)
                .with_dependencies(["Load-7"])
                .with_times(Some(at(2, 2)), Some(at(2, 3))),
        )
        .with_step(
            "report",
            StepInfo::new("Report-7", StepStatus::Completed)
                .with_dependencies(["Load-7"])
                .with_times(Some(at(2, 3)), Some(at(2, 4))),
        );

    let live = Run::new("live", at(3, 0)).with_step(
        "stream",
        StepInfo::new("Stream-1", StepStatus::Running).with_times(Some(at(3, 1)), None),
    );

    let tangled = Run::new("tangled", at(4, 0))
        .with_step(
            "left",
            StepInfo::new("Left-1", StepStatus::Incomplete).with_dependencies(["Right-1"]),
        )
        .with_step(
            "right",
            StepInfo::new("Right-1", StepStatus::Incomplete).with_dependencies(["Left-1"]),
        );

    let empty = Run::new("empty", at(5, 0));

    InMemoryWorkspace::new("mem://demo")
        .with_run(train)
        .with_run(mixed)
        .with_run(live)
        .with_run(tangled)
        .with_run(empty)
}

pub fn demo_router() -> Router {
    let opener = InMemoryOpener::new().with_workspace("demo", demo_workspace());
    router_with(Arc::new(opener))
}

pub fn router_with(opener: Arc<dyn WorkspaceOpener>) -> Router {
    build_router(Arc::new(ApiState::new(opener, 8)))
}

/// Send a GET and return status plus raw body.
pub async fn get_raw(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

/// Send a GET and parse the JSON body.
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get_raw(router, uri).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("non-JSON body for {}: {} ({:?})", uri, e, String::from_utf8_lossy(&body)));
    (status, json)
}
