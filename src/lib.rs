//! Read-only HTTP API over a tracking workspace's runs and steps.
//!
//! The dashboard polls these endpoints to show runs, their derived status
//! and their steps in dependency order.
//!
//! ## Module Structure
//!
//! - `types`: step and run records as read from the workspace
//! - `status`: run status aggregation
//! - `ordering`: dependency ordering of a run's steps
//! - `workspace`: read interface, in-memory and snapshot backends
//! - `cache`: LRU cache of open workspaces
//! - `api`: request/response types, errors, handlers
//! - `server`: router and HTTP server
//! - `config`, `logging`, `util`: ambient plumbing

pub mod api;
pub mod cache;
pub mod config;
pub mod logging;
pub mod ordering;
pub mod server;
pub mod status;
pub mod types;
pub mod util;
pub mod workspace;

pub use api::{ApiError, ApiState};
pub use cache::{WorkspaceCache, DEFAULT_CACHE_CAPACITY};
pub use config::{LogFormat, ServerConfig};
pub use ordering::{ordered_step_infos, OrderingError};
pub use server::{build_router, VizServer};
pub use status::{summarize, RunStatus, RunSummary, StepCounts};
pub use types::{Run, StepInfo, StepStatus};
pub use workspace::{
    InMemoryOpener, InMemoryWorkspace, RunQuery, RunSort, SnapshotOpener, SnapshotWorkspace,
    StepInfoSort, StepQuery, Workspace, WorkspaceError, WorkspaceOpener, WorkspaceSnapshot,
};
