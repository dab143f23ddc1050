//! JSON snapshot workspaces.
//!
//! A workspace `<id>` is the file `<root>/<id>.json`:
//!
//! ```json
//! {
//!   "url": "local:///experiments/ws",
//!   "runs": [
//!     { "name": "run-1", "start_date": "2022-10-20T19:45:00Z",
//!       "steps": { "prepare": "Preparing-002rep" } }
//!   ],
//!   "steps": [
//!     { "unique_id": "Preparing-002rep", "status": "completed", "dependencies": [] }
//!   ]
//! }
//! ```
//!
//! Opened handles re-read the file whenever its modification time or length
//! changes, so the dashboard sees updates without reopening.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

use super::{InMemoryWorkspace, Workspace, WorkspaceError, WorkspaceOpener};
use crate::types::{Run, StepInfo};

#[derive(Debug, Clone, Deserialize)]
pub struct RunRecord {
    pub name: String,
    pub start_date: DateTime<Utc>,
    /// Step name within the run -> step unique id
    #[serde(default)]
    pub steps: IndexMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub runs: Vec<RunRecord>,
    #[serde(default)]
    pub steps: Vec<StepInfo>,
}

impl WorkspaceSnapshot {
    pub fn from_json(data: &[u8]) -> Result<Self, WorkspaceError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Resolve run step references and build a workspace.
    ///
    /// `fallback_url` is used when the snapshot does not name itself.
    pub fn into_workspace(self, fallback_url: &str) -> Result<InMemoryWorkspace, WorkspaceError> {
        let url = self.url.unwrap_or_else(|| fallback_url.to_string());
        let by_id: HashMap<&str, &StepInfo> = self
            .steps
            .iter()
            .map(|s| (s.unique_id.as_str(), s))
            .collect();

        let mut runs = Vec::with_capacity(self.runs.len());
        for record in &self.runs {
            let mut run = Run::new(record.name.clone(), record.start_date);
            for (step_name, unique_id) in &record.steps {
                let step = by_id.get(unique_id.as_str()).ok_or_else(|| {
                    WorkspaceError::Corrupt(format!(
                        "run '{}' references unknown step '{}'",
                        record.name, unique_id
                    ))
                })?;
                let mut step = (*step).clone();
                if step.step_name.is_none() {
                    step.step_name = Some(step_name.clone());
                }
                run.steps.insert(step_name.clone(), step);
            }
            runs.push(run);
        }

        let mut workspace = InMemoryWorkspace::new(url);
        for step in self.steps {
            workspace = workspace.with_step(step);
        }
        for run in runs {
            workspace = workspace.with_run(run);
        }
        Ok(workspace)
    }
}

/// Opens snapshot files from a directory.
#[derive(Debug, Clone)]
pub struct SnapshotOpener {
    root: PathBuf,
}

impl SnapshotOpener {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, WorkspaceError> {
        let valid = !id.is_empty()
            && !id.starts_with('.')
            && !id.contains(['/', '\\'])
            && !id.contains("..");
        if !valid {
            return Err(WorkspaceError::InvalidIdentifier(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }
}

fn read_error(id: &str, e: std::io::Error) -> WorkspaceError {
    if e.kind() == std::io::ErrorKind::NotFound {
        WorkspaceError::WorkspaceNotFound(id.to_string())
    } else {
        e.into()
    }
}

/// Modification time and length of a snapshot file when it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(metadata: &Metadata) -> Self {
        Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        }
    }
}

struct Loaded {
    stamp: FileStamp,
    workspace: Arc<InMemoryWorkspace>,
}

/// Workspace backed by a snapshot file.
///
/// Every read checks the file's stamp and reloads it when the file changed,
/// so a cached handle follows the file. `url` is fixed at open time.
pub struct SnapshotWorkspace {
    id: String,
    path: PathBuf,
    url: String,
    loaded: RwLock<Loaded>,
}

impl SnapshotWorkspace {
    fn new(id: &str, path: PathBuf, stamp: FileStamp, workspace: InMemoryWorkspace) -> Self {
        Self {
            id: id.to_string(),
            path,
            url: workspace.url().to_string(),
            loaded: RwLock::new(Loaded {
                stamp,
                workspace: Arc::new(workspace),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded workspace, re-read first if the file changed.
    fn current(&self) -> Result<Arc<InMemoryWorkspace>, WorkspaceError> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| read_error(&self.id, e))?;
        let stamp = FileStamp::of(&metadata);
        {
            let loaded = self.loaded.read();
            if loaded.stamp == stamp {
                return Ok(loaded.workspace.clone());
            }
        }

        let data = std::fs::read(&self.path).map_err(|e| read_error(&self.id, e))?;
        let workspace = Arc::new(WorkspaceSnapshot::from_json(&data)?.into_workspace(&self.id)?);
        info!(
            workspace = %self.id,
            runs = workspace.run_count(),
            steps = workspace.step_count(),
            "Reloaded workspace snapshot"
        );
        *self.loaded.write() = Loaded {
            stamp,
            workspace: workspace.clone(),
        };
        Ok(workspace)
    }
}

impl Workspace for SnapshotWorkspace {
    fn url(&self) -> &str {
        &self.url
    }

    fn list_runs(&self) -> Result<Vec<Run>, WorkspaceError> {
        self.current()?.list_runs()
    }

    fn get_run(&self, name: &str) -> Result<Run, WorkspaceError> {
        self.current()?.get_run(name)
    }

    fn list_steps(&self) -> Result<Vec<StepInfo>, WorkspaceError> {
        self.current()?.list_steps()
    }

    fn get_step(&self, unique_id: &str) -> Result<StepInfo, WorkspaceError> {
        self.current()?.get_step(unique_id)
    }
}

#[async_trait]
impl WorkspaceOpener for SnapshotOpener {
    async fn open(&self, id: &str) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        let path = self.path_for(id)?;
        debug!("Loading workspace snapshot {}", path.display());

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| read_error(id, e))?;
        let data = tokio::fs::read(&path).await.map_err(|e| read_error(id, e))?;

        let workspace = WorkspaceSnapshot::from_json(&data)?.into_workspace(id)?;
        info!(
            workspace = id,
            runs = workspace.run_count(),
            steps = workspace.step_count(),
            "Opened workspace snapshot"
        );
        Ok(Arc::new(SnapshotWorkspace::new(
            id,
            path,
            FileStamp::of(&metadata),
            workspace,
        )))
    }
}
