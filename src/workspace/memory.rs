//! In-memory workspace.
//!
//! Backs the snapshot adapter and serves as the fake in tests.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{Workspace, WorkspaceError, WorkspaceOpener};
use crate::types::{Run, StepInfo};

#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspace {
    url: String,
    runs: IndexMap<String, Run>,
    steps: IndexMap<String, StepInfo>,
}

impl InMemoryWorkspace {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            runs: IndexMap::new(),
            steps: IndexMap::new(),
        }
    }

    /// Register a run; its steps are registered in the workspace too.
    pub fn with_run(mut self, run: Run) -> Self {
        for step in run.steps.values() {
            self.steps
                .entry(step.unique_id.clone())
                .or_insert_with(|| step.clone());
        }
        self.runs.insert(run.name.clone(), run);
        self
    }

    /// Register a step that may not belong to any run.
    pub fn with_step(mut self, step: StepInfo) -> Self {
        self.steps.insert(step.unique_id.clone(), step);
        self
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

impl Workspace for InMemoryWorkspace {
    fn url(&self) -> &str {
        &self.url
    }

    fn list_runs(&self) -> Result<Vec<Run>, WorkspaceError> {
        Ok(self.runs.values().cloned().collect())
    }

    fn get_run(&self, name: &str) -> Result<Run, WorkspaceError> {
        self.runs
            .get(name)
            .cloned()
            .ok_or_else(|| WorkspaceError::RunNotFound(name.to_string()))
    }

    fn list_steps(&self) -> Result<Vec<StepInfo>, WorkspaceError> {
        Ok(self.steps.values().cloned().collect())
    }

    fn get_step(&self, unique_id: &str) -> Result<StepInfo, WorkspaceError> {
        self.steps
            .get(unique_id)
            .cloned()
            .ok_or_else(|| WorkspaceError::StepNotFound(unique_id.to_string()))
    }
}

/// Opener over a fixed set of in-memory workspaces.
#[derive(Default)]
pub struct InMemoryOpener {
    workspaces: HashMap<String, Arc<dyn Workspace>>,
    opened: AtomicUsize,
}

impl InMemoryOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace(mut self, id: impl Into<String>, workspace: impl Workspace + 'static) -> Self {
        self.workspaces.insert(id.into(), Arc::new(workspace));
        self
    }

    /// Number of successful opens so far.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkspaceOpener for InMemoryOpener {
    async fn open(&self, id: &str) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        let workspace = self
            .workspaces
            .get(id)
            .cloned()
            .ok_or_else(|| WorkspaceError::WorkspaceNotFound(id.to_string()))?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(workspace)
    }
}
