//! Workspace handle cache
//!
//! Keeps recently opened workspaces so repeated dashboard polls do not reopen
//! them. Fixed capacity with least-recently-used eviction; the map's order is
//! the recency order (front = least recent).

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::workspace::{Workspace, WorkspaceError, WorkspaceOpener};

/// Default number of open workspaces kept
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

pub struct WorkspaceCache {
    capacity: usize,
    entries: Mutex<IndexMap<String, Arc<dyn Workspace>>>,
}

impl WorkspaceCache {
    /// Create a cache. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(IndexMap::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Check membership without touching recency.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Look up a handle and mark it most recently used.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Workspace>> {
        let mut entries = self.entries.lock();
        let index = entries.get_index_of(id)?;
        let last = entries.len() - 1;
        entries.move_index(index, last);
        entries.get_index(last).map(|(_, ws)| ws.clone())
    }

    /// Insert a handle, evicting the least recently used one when full.
    ///
    /// If the id is already cached the existing handle is kept and returned.
    pub fn insert(&self, id: &str, workspace: Arc<dyn Workspace>) -> Arc<dyn Workspace> {
        let mut entries = self.entries.lock();
        if let Some(index) = entries.get_index_of(id) {
            let last = entries.len() - 1;
            entries.move_index(index, last);
            return entries[last].clone();
        }

        while entries.len() >= self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                debug!("Evicted workspace {} from cache", evicted);
            }
        }
        entries.insert(id.to_string(), workspace.clone());
        workspace
    }

    /// Return the cached handle or open and cache it.
    ///
    /// Opening happens without holding the lock; when two callers race on
    /// the same id the first insert wins.
    pub async fn get_or_open(
        &self,
        id: &str,
        opener: &dyn WorkspaceOpener,
    ) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        if let Some(ws) = self.get(id) {
            debug!("Workspace cache hit: {}", id);
            return Ok(ws);
        }

        debug!("Workspace cache miss: {}", id);
        let ws = opener.open(id).await?;
        Ok(self.insert(id, ws))
    }

    /// Ids from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl Default for WorkspaceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
