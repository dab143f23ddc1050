//! Shared state for the API endpoints.

use std::sync::Arc;

use super::errors::ApiError;
use crate::cache::WorkspaceCache;
use crate::workspace::{Workspace, WorkspaceOpener};

pub struct ApiState {
    pub opener: Arc<dyn WorkspaceOpener>,
    pub cache: WorkspaceCache,
}

impl ApiState {
    pub fn new(opener: Arc<dyn WorkspaceOpener>, cache_capacity: usize) -> Self {
        Self {
            opener,
            cache: WorkspaceCache::new(cache_capacity),
        }
    }

    /// Open a workspace through the cache.
    pub async fn workspace(&self, wsid: &str) -> Result<Arc<dyn Workspace>, ApiError> {
        Ok(self.cache.get_or_open(wsid, self.opener.as_ref()).await?)
    }
}
