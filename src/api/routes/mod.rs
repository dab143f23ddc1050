//! API route handlers.
//!
//! Each submodule handles a specific group of endpoints:
//! - `workspace`: liveness probe and workspace summary
//! - `runs`: run listing and run detail
//! - `steps`: step listing and step detail
//! - `artifacts`: artifact metadata (download not served yet)

pub mod artifacts;
pub mod runs;
pub mod steps;
pub mod workspace;

pub use artifacts::get_artifact;
pub use runs::{get_run, list_runs};
pub use steps::{get_step, list_steps};
pub use workspace::{get_workspace, index};

use super::errors::ApiError;
use super::types::MAX_PAGE_SIZE;

/// Offset and limit for a zero-based page.
pub(crate) fn page_window(current_page: usize, page_size: usize) -> Result<(usize, usize), ApiError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ApiError::BadRequest(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, page_size
        )));
    }
    Ok((current_page.saturating_mul(page_size), page_size))
}
