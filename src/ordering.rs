//! Dependency ordering for the steps of a run.

use std::collections::HashSet;
use thiserror::Error;

use crate::types::StepInfo;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// A full pass emitted nothing while steps were still pending.
    #[error("Cycle or missing dependency among steps: {}", .pending.join(", "))]
    CycleOrMissingDependency { pending: Vec<String> },
}

/// Order steps so that every step comes after all of its dependencies.
///
/// Each pass walks the pending list and emits every step whose dependencies
/// are already emitted, keeping input order among steps released in the same
/// pass. Fails if a pass makes no progress, which happens when the steps form
/// a cycle or reference a step that is not in the input.
pub fn ordered_step_infos<'a, I>(steps: I) -> Result<Vec<&'a StepInfo>, OrderingError>
where
    I: IntoIterator<Item = &'a StepInfo>,
{
    let mut pending: Vec<&StepInfo> = steps.into_iter().collect();
    let mut done: HashSet<&str> = HashSet::with_capacity(pending.len());
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let before = ordered.len();
        let mut still_pending = Vec::new();

        for step in pending {
            if step.dependencies.iter().all(|d| done.contains(d.as_str())) {
                done.insert(step.unique_id.as_str());
                ordered.push(step);
            } else {
                still_pending.push(step);
            }
        }

        if ordered.len() == before {
            return Err(OrderingError::CycleOrMissingDependency {
                pending: still_pending
                    .iter()
                    .map(|s| s.unique_id.clone())
                    .collect(),
            });
        }
        pending = still_pending;
    }

    Ok(ordered)
}
