//! Cascade Deletion: plan first, commit separately
//!
//! Planning is pure: it computes the objective and everything aligned under
//! it so the caller can show the affected set and ask for confirmation.
//! Only [`EntityStore::commit_deletion`](crate::EntityStore::commit_deletion)
//! mutates. Dropping a plan is the rejection path.

use crate::hierarchy_index::descendants;
use okr_types::{Objective, ObjectiveId, OkrError, OkrResult};
use std::collections::BTreeSet;

/// The affected set of one cascade deletion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletionPlan {
    /// Root first, then its descendants
    affected: Vec<ObjectiveId>,
}

impl DeletionPlan {
    pub fn root(&self) -> &ObjectiveId {
        &self.affected[0]
    }

    pub fn affected_ids(&self) -> &[ObjectiveId] {
        &self.affected
    }

    /// Descendants only, without the root
    pub fn cascaded_ids(&self) -> &[ObjectiveId] {
        &self.affected[1..]
    }

    pub fn len(&self) -> usize {
        self.affected.len()
    }

    /// A plan always contains at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, objective_id: &ObjectiveId) -> bool {
        self.affected.contains(objective_id)
    }

    pub(crate) fn id_set(&self) -> BTreeSet<&ObjectiveId> {
        self.affected.iter().collect()
    }
}

/// Compute `{objective_id} ∪ descendants(objective_id)` without touching
/// anything
pub fn plan_deletion(objective_id: &ObjectiveId, objectives: &[Objective]) -> OkrResult<DeletionPlan> {
    let root = objectives
        .iter()
        .find(|o| &o.id == objective_id)
        .ok_or_else(|| OkrError::ObjectiveNotFound(objective_id.clone()))?;

    let below = descendants(&root.id, objectives)?;
    let mut affected = Vec::with_capacity(below.len() + 1);
    affected.push(root.id.clone());
    affected.extend(below.into_iter().map(|o| o.id.clone()));

    Ok(DeletionPlan { affected })
}
