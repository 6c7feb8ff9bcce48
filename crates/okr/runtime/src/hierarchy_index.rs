//! Hierarchy Index: alignment tree views derived from `parent_id`
//!
//! Nothing here is cached. Every function scans the objective slice it is
//! given, so results always reflect the current store snapshot. Traversals
//! keep a visited set and report `CyclicAlignment` instead of looping or
//! silently skipping the objectives on a loop.

use okr_types::{Objective, ObjectiveId, OkrError, OkrResult};
use std::collections::HashSet;

/// A node of the nested alignment view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentNode {
    pub objective_id: ObjectiveId,
    /// 0 for top-level objectives
    pub depth: usize,
    pub children: Vec<AlignmentNode>,
}

impl AlignmentNode {
    /// Number of objectives in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(AlignmentNode::size).sum::<usize>()
    }

    /// Pre-order walk as `(depth, id)` pairs, handy for indented rendering
    pub fn flatten(&self) -> Vec<(usize, &ObjectiveId)> {
        let mut out = Vec::with_capacity(self.size());
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<(usize, &'a ObjectiveId)>) {
        out.push((self.depth, &self.objective_id));
        for child in &self.children {
            child.flatten_into(out);
        }
    }
}

fn lookup<'a>(objectives: &'a [Objective], id: &ObjectiveId) -> Option<&'a Objective> {
    objectives.iter().find(|o| &o.id == id)
}

/// Objectives whose `parent_id` is `objective_id`, in store order
pub fn children<'a>(objective_id: &ObjectiveId, objectives: &'a [Objective]) -> Vec<&'a Objective> {
    objectives
        .iter()
        .filter(|o| o.is_child_of(objective_id))
        .collect()
}

/// Every objective below `objective_id`, each exactly once
///
/// Direct children are listed before their own subtrees are expanded. No
/// caller depends on the order beyond that.
pub fn descendants<'a>(
    objective_id: &ObjectiveId,
    objectives: &'a [Objective],
) -> OkrResult<Vec<&'a Objective>> {
    let mut visited = HashSet::new();
    visited.insert(objective_id.clone());

    let mut out = Vec::new();
    expand(objective_id, objectives, &mut visited, &mut out)?;
    Ok(out)
}

fn expand<'a>(
    parent_id: &ObjectiveId,
    objectives: &'a [Objective],
    visited: &mut HashSet<ObjectiveId>,
    out: &mut Vec<&'a Objective>,
) -> OkrResult<()> {
    let direct = children(parent_id, objectives);
    for &child in &direct {
        if !visited.insert(child.id.clone()) {
            return Err(OkrError::CyclicAlignment(child.id.clone()));
        }
        out.push(child);
    }
    for child in direct {
        expand(&child.id, objectives, visited, out)?;
    }
    Ok(())
}

/// Top-level objectives (no parent), in store order
pub fn roots(objectives: &[Objective]) -> Vec<&Objective> {
    objectives.iter().filter(|o| o.is_top_level()).collect()
}

/// Parent chain from the direct parent up to the top-level objective
///
/// A dangling `parent_id` ends the chain.
pub fn ancestors<'a>(
    objective_id: &ObjectiveId,
    objectives: &'a [Objective],
) -> OkrResult<Vec<&'a Objective>> {
    let start = lookup(objectives, objective_id)
        .ok_or_else(|| OkrError::ObjectiveNotFound(objective_id.clone()))?;

    let mut visited = HashSet::new();
    visited.insert(start.id.clone());

    let mut chain = Vec::new();
    let mut cursor = start.parent_id.as_ref();
    while let Some(parent_id) = cursor {
        let Some(parent) = lookup(objectives, parent_id) else {
            break;
        };
        if !visited.insert(parent.id.clone()) {
            return Err(OkrError::CyclicAlignment(parent.id.clone()));
        }
        chain.push(parent);
        cursor = parent.parent_id.as_ref();
    }
    Ok(chain)
}

/// Whether aligning `objective_id` under `new_parent` would close a loop
///
/// Walks up from the proposed parent; reaching `objective_id` (or any
/// pre-existing loop) means the edge is not allowed.
pub fn would_create_cycle(
    objective_id: &ObjectiveId,
    new_parent: &ObjectiveId,
    objectives: &[Objective],
) -> bool {
    let mut visited = HashSet::new();
    let mut cursor = Some(new_parent);
    while let Some(current) = cursor {
        if current == objective_id || !visited.insert(current.clone()) {
            return true;
        }
        cursor = lookup(objectives, current).and_then(|o| o.parent_id.as_ref());
    }
    false
}

/// Fail with `CyclicAlignment` if any objective sits on a parent loop
pub fn validate_acyclic(objectives: &[Objective]) -> OkrResult<()> {
    for objective in objectives {
        ancestors(&objective.id, objectives)?;
    }
    Ok(())
}

/// Nested view of the whole forest, rooted at the top-level objectives
///
/// Every objective must appear in the result. One that no root reaches sits
/// on or under a parent loop (`CyclicAlignment`) or below a missing parent
/// (`UnknownParent`).
pub fn alignment_tree(objectives: &[Objective]) -> OkrResult<Vec<AlignmentNode>> {
    let mut visited = HashSet::new();
    let mut tree = Vec::new();
    for root in roots(objectives) {
        visited.insert(root.id.clone());
        tree.push(build_node(root, 0, objectives, &mut visited)?);
    }

    if let Some(stray) = objectives.iter().find(|o| !visited.contains(&o.id)) {
        let chain = ancestors(&stray.id, objectives)?;
        let top = chain.last().copied().unwrap_or(stray);
        return Err(match &top.parent_id {
            Some(parent_id) => OkrError::UnknownParent(parent_id.clone()),
            None => OkrError::CyclicAlignment(stray.id.clone()),
        });
    }
    Ok(tree)
}

fn build_node(
    objective: &Objective,
    depth: usize,
    objectives: &[Objective],
    visited: &mut HashSet<ObjectiveId>,
) -> OkrResult<AlignmentNode> {
    let mut node = AlignmentNode {
        objective_id: objective.id.clone(),
        depth,
        children: Vec::new(),
    };
    for child in children(&objective.id, objectives) {
        if !visited.insert(child.id.clone()) {
            return Err(OkrError::CyclicAlignment(child.id.clone()));
        }
        node.children
            .push(build_node(child, depth + 1, objectives, visited)?);
    }
    Ok(node)
}

/// Objectives that may be picked as the parent of `editing`
///
/// Individual objectives never take children. When editing an existing
/// objective, it and its own subtree are excluded.
pub fn parent_candidates<'a>(
    objectives: &'a [Objective],
    editing: Option<&ObjectiveId>,
) -> Vec<&'a Objective> {
    objectives
        .iter()
        .filter(|o| o.objective_type.accepts_children())
        .filter(|o| match editing {
            Some(editing_id) => !would_create_cycle(editing_id, &o.id, objectives),
            None => true,
        })
        .collect()
}
