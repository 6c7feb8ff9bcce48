//! Objectives and their classification tags
//!
//! An objective sits in the alignment tree through its `parent_id`. The tree
//! itself is never stored; it is derived from these flat references.

use crate::{KeyResult, ObjectiveId, OkrError, OkrResult, OwnerRef, TeamId, UserId};
use serde::{Deserialize, Serialize};

/// Display/classification tag, conventionally aligned with the owner kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveType {
    Company,
    Team,
    Individual,
}

impl ObjectiveType {
    /// Tag used when a draft does not pick one: team owners get `Team`,
    /// user owners get `Individual`
    pub fn derived_from(owner: &OwnerRef) -> Self {
        match owner {
            OwnerRef::Team(_) => ObjectiveType::Team,
            OwnerRef::User(_) => ObjectiveType::Individual,
        }
    }

    /// Whether objectives of this type may have others aligned under them
    pub fn accepts_children(&self) -> bool {
        !matches!(self, ObjectiveType::Individual)
    }
}

impl std::fmt::Display for ObjectiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveType::Company => write!(f, "Company"),
            ObjectiveType::Team => write!(f, "Team"),
            ObjectiveType::Individual => write!(f, "Individual"),
        }
    }
}

/// Ambition level; selects the scoring bands, never the arithmetic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommitmentLevel {
    /// Expected to reach 100%
    #[default]
    Committed,
    /// Success at 70%
    Aspirational,
}

impl std::fmt::Display for CommitmentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitmentLevel::Committed => write!(f, "Committed"),
            CommitmentLevel::Aspirational => write!(f, "Aspirational"),
        }
    }
}

/// A goal statement owned by a user or team, decomposed into key results
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: ObjectiveId,
    pub title: String,
    pub owner: OwnerRef,
    #[serde(rename = "type")]
    pub objective_type: ObjectiveType,
    pub level: CommitmentLevel,
    pub parent_id: Option<ObjectiveId>,
    /// Opaque period label such as "Q3 2024"
    pub cycle: String,
    /// Display order is insertion order
    pub key_results: Vec<KeyResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

impl Objective {
    /// Create a top-level objective with no key results
    pub fn new(
        id: ObjectiveId,
        title: impl Into<String>,
        owner: OwnerRef,
        objective_type: ObjectiveType,
        level: CommitmentLevel,
        cycle: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            owner,
            objective_type,
            level,
            parent_id: None,
            cycle: cycle.into(),
            key_results: Vec::new(),
            reflection: None,
        }
    }

    pub fn with_parent(mut self, parent_id: ObjectiveId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_key_result(mut self, key_result: KeyResult) -> Self {
        self.key_results.push(key_result);
        self
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_child_of(&self, parent_id: &ObjectiveId) -> bool {
        self.parent_id.as_ref() == Some(parent_id)
    }

    pub fn is_owned_by_user(&self, user_id: &UserId) -> bool {
        self.owner.is_user(user_id)
    }

    pub fn is_owned_by_team(&self, team_id: &TeamId) -> bool {
        self.owner.is_team(team_id)
    }

    /// Check required fields. Referential checks belong to the store.
    pub fn validate(&self) -> OkrResult<()> {
        if self.title.trim().is_empty() {
            return Err(OkrError::malformed("title", "must not be empty"));
        }
        if self.parent_id.as_ref() == Some(&self.id) {
            return Err(OkrError::CyclicAlignment(self.id.clone()));
        }
        for key_result in &self.key_results {
            key_result.validate()?;
        }
        Ok(())
    }
}
