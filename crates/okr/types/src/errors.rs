//! Error types for the OKR layer
//!
//! Nothing here is fatal. Every error describes a declined mutation or an
//! unavailable collaborator; the store is left exactly as it was.

use crate::{ObjectiveId, OwnerRef, TeamId, UserId};
use serde::{Deserialize, Serialize};

/// Why the integrity guard refused a removal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DeletionDenial {
    /// The acting user tried to remove their own account
    #[error("You cannot delete your own user account.")]
    SelfDeletionForbidden,

    /// The user or team still owns objectives
    #[error("{owner} owns {count} objective(s). Reassign them before deleting.")]
    OwnsActiveObjectives { owner: OwnerRef, count: usize },

    /// The team still has members
    #[error("Team {team} still has {count} member(s). Reassign them to other teams before deleting.")]
    TeamHasMembers { team: TeamId, count: usize },
}

/// Errors that can occur in OKR operations
#[derive(Debug, thiserror::Error)]
pub enum OkrError {
    #[error("Deletion denied: {0}")]
    Denied(DeletionDenial),

    #[error("Key result advisory unavailable: {0}")]
    ValidationUnavailable(String),

    #[error("Malformed record: {field} {reason}")]
    MalformedRecord { field: String, reason: String },

    #[error("Cyclic alignment detected at objective {0}")]
    CyclicAlignment(ObjectiveId),

    #[error("Objective not found: {0}")]
    ObjectiveNotFound(ObjectiveId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Owner does not exist: {0}")]
    UnknownOwner(OwnerRef),

    #[error("Parent objective does not exist: {0}")]
    UnknownParent(ObjectiveId),

    #[error("Team does not exist: {0}")]
    UnknownTeam(TeamId),

    #[error("Identifier already in use: {0}")]
    DuplicateId(String),

    #[error("Deletion plan for {root} is stale: the subtree changed after planning")]
    StaleDeletionPlan { root: ObjectiveId },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OkrError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OkrError::MalformedRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The guard denial carried by this error, if any
    pub fn denial(&self) -> Option<&DeletionDenial> {
        match self {
            OkrError::Denied(denial) => Some(denial),
            _ => None,
        }
    }
}

impl From<DeletionDenial> for OkrError {
    fn from(denial: DeletionDenial) -> Self {
        OkrError::Denied(denial)
    }
}

/// Result type alias for OKR operations
pub type OkrResult<T> = Result<T, OkrError>;
