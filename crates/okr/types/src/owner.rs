//! Objective ownership
//!
//! An objective is owned by exactly one user or one team. The two owner
//! kinds share nothing beyond identity and a display name, so ownership is a
//! tagged union rather than a trait.

use crate::{TeamId, UserId};
use serde::{Deserialize, Serialize};

/// Kind of entity that owns an objective
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerType {
    User,
    Team,
}

impl std::fmt::Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerType::User => write!(f, "User"),
            OwnerType::Team => write!(f, "Team"),
        }
    }
}

/// Exclusive reference to the owning user or team
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "owner_type", content = "owner_id")]
pub enum OwnerRef {
    User(UserId),
    Team(TeamId),
}

impl OwnerRef {
    pub fn user(id: impl Into<String>) -> Self {
        OwnerRef::User(UserId::new(id))
    }

    pub fn team(id: impl Into<String>) -> Self {
        OwnerRef::Team(TeamId::new(id))
    }

    pub fn owner_type(&self) -> OwnerType {
        match self {
            OwnerRef::User(_) => OwnerType::User,
            OwnerRef::Team(_) => OwnerType::Team,
        }
    }

    /// Raw owner id, regardless of kind
    pub fn id_str(&self) -> &str {
        match self {
            OwnerRef::User(id) => id.as_str(),
            OwnerRef::Team(id) => id.as_str(),
        }
    }

    pub fn is_user(&self, user_id: &UserId) -> bool {
        matches!(self, OwnerRef::User(id) if id == user_id)
    }

    pub fn is_team(&self, team_id: &TeamId) -> bool {
        matches!(self, OwnerRef::Team(id) if id == team_id)
    }
}

impl std::fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.owner_type(), self.id_str())
    }
}
