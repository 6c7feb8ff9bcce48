//! Directory records: who can own objectives

use crate::{OkrError, OkrResult, TeamId, UserId};
use serde::{Deserialize, Serialize};

/// A person in the organisation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub avatar_url: String,
    /// Teamless users (e.g. executives) are allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar_url: avatar_url.into(),
            team_id: None,
        }
    }

    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn is_member_of(&self, team_id: &TeamId) -> bool {
        self.team_id.as_ref() == Some(team_id)
    }

    pub fn validate(&self) -> OkrResult<()> {
        if self.name.trim().is_empty() {
            return Err(OkrError::malformed("user.name", "must not be empty"));
        }
        Ok(())
    }
}

/// A flat team. Teams do not nest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> OkrResult<()> {
        if self.name.trim().is_empty() {
            return Err(OkrError::malformed("team.name", "must not be empty"));
        }
        Ok(())
    }
}

/// Display data for whoever owns an objective
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerView<'a> {
    pub name: &'a str,
    /// Only users carry an avatar
    pub avatar_url: Option<&'a str>,
}

impl<'a> From<&'a User> for OwnerView<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            avatar_url: Some(&user.avatar_url),
        }
    }
}

impl<'a> From<&'a Team> for OwnerView<'a> {
    fn from(team: &'a Team) -> Self {
        Self {
            name: &team.name,
            avatar_url: None,
        }
    }
}
