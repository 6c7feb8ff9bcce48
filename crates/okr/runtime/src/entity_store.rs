//! Entity Store: the authoritative objectives, users and teams
//!
//! Collections are ordered and the order is observable: new objectives are
//! shown first, new users and teams last. Every mutation validates first and
//! only then writes, so a failed call leaves the store as it was.

use crate::cascade_deletion::{plan_deletion, DeletionPlan};
use crate::hierarchy_index::{validate_acyclic, would_create_cycle};
use crate::integrity_guard::{
    can_delete_team, can_delete_user, TeamDeletionPermit, UserDeletionPermit,
};
use okr_types::{
    Objective, ObjectiveId, OkrError, OkrResult, OwnerRef, OwnerView, Team, TeamId, User, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// In-memory store of all OKR records
///
/// Deserializing goes through [`EntityStore::from_parts`], so a loaded store
/// satisfies the same invariants as one built by inserts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreParts")]
pub struct EntityStore {
    objectives: Vec<Objective>,
    users: Vec<User>,
    teams: Vec<Team>,
}

/// Unchecked wire form of a store
#[derive(Deserialize)]
struct StoreParts {
    #[serde(default)]
    objectives: Vec<Objective>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    teams: Vec<Team>,
}

impl TryFrom<StoreParts> for EntityStore {
    type Error = OkrError;

    fn try_from(parts: StoreParts) -> OkrResult<Self> {
        Self::from_parts(parts.objectives, parts.users, parts.teams)
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, keeping their order
    ///
    /// Every record is validated and every reference must resolve.
    pub fn from_parts(
        objectives: Vec<Objective>,
        users: Vec<User>,
        teams: Vec<Team>,
    ) -> OkrResult<Self> {
        let mut store = Self::new();
        for team in teams {
            store.insert_team(team)?;
        }
        for user in users {
            store.insert_user(user)?;
        }

        for objective in &objectives {
            objective.validate()?;
            if !store.owner_exists(&objective.owner) {
                return Err(OkrError::UnknownOwner(objective.owner.clone()));
            }
        }
        for (index, objective) in objectives.iter().enumerate() {
            if objectives[..index].iter().any(|o| o.id == objective.id) {
                return Err(OkrError::DuplicateId(objective.id.to_string()));
            }
            if let Some(parent_id) = &objective.parent_id {
                if !objectives.iter().any(|o| &o.id == parent_id) {
                    return Err(OkrError::UnknownParent(parent_id.clone()));
                }
            }
        }
        validate_acyclic(&objectives)?;

        store.objectives = objectives;
        Ok(store)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn objective(&self, objective_id: &ObjectiveId) -> Option<&Objective> {
        self.objectives.iter().find(|o| &o.id == objective_id)
    }

    pub fn user(&self, user_id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == user_id)
    }

    pub fn team(&self, team_id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == team_id)
    }

    /// Name and avatar of an objective's owner
    pub fn resolve_owner(&self, owner: &OwnerRef) -> Option<OwnerView<'_>> {
        match owner {
            OwnerRef::User(id) => self.user(id).map(OwnerView::from),
            OwnerRef::Team(id) => self.team(id).map(OwnerView::from),
        }
    }

    pub fn owner_exists(&self, owner: &OwnerRef) -> bool {
        match owner {
            OwnerRef::User(id) => self.user(id).is_some(),
            OwnerRef::Team(id) => self.team(id).is_some(),
        }
    }

    pub fn objectives_owned_by_user(&self, user_id: &UserId) -> Vec<&Objective> {
        self.objectives
            .iter()
            .filter(|o| o.is_owned_by_user(user_id))
            .collect()
    }

    pub fn objectives_owned_by_team(&self, team_id: &TeamId) -> Vec<&Objective> {
        self.objectives
            .iter()
            .filter(|o| o.is_owned_by_team(team_id))
            .collect()
    }

    /// The user's own objectives followed by those of their team
    pub fn objectives_for_user(&self, user_id: &UserId) -> Vec<&Objective> {
        let mut out = self.objectives_owned_by_user(user_id);
        if let Some(team_id) = self.user(user_id).and_then(|u| u.team_id.as_ref()) {
            out.extend(self.objectives_owned_by_team(team_id));
        }
        out
    }

    pub fn objectives_in_cycle(&self, cycle: &str) -> Vec<&Objective> {
        self.objectives.iter().filter(|o| o.cycle == cycle).collect()
    }

    /// Distinct cycle labels in order of first appearance
    pub fn cycles(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for objective in &self.objectives {
            if !out.contains(&objective.cycle.as_str()) {
                out.push(&objective.cycle);
            }
        }
        out
    }

    pub fn members_of(&self, team_id: &TeamId) -> Vec<&User> {
        self.users.iter().filter(|u| u.is_member_of(team_id)).collect()
    }

    // ── Objective mutations ──────────────────────────────────────────

    /// Add a new objective at the front of the collection
    pub fn insert_objective(&mut self, objective: Objective) -> OkrResult<()> {
        objective.validate()?;
        if self.objective(&objective.id).is_some() {
            return Err(OkrError::DuplicateId(objective.id.to_string()));
        }
        self.check_references(&objective)?;

        debug!(objective = %objective.id, "Inserting objective");
        self.objectives.insert(0, objective);
        Ok(())
    }

    /// Replace an existing objective wholesale, returning the previous record
    pub fn replace_objective(&mut self, objective: Objective) -> OkrResult<Objective> {
        objective.validate()?;
        let index = self
            .objectives
            .iter()
            .position(|o| o.id == objective.id)
            .ok_or_else(|| OkrError::ObjectiveNotFound(objective.id.clone()))?;
        self.check_references(&objective)?;

        debug!(objective = %objective.id, "Replacing objective");
        Ok(std::mem::replace(&mut self.objectives[index], objective))
    }

    /// Store a retrospective reflection; blank text clears it
    pub fn save_reflection(&mut self, objective_id: &ObjectiveId, text: &str) -> OkrResult<()> {
        let objective = self
            .objectives
            .iter_mut()
            .find(|o| &o.id == objective_id)
            .ok_or_else(|| OkrError::ObjectiveNotFound(objective_id.clone()))?;

        let text = text.trim();
        objective.reflection = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
        Ok(())
    }

    fn check_references(&self, objective: &Objective) -> OkrResult<()> {
        if !self.owner_exists(&objective.owner) {
            return Err(OkrError::UnknownOwner(objective.owner.clone()));
        }
        if let Some(parent_id) = &objective.parent_id {
            if self.objective(parent_id).is_none() {
                return Err(OkrError::UnknownParent(parent_id.clone()));
            }
            if would_create_cycle(&objective.id, parent_id, &self.objectives) {
                return Err(OkrError::CyclicAlignment(objective.id.clone()));
            }
        }
        Ok(())
    }

    /// Remove every objective in the plan as one step
    ///
    /// The closure is recomputed first; if it no longer matches the plan
    /// (say, a child was aligned under the subtree after planning) nothing
    /// is removed.
    pub fn commit_deletion(&mut self, plan: DeletionPlan) -> OkrResult<Vec<Objective>> {
        let current = match plan_deletion(plan.root(), &self.objectives) {
            Ok(current) => current,
            Err(OkrError::ObjectiveNotFound(_)) => {
                return Err(OkrError::StaleDeletionPlan {
                    root: plan.root().clone(),
                })
            }
            Err(e) => return Err(e),
        };
        if current.id_set() != plan.id_set() {
            return Err(OkrError::StaleDeletionPlan {
                root: plan.root().clone(),
            });
        }

        let (removed, kept): (Vec<Objective>, Vec<Objective>) = std::mem::take(&mut self.objectives)
            .into_iter()
            .partition(|o| plan.contains(&o.id));
        self.objectives = kept;
        Ok(removed)
    }

    // ── Directory mutations ──────────────────────────────────────────

    /// Add a user at the end of the directory
    pub fn insert_user(&mut self, user: User) -> OkrResult<()> {
        user.validate()?;
        if self.user(&user.id).is_some() {
            return Err(OkrError::DuplicateId(user.id.to_string()));
        }
        if let Some(team_id) = &user.team_id {
            if self.team(team_id).is_none() {
                return Err(OkrError::UnknownTeam(team_id.clone()));
            }
        }
        self.users.push(user);
        Ok(())
    }

    /// Add a team at the end of the directory
    pub fn insert_team(&mut self, team: Team) -> OkrResult<()> {
        team.validate()?;
        if self.team(&team.id).is_some() {
            return Err(OkrError::DuplicateId(team.id.to_string()));
        }
        self.teams.push(team);
        Ok(())
    }

    pub(crate) fn remove_user(&mut self, permit: UserDeletionPermit) -> OkrResult<User> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == permit.user_id)
            .ok_or_else(|| OkrError::UserNotFound(permit.user_id.clone()))?;

        can_delete_user(
            &permit.user_id,
            permit.acting_user_id.as_ref(),
            &self.objectives,
        )
        .into_result()?;

        Ok(self.users.remove(index))
    }

    pub(crate) fn remove_team(&mut self, permit: TeamDeletionPermit) -> OkrResult<Team> {
        let index = self
            .teams
            .iter()
            .position(|t| t.id == permit.team_id)
            .ok_or_else(|| OkrError::TeamNotFound(permit.team_id.clone()))?;

        can_delete_team(&permit.team_id, &self.users, &self.objectives).into_result()?;

        Ok(self.teams.remove(index))
    }
}
