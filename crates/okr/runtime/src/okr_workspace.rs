//! OKR Workspace: the single entry point for OKR operations
//!
//! The workspace owns the entity store and the acting-user context and
//! composes the pure components around them: hierarchy queries, scoring,
//! integrity guards, cascade deletion and the key result advisor. It is the
//! only writer of its store.

use std::sync::Arc;

use crate::{
    acting_user::{ActingUserChange, ActingUserContext},
    advisory::{advise, AdvisoryOutcome, KeyResultAdvisor},
    cascade_deletion::{plan_deletion, DeletionPlan},
    entity_store::EntityStore,
    hierarchy_index::{self, AlignmentNode},
    integrity_guard::{
        can_delete_team, can_delete_user, GuardDecision, TeamDeletionPermit, UserDeletionPermit,
    },
    scoring_engine::{self, ObjectiveScorecard},
};
use okr_types::{
    EngineConfig, IdGenerator, Objective, ObjectiveDraft, ObjectiveId, OkrError, OkrResult,
    Team, TeamDraft, TeamId, User, UserDraft, UserId, UuidGenerator,
};
use tracing::{info, warn};

/// Result of removing a user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRemoval {
    pub user: User,
    /// Set when the acting-user context had to move
    pub acting_change: Option<ActingUserChange>,
}

/// Owns the OKR state and mediates every change to it
pub struct OkrWorkspace {
    store: EntityStore,
    acting: ActingUserContext,
    config: EngineConfig,
    ids: Box<dyn IdGenerator>,
    advisor: Option<Arc<dyn KeyResultAdvisor>>,
}

impl std::fmt::Debug for OkrWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OkrWorkspace")
            .field("objectives", &self.store.objectives().len())
            .field("users", &self.store.users().len())
            .field("teams", &self.store.teams().len())
            .field("acting", &self.acting.current())
            .field("advisor", &self.advisor.is_some())
            .finish()
    }
}

impl OkrWorkspace {
    /// Create a workspace over an existing store, with nobody acting
    pub fn new(store: EntityStore, config: EngineConfig) -> Self {
        info!(
            objectives = store.objectives().len(),
            users = store.users().len(),
            teams = store.teams().len(),
            "OKR workspace created"
        );
        Self {
            store,
            acting: ActingUserContext::default(),
            config,
            ids: Box::new(UuidGenerator),
            advisor: None,
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn KeyResultAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_acting_user(mut self, user_id: UserId) -> OkrResult<Self> {
        self.switch_acting_user(user_id)?;
        Ok(self)
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn acting_user(&self) -> Option<&UserId> {
        self.acting.current()
    }

    /// The acting user's objectives followed by their team's
    pub fn my_objectives(&self) -> Vec<&Objective> {
        match self.acting.current() {
            Some(user_id) => self.store.objectives_for_user(user_id),
            None => Vec::new(),
        }
    }

    pub fn alignment_tree(&self) -> OkrResult<Vec<AlignmentNode>> {
        hierarchy_index::alignment_tree(self.store.objectives())
    }

    pub fn parent_candidates(&self, editing: Option<&ObjectiveId>) -> Vec<&Objective> {
        hierarchy_index::parent_candidates(self.store.objectives(), editing)
    }

    pub fn scorecard(&self, objective_id: &ObjectiveId) -> OkrResult<ObjectiveScorecard> {
        let objective = self
            .store
            .objective(objective_id)
            .ok_or_else(|| OkrError::ObjectiveNotFound(objective_id.clone()))?;
        Ok(scoring_engine::scorecard(objective))
    }

    // =========================================================================
    // OBJECTIVES
    // =========================================================================

    /// Validate a draft, assign ids and add it at the front of the store
    pub fn create_objective(&mut self, draft: ObjectiveDraft) -> OkrResult<ObjectiveId> {
        draft.validate()?;
        if !self.store.owner_exists(&draft.owner) {
            return Err(OkrError::UnknownOwner(draft.owner.clone()));
        }
        if let Some(parent_id) = &draft.parent_id {
            if self.store.objective(parent_id).is_none() {
                return Err(OkrError::UnknownParent(parent_id.clone()));
            }
        }

        let objective = draft.build(self.ids.as_mut(), &self.config)?;
        let id = objective.id.clone();
        let key_results = objective.key_results.len();
        self.store.insert_objective(objective)?;

        info!(objective = %id, key_results = key_results, "Objective created");
        Ok(id)
    }

    /// Replace an objective with an edited copy
    pub fn update_objective(&mut self, objective: Objective) -> OkrResult<()> {
        let id = objective.id.clone();
        self.store.replace_objective(objective)?;
        info!(objective = %id, "Objective updated");
        Ok(())
    }

    pub fn save_reflection(&mut self, objective_id: &ObjectiveId, text: &str) -> OkrResult<()> {
        self.store.save_reflection(objective_id, text)?;
        info!(objective = %objective_id, "Reflection saved");
        Ok(())
    }

    /// Phase one of a cascade delete; nothing changes yet
    pub fn plan_objective_deletion(&self, objective_id: &ObjectiveId) -> OkrResult<DeletionPlan> {
        let plan = plan_deletion(objective_id, self.store.objectives())?;
        info!(
            objective = %objective_id,
            affected = plan.len(),
            "Objective deletion planned"
        );
        Ok(plan)
    }

    /// Phase two: remove the planned objectives together
    pub fn commit_objective_deletion(&mut self, plan: DeletionPlan) -> OkrResult<Vec<Objective>> {
        let root = plan.root().clone();
        match self.store.commit_deletion(plan) {
            Ok(removed) => {
                info!(objective = %root, affected = removed.len(), "Objectives deleted");
                Ok(removed)
            }
            Err(e) => {
                warn!(objective = %root, error = %e, "Objective deletion refused");
                Err(e)
            }
        }
    }

    // =========================================================================
    // DIRECTORY
    // =========================================================================

    pub fn create_user(&mut self, draft: UserDraft) -> OkrResult<UserId> {
        if let Some(team_id) = &draft.team_id {
            if self.store.team(team_id).is_none() {
                return Err(OkrError::UnknownTeam(team_id.clone()));
            }
        }
        let user = draft.build(self.ids.as_mut(), &self.config)?;
        let id = user.id.clone();
        self.store.insert_user(user)?;

        info!(user = %id, "User created");
        Ok(id)
    }

    pub fn create_team(&mut self, draft: TeamDraft) -> OkrResult<TeamId> {
        let team = draft.build(self.ids.as_mut())?;
        let id = team.id.clone();
        self.store.insert_team(team)?;

        info!(team = %id, "Team created");
        Ok(id)
    }

    pub fn switch_acting_user(&mut self, user_id: UserId) -> OkrResult<ActingUserChange> {
        if self.store.user(&user_id).is_none() {
            return Err(OkrError::UserNotFound(user_id));
        }
        let change = self.acting.switch_to(user_id);
        info!(from = ?change.from, to = ?change.to, "Acting user switched");
        Ok(change)
    }

    /// Ask the guard whether a user may be removed right now
    pub fn check_user_deletion(
        &self,
        user_id: &UserId,
    ) -> OkrResult<GuardDecision<UserDeletionPermit>> {
        if self.store.user(user_id).is_none() {
            return Err(OkrError::UserNotFound(user_id.clone()));
        }
        Ok(can_delete_user(
            user_id,
            self.acting.current(),
            self.store.objectives(),
        ))
    }

    /// Check and remove a user in one step
    pub fn delete_user(&mut self, user_id: &UserId) -> OkrResult<UserRemoval> {
        match self.check_user_deletion(user_id)? {
            GuardDecision::Allow(permit) => self.commit_user_deletion(permit),
            GuardDecision::Deny(denial) => {
                warn!(user = %user_id, reason = %denial, "User deletion denied");
                Err(denial.into())
            }
        }
    }

    /// Remove a user with a permit from [`check_user_deletion`](Self::check_user_deletion)
    ///
    /// The guard is evaluated again against the current acting user and
    /// objectives.
    pub fn commit_user_deletion(&mut self, permit: UserDeletionPermit) -> OkrResult<UserRemoval> {
        let permit = UserDeletionPermit {
            user_id: permit.user_id,
            acting_user_id: self.acting.current().cloned(),
        };
        let removes_acting = permit.removes_acting_user(self.acting.current());
        let user_id = permit.user_id.clone();

        let user = self.store.remove_user(permit).inspect_err(|e| {
            warn!(user = %user_id, error = %e, "User deletion refused at commit");
        })?;

        let acting_change = if removes_acting {
            self.acting
                .reassign_after_removal(&user.id, self.store.users())
        } else {
            None
        };

        info!(user = %user.id, name = %user.name, "User deleted");
        Ok(UserRemoval {
            user,
            acting_change,
        })
    }

    /// Ask the guard whether a team may be removed right now
    pub fn check_team_deletion(
        &self,
        team_id: &TeamId,
    ) -> OkrResult<GuardDecision<TeamDeletionPermit>> {
        if self.store.team(team_id).is_none() {
            return Err(OkrError::TeamNotFound(team_id.clone()));
        }
        Ok(can_delete_team(
            team_id,
            self.store.users(),
            self.store.objectives(),
        ))
    }

    /// Check and remove a team in one step
    pub fn delete_team(&mut self, team_id: &TeamId) -> OkrResult<Team> {
        match self.check_team_deletion(team_id)? {
            GuardDecision::Allow(permit) => self.commit_team_deletion(permit),
            GuardDecision::Deny(denial) => {
                warn!(team = %team_id, reason = %denial, "Team deletion denied");
                Err(denial.into())
            }
        }
    }

    pub fn commit_team_deletion(&mut self, permit: TeamDeletionPermit) -> OkrResult<Team> {
        let team_id = permit.team_id.clone();
        let team = self.store.remove_team(permit).inspect_err(|e| {
            warn!(team = %team_id, error = %e, "Team deletion refused at commit");
        })?;

        info!(team = %team.id, name = %team.name, "Team deleted");
        Ok(team)
    }

    // =========================================================================
    // ADVISORY
    // =========================================================================

    /// Ask the configured advisor about a key result description
    pub async fn advise_key_result(&self, description: &str) -> AdvisoryOutcome {
        advise(self.advisor.as_deref(), description).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{AdvisoryVerdict, ModelAdvisor, NoopTransport};
    use crate::seed::sample_workspace;
    use okr_types::{
        AdvisoryConfig, CommitmentLevel, DeletionDenial, KeyResultDraft, ObjectiveType, OwnerRef,
        SequentialGenerator,
    };

    fn make_workspace() -> OkrWorkspace {
        sample_workspace()
            .unwrap()
            .with_id_generator(SequentialGenerator::new())
    }

    #[test]
    fn test_create_objective_is_prepended() {
        let mut ws = make_workspace();
        let draft = ObjectiveDraft::new("Harden CI", OwnerRef::user("u2"))
            .with_parent(ObjectiveId::new("o2"))
            .with_key_result(KeyResultDraft::new("Cut flaky tests to zero", 12.0, 0.0, "tests"));

        let id = ws.create_objective(draft).unwrap();
        assert_eq!(id, ObjectiveId::new("o-1"));
        assert_eq!(ws.store().objectives()[0].id, id);

        let created = ws.store().objective(&id).unwrap();
        assert_eq!(created.objective_type, ObjectiveType::Individual);
        assert_eq!(created.cycle, "Q3 2024");

        // Zero target counts as met
        assert_eq!(ws.scorecard(&id).unwrap().final_score.to_string(), "1.00");
    }

    #[test]
    fn test_create_objective_rejections() {
        let mut ws = make_workspace();
        let before = ws.store().clone();

        let ghost = ObjectiveDraft::new("Ghost", OwnerRef::user("nobody"));
        assert!(matches!(ws.create_objective(ghost), Err(OkrError::UnknownOwner(_))));

        let orphan = ObjectiveDraft::new("Orphan", OwnerRef::team("t1"))
            .with_parent(ObjectiveId::new("o99"));
        assert!(matches!(ws.create_objective(orphan), Err(OkrError::UnknownParent(_))));

        let blank = ObjectiveDraft::new(" ", OwnerRef::team("t1"));
        assert!(matches!(ws.create_objective(blank), Err(OkrError::MalformedRecord { .. })));

        assert_eq!(ws.store(), &before);
    }

    #[test]
    fn test_update_objective_prevents_cycle() {
        let mut ws = make_workspace();
        let mut o2 = ws.store().objective(&ObjectiveId::new("o2")).unwrap().clone();
        o2.parent_id = Some(ObjectiveId::new("o4"));
        assert!(matches!(ws.update_objective(o2), Err(OkrError::CyclicAlignment(_))));

        let mut o3 = ws.store().objective(&ObjectiveId::new("o3")).unwrap().clone();
        o3.level = CommitmentLevel::Aspirational;
        ws.update_objective(o3).unwrap();
        assert_eq!(
            ws.store().objective(&ObjectiveId::new("o3")).unwrap().level,
            CommitmentLevel::Aspirational
        );
    }

    #[test]
    fn test_delete_self_denied() {
        let mut ws = make_workspace();
        let result = ws.delete_user(&UserId::new("u1"));
        assert!(matches!(
            result,
            Err(OkrError::Denied(DeletionDenial::SelfDeletionForbidden))
        ));
        assert!(ws.store().user(&UserId::new("u1")).is_some());
    }

    #[test]
    fn test_delete_owner_denied_then_allowed() {
        let mut ws = make_workspace();
        let u3 = UserId::new("u3");

        let decision = ws.check_user_deletion(&u3).unwrap();
        assert!(matches!(
            decision.denial(),
            Some(DeletionDenial::OwnsActiveObjectives { count: 1, .. })
        ));

        let plan = ws.plan_objective_deletion(&ObjectiveId::new("o5")).unwrap();
        ws.commit_objective_deletion(plan).unwrap();

        let removal = ws.delete_user(&u3).unwrap();
        assert_eq!(removal.user.name, "Alice Johnson");
        assert!(removal.acting_change.is_none());
        assert!(ws.store().user(&u3).is_none());
    }

    #[test]
    fn test_permit_rechecked_against_new_actor() {
        let mut ws = make_workspace();
        let u4 = UserId::new("u4");
        let permit = ws.check_user_deletion(&u4).unwrap().into_result().unwrap();

        ws.switch_acting_user(u4.clone()).unwrap();
        assert!(permit.removes_acting_user(ws.acting_user()));
        let result = ws.commit_user_deletion(permit);
        assert!(matches!(
            result,
            Err(OkrError::Denied(DeletionDenial::SelfDeletionForbidden))
        ));
        assert!(ws.store().user(&u4).is_some());
    }

    #[test]
    fn test_delete_team() {
        let mut ws = make_workspace();
        let denied = ws.delete_team(&TeamId::new("t1"));
        assert!(matches!(
            denied,
            Err(OkrError::Denied(DeletionDenial::TeamHasMembers { count: 2, .. }))
        ));

        let t3 = ws.create_team(TeamDraft::new("Operations")).unwrap();
        let removed = ws.delete_team(&t3).unwrap();
        assert_eq!(removed.name, "Operations");

        assert!(matches!(
            ws.delete_team(&TeamId::new("t404")),
            Err(OkrError::TeamNotFound(_))
        ));
    }

    #[test]
    fn test_create_user_appends_with_avatar() {
        let mut ws = make_workspace();
        let id = ws
            .create_user(UserDraft::new("Dana Lee").with_team(TeamId::new("t2")))
            .unwrap();
        let last = ws.store().users().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.avatar_url, format!("https://i.pravatar.cc/150?u={}", id));

        let result = ws.create_user(UserDraft::new("Lost").with_team(TeamId::new("t9")));
        assert!(matches!(result, Err(OkrError::UnknownTeam(_))));
    }

    #[test]
    fn test_switch_acting_user() {
        let mut ws = make_workspace();
        let change = ws.switch_acting_user(UserId::new("ceo")).unwrap();
        assert_eq!(change.from, Some(UserId::new("u1")));
        assert_eq!(ws.my_objectives().len(), 1);

        assert!(matches!(
            ws.switch_acting_user(UserId::new("ghost")),
            Err(OkrError::UserNotFound(_))
        ));
        assert_eq!(ws.acting_user(), Some(&UserId::new("ceo")));
    }

    #[test]
    fn test_my_objectives_include_team() {
        let ws = make_workspace();
        let ids: Vec<&str> = ws.my_objectives().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o4", "o2"]);
    }

    #[test]
    fn test_reflection_and_scorecard() {
        let mut ws = make_workspace();
        let id = ObjectiveId::new("o3");
        ws.save_reflection(&id, "Organic search took longer to ramp.").unwrap();
        assert!(ws.store().objective(&id).unwrap().reflection.is_some());

        let card = ws.scorecard(&id).unwrap();
        assert_eq!(card.final_score.to_string(), "0.52");
        assert!(ws.scorecard(&ObjectiveId::new("nope")).is_err());
    }

    #[test]
    fn test_parent_candidates_for_edit() {
        let ws = make_workspace();
        let ids: Vec<&str> = ws
            .parent_candidates(Some(&ObjectiveId::new("o3")))
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ids, vec!["o1", "o2"]);
    }

    #[tokio::test]
    async fn test_advise_without_advisor() {
        let ws = make_workspace();
        assert!(ws.advise_key_result("Grow revenue").await.is_unavailable());
    }

    #[tokio::test]
    async fn test_advise_without_key_skips() {
        let advisor = ModelAdvisor::with_transport(
            AdvisoryConfig::default(),
            None,
            Arc::new(NoopTransport),
        );
        let ws = make_workspace().with_advisor(Arc::new(advisor));
        let outcome = ws.advise_key_result("Grow revenue").await;
        assert_eq!(outcome.verdict(), Some(&AdvisoryVerdict::skipped()));
    }
}
