//! Integrity Guard: decides whether a user or team may be removed
//!
//! Checks are pure and can be repeated freely. An allowed check yields a
//! permit; the store's removal entry points only accept permits, and they
//! re-run the same check against current state before removing anything.

use okr_types::{DeletionDenial, Objective, OwnerRef, TeamId, User, UserId};

/// Guard check result
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision<P> {
    /// Removal may proceed with this permit
    Allow(P),
    /// Removal is refused
    Deny(DeletionDenial),
}

impl<P> GuardDecision<P> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, GuardDecision::Deny(_))
    }

    pub fn denial(&self) -> Option<&DeletionDenial> {
        match self {
            GuardDecision::Deny(denial) => Some(denial),
            GuardDecision::Allow(_) => None,
        }
    }

    pub fn into_result(self) -> Result<P, DeletionDenial> {
        match self {
            GuardDecision::Allow(permit) => Ok(permit),
            GuardDecision::Deny(denial) => Err(denial),
        }
    }
}

/// Authorises removing one user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDeletionPermit {
    pub(crate) user_id: UserId,
    pub(crate) acting_user_id: Option<UserId>,
}

impl UserDeletionPermit {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Whether committing this permit removes whoever is acting now
    pub fn removes_acting_user(&self, current: Option<&UserId>) -> bool {
        current == Some(&self.user_id)
    }
}

/// Authorises removing one team
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamDeletionPermit {
    pub(crate) team_id: TeamId,
}

impl TeamDeletionPermit {
    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }
}

/// May `user_id` be removed while `acting_user_id` is acting?
///
/// Self-deletion is checked first, so it wins even when the user owns
/// nothing. Without an acting user nobody can be removed.
pub fn can_delete_user(
    user_id: &UserId,
    acting_user_id: Option<&UserId>,
    objectives: &[Objective],
) -> GuardDecision<UserDeletionPermit> {
    match acting_user_id {
        None => return GuardDecision::Deny(DeletionDenial::SelfDeletionForbidden),
        Some(acting) if acting == user_id => {
            return GuardDecision::Deny(DeletionDenial::SelfDeletionForbidden)
        }
        Some(_) => {}
    }

    let owned = objectives
        .iter()
        .filter(|o| o.is_owned_by_user(user_id))
        .count();
    if owned > 0 {
        return GuardDecision::Deny(DeletionDenial::OwnsActiveObjectives {
            owner: OwnerRef::User(user_id.clone()),
            count: owned,
        });
    }

    GuardDecision::Allow(UserDeletionPermit {
        user_id: user_id.clone(),
        acting_user_id: acting_user_id.cloned(),
    })
}

/// May `team_id` be removed?
///
/// Members are checked before owned objectives.
pub fn can_delete_team(
    team_id: &TeamId,
    users: &[User],
    objectives: &[Objective],
) -> GuardDecision<TeamDeletionPermit> {
    let members = users.iter().filter(|u| u.is_member_of(team_id)).count();
    if members > 0 {
        return GuardDecision::Deny(DeletionDenial::TeamHasMembers {
            team: team_id.clone(),
            count: members,
        });
    }

    let owned = objectives
        .iter()
        .filter(|o| o.is_owned_by_team(team_id))
        .count();
    if owned > 0 {
        return GuardDecision::Deny(DeletionDenial::OwnsActiveObjectives {
            owner: OwnerRef::Team(team_id.clone()),
            count: owned,
        });
    }

    GuardDecision::Allow(TeamDeletionPermit {
        team_id: team_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use okr_types::{CommitmentLevel, ObjectiveId, ObjectiveType};

    fn owned_by(id: &str, owner: OwnerRef) -> Objective {
        let objective_type = ObjectiveType::derived_from(&owner);
        Objective::new(
            ObjectiveId::new(id),
            "Objective",
            owner,
            objective_type,
            CommitmentLevel::Committed,
            "Q3 2024",
        )
    }

    fn member(id: &str, team: &str) -> User {
        User::new(UserId::new(id), id, "").with_team(TeamId::new(team))
    }

    #[test]
    fn test_self_deletion_wins_even_when_owning_nothing() {
        let u1 = UserId::new("u1");
        let decision = can_delete_user(&u1, Some(&u1), &[]);
        assert_eq!(decision.denial(), Some(&DeletionDenial::SelfDeletionForbidden));
    }

    #[test]
    fn test_self_deletion_checked_before_ownership() {
        let u1 = UserId::new("u1");
        let objectives = vec![owned_by("o1", OwnerRef::user("u1"))];
        let decision = can_delete_user(&u1, Some(&u1), &objectives);
        assert_eq!(decision.denial(), Some(&DeletionDenial::SelfDeletionForbidden));
    }

    #[test]
    fn test_no_acting_user_denies() {
        let decision = can_delete_user(&UserId::new("u2"), None, &[]);
        assert!(decision.is_denied());
    }

    #[test]
    fn test_owner_cannot_be_deleted() {
        let objectives = vec![
            owned_by("o1", OwnerRef::user("u2")),
            owned_by("o2", OwnerRef::user("u2")),
            owned_by("o3", OwnerRef::team("u2")),
        ];
        let decision = can_delete_user(&UserId::new("u2"), Some(&UserId::new("u1")), &objectives);
        assert_eq!(
            decision.denial(),
            Some(&DeletionDenial::OwnsActiveObjectives {
                owner: OwnerRef::user("u2"),
                count: 2,
            })
        );
    }

    #[test]
    fn test_user_permit() {
        let u1 = UserId::new("u1");
        let u2 = UserId::new("u2");
        let permit = can_delete_user(&u2, Some(&u1), &[]).into_result().unwrap();
        assert_eq!(permit.user_id(), &u2);
        assert!(!permit.removes_acting_user(Some(&u1)));
        // The acting user changed between check and commit
        assert!(permit.removes_acting_user(Some(&u2)));
        assert!(!permit.removes_acting_user(None));
    }

    #[test]
    fn test_guard_is_repeatable() {
        let objectives = vec![owned_by("o1", OwnerRef::user("u2"))];
        let acting = UserId::new("u1");
        let first = can_delete_user(&UserId::new("u2"), Some(&acting), &objectives);
        let second = can_delete_user(&UserId::new("u2"), Some(&acting), &objectives);
        assert_eq!(first, second);
    }

    #[test]
    fn test_members_reported_before_objectives() {
        let users = vec![member("u1", "t1"), member("u2", "t1"), member("u3", "t2")];
        let objectives = vec![owned_by("o1", OwnerRef::team("t1"))];
        let decision = can_delete_team(&TeamId::new("t1"), &users, &objectives);
        assert_eq!(
            decision.denial(),
            Some(&DeletionDenial::TeamHasMembers {
                team: TeamId::new("t1"),
                count: 2,
            })
        );
    }

    #[test]
    fn test_empty_team_owning_objectives() {
        let objectives = vec![owned_by("o1", OwnerRef::team("t3"))];
        let decision = can_delete_team(&TeamId::new("t3"), &[], &objectives);
        assert!(matches!(
            decision,
            GuardDecision::Deny(DeletionDenial::OwnsActiveObjectives { count: 1, .. })
        ));
    }

    #[test]
    fn test_empty_team_allowed() {
        let users = vec![member("u1", "t1")];
        let decision = can_delete_team(&TeamId::new("t2"), &users, &[]);
        assert!(decision.is_allowed());
        let permit = decision.into_result().unwrap();
        assert_eq!(permit.team_id(), &TeamId::new("t2"));
    }
}
