//! Acting-user context
//!
//! The "current user" is the user whose perspective is active. It decides
//! self-deletion and which objectives count as "mine".

use okr_types::{User, UserId};
use serde::{Deserialize, Serialize};

/// A move of the acting-user context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingUserChange {
    pub from: Option<UserId>,
    pub to: Option<UserId>,
}

/// Who is acting right now, if anyone
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingUserContext {
    current: Option<UserId>,
}

impl ActingUserContext {
    pub fn new(current: Option<UserId>) -> Self {
        Self { current }
    }

    pub fn acting_as(user_id: UserId) -> Self {
        Self::new(Some(user_id))
    }

    pub fn current(&self) -> Option<&UserId> {
        self.current.as_ref()
    }

    pub fn is(&self, user_id: &UserId) -> bool {
        self.current.as_ref() == Some(user_id)
    }

    pub fn switch_to(&mut self, user_id: UserId) -> ActingUserChange {
        let from = self.current.replace(user_id.clone());
        ActingUserChange {
            from,
            to: Some(user_id),
        }
    }

    pub fn clear(&mut self) -> ActingUserChange {
        ActingUserChange {
            from: self.current.take(),
            to: None,
        }
    }

    /// Move off a user that was just removed
    ///
    /// Picks the first remaining user in directory order, or empties the
    /// context when nobody is left. Returns `None` when the removed user was
    /// not the acting one.
    pub fn reassign_after_removal(
        &mut self,
        removed: &UserId,
        remaining: &[User],
    ) -> Option<ActingUserChange> {
        if !self.is(removed) {
            return None;
        }
        match remaining.iter().find(|u| &u.id != removed) {
            Some(next) => Some(self.switch_to(next.id.clone())),
            None => Some(self.clear()),
        }
    }
}
