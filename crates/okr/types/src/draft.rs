//! Drafts: records as entered, before identifiers are assigned
//!
//! A draft is validated before any identifier is drawn, so a rejected draft
//! consumes nothing and touches nothing.

use crate::{
    CommitmentLevel, EngineConfig, IdGenerator, IdKind, KeyResult, KeyResultId, Objective,
    ObjectiveId, ObjectiveType, OkrError, OkrResult, OwnerRef, Team, TeamId, User, UserId,
};
use crate::key_result::validate_measure;
use serde::{Deserialize, Serialize};

/// A key result as typed into the editor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyResultDraft {
    pub description: String,
    pub current_value: f64,
    pub target_value: f64,
    pub unit: String,
}

impl Default for KeyResultDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            current_value: 0.0,
            target_value: 100.0,
            unit: "%".to_string(),
        }
    }
}

impl KeyResultDraft {
    pub fn new(
        description: impl Into<String>,
        current_value: f64,
        target_value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            current_value,
            target_value,
            unit: unit.into(),
        }
    }

    fn validate(&self, index: usize) -> OkrResult<()> {
        validate_measure(
            &index.to_string(),
            &self.description,
            self.current_value,
            self.target_value,
        )
    }

    fn build(self, id: KeyResultId) -> KeyResult {
        KeyResult::new(
            id,
            self.description,
            self.current_value,
            self.target_value,
            self.unit,
        )
    }
}

/// An objective as entered in the creation form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveDraft {
    pub title: String,
    pub owner: OwnerRef,
    /// Derived from the owner when absent
    #[serde(default)]
    pub objective_type: Option<ObjectiveType>,
    #[serde(default)]
    pub level: CommitmentLevel,
    #[serde(default)]
    pub parent_id: Option<ObjectiveId>,
    /// Falls back to the configured default cycle
    #[serde(default)]
    pub cycle: Option<String>,
    pub key_results: Vec<KeyResultDraft>,
}

impl ObjectiveDraft {
    pub fn new(title: impl Into<String>, owner: OwnerRef) -> Self {
        Self {
            title: title.into(),
            owner,
            objective_type: None,
            level: CommitmentLevel::default(),
            parent_id: None,
            cycle: None,
            key_results: Vec::new(),
        }
    }

    pub fn with_type(mut self, objective_type: ObjectiveType) -> Self {
        self.objective_type = Some(objective_type);
        self
    }

    pub fn with_level(mut self, level: CommitmentLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_parent(mut self, parent_id: ObjectiveId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_cycle(mut self, cycle: impl Into<String>) -> Self {
        self.cycle = Some(cycle.into());
        self
    }

    pub fn with_key_result(mut self, key_result: KeyResultDraft) -> Self {
        self.key_results.push(key_result);
        self
    }

    pub fn validate(&self) -> OkrResult<()> {
        if self.title.trim().is_empty() {
            return Err(OkrError::malformed("title", "must not be empty"));
        }
        for (index, key_result) in self.key_results.iter().enumerate() {
            key_result.validate(index)?;
        }
        Ok(())
    }

    /// Validate, then assign identifiers and fill defaults
    pub fn build(self, ids: &mut dyn IdGenerator, config: &EngineConfig) -> OkrResult<Objective> {
        self.validate()?;

        let id = ObjectiveId::new(ids.next_id(IdKind::Objective));
        let objective_type = self
            .objective_type
            .unwrap_or_else(|| ObjectiveType::derived_from(&self.owner));
        let cycle = self
            .cycle
            .unwrap_or_else(|| config.default_cycle.clone());
        let key_results = self
            .key_results
            .into_iter()
            .map(|kr| kr.build(KeyResultId::new(ids.next_id(IdKind::KeyResult))))
            .collect();

        Ok(Objective {
            id,
            title: self.title,
            owner: self.owner,
            objective_type,
            level: self.level,
            parent_id: self.parent_id,
            cycle,
            key_results,
            reflection: None,
        })
    }
}

/// A user as entered in the directory form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

impl UserDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar_url: None,
            team_id: None,
        }
    }

    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    pub fn build(self, ids: &mut dyn IdGenerator, config: &EngineConfig) -> OkrResult<User> {
        if self.name.trim().is_empty() {
            return Err(OkrError::malformed("user.name", "must not be empty"));
        }
        let id = UserId::new(ids.next_id(IdKind::User));
        let avatar_url = match self.avatar_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => config.avatar_url_for(id.as_str()),
        };
        Ok(User {
            id,
            name: self.name,
            avatar_url,
            team_id: self.team_id,
        })
    }
}

/// A team as entered in the directory form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDraft {
    pub name: String,
}

impl TeamDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn build(self, ids: &mut dyn IdGenerator) -> OkrResult<Team> {
        if self.name.trim().is_empty() {
            return Err(OkrError::malformed("team.name", "must not be empty"));
        }
        Ok(Team::new(TeamId::new(ids.next_id(IdKind::Team)), self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequentialGenerator;

    #[test]
    fn test_objective_draft_defaults() {
        let mut ids = SequentialGenerator::new();
        let config = EngineConfig::default();

        let objective = ObjectiveDraft::new("Refactor auth", OwnerRef::user("u1"))
            .with_key_result(KeyResultDraft::new("Migrate endpoints", 0.0, 100.0, "%"))
            .with_key_result(KeyResultDraft::new("Halve tickets", 10.0, 50.0, "%"))
            .build(&mut ids, &config)
            .unwrap();

        assert_eq!(objective.id, ObjectiveId::new("o-1"));
        assert_eq!(objective.objective_type, ObjectiveType::Individual);
        assert_eq!(objective.level, CommitmentLevel::Committed);
        assert_eq!(objective.cycle, "Q3 2024");
        assert_eq!(objective.key_results[0].id, KeyResultId::new("kr-2"));
        assert_eq!(objective.key_results[1].description, "Halve tickets");
        assert!(objective.reflection.is_none());
    }

    #[test]
    fn test_objective_draft_explicit_fields() {
        let mut ids = SequentialGenerator::new();
        let objective = ObjectiveDraft::new("Win the market", OwnerRef::user("ceo"))
            .with_type(ObjectiveType::Company)
            .with_level(CommitmentLevel::Aspirational)
            .with_cycle("Q4 2024")
            .build(&mut ids, &EngineConfig::default())
            .unwrap();

        assert_eq!(objective.objective_type, ObjectiveType::Company);
        assert_eq!(objective.cycle, "Q4 2024");
        assert!(objective.key_results.is_empty());
    }

    #[test]
    fn test_malformed_draft_draws_no_ids() {
        let mut ids = SequentialGenerator::new();
        let config = EngineConfig::default();

        let result = ObjectiveDraft::new("Ship it", OwnerRef::team("t1"))
            .with_key_result(KeyResultDraft::default())
            .build(&mut ids, &config);
        assert!(matches!(
            result,
            Err(OkrError::MalformedRecord { field, .. }) if field == "key_results[0].description"
        ));

        let result = ObjectiveDraft::new("", OwnerRef::team("t1")).build(&mut ids, &config);
        assert!(result.is_err());

        // Nothing was consumed by the rejected drafts
        assert_eq!(ids.next_id(IdKind::Objective), "o-1");
    }

    #[test]
    fn test_draft_and_record_share_key_result_rules() {
        let cases = [
            KeyResultDraft::new("   ", 1.0, 2.0, "%"),
            KeyResultDraft::new("Ship", f64::NAN, 2.0, "%"),
            KeyResultDraft::new("Ship", 1.0, f64::INFINITY, "%"),
            KeyResultDraft::new("Ship", -3.0, 0.0, "pts"),
        ];
        for draft in cases {
            let record = draft.clone().build(KeyResultId::new("0"));
            let from_draft = draft.validate(0);
            let from_record = record.validate();
            assert_eq!(from_draft.is_ok(), from_record.is_ok());
            if let (Err(a), Err(b)) = (from_draft, from_record) {
                assert_eq!(a.to_string(), b.to_string());
            }
        }
    }

    #[test]
    fn test_key_result_draft_default() {
        let draft = KeyResultDraft::default();
        assert_eq!(draft.target_value, 100.0);
        assert_eq!(draft.unit, "%");
    }

    #[test]
    fn test_user_draft_avatar() {
        let mut ids = SequentialGenerator::new();
        let config = EngineConfig::default();

        let user = UserDraft::new("Bob").build(&mut ids, &config).unwrap();
        assert_eq!(user.avatar_url, "https://i.pravatar.cc/150?u=u-1");

        let user = UserDraft::new("Eve")
            .with_avatar("https://example.test/eve.png")
            .with_team(TeamId::new("t1"))
            .build(&mut ids, &config)
            .unwrap();
        assert_eq!(user.avatar_url, "https://example.test/eve.png");
        assert_eq!(user.team_id, Some(TeamId::new("t1")));

        assert!(UserDraft::new("  ").build(&mut ids, &config).is_err());
    }

    #[test]
    fn test_team_draft() {
        let mut ids = SequentialGenerator::new();
        let team = TeamDraft::new("Ops").build(&mut ids).unwrap();
        assert_eq!(team.id, TeamId::new("t-1"));
        assert!(TeamDraft::new("").build(&mut ids).is_err());
    }
}
