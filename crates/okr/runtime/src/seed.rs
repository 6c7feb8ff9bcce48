//! Sample organisation for demos and tests
//!
//! Five users (one teamless executive), two teams, and a three-level
//! alignment tree in the "Q3 2024" cycle:
//!
//! ```text
//! o1 Company  (ceo)
//! ├── o2 Team (t1)
//! │   └── o4 Individual (u1)
//! └── o3 Team (t2)
//!     └── o5 Individual (u3)
//! ```

use crate::{EntityStore, OkrWorkspace};
use okr_types::{
    CommitmentLevel, EngineConfig, KeyResult, KeyResultId, Objective, ObjectiveId, ObjectiveType,
    OkrResult, OwnerRef, Team, TeamId, User, UserId,
};

pub const SAMPLE_CYCLE: &str = "Q3 2024";

/// The user the sample workspace starts out acting as
pub const SAMPLE_ACTING_USER: &str = "u1";

fn avatar(id: &str) -> String {
    EngineConfig::default().avatar_url_for(id)
}

fn user(id: &str, name: &str, team: Option<&str>) -> User {
    let user = User::new(UserId::new(id), name, avatar(id));
    match team {
        Some(team_id) => user.with_team(TeamId::new(team_id)),
        None => user,
    }
}

fn kr(id: &str, description: &str, current: f64, target: f64, unit: &str) -> KeyResult {
    KeyResult::new(KeyResultId::new(id), description, current, target, unit)
}

fn objective(
    id: &str,
    title: &str,
    owner: OwnerRef,
    objective_type: ObjectiveType,
    level: CommitmentLevel,
    parent: Option<&str>,
    key_results: Vec<KeyResult>,
) -> Objective {
    let mut objective = Objective::new(
        ObjectiveId::new(id),
        title,
        owner,
        objective_type,
        level,
        SAMPLE_CYCLE,
    );
    objective.parent_id = parent.map(ObjectiveId::new);
    objective.key_results = key_results;
    objective
}

pub fn sample_users() -> Vec<User> {
    vec![
        user("u1", "Jane Doe", Some("t1")),
        user("u2", "John Smith", Some("t1")),
        user("u3", "Alice Johnson", Some("t2")),
        user("u4", "Bob Williams", Some("t2")),
        user("ceo", "Sarah Chen (CEO)", None),
    ]
}

pub fn sample_teams() -> Vec<Team> {
    vec![
        Team::new(TeamId::new("t1"), "Product & Engineering"),
        Team::new(TeamId::new("t2"), "Marketing & Sales"),
    ]
}

pub fn sample_objectives() -> Vec<Objective> {
    use CommitmentLevel::{Aspirational, Committed};

    vec![
        objective(
            "o1",
            "Achieve Product-Market Fit and Accelerate Growth",
            OwnerRef::user("ceo"),
            ObjectiveType::Company,
            Aspirational,
            None,
            vec![
                kr("kr1-1", "Increase North American MAU from 50k to 100k", 65000.0, 100000.0, "users"),
                kr("kr1-2", "Achieve a Net Promoter Score (NPS) of 45", 38.0, 45.0, "points"),
                kr("kr1-3", "Generate $1M in new Annual Recurring Revenue (ARR)", 650000.0, 1000000.0, "$"),
            ],
        ),
        objective(
            "o2",
            "Launch Version 2.0 of the Platform",
            OwnerRef::team("t1"),
            ObjectiveType::Team,
            Committed,
            Some("o1"),
            vec![
                kr("kr2-1", "Reduce average API response time to under 150ms", 145.0, 150.0, "ms"),
                kr("kr2-2", "Achieve 95% test coverage for the new microservices", 96.0, 95.0, "%"),
                kr("kr2-3", "Complete beta testing with 10 enterprise clients", 8.0, 10.0, "clients"),
            ],
        )
        .with_reflection(
            "The team did an amazing job on performance and test coverage. We fell short on \
             beta testers because of delays in the sales pipeline, which is a key dependency to \
             manage better next quarter. The platform is stable and feedback is positive.",
        ),
        objective(
            "o3",
            "Increase Marketing Qualified Leads (MQLs)",
            OwnerRef::team("t2"),
            ObjectiveType::Team,
            Committed,
            Some("o1"),
            vec![
                kr("kr3-1", "Generate 5,000 new MQLs from organic search", 2100.0, 5000.0, "leads"),
                kr("kr3-2", "Achieve a 4% conversion rate on the new landing page", 2.5, 4.0, "%"),
            ],
        ),
        objective(
            "o4",
            "Refactor the Authentication Service",
            OwnerRef::user("u1"),
            ObjectiveType::Individual,
            Committed,
            Some("o2"),
            vec![
                kr("kr4-1", "Migrate all endpoints to the new authentication JWT standard", 100.0, 100.0, "%"),
                kr("kr4-2", "Reduce login-related support tickets by 50%", 40.0, 50.0, "%"),
            ],
        ),
        objective(
            "o5",
            "Develop Q3 Content Marketing Plan",
            OwnerRef::user("u3"),
            ObjectiveType::Individual,
            Aspirational,
            Some("o3"),
            vec![
                kr("kr5-1", "Publish 4 high-quality blog posts driving 10k views", 2.0, 4.0, "posts"),
                kr("kr5-2", "Launch one new e-book and get 500 downloads", 412.0, 500.0, "downloads"),
            ],
        ),
    ]
}

pub fn sample_store() -> OkrResult<EntityStore> {
    EntityStore::from_parts(sample_objectives(), sample_users(), sample_teams())
}

/// The sample store with default configuration, acting as `u1`
pub fn sample_workspace() -> OkrResult<OkrWorkspace> {
    let workspace = OkrWorkspace::new(sample_store()?, EngineConfig::default())
        .with_acting_user(UserId::new(SAMPLE_ACTING_USER))?;
    Ok(workspace)
}
