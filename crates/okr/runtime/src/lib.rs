//! OKR Runtime
//!
//! In-memory engine for an Objectives & Key Results alignment tree.
//!
//! # Components
//!
//! - **Entity Store**: ordered objectives, users and teams; the only state.
//! - **Hierarchy Index**: children, descendants, ancestors and the nested
//!   alignment view, all recomputed from `parent_id` on every call.
//! - **Cascade Deletion**: plan an objective's removal with its subtree,
//!   then commit it as one step.
//! - **Scoring Engine**: key result progress, objective progress, final
//!   scores and traffic-light bands.
//! - **Integrity Guard**: refuses removing the acting user, owners of
//!   objectives, and teams that still have members.
//! - **Advisory**: optional model-backed feedback on key result wording.
//!
//! [`OkrWorkspace`] composes these behind one API. Everything except the
//! advisory call is synchronous and pure over store snapshots.

#![deny(unsafe_code)]

pub mod acting_user;
pub mod advisory;
pub mod cascade_deletion;
pub mod entity_store;
pub mod hierarchy_index;
pub mod integrity_guard;
pub mod okr_workspace;
pub mod scoring_engine;
pub mod seed;

pub use acting_user::{ActingUserChange, ActingUserContext};
pub use advisory::{
    advise, AdvisoryOutcome, AdvisoryRequest, AdvisoryResponse, AdvisoryTransport,
    AdvisoryVerdict, KeyResultAdvisor, ModelAdvisor, NoopTransport,
};
pub use cascade_deletion::{plan_deletion, DeletionPlan};
pub use entity_store::EntityStore;
pub use hierarchy_index::{
    alignment_tree, ancestors, children, descendants, parent_candidates, roots,
    would_create_cycle, AlignmentNode,
};
pub use integrity_guard::{
    can_delete_team, can_delete_user, GuardDecision, TeamDeletionPermit, UserDeletionPermit,
};
pub use okr_workspace::{OkrWorkspace, UserRemoval};
pub use scoring_engine::{
    bar_fill, display_percent, final_score, key_result_progress, objective_progress,
    progress_band, scorecard, FinalScore, KeyResultScore, ObjectiveScorecard,
};

pub use okr_types;
