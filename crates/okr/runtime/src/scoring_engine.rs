//! Scoring Engine: progress and final scores
//!
//! Scoring is pure arithmetic over one objective's key results. Progress is
//! not rolled up the alignment tree; a parent's score depends only on its own
//! key results.

use okr_types::{CommitmentLevel, KeyResult, KeyResultId, Objective, ObjectiveId, ScoreBand};
use serde::{Deserialize, Serialize};

/// Completion of one key result as a percentage
///
/// A zero target counts as fully met. The value is not clamped, so
/// overshooting gives more than 100 and a negative current gives less than 0.
pub fn key_result_progress(key_result: &KeyResult) -> f64 {
    if key_result.target_value == 0.0 {
        return 100.0;
    }
    key_result.current_value / key_result.target_value * 100.0
}

/// Unweighted mean of key result progress; 0 for an objective without any
pub fn objective_progress(objective: &Objective) -> f64 {
    if objective.key_results.is_empty() {
        return 0.0;
    }
    let total: f64 = objective.key_results.iter().map(key_result_progress).sum();
    total / objective.key_results.len() as f64
}

/// End-of-cycle score on the 0-1 scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalScore(f64);

impl FinalScore {
    pub fn from_progress(progress: f64) -> Self {
        Self(progress / 100.0)
    }

    /// Unrounded score
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Score rounded to two decimals, the value bands are evaluated on
    pub fn rounded(&self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    pub fn band(&self, level: CommitmentLevel) -> ScoreBand {
        level.score_bands().classify(self.rounded())
    }
}

impl std::fmt::Display for FinalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

pub fn final_score(objective: &Objective) -> FinalScore {
    FinalScore::from_progress(objective_progress(objective))
}

/// Progress clamped to `[0, 100]` for drawing a bar
pub fn bar_fill(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}

/// Whole-number percentage, rounding halves up
pub fn display_percent(progress: f64) -> i64 {
    (progress + 0.5).floor() as i64
}

/// Progress band for a level, evaluated on the clamped progress
pub fn progress_band(level: CommitmentLevel, progress: f64) -> ScoreBand {
    level.progress_bands().classify(bar_fill(progress))
}

/// Per key result figures
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyResultScore {
    pub key_result_id: KeyResultId,
    pub progress: f64,
    pub display_percent: i64,
    pub band: ScoreBand,
}

/// Everything a card or retrospective needs to render one objective
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveScorecard {
    pub objective_id: ObjectiveId,
    pub level: CommitmentLevel,
    pub key_results: Vec<KeyResultScore>,
    pub progress: f64,
    pub display_percent: i64,
    pub progress_band: ScoreBand,
    pub final_score: FinalScore,
    pub score_band: ScoreBand,
}

pub fn scorecard(objective: &Objective) -> ObjectiveScorecard {
    let level = objective.level;
    let key_results = objective
        .key_results
        .iter()
        .map(|kr| {
            let progress = key_result_progress(kr);
            KeyResultScore {
                key_result_id: kr.id.clone(),
                progress,
                display_percent: display_percent(progress),
                band: progress_band(level, progress),
            }
        })
        .collect();

    let progress = objective_progress(objective);
    let final_score = FinalScore::from_progress(progress);

    ObjectiveScorecard {
        objective_id: objective.id.clone(),
        level,
        key_results,
        progress,
        display_percent: display_percent(progress),
        progress_band: progress_band(level, progress),
        final_score,
        score_band: final_score.band(level),
    }
}
