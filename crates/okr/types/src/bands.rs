//! Traffic-light bands for progress and final scores
//!
//! Progress (0-100) and final score (0-1) use different thresholds. The
//! Committed progress bands (85/50) are not the score bands scaled by 100
//! (90/60); both tables are kept as they are.

use crate::CommitmentLevel;
use serde::{Deserialize, Serialize};

/// Traffic-light classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBand {
    OnTrack,
    AtRisk,
    OffTrack,
}

impl ScoreBand {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::OnTrack => "on track",
            ScoreBand::AtRisk => "at risk",
            ScoreBand::OffTrack => "off track",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds for the two upper bands; anything below `at_risk` is off track
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub on_track: f64,
    pub at_risk: f64,
}

impl BandThresholds {
    pub const fn new(on_track: f64, at_risk: f64) -> Self {
        Self { on_track, at_risk }
    }

    pub fn classify(&self, value: f64) -> ScoreBand {
        if value >= self.on_track {
            ScoreBand::OnTrack
        } else if value >= self.at_risk {
            ScoreBand::AtRisk
        } else {
            ScoreBand::OffTrack
        }
    }
}

/// Final-score bands (0-1 scale)
pub const ASPIRATIONAL_SCORE_BANDS: BandThresholds = BandThresholds::new(0.70, 0.40);
pub const COMMITTED_SCORE_BANDS: BandThresholds = BandThresholds::new(0.90, 0.60);

/// Progress-bar bands (0-100 scale)
pub const ASPIRATIONAL_PROGRESS_BANDS: BandThresholds = BandThresholds::new(70.0, 40.0);
pub const COMMITTED_PROGRESS_BANDS: BandThresholds = BandThresholds::new(85.0, 50.0);

impl CommitmentLevel {
    pub fn score_bands(&self) -> BandThresholds {
        match self {
            CommitmentLevel::Aspirational => ASPIRATIONAL_SCORE_BANDS,
            CommitmentLevel::Committed => COMMITTED_SCORE_BANDS,
        }
    }

    pub fn progress_bands(&self) -> BandThresholds {
        match self {
            CommitmentLevel::Aspirational => ASPIRATIONAL_PROGRESS_BANDS,
            CommitmentLevel::Committed => COMMITTED_PROGRESS_BANDS,
        }
    }
}
