//! Quality arbiter verdicts.

use serde::{Deserialize, Serialize};

/// Lowest score any insight can hold, including after penalties.
pub const MIN_SCORE: u8 = 1;
/// Highest score any insight can hold.
pub const MAX_SCORE: u8 = 10;
/// Overall score at which the arbiter is expected to include an insight.
pub const INCLUSION_THRESHOLD: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    pub signal_id: String,
    pub specificity: u8,
    pub actionability: u8,
    pub evidence: u8,
    pub overall_score: u8,
    /// The arbiter's own inclusion decision; the orchestrator only respects it.
    pub include_in_digest: bool,
    #[serde(default)]
    pub revision_note: String,
}

/// Everything the arbiter produces for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityJudgment {
    pub scores: Vec<QualityScore>,
    pub executive_summary: String,
    pub quality_grade: String,
}

impl QualityJudgment {
    pub fn score_for(&self, signal_id: &str) -> Option<&QualityScore> {
        self.scores.iter().find(|s| s.signal_id == signal_id)
    }
}
