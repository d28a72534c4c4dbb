//! The user-facing weekly digest.

use serde::{Deserialize, Serialize};

use super::insight::StrategicInsight;
use super::review::ScenarioPrediction;

/// An insight that passed every gate, with its effective score and annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestInsight {
    #[serde(flatten)]
    pub insight: StrategicInsight,
    /// Arbiter score after any contradiction penalty; never below 1.
    pub quality_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_team_challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contradiction_note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalDigest {
    pub executive_summary: String,
    /// Sorted by non-increasing `quality_score`.
    pub insights: Vec<DigestInsight>,
    pub scenarios: ScenarioPrediction,
    pub quality_grade: String,
}

impl FinalDigest {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }
}
