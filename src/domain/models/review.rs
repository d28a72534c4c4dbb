//! Outputs of the four specialist reviewers.

use serde::{Deserialize, Serialize};

use super::insight::Urgency;
use super::signal::normalize_tag;

/// Red-team opinion on the strategist's urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisedUrgency {
    Unchanged,
    Critical,
    High,
    Medium,
    Low,
}

impl RevisedUrgency {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        if normalize_tag(s) == "unchanged" {
            return Some(Self::Unchanged);
        }
        Urgency::from_str(s).map(Self::from)
    }
}

impl From<Urgency> for RevisedUrgency {
    fn from(urgency: Urgency) -> Self {
        match urgency {
            Urgency::Critical => Self::Critical,
            Urgency::High => Self::High,
            Urgency::Medium => Self::Medium,
            Urgency::Low => Self::Low,
        }
    }
}

impl Default for RevisedUrgency {
    fn default() -> Self {
        Self::Unchanged
    }
}

/// Outcome of an adversarial challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeVerdict {
    Upheld,
    PartiallyChallenged,
    Overturned,
}

impl ChallengeVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upheld => "upheld",
            Self::PartiallyChallenged => "partially_challenged",
            Self::Overturned => "overturned",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_tag(s).as_str() {
            "upheld" => Some(Self::Upheld),
            "partially_challenged" => Some(Self::PartiallyChallenged),
            "overturned" => Some(Self::Overturned),
            _ => None,
        }
    }
}

impl Default for ChallengeVerdict {
    fn default() -> Self {
        Self::Upheld
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedTeamChallenge {
    pub signal_id: String,
    pub original_assessment: String,
    pub challenge: String,
    pub alternative_interpretation: String,
    #[serde(default)]
    pub blind_spots: Vec<String>,
    pub revised_urgency: RevisedUrgency,
    /// In `[-0.3, 0.3]`.
    pub confidence_adjustment: f64,
    pub verdict: ChallengeVerdict,
}

impl RedTeamChallenge {
    pub const MAX_CONFIDENCE_ADJUSTMENT: f64 = 0.3;
}

/// One forecast about a competitor's next move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedScenario {
    pub competitor_name: String,
    pub prediction: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub timeframe: String,
    pub impact_if_true: String,
    pub preemptive_action: String,
    pub counter_scenario: String,
}

/// Forecast for the whole run, produced once rather than per signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPrediction {
    pub market_direction: String,
    #[serde(default)]
    pub scenarios: Vec<PredictedScenario>,
    #[serde(default)]
    pub wildcards: Vec<String>,
}

impl ScenarioPrediction {
    pub fn is_empty(&self) -> bool {
        self.market_direction.is_empty() && self.scenarios.is_empty() && self.wildcards.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub signal_id: String,
    pub verified: bool,
    /// In `[0, 1]`.
    pub evidence_strength: f64,
    pub evidence_note: String,
    #[serde(default)]
    pub missing_evidence: Vec<String>,
}

impl VerificationResult {
    /// Evidence strength below which an unverified insight is withheld.
    pub const MIN_EVIDENCE_STRENGTH: f64 = 0.4;

    /// True only for an explicit failure: not verified and weakly evidenced.
    pub fn is_explicit_failure(&self) -> bool {
        !self.verified && self.evidence_strength < Self::MIN_EVIDENCE_STRENGTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_tag(s).as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Low
    }
}

/// A detected conflict between two insights of the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightContradiction {
    pub signal_id: String,
    pub conflicts_with_signal_id: String,
    pub severity: Severity,
    pub explanation: String,
    pub recommended_resolution: String,
}

impl InsightContradiction {
    /// Whether this contradiction names `signal_id` on either side.
    pub fn involves(&self, signal_id: &str) -> bool {
        self.signal_id == signal_id || self.conflicts_with_signal_id == signal_id
    }
}
