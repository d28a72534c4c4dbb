//! The four specialist reviewers that run concurrently after the strategist.
//!
//! Each reviewer is independent of the others: they read the same insights
//! (and, for the verifier and scenario predictor, the classified signals) and
//! produce one slice of the [`ReviewOutcome`].

pub mod contradiction_detector;
pub mod red_team;
pub mod scenario_predictor;
pub mod verifier;

use serde::{Deserialize, Serialize};

use crate::domain::models::{
    InsightContradiction, RedTeamChallenge, ScenarioPrediction, VerificationResult,
};

pub use contradiction_detector::ContradictionDetector;
pub use red_team::RedTeam;
pub use scenario_predictor::ScenarioPredictor;
pub use verifier::Verifier;

/// Combined output of the review stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub red_team_challenges: Vec<RedTeamChallenge>,
    pub scenario_prediction: ScenarioPrediction,
    pub verification_results: Vec<VerificationResult>,
    pub contradictions: Vec<InsightContradiction>,
}

impl ReviewOutcome {
    pub fn challenge_for(&self, signal_id: &str) -> Option<&RedTeamChallenge> {
        self.red_team_challenges.iter().find(|c| c.signal_id == signal_id)
    }

    pub fn verification_for(&self, signal_id: &str) -> Option<&VerificationResult> {
        self.verification_results.iter().find(|v| v.signal_id == signal_id)
    }

    /// Contradictions naming `signal_id` on either side, in detection order.
    pub fn contradictions_for<'a>(
        &'a self,
        signal_id: &'a str,
    ) -> impl Iterator<Item = &'a InsightContradiction> + 'a {
        self.contradictions.iter().filter(move |c| c.involves(signal_id))
    }
}
