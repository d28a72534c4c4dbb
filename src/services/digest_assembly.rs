//! Digest assembly: turns judged insights into the user-facing digest.
//!
//! Pure and synchronous. Given the strategist's insights, the arbiter's
//! judgment and the combined review outcome, every insight passes through the
//! same gates in the same order:
//!
//! 1. no score, or the arbiter declined it: excluded
//! 2. explicitly failed verification (not verified and weak evidence): excluded
//! 3. a high-severity contradiction on either side: score minus one, floored at [`MIN_SCORE`]
//! 4. annotations from the red team, verifier and contradiction detector
//! 5. stable sort by effective score, highest first
//!
//! An absent verification result never excludes an insight.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::models::{
    ChallengeVerdict, DigestInsight, FinalDigest, QualityJudgment, Severity, StrategicInsight,
    MIN_SCORE,
};
use crate::services::reviewers::ReviewOutcome;

/// Points removed from an insight's score by a high-severity contradiction.
pub const CONTRADICTION_PENALTY: u8 = 1;

pub fn assemble_digest(
    insights: &[StrategicInsight],
    judgment: &QualityJudgment,
    reviews: &ReviewOutcome,
) -> FinalDigest {
    let mut seen = HashSet::new();
    let mut entries: Vec<DigestInsight> = insights
        .iter()
        .filter(|insight| seen.insert(insight.signal_id.as_str()))
        .filter_map(|insight| digest_entry(insight, judgment, reviews))
        .collect();

    // sort_by is stable: equal scores keep strategist order
    entries.sort_by(|a, b| b.quality_score.cmp(&a.quality_score));

    FinalDigest {
        executive_summary: judgment.executive_summary.clone(),
        insights: entries,
        scenarios: reviews.scenario_prediction.clone(),
        quality_grade: judgment.quality_grade.clone(),
    }
}

fn digest_entry(
    insight: &StrategicInsight,
    judgment: &QualityJudgment,
    reviews: &ReviewOutcome,
) -> Option<DigestInsight> {
    let id = insight.signal_id.as_str();

    let Some(score) = judgment.score_for(id) else {
        debug!(signal_id = %id, "excluded: no quality score");
        return None;
    };
    if !score.include_in_digest {
        debug!(signal_id = %id, overall = score.overall_score, "excluded by arbiter");
        return None;
    }

    let verification = reviews.verification_for(id);
    if verification.is_some_and(|v| v.is_explicit_failure()) {
        debug!(signal_id = %id, "excluded: failed verification");
        return None;
    }

    let mut quality_score = score.overall_score.max(MIN_SCORE);
    if reviews
        .contradictions_for(id)
        .any(|c| c.severity == Severity::High)
    {
        quality_score = quality_score
            .saturating_sub(CONTRADICTION_PENALTY)
            .max(MIN_SCORE);
    }

    let red_team_challenge = reviews
        .challenge_for(id)
        .filter(|c| c.verdict != ChallengeVerdict::Upheld)
        .map(|c| c.challenge.clone());
    let evidence_note = verification
        .filter(|v| !v.verified)
        .map(|v| v.evidence_note.clone());
    let contradiction_note = reviews
        .contradictions_for(id)
        .next()
        .map(|c| c.explanation.clone());

    Some(DigestInsight {
        insight: insight.clone(),
        quality_score,
        red_team_challenge,
        evidence_note,
        contradiction_note,
    })
}
