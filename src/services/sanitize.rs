//! Boundary sanitizers: untrusted model JSON in, well-formed domain values out.
//!
//! One pure function per result type. Unknown enum tags fall back to the
//! type's default, missing numbers take documented defaults, and out-of-range
//! numbers are clamped. Entries without a usable `signal_id` are dropped.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::domain::models::{
    ChallengeVerdict, Classification, InsightContradiction, Outlook, PredictedScenario,
    QualityScore, RedTeamChallenge, RevisedUrgency, ScenarioPrediction, Severity, SignalCategory,
    StrategicInsight, TimeHorizon, Urgency, Velocity, VerificationResult, INCLUSION_THRESHOLD,
    MAX_SCORE, MIN_SCORE,
};

/// Neutral score for a missing quality dimension.
const DEFAULT_DIMENSION_SCORE: u8 = 5;
/// Evidence strength assumed when the verifier omits it; high enough that a
/// malformed entry never withholds an insight on its own.
const DEFAULT_EVIDENCE_STRENGTH: f64 = 0.5;

// -- field helpers --

/// Array under `key`, or the root itself when the model answered with a bare array.
pub fn items<'a>(root: &'a Value, key: &str) -> &'a [Value] {
    match root {
        Value::Array(items) => items,
        _ => root
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    }
}

pub fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn signal_id(value: &Value) -> Option<String> {
    let id = text(value, "signal_id");
    let id = if id.is_empty() { text(value, "id") } else { id };
    (!id.is_empty()).then_some(id)
}

pub fn number(value: &Value, key: &str) -> Option<f64> {
    let n = match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn flag(value: &Value, key: &str) -> Option<bool> {
    match value.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn unit(value: &Value, key: &str, default: f64) -> f64 {
    number(value, key).unwrap_or(default).clamp(0.0, 1.0)
}

fn score(value: &Value, key: &str, default: u8) -> u8 {
    number(value, key)
        .map(|n| n.round().clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8)
        .unwrap_or(default)
}

// -- per-type sanitizers --

/// Classification for one signal, keyed by the id the model echoed.
pub fn classification(value: &Value) -> Option<(String, Classification)> {
    let id = signal_id(value)?;
    let fallback = Classification::fallback();

    let related_signal_ids: BTreeSet<String> = string_list(value, "related_signal_ids")
        .into_iter()
        .filter(|related| *related != id)
        .collect();

    let reasoning = text(value, "reasoning");
    let classification = Classification {
        category: SignalCategory::from_str(&text(value, "category")).unwrap_or_default(),
        confidence: unit(value, "confidence", Classification::DEFAULT_CONFIDENCE),
        reasoning: if reasoning.is_empty() { fallback.reasoning } else { reasoning },
        strategic_weight: score(value, "strategic_weight", Classification::DEFAULT_WEIGHT),
        velocity: Velocity::from_str(&text(value, "velocity")).unwrap_or_default(),
        related_signal_ids,
    };
    Some((id, classification))
}

/// Strategic insight; `competitor_name` falls back to the caller-supplied name.
pub fn insight(value: &Value, fallback_competitor: impl FnOnce(&str) -> String) -> Option<StrategicInsight> {
    let signal_id = signal_id(value)?;
    let competitor_name = match text(value, "competitor_name") {
        name if name.is_empty() => fallback_competitor(&signal_id),
        name => name,
    };
    let outlook_tag = match text(value, "opportunity_or_threat") {
        tag if tag.is_empty() => text(value, "outlook"),
        tag => tag,
    };

    Some(StrategicInsight {
        competitor_name,
        what_happened: text(value, "what_happened"),
        strategic_implication: text(value, "strategic_implication"),
        impact_on_user: text(value, "impact_on_user"),
        recommended_action: text(value, "recommended_action"),
        urgency: Urgency::from_str(&text(value, "urgency")).unwrap_or_default(),
        outlook: Outlook::from_str(&outlook_tag).unwrap_or_default(),
        time_horizon: TimeHorizon::from_str(&text(value, "time_horizon")).unwrap_or_default(),
        signal_id,
    })
}

pub fn red_team_challenge(value: &Value) -> Option<RedTeamChallenge> {
    let signal_id = signal_id(value)?;
    let max = RedTeamChallenge::MAX_CONFIDENCE_ADJUSTMENT;

    Some(RedTeamChallenge {
        original_assessment: text(value, "original_assessment"),
        challenge: text(value, "challenge"),
        alternative_interpretation: text(value, "alternative_interpretation"),
        blind_spots: string_list(value, "blind_spots"),
        revised_urgency: RevisedUrgency::from_str(&text(value, "revised_urgency")).unwrap_or_default(),
        confidence_adjustment: number(value, "confidence_adjustment")
            .unwrap_or(0.0)
            .clamp(-max, max),
        verdict: ChallengeVerdict::from_str(&text(value, "verdict")).unwrap_or_default(),
        signal_id,
    })
}

fn predicted_scenario(value: &Value) -> Option<PredictedScenario> {
    let prediction = text(value, "prediction");
    if prediction.is_empty() {
        return None;
    }
    Some(PredictedScenario {
        competitor_name: text(value, "competitor_name"),
        prediction,
        confidence: unit(value, "confidence", 0.5),
        evidence: string_list(value, "evidence"),
        timeframe: text(value, "timeframe"),
        impact_if_true: text(value, "impact_if_true"),
        preemptive_action: text(value, "preemptive_action"),
        counter_scenario: text(value, "counter_scenario"),
    })
}

pub fn scenario_prediction(root: &Value) -> ScenarioPrediction {
    ScenarioPrediction {
        market_direction: text(root, "market_direction"),
        scenarios: items(root, "scenarios")
            .iter()
            .filter_map(predicted_scenario)
            .collect(),
        wildcards: string_list(root, "wildcards"),
    }
}

pub fn verification(value: &Value) -> Option<VerificationResult> {
    let signal_id = signal_id(value)?;
    Some(VerificationResult {
        verified: flag(value, "verified").unwrap_or(false),
        evidence_strength: unit(value, "evidence_strength", DEFAULT_EVIDENCE_STRENGTH),
        evidence_note: text(value, "evidence_note"),
        missing_evidence: string_list(value, "missing_evidence"),
        signal_id,
    })
}

pub fn contradiction(value: &Value) -> Option<InsightContradiction> {
    let signal_id = signal_id(value)?;
    let conflicts_with_signal_id = text(value, "conflicts_with_signal_id");
    if conflicts_with_signal_id.is_empty() || conflicts_with_signal_id == signal_id {
        return None;
    }
    Some(InsightContradiction {
        signal_id,
        conflicts_with_signal_id,
        severity: Severity::from_str(&text(value, "severity")).unwrap_or_default(),
        explanation: text(value, "explanation"),
        recommended_resolution: text(value, "recommended_resolution"),
    })
}

/// Quality score; a missing overall is the rounded mean of the dimensions and
/// a missing inclusion verdict follows the overall threshold.
pub fn quality_score(value: &Value) -> Option<QualityScore> {
    let signal_id = signal_id(value)?;
    let specificity = score(value, "specificity", DEFAULT_DIMENSION_SCORE);
    let actionability = score(value, "actionability", DEFAULT_DIMENSION_SCORE);
    let evidence = score(value, "evidence", DEFAULT_DIMENSION_SCORE);

    let mean = (f64::from(specificity) + f64::from(actionability) + f64::from(evidence)) / 3.0;
    let overall_score = score(value, "overall_score", mean.round() as u8);
    let include_in_digest =
        flag(value, "include_in_digest").unwrap_or(overall_score >= INCLUSION_THRESHOLD);

    Some(QualityScore {
        signal_id,
        specificity,
        actionability,
        evidence,
        overall_score,
        include_in_digest,
        revision_note: text(value, "revision_note"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification_clamps_and_defaults() {
        let (id, c) = classification(&json!({
            "signal_id": "s1",
            "category": "Market Expansion",
            "confidence": 1.7,
            "strategic_weight": "12",
            "velocity": "sideways",
            "related_signal_ids": ["s2", "s1", ""]
        }))
        .unwrap();

        assert_eq!(id, "s1");
        assert_eq!(c.category, SignalCategory::MarketExpansion);
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.strategic_weight, 10);
        assert_eq!(c.velocity, Velocity::Steady);
        assert_eq!(c.related_signal_ids.len(), 1);
        assert!(c.related_signal_ids.contains("s2"));
    }

    #[test]
    fn test_classification_without_id_is_dropped() {
        assert!(classification(&json!({"category": "offensive_move"})).is_none());
    }

    #[test]
    fn test_classification_unknown_category_defaults() {
        let (_, c) = classification(&json!({"id": "s1", "category": "???", "strategic_weight": 0})).unwrap();
        assert_eq!(c.category, SignalCategory::InternalShift);
        assert_eq!(c.strategic_weight, MIN_SCORE);
        assert_eq!(c.confidence, Classification::DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_insight_competitor_fallback_and_enums() {
        let insight = insight(
            &json!({"signal_id": "s1", "urgency": "CRITICAL", "opportunity_or_threat": "menace"}),
            |_| "Rival Inc".to_string(),
        )
        .unwrap();
        assert_eq!(insight.competitor_name, "Rival Inc");
        assert_eq!(insight.urgency, Urgency::Critical);
        assert_eq!(insight.outlook, Outlook::Neutral);
        assert_eq!(insight.time_horizon, TimeHorizon::ShortTerm);
    }

    #[test]
    fn test_red_team_adjustment_clamped() {
        let challenge = red_team_challenge(&json!({
            "signal_id": "s1",
            "confidence_adjustment": -0.9,
            "verdict": "partially challenged",
            "revised_urgency": "low"
        }))
        .unwrap();
        assert_eq!(challenge.confidence_adjustment, -0.3);
        assert_eq!(challenge.verdict, ChallengeVerdict::PartiallyChallenged);
        assert_eq!(challenge.revised_urgency, RevisedUrgency::Low);
    }

    #[test]
    fn test_verification_defaults_never_exclude() {
        let result = verification(&json!({"signal_id": "s1"})).unwrap();
        assert!(!result.verified);
        assert!(!result.is_explicit_failure());
    }

    #[test]
    fn test_verification_string_flags() {
        let result = verification(&json!({"signal_id": "s1", "verified": "yes", "evidence_strength": -2})).unwrap();
        assert!(result.verified);
        assert_eq!(result.evidence_strength, 0.0);
    }

    #[test]
    fn test_contradiction_requires_two_distinct_ids() {
        assert!(contradiction(&json!({"signal_id": "a", "conflicts_with_signal_id": "a"})).is_none());
        assert!(contradiction(&json!({"signal_id": "a"})).is_none());

        let c = contradiction(&json!({"signal_id": "a", "conflicts_with_signal_id": "b", "severity": "severe"})).unwrap();
        assert_eq!(c.severity, Severity::Low);
    }

    #[test]
    fn test_quality_score_derives_missing_fields() {
        let q = quality_score(&json!({"signal_id": "s1", "specificity": 8, "actionability": 7, "evidence": 6})).unwrap();
        assert_eq!(q.overall_score, 7);
        assert!(q.include_in_digest);

        let q = quality_score(&json!({"signal_id": "s2", "overall_score": 4})).unwrap();
        assert!(!q.include_in_digest);

        let q = quality_score(&json!({"signal_id": "s3", "overall_score": 9, "include_in_digest": false})).unwrap();
        assert!(!q.include_in_digest, "explicit verdict wins over threshold");
    }

    #[test]
    fn test_scenario_prediction_skips_empty_predictions() {
        let prediction = scenario_prediction(&json!({
            "market_direction": "Consolidation",
            "scenarios": [
                {"competitor_name": "Rival", "prediction": "Launches API", "confidence": 3},
                {"competitor_name": "Other"}
            ],
            "wildcards": "Regulation"
        }));
        assert_eq!(prediction.scenarios.len(), 1);
        assert_eq!(prediction.scenarios[0].confidence, 1.0);
        assert_eq!(prediction.wildcards, vec!["Regulation".to_string()]);
    }

    #[test]
    fn test_items_accepts_bare_arrays() {
        let root = json!([{"signal_id": "a"}]);
        assert_eq!(items(&root, "anything").len(), 1);
        assert!(items(&json!({"other": []}), "insights").is_empty());
    }
}
