//! Common test utilities for integration tests
//!
//! Provides the canonical five-signal week used across the pipeline tests
//! together with a scripted generator answering for every agent.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;

use rivalscope::adapters::substrates::{MockGenerator, MockResponse};
use rivalscope::adapters::trace::InMemoryTraceSink;
use rivalscope::domain::models::{AgentsConfig, RawSignal, UserProduct};
use rivalscope::services::{GenerationClient, InsightPipeline, TraceRecorder};

pub const REVIEWERS: [&str; 4] = ["red_team", "scenario_predictor", "verifier", "contradiction_detector"];

pub fn product() -> UserProduct {
    UserProduct::new(
        "Ledgerly",
        "Bookkeeping for freelancers that files itself",
        "Freelancers and sole traders in the EU",
    )
    .with_features(["bank sync", "VAT returns", "invoice reminders"])
    .with_description("Automated bookkeeping with tax filing built in")
}

pub fn signal(id: &str, competitor: &str, title: &str) -> RawSignal {
    RawSignal {
        id: id.to_string(),
        competitor_id: competitor.to_lowercase(),
        competitor_name: competitor.to_string(),
        source: "website".to_string(),
        signal_type: "pricing".to_string(),
        title: title.to_string(),
        summary: format!("{competitor}: {title}"),
        raw_content: None,
        detected_at: Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Five signals from two competitors; `s4` and `s5` end up below the insight threshold.
pub fn week_signals() -> Vec<RawSignal> {
    vec![
        signal("s1", "Bookwise", "Free tier launched for freelancers"),
        signal("s2", "Bookwise", "Premium plan price raised 20%"),
        signal("s3", "TaxPilot", "Claims automatic VAT filing in 27 countries"),
        signal("s4", "TaxPilot", "New office dog"),
        signal("s5", "Bookwise", "Blog post about productivity"),
    ]
}

pub fn classifier_response() -> MockResponse {
    MockResponse::json(json!({
        "classifications": [
            {"signal_id": "s1", "category": "offensive_move", "confidence": 0.9, "strategic_weight": 9, "velocity": "accelerating"},
            {"signal_id": "s2", "category": "defensive_move", "confidence": 0.8, "strategic_weight": 6, "velocity": "steady", "related_signal_ids": ["s1"]},
            {"signal_id": "s3", "category": "market_expansion", "confidence": 0.7, "strategic_weight": 7},
            {"signal_id": "s4", "category": "internal_shift", "confidence": 0.9, "strategic_weight": 1},
            {"signal_id": "s5", "category": "ecosystem_play", "confidence": 0.6, "strategic_weight": 3}
        ]
    }))
}

pub fn strategist_response() -> MockResponse {
    let insight = |id: &str, outlook: &str, urgency: &str| {
        json!({
            "signal_id": id,
            "what_happened": format!("Move {id}"),
            "strategic_implication": "Price pressure at the entry tier",
            "impact_on_user": "Trial conversions at risk",
            "recommended_action": "Revisit the starter plan",
            "urgency": urgency,
            "opportunity_or_threat": outlook,
            "time_horizon": "short_term"
        })
    };
    MockResponse::json(json!({
        "insights": [
            insight("s1", "threat", "critical"),
            insight("s2", "opportunity", "medium"),
            insight("s3", "threat", "high"),
            // sub-threshold signal; must be dropped
            insight("s4", "neutral", "low")
        ]
    }))
}

pub fn red_team_response() -> MockResponse {
    MockResponse::json(json!({
        "challenges": [
            {"signal_id": "s1", "challenge": "Free tiers rarely convert", "verdict": "partially_challenged", "confidence_adjustment": -0.1},
            {"signal_id": "s2", "challenge": "Consistent with the market", "verdict": "upheld"}
        ]
    }))
}

pub fn scenario_response() -> MockResponse {
    MockResponse::json(json!({
        "market_direction": "Entry-level bookkeeping is commoditising",
        "scenarios": [
            {"competitor_name": "Bookwise", "prediction": "Bundles invoicing into the free tier", "confidence": 0.6, "timeframe": "Q2"},
            {"competitor_name": "TaxPilot", "prediction": "Partners with a neobank", "confidence": 0.4}
        ],
        "wildcards": ["EU-wide e-invoicing mandate moves forward"]
    }))
}

/// `s3` fails verification outright; `s1` has no verification at all.
pub fn verifier_response() -> MockResponse {
    MockResponse::json(json!({
        "verifications": [
            {"signal_id": "s2", "verified": false, "evidence_strength": 0.6, "evidence_note": "Only one pricing page checked"},
            {"signal_id": "s3", "verified": false, "evidence_strength": 0.1, "evidence_note": "Marketing claim only"}
        ]
    }))
}

pub fn contradiction_response() -> MockResponse {
    MockResponse::json(json!({
        "contradictions": [
            {"signal_id": "s1", "conflicts_with_signal_id": "s2", "severity": "high", "explanation": "Free tier vs price rise point in opposite directions"}
        ]
    }))
}

pub fn arbiter_response() -> MockResponse {
    MockResponse::json(json!({
        "scores": [
            {"signal_id": "s1", "specificity": 9, "actionability": 8, "evidence": 8, "overall_score": 8, "include_in_digest": true},
            {"signal_id": "s2", "specificity": 8, "actionability": 8, "evidence": 7, "overall_score": 9, "include_in_digest": true},
            {"signal_id": "s3", "specificity": 9, "actionability": 9, "evidence": 9, "overall_score": 9, "include_in_digest": true}
        ],
        "executive_summary": "Bookwise is attacking the entry tier while TaxPilot overclaims.",
        "quality_grade": "B+"
    }))
}

/// Scripted generator for the full week. `reviewer_delay` is added to every reviewer call.
pub fn week_generator(reviewer_delay: Option<Duration>) -> MockGenerator {
    let delayed = |response: MockResponse| match reviewer_delay {
        Some(delay) => response.with_delay(delay),
        None => response,
    };
    MockGenerator::new()
        .with_agent_response("classifier", classifier_response())
        .with_agent_response("strategist", strategist_response())
        .with_agent_response("red_team", delayed(red_team_response()))
        .with_agent_response("scenario_predictor", delayed(scenario_response()))
        .with_agent_response("verifier", delayed(verifier_response()))
        .with_agent_response("contradiction_detector", delayed(contradiction_response()))
        .with_agent_response("quality_arbiter", arbiter_response())
}

pub fn pipeline(generator: Arc<MockGenerator>) -> InsightPipeline {
    InsightPipeline::new(
        GenerationClient::new(generator, TraceRecorder::disabled()),
        &AgentsConfig::default(),
    )
}

pub fn traced_pipeline(generator: Arc<MockGenerator>, sink: Arc<InMemoryTraceSink>) -> InsightPipeline {
    InsightPipeline::new(
        GenerationClient::new(generator, TraceRecorder::new(sink)),
        &AgentsConfig::default(),
    )
}
