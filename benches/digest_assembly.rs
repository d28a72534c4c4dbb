use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rivalscope::domain::models::{
    ChallengeVerdict, InsightContradiction, Outlook, QualityJudgment, QualityScore,
    RedTeamChallenge, RevisedUrgency, Severity, StrategicInsight, TimeHorizon, Urgency,
    VerificationResult,
};
use rivalscope::services::{assemble_digest, ReviewOutcome};

fn build(n: usize) -> (Vec<StrategicInsight>, QualityJudgment, ReviewOutcome) {
    let id = |i: usize| format!("s{i:05}");
    let insights = (0..n)
        .map(|i| StrategicInsight {
            signal_id: id(i),
            competitor_name: format!("Rival {}", i % 7),
            what_happened: format!("Move {i}"),
            strategic_implication: "Pressure on the entry tier".to_string(),
            impact_on_user: "Churn risk".to_string(),
            recommended_action: "Review pricing".to_string(),
            urgency: Urgency::High,
            outlook: Outlook::Threat,
            time_horizon: TimeHorizon::ShortTerm,
        })
        .collect();

    let scores = (0..n)
        .map(|i| {
            let overall = (i % 10) as u8 + 1;
            QualityScore {
                signal_id: id(i),
                specificity: overall,
                actionability: overall,
                evidence: overall,
                overall_score: overall,
                include_in_digest: overall >= 4,
                revision_note: String::new(),
            }
        })
        .collect();

    let reviews = ReviewOutcome {
        red_team_challenges: (0..n)
            .step_by(3)
            .map(|i| RedTeamChallenge {
                signal_id: id(i),
                original_assessment: String::new(),
                challenge: format!("Challenge {i}"),
                alternative_interpretation: String::new(),
                blind_spots: vec![],
                revised_urgency: RevisedUrgency::Unchanged,
                confidence_adjustment: -0.1,
                verdict: ChallengeVerdict::PartiallyChallenged,
            })
            .collect(),
        verification_results: (0..n)
            .step_by(2)
            .map(|i| VerificationResult {
                signal_id: id(i),
                verified: i % 4 != 0,
                evidence_strength: (i % 10) as f64 / 10.0,
                evidence_note: format!("Note {i}"),
                missing_evidence: vec![],
            })
            .collect(),
        contradictions: (1..n)
            .step_by(5)
            .map(|i| InsightContradiction {
                signal_id: id(i - 1),
                conflicts_with_signal_id: id(i),
                severity: if i % 2 == 0 { Severity::High } else { Severity::Medium },
                explanation: format!("Conflict {i}"),
                recommended_resolution: String::new(),
            })
            .collect(),
        ..ReviewOutcome::default()
    };

    let judgment = QualityJudgment {
        scores,
        executive_summary: "Summary".to_string(),
        quality_grade: "B".to_string(),
    };
    (insights, judgment, reviews)
}

fn bench_assemble_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_digest");
    for n in [10usize, 100, 1_000] {
        let (insights, judgment, reviews) = build(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| assemble_digest(black_box(&insights), black_box(&judgment), black_box(&reviews)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assemble_digest);
criterion_main!(benches);
