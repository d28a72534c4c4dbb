//! Pipeline orchestrator.
//!
//! Drives one run through its fixed stage graph:
//!
//! ```text
//! started -> classified -> strategized
//!         -> {red_teamed, scenarios_generated, verified, contradictions_checked}
//!         -> quality_judged -> completed
//! ```
//!
//! The four reviewers run concurrently and are joined before the arbiter.
//! Generation failures never surface here; they degrade the affected stage
//! to its fallback value. Only bad input or an internal error fails a run,
//! and a failed run never yields a partial trace.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::future::try_join4;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentsConfig, PipelineStage, PipelineTrace, RawSignal, StageClock, UserProduct,
};
use crate::services::classifier::SignalClassifier;
use crate::services::digest_assembly::assemble_digest;
use crate::services::generation_client::GenerationClient;
use crate::services::quality_arbiter::QualityArbiter;
use crate::services::reviewers::{
    ContradictionDetector, RedTeam, ReviewOutcome, ScenarioPredictor, Verifier,
};
use crate::services::run_context::RunContext;
use crate::services::strategist::Strategist;

/// Everything a run needs from the caller.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    /// Tags trace events and names the run. Blank means untraced.
    pub correlation_id: Option<String>,
    pub product: Option<UserProduct>,
    pub signals: Vec<RawSignal>,
}

impl PipelineInput {
    pub fn new(product: UserProduct, signals: Vec<RawSignal>) -> Self {
        Self {
            correlation_id: None,
            product: Some(product),
            signals,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// Reject input the pipeline cannot meaningfully run on, before any call is made.
pub fn validate_input(input: &PipelineInput) -> DomainResult<&UserProduct> {
    let product = input
        .product
        .as_ref()
        .ok_or_else(|| DomainError::MissingInput("user product".to_string()))?;
    if input.signals.is_empty() {
        return Err(DomainError::MissingInput("competitor signals".to_string()));
    }

    let mut ids = HashSet::new();
    for signal in &input.signals {
        if signal.id.trim().is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "signal '{}' has an empty id",
                signal.title
            )));
        }
        if !ids.insert(signal.id.as_str()) {
            return Err(DomainError::ValidationFailed(format!(
                "duplicate signal id '{}'",
                signal.id
            )));
        }
    }
    Ok(product)
}

/// The multi-agent insight pipeline.
pub struct InsightPipeline {
    classifier: SignalClassifier,
    strategist: Strategist,
    red_team: RedTeam,
    scenario_predictor: ScenarioPredictor,
    verifier: Verifier,
    contradiction_detector: ContradictionDetector,
    quality_arbiter: QualityArbiter,
}

impl InsightPipeline {
    pub fn new(client: GenerationClient, agents: &AgentsConfig) -> Self {
        Self {
            classifier: SignalClassifier::new(client.clone(), agents.classifier),
            strategist: Strategist::new(client.clone(), agents.strategist),
            red_team: RedTeam::new(client.clone(), agents.red_team),
            scenario_predictor: ScenarioPredictor::new(client.clone(), agents.scenario_predictor),
            verifier: Verifier::new(client.clone(), agents.verifier),
            contradiction_detector: ContradictionDetector::new(
                client.clone(),
                agents.contradiction_detector,
            ),
            quality_arbiter: QualityArbiter::new(client, agents.quality_arbiter),
        }
    }

    /// Execute one run. The returned trace carries all nine stage timestamps.
    #[instrument(skip_all, fields(signals = input.signals.len()))]
    pub async fn run(&self, input: PipelineInput) -> DomainResult<PipelineTrace> {
        let product = validate_input(&input)?;
        let ctx = RunContext::new(input.correlation_id.clone());
        let run_id = ctx
            .correlation_id()
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

        let mut clock = StageClock::new();
        clock.mark(PipelineStage::Started);
        info!(run_id = %run_id, signals = input.signals.len(), "pipeline started");

        let classified = self
            .classifier
            .classify(&ctx, product, &input.signals)
            .await?;
        clock.mark(PipelineStage::Classified);

        let insights = self.strategist.generate(&ctx, product, &classified).await?;
        clock.mark(PipelineStage::Strategized);
        info!(run_id = %run_id, insights = insights.len(), "strategist complete");

        let (
            (red_team_challenges, red_teamed_at),
            (scenario_prediction, scenarios_at),
            (verification_results, verified_at),
            (contradictions, contradictions_at),
        ) = try_join4(
            stamped(self.red_team.challenge(&ctx, product, &insights)),
            stamped(self.scenario_predictor.predict(&ctx, product, &classified)),
            stamped(self.verifier.verify(&ctx, &insights, &classified)),
            stamped(self.contradiction_detector.detect(&ctx, &insights)),
        )
        .await?;
        clock.mark_at(PipelineStage::RedTeamed, red_teamed_at);
        clock.mark_at(PipelineStage::ScenariosGenerated, scenarios_at);
        clock.mark_at(PipelineStage::Verified, verified_at);
        clock.mark_at(PipelineStage::ContradictionsChecked, contradictions_at);

        let reviews = ReviewOutcome {
            red_team_challenges,
            scenario_prediction,
            verification_results,
            contradictions,
        };

        let judgment = self
            .quality_arbiter
            .judge(&ctx, product, &insights, &reviews)
            .await?;
        clock.mark(PipelineStage::QualityJudged);

        let final_digest = assemble_digest(&insights, &judgment, &reviews);
        clock.mark(PipelineStage::Completed);
        let timestamps = clock.finish()?;

        let usage = ctx.usage().snapshot().await;
        info!(
            run_id = %run_id,
            digest_insights = final_digest.insights.len(),
            grade = %final_digest.quality_grade,
            duration_ms = timestamps.total_duration_ms(),
            "pipeline completed"
        );

        Ok(PipelineTrace {
            run_id,
            timestamps,
            classified_signals: classified,
            strategist_insights: insights,
            red_team_challenges: reviews.red_team_challenges,
            scenario_prediction: reviews.scenario_prediction,
            verification_results: reviews.verification_results,
            contradictions: reviews.contradictions,
            quality_judgment: judgment,
            final_digest,
            usage,
        })
    }
}

/// Completion time of a reviewer branch, taken when the branch itself finishes
/// rather than when the join does.
async fn stamped<T>(
    branch: impl std::future::Future<Output = DomainResult<T>>,
) -> DomainResult<(T, DateTime<Utc>)> {
    let value = branch.await?;
    Ok((value, Utc::now()))
}
