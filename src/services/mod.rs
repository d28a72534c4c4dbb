//! Pipeline services: the seven agents, their shared plumbing and the orchestrator.

pub mod classifier;
pub mod digest_assembly;
pub mod generation_client;
pub mod json_extraction;
pub mod pipeline_orchestrator;
pub mod prompting;
pub mod quality_arbiter;
pub mod reviewers;
pub mod run_context;
pub mod sanitize;
pub mod strategist;
pub mod trace_analysis;
pub mod trace_recorder;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use classifier::SignalClassifier;
pub use digest_assembly::assemble_digest;
pub use generation_client::{GenerationClient, FALLBACK_RESPONSE};
pub use json_extraction::{extract_json, parse_json, JsonExtractionError};
pub use pipeline_orchestrator::{validate_input, InsightPipeline, PipelineInput};
pub use quality_arbiter::QualityArbiter;
pub use reviewers::{ContradictionDetector, RedTeam, ReviewOutcome, ScenarioPredictor, Verifier};
pub use run_context::{RunContext, UsageLedger};
pub use strategist::Strategist;
pub use trace_analysis::{analyze, CallSpan, SpanOverlap, TraceReport};
pub use trace_recorder::TraceRecorder;
