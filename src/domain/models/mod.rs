//! Domain models for the insight pipeline.

pub mod config;
pub mod digest;
pub mod insight;
pub mod pipeline_trace;
pub mod product;
pub mod quality;
pub mod review;
pub mod signal;
pub mod trace_event;
pub mod usage;

pub use config::{
    AgentParams, AgentsConfig, Config, GenerationConfig, LoggingConfig, ProviderKind,
    StorageConfig, TraceConfig,
};
pub use digest::{DigestInsight, FinalDigest};
pub use insight::{Outlook, StrategicInsight, TimeHorizon, Urgency};
pub use pipeline_trace::{PipelineStage, PipelineTrace, StageClock, StageTimestamps};
pub use product::UserProduct;
pub use quality::{QualityJudgment, QualityScore, INCLUSION_THRESHOLD, MAX_SCORE, MIN_SCORE};
pub use review::{
    ChallengeVerdict, InsightContradiction, PredictedScenario, RedTeamChallenge, RevisedUrgency,
    ScenarioPrediction, Severity, VerificationResult,
};
pub use signal::{
    Classification, ClassifiedSignal, RawSignal, SignalCategory, Velocity,
    INSIGHT_WEIGHT_THRESHOLD,
};
pub use trace_event::{TraceEvent, TraceEventKind};
pub use usage::{AgentUsage, TokenUsage};
