//! Rivalscope - competitive-intelligence insight pipeline
//!
//! Rivalscope turns a batch of raw competitor signals into a vetted weekly
//! digest for one product. Seven text-generation agents cooperate: a
//! classifier, a strategist, four concurrent reviewers (red team, scenario
//! predictor, verifier, contradiction detector) and a quality arbiter.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Data model, errors and ports
//! - **Adapters** (`adapters`): Provider clients, trace sinks, digest storage
//! - **Service Layer** (`services`): The agents and the pipeline orchestrator
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rivalscope::adapters::substrates::MockGenerator;
//! use rivalscope::domain::models::AgentsConfig;
//! use rivalscope::services::{GenerationClient, InsightPipeline, PipelineInput, TraceRecorder};
//!
//! # async fn demo(product: rivalscope::UserProduct, signals: Vec<rivalscope::RawSignal>) -> anyhow::Result<()> {
//! let client = GenerationClient::new(Arc::new(MockGenerator::new()), TraceRecorder::disabled());
//! let pipeline = InsightPipeline::new(client, &AgentsConfig::default());
//! let trace = pipeline.run(PipelineInput::new(product, signals)).await?;
//! println!("{}", trace.final_digest.executive_summary);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ClassifiedSignal, Config, FinalDigest, PipelineStage, PipelineTrace, RawSignal,
    StrategicInsight, UserProduct,
};
pub use domain::ports::{DigestStore, TextGenerator, TraceSink};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{GenerationClient, InsightPipeline, PipelineInput, TraceRecorder};
