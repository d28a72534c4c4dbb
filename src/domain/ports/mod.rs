//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - TextGenerator: external generative text service
//! - TraceSink: append-only generation-call event log
//! - DigestStore: storage for finished pipeline traces
//!
//! These traits keep the pipeline independent of any concrete provider.

pub mod digest_store;
pub mod text_generator;
pub mod trace_sink;

pub use digest_store::DigestStore;
pub use text_generator::{
    ChatMessage, Generation, GenerationError, GenerationParams, GenerationRequest, Role,
    TextGenerator,
};
pub use trace_sink::{TraceSink, TraceSinkError};
