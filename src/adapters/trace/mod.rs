//! Trace sink adapters.

pub mod jsonl;
pub mod memory;

pub use jsonl::{read_events, JsonlTraceSink};
pub use memory::InMemoryTraceSink;
