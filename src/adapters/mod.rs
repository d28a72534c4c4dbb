//! Infrastructure adapters for external systems.

pub mod store;
pub mod substrates;
pub mod trace;
