//! Domain layer for the rivalscope insight pipeline
//!
//! This module contains the data model, port traits and domain errors.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
