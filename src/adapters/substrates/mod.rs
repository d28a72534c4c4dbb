//! Text generator adapter implementations.

pub mod anthropic_api;
pub mod mock;
pub mod openai_compat;
pub mod registry;

pub use anthropic_api::{AnthropicApiConfig, AnthropicApiGenerator};
pub use mock::{MockCall, MockGenerator, MockResponse};
pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatGenerator};
pub use registry::GeneratorRegistry;
