pub mod anthropic;
pub mod factory;
pub mod openai_compat;
pub mod traits;
pub mod util;

// Re-exports for convenience.
pub use factory::build_provider;
pub use traits::{ChatRequest, ChatResponse, LlmProvider, Usage};
