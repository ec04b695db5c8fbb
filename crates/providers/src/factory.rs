//! Provider construction.
//!
//! Picks the adapter for the configured [`ProviderKind`] and resolves its
//! credentials eagerly, so a missing key surfaces at startup rather than on
//! the first turn.

use crate::anthropic::AnthropicProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::traits::LlmProvider;
use bfi_domain::config::{ProviderConfig, ProviderKind};
use bfi_domain::error::Result;
use std::sync::Arc;

/// Instantiate the provider described by `cfg`.
pub fn build_provider(cfg: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match cfg.kind {
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_config(cfg)?),
        ProviderKind::OpenaiCompat => Arc::new(OpenAiCompatProvider::from_config(cfg)?),
    };

    tracing::info!(
        provider_id = %cfg.id,
        kind = ?cfg.kind,
        base_url = %cfg.base_url,
        "registered LLM provider"
    );
    Ok(provider)
}
