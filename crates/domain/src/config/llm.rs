use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// The single provider the wizard talks to.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Maximum tokens per model response. Replies are meant to be two or
    /// three sentences plus a question, so this stays small.
    #[serde(default = "d_400")]
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0). `None` lets the provider choose.
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            max_tokens: d_400(),
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "d_provider_id")]
    pub id: String,
    #[serde(default = "d_kind")]
    pub kind: ProviderKind,
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_auth")]
    pub auth: AuthConfig,
    #[serde(default)]
    pub default_model: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            id: d_provider_id(),
            kind: d_kind(),
            base_url: d_base_url(),
            auth: d_auth(),
            default_model: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Anthropic,
    OpenaiCompat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Env var containing the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Direct key (for config-only setups; prefer env or the keychain).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Keychain service name (e.g., "ideate").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Keychain account name (e.g., "anthropic-api-key").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

// ── serde default helpers ───────────────────────────────────────────

fn d_400() -> u32 {
    400
}
fn d_provider_id() -> String {
    "anthropic".into()
}
fn d_kind() -> ProviderKind {
    ProviderKind::Anthropic
}
fn d_base_url() -> String {
    "https://api.anthropic.com".into()
}
fn d_auth() -> AuthConfig {
    AuthConfig {
        env: Some("ANTHROPIC_API_KEY".into()),
        ..Default::default()
    }
}
