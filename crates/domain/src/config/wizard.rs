use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wizard session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Upper bound on a single model call. Elapsing it counts as a
    /// transport failure and the turn falls back to the canned reply.
    #[serde(default = "d_60000u")]
    pub request_timeout_ms: u64,
    /// Replace the built-in ideation guide with the contents of this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_file: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: d_60000u(),
            system_prompt_file: None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Terminal REPL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Persist line-editor history under `~/.ideate/`.
    #[serde(default = "d_true")]
    pub history: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self { history: true }
    }
}

fn d_60000u() -> u64 {
    60_000
}
fn d_true() -> bool {
    true
}
