mod llm;
mod wizard;

pub use llm::*;
pub use wizard::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub repl: ReplConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good. Credential
    /// resolution is not attempted here; see `ideate config validate`.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let provider = &self.llm.provider;

        if provider.id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.provider.id".into(),
                message: "provider id must not be empty".into(),
            });
        }

        if provider.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.provider.base_url".into(),
                message: "provider base_url must not be empty".into(),
            });
        }

        let auth = &provider.auth;
        let has_keychain = auth.service.is_some() && auth.account.is_some();
        if auth.key.is_none() && auth.env.is_none() && !has_keychain {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "llm.provider.auth".into(),
                message: "no credential source configured (key, env, or service+account)".into(),
            });
        }

        if auth.key.is_some() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "llm.provider.auth.key".into(),
                message: "plaintext API key in config; prefer env or keychain".into(),
            });
        }

        if self.llm.max_tokens == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.max_tokens".into(),
                message: "max_tokens must be greater than 0".into(),
            });
        }

        if let Some(t) = self.llm.temperature {
            if !(0.0..=2.0).contains(&t) {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "llm.temperature".into(),
                    message: format!("temperature {t} outside 0.0-2.0"),
                });
            }
        }

        if self.wizard.request_timeout_ms == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "wizard.request_timeout_ms".into(),
                message: "request timeout must be greater than 0".into(),
            });
        }

        if let Some(path) = &self.wizard.system_prompt_file {
            if !path.exists() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "wizard.system_prompt_file".into(),
                    message: format!("{} does not exist", path.display()),
                });
            }
        }

        errors
    }

    /// Whether any issue is severe enough to refuse to start.
    pub fn has_errors(issues: &[ConfigError]) -> bool {
        issues.iter().any(|e| e.severity == ConfigSeverity::Error)
    }
}
