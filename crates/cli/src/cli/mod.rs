pub mod chat;
pub mod config;
pub mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// ideate: validate a product idea before you write any code.
#[derive(Debug, Parser)]
#[command(name = "ideate", version, about)]
pub struct Cli {
    /// Path to the config file (overrides `IDEATE_CONFIG`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an ideation session (default when no subcommand is given).
    Chat,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file, report issues, and check the API key resolves.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
    /// Store the provider API key in the OS keychain.
    SetSecret {
        /// Keychain service name.
        #[arg(long, default_value = "ideate")]
        service: String,
        /// Keychain account name.
        #[arg(long, default_value = "anthropic-api-key")]
        account: String,
    },
}

// ── Config loading helper ─────────────────────────────────────────────

/// Pick the config path: `--config`, then `IDEATE_CONFIG`, then
/// `ideate.toml` in the working directory.
pub fn config_path(flag: Option<&Path>) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    std::env::var_os("IDEATE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ideate.toml"))
}

/// Load the configuration at `path`. A missing file yields the defaults; an
/// unreadable or unparsable one is an error.
pub fn load_config(path: &Path) -> anyhow::Result<bfi_domain::config::Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(bfi_domain::config::Config::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
    let config = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))?;
    Ok(config)
}
