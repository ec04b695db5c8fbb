use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bfi_cli::cli::{self, Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing(cli.log_json);

    let config_path = cli::config_path(cli.config.as_deref());

    match cli.command {
        // Default to chat when no subcommand is given.
        None | Some(Command::Chat) => {
            let config = cli::load_config(&config_path)?;
            cli::chat::chat(Arc::new(config)).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let config = cli::load_config(&config_path)?;
            if !cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let config = cli::load_config(&config_path)?;
            cli::config::show(&config)
        }
        Some(Command::Config(ConfigCommand::SetSecret { service, account })) => {
            cli::config::set_secret(&service, &account)
        }
        Some(Command::Version) => {
            println!("ideate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Logs go to stderr so they never interleave with the conversation on stdout.
fn init_cli_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
