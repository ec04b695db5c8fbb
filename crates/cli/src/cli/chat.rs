//! `ideate chat`: the interactive REPL.
//!
//! Opens the session, then feeds each line to the wizard and prints the
//! reply. Conversation text goes to stdout; banners, the stage rail and the
//! busy indicator go to stderr.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bfi_domain::config::Config;
use bfi_wizard::{SessionOptions, SkipReason, TurnOutcome, WizardSession};

use super::render;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive ideation REPL until `/exit` or Ctrl+D.
pub async fn chat(config: Arc<Config>) -> anyhow::Result<()> {
    let provider = bfi_providers::build_provider(&config.llm.provider)
        .context("initializing LLM provider")?;
    let options = SessionOptions::from_config(&config).context("loading system prompt")?;
    let session = WizardSession::new(provider, options);
    tracing::debug!(session_id = %session.id(), "session created");

    let history_path = config.repl.history.then(|| {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".ideate")
            .join("history.txt")
    });
    if let Some(parent) = history_path.as_ref().and_then(|p| p.parent()) {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    eprintln!("💡 But first, ideate");
    eprintln!("Before you write any code, let's make sure you're building something worth building.");
    eprintln!("Type /help for commands, Ctrl+D to exit");
    eprintln!();

    open(&session).await;

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    match handle_slash_command(trimmed, &session) {
                        SlashAction::Continue => {}
                        SlashAction::Restart => open(&session).await,
                        SlashAction::Exit => break,
                    }
                    continue;
                }

                let before = session.snapshot().stage;
                let outcome = with_indicator(session.send(trimmed)).await;
                report(&session, &outcome);
                let after = session.snapshot().stage;
                if after != before {
                    eprintln!("{}", render::stage_rail(after));
                    eprintln!();
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        rl.save_history(path).ok();
    }

    let summary = session.export_summary();
    if !summary.is_empty() {
        eprintln!("\nYour summary so far:\n");
        println!("{summary}");
    }
    eprintln!("Goodbye!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn rendering
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn open(session: &WizardSession) {
    let outcome = with_indicator(session.start()).await;
    report(session, &outcome);
    eprintln!("{}", render::stage_rail(session.snapshot().stage));
    eprintln!();
}

/// Print the newest assistant message, or explain why nothing happened.
fn report(session: &WizardSession, outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Replied { .. } | TurnOutcome::Fallback { .. } => {
            if let TurnOutcome::Fallback { error } = outcome {
                tracing::debug!(error = %error, "turn fell back");
            }
            if let Some(entry) = session.snapshot().transcript.last() {
                println!("{}", render::markdown_bold(&entry.content));
                println!();
            }
        }
        TurnOutcome::Skipped(SkipReason::Busy) => eprintln!("(still thinking, hang on)"),
        TurnOutcome::Skipped(SkipReason::EmptyInput) => {}
        TurnOutcome::Skipped(SkipReason::WrongPhase(phase)) => {
            eprintln!("(not now: session is {phase:?})");
        }
        TurnOutcome::Discarded => eprintln!("(reply dropped after reset)"),
    }
}

/// Await `fut`, printing a dot to stderr every 400ms while it is pending.
async fn with_indicator<F: Future>(fut: F) -> F::Output {
    tokio::pin!(fut);
    let mut ticker = tokio::time::interval(Duration::from_millis(400));
    ticker.tick().await;
    let mut shown = false;

    let out = loop {
        tokio::select! {
            out = &mut fut => break out,
            _ = ticker.tick() => {
                if !shown {
                    eprint!("\x1B[2mthinking");
                    shown = true;
                }
                eprint!(".");
                std::io::stderr().flush().ok();
            }
        }
    };

    if shown {
        eprintln!("\x1B[0m");
    }
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlashAction {
    Continue,
    /// Session was reset; open a fresh one.
    Restart,
    Exit,
}

fn handle_slash_command(input: &str, session: &WizardSession) -> SlashAction {
    let cmd = input.split_whitespace().next().unwrap_or(input);

    match cmd {
        "/exit" | "/quit" => return SlashAction::Exit,

        "/summary" => {
            let snap = session.snapshot();
            eprintln!("{}", render::summary_panel(&snap.summary, snap.stage));
        }

        "/copy" => {
            let text = session.export_summary();
            if text.is_empty() {
                eprintln!("Nothing to copy yet.");
            } else {
                println!("{text}");
                println!();
            }
        }

        "/stage" => {
            eprintln!("{}", render::stage_rail(session.snapshot().stage));
        }

        "/reset" => {
            session.reset_session();
            eprintln!("Session reset.");
            return SlashAction::Restart;
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /summary     Show what has been captured so far");
            eprintln!("  /copy        Print the summary as plain text for copying");
            eprintln!("  /stage       Show progress through the stages");
            eprintln!("  /reset       Throw everything away and start over");
            eprintln!("  /exit, /quit Exit");
            eprintln!("  /help        Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    SlashAction::Continue
}
