//! Plain-text rendering of session snapshots for the terminal.

use bfi_wizard::{Field, Stage, Summary};

const BOLD: &str = "\x1B[1m";
const DIM: &str = "\x1B[2m";
const RESET: &str = "\x1B[0m";

/// One line showing every stage, with the current one bracketed and
/// finished ones dimmed.
pub fn stage_rail(current: Stage) -> String {
    Stage::all()
        .map(|s| {
            if s == current {
                format!("{BOLD}[{} {}]{RESET}", s.icon(), s.label())
            } else if s < current {
                format!("{DIM}✓ {}{RESET}", s.label())
            } else {
                format!("{DIM}{}{RESET}", s.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" › ")
}

/// The summary panel: every field, with unset ones shown as a dash.
pub fn summary_panel(summary: &Summary, stage: Stage) -> String {
    let mut out = format!("Stage: {stage}\n");
    for field in Field::ALL {
        let value = summary.get(field).unwrap_or("–");
        out.push_str(&format!("  {:<16} {value}\n", field.as_str()));
    }
    out
}

/// Replace `**bold**` spans with ANSI bold. Unpaired markers are left as-is.
pub fn markdown_bold(text: &str) -> String {
    let parts: Vec<&str> = text.split("**").collect();
    if parts.len() < 3 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let paired = if parts.len() % 2 == 1 { parts.len() } else { parts.len() - 1 };
    for (i, part) in parts.iter().enumerate() {
        if i >= paired {
            out.push_str("**");
            out.push_str(part);
        } else if i % 2 == 1 {
            out.push_str(BOLD);
            out.push_str(part);
            out.push_str(RESET);
        } else {
            out.push_str(part);
        }
    }
    out
}
