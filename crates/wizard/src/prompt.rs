//! Fixed texts exchanged with the model and shown to the user.

use std::path::Path;

use bfi_domain::error::{Error, Result};

/// Instruction block sent as the system message on every request. It holds
/// the stage guide and the summary-marker protocol that [`crate::extract`]
/// parses.
pub const SYSTEM_PROMPT: &str = r#"You are an ideation guide for butfirstideate.ai. You help people validate app ideas before they build anything.

=== YOUR ROLE ===
Walk the user through validating their idea as a conversation. Act as a skeptical but supportive product strategist.

=== STAGES ===
1. Problem - What problem? Who has it? How do you know?
2. Solutions - What already exists? Where are the gaps?
3. Users - Who specifically? Can you reach them?
4. Differentiation - Why would someone pick this over the alternatives?
5. Feasibility - Can they build it? How complex is it?
6. Go/No-Go - An honest recommendation

=== RULES ===
- Ask ONE question at a time
- Dig deeper when answers are vague
- Challenge weak assumptions
- Be honest if the idea looks flawed
- Keep replies to 2-3 sentences plus your question
- An occasional emoji is fine

=== SUMMARY ===
When you learn something concrete, end your message with:
|||SUMMARY:{"field":"problem","value":"5-10 word summary"}|||

Fields: problem, users, competition, differentiation, complexity, recommendation
Only include it when you have NEW information, not on every message. Never more than one per message.

Start by greeting the user warmly and asking what they want to build and why."#;

/// Sole message of the opening request.
pub const SEED_INSTRUCTION: &str = "Start the ideation session.";

/// Shown as the first assistant message when the opening request fails.
pub const OPENING_GREETING: &str =
    "Hey! 👋 I'm here to help validate your app idea before you code.\n\n**What do you want to build, and why?**";

/// Shown in place of a reply when a turn's request fails.
pub const FALLBACK_REPLY: &str = "Sorry, could you try that again?";

/// Load a replacement instruction block, or the built-in one when `path` is
/// `None`. A custom prompt must still describe the summary marker for the
/// stage rail to move.
pub fn load_system_prompt(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(SYSTEM_PROMPT.to_string());
    };

    let text = std::fs::read_to_string(path)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Config(format!("system prompt file {} is empty", path.display())));
    }
    if !text.contains("|||SUMMARY:") {
        tracing::warn!(
            path = %path.display(),
            "custom system prompt does not mention the |||SUMMARY: marker; stages will not advance"
        );
    }
    Ok(text.to_string())
}
