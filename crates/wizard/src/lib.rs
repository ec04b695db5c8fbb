//! Conversation engine for the idea-validation wizard.
//!
//! A [`WizardSession`] owns the transcript, the six-field summary and the
//! derived stage. Each model reply is split by [`extract`] into display text
//! and at most one summary update.

pub mod extract;
pub mod prompt;
pub mod session;
pub mod stage;
pub mod summary;
pub mod transcript;

pub use extract::{extract, Extraction, SummaryUpdate};
pub use session::{Phase, SessionOptions, SessionSnapshot, SkipReason, TurnOutcome, WizardSession};
pub use stage::Stage;
pub use summary::{Field, Summary, UpdateOutcome};
pub use transcript::{Transcript, TranscriptEntry};
