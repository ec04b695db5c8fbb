//! The session orchestrator.
//!
//! [`WizardSession`] is the only owner of the transcript, summary and stage.
//! Render surfaces hold it behind an `Arc`, emit intents through
//! [`start`](WizardSession::start), [`send`](WizardSession::send) and
//! [`reset_session`](WizardSession::reset_session), and read state through
//! [`snapshot`](WizardSession::snapshot).
//!
//! At most one model call is outstanding per session. The gate is a
//! single-permit semaphore taken with `try_acquire`: a second intent that
//! arrives while a call is in flight is skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use bfi_domain::config::Config;
use bfi_domain::error::{Error, Result};
use bfi_domain::message::Message;
use bfi_providers::{ChatRequest, LlmProvider};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::extract::extract;
use crate::prompt::{self, FALLBACK_REPLY, OPENING_GREETING, SEED_INSTRUCTION};
use crate::stage::Stage;
use crate::summary::{Summary, UpdateOutcome};
use crate::transcript::{Transcript, TranscriptEntry};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    AwaitingFirstResponse,
    Idle,
    AwaitingResponse,
}

/// Why an intent was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A model call is already in flight.
    Busy,
    /// The user text was empty after trimming.
    EmptyInput,
    /// The intent is not valid in the current phase.
    WrongPhase(Phase),
}

/// Result of a `start` or `send` intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model answered; its cleaned text was appended.
    Replied {
        update: Option<UpdateOutcome>,
        stage: Stage,
    },
    /// The call failed; a canned assistant message was appended instead.
    Fallback { error: String },
    /// Nothing happened.
    Skipped(SkipReason),
    /// The session was reset while the call was in flight; the reply was
    /// thrown away.
    Discarded,
}

/// Request parameters that stay fixed for the life of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub model: Option<String>,
    pub request_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            max_tokens: 400,
            temperature: None,
            model: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl SessionOptions {
    /// Build options from the loaded config, reading a custom system prompt
    /// file if one is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            system_prompt: prompt::load_system_prompt(config.wizard.system_prompt_file.as_deref())?,
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature.map(|t| t as f32),
            model: config.llm.provider.default_model.clone(),
            request_timeout: Duration::from_millis(config.wizard.request_timeout_ms),
        })
    }
}

/// Owned, read-only copy of session state for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub busy: bool,
    pub stage: Stage,
    pub summary: Summary,
    pub transcript: Vec<TranscriptEntry>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// WizardSession
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct SessionState {
    phase: Phase,
    transcript: Transcript,
    summary: Summary,
    stage: Stage,
    /// Bumped on every reset so replies to pre-reset requests are dropped.
    generation: u64,
}

pub struct WizardSession {
    id: Uuid,
    provider: Arc<dyn LlmProvider>,
    options: SessionOptions,
    in_flight: Semaphore,
    state: Mutex<SessionState>,
}

impl WizardSession {
    pub fn new(provider: Arc<dyn LlmProvider>, options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider,
            options,
            in_flight: Semaphore::new(1),
            state: Mutex::new(SessionState {
                phase: Phase::NotStarted,
                transcript: Transcript::new(),
                summary: Summary::new(),
                stage: Stage::default(),
                generation: 0,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether a model call is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let st = self.state.lock();
        SessionSnapshot {
            phase: st.phase,
            busy: self.is_busy(),
            stage: st.stage,
            summary: st.summary.clone(),
            transcript: st.transcript.entries().to_vec(),
        }
    }

    /// The "copy summary" export of the current summary.
    pub fn export_summary(&self) -> String {
        self.state.lock().summary.export()
    }

    /// Open the conversation. Valid only before the first turn.
    ///
    /// Always leaves an assistant message behind: the model's greeting, or
    /// [`OPENING_GREETING`] when the call fails.
    pub async fn start(&self) -> TurnOutcome {
        let Ok(_permit) = self.in_flight.try_acquire() else {
            return TurnOutcome::Skipped(SkipReason::Busy);
        };

        let generation = {
            let mut st = self.state.lock();
            if st.phase != Phase::NotStarted {
                return TurnOutcome::Skipped(SkipReason::WrongPhase(st.phase));
            }
            st.phase = Phase::AwaitingFirstResponse;
            st.generation
        };

        tracing::info!(session_id = %self.id, provider = %self.provider.provider_id(), "starting session");
        let result = self.complete(vec![Message::user(SEED_INSTRUCTION)]).await;

        let mut st = self.state.lock();
        if st.generation != generation {
            tracing::debug!(session_id = %self.id, "session reset during opening call; reply dropped");
            return TurnOutcome::Discarded;
        }
        st.phase = Phase::Idle;

        match result {
            Ok(raw) => {
                // The opening reply only greets; any marker it carries is
                // stripped but not recorded.
                let ex = extract(&raw);
                if let Some(update) = &ex.update {
                    tracing::debug!(session_id = %self.id, field = %update.field, "ignoring summary marker in greeting");
                }
                st.transcript.push_assistant(ex.text);
                TurnOutcome::Replied {
                    update: None,
                    stage: st.stage,
                }
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "opening call failed; using built-in greeting");
                st.transcript.push_assistant(OPENING_GREETING);
                TurnOutcome::Fallback { error: e.to_string() }
            }
        }
    }

    /// Send one user message and wait for the reply.
    ///
    /// The user message is appended before the call and stays in the
    /// transcript even if the call fails.
    pub async fn send(&self, user_text: &str) -> TurnOutcome {
        let text = user_text.trim();
        if text.is_empty() {
            return TurnOutcome::Skipped(SkipReason::EmptyInput);
        }

        let Ok(_permit) = self.in_flight.try_acquire() else {
            tracing::debug!(session_id = %self.id, "send ignored; call in flight");
            return TurnOutcome::Skipped(SkipReason::Busy);
        };

        let (generation, messages) = {
            let mut st = self.state.lock();
            if st.phase != Phase::Idle {
                return TurnOutcome::Skipped(SkipReason::WrongPhase(st.phase));
            }
            st.transcript.push_user(text);
            st.phase = Phase::AwaitingResponse;
            (st.generation, st.transcript.to_messages())
        };

        let turn = messages.len();
        let result = self.complete(messages).await;

        let mut st = self.state.lock();
        if st.generation != generation {
            tracing::debug!(session_id = %self.id, "session reset during call; reply dropped");
            return TurnOutcome::Discarded;
        }
        st.phase = Phase::Idle;

        match result {
            Ok(raw) => {
                let ex = extract(&raw);
                let update = ex.update.map(|u| {
                    let outcome = st.summary.apply_update(&u.field, &u.value);
                    if let UpdateOutcome::DroppedUnknown(field) = &outcome {
                        tracing::warn!(session_id = %self.id, field = %field, "model named an unknown summary field");
                    }
                    outcome
                });
                let before = st.stage;
                st.stage = Stage::from_summary(&st.summary);
                if st.stage != before {
                    tracing::info!(session_id = %self.id, stage = st.stage.index(), label = st.stage.label(), "stage advanced");
                }
                st.transcript.push_assistant(ex.text);
                TurnOutcome::Replied {
                    update,
                    stage: st.stage,
                }
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, turn, error = %e, "model call failed; using fallback reply");
                st.transcript.push_assistant(FALLBACK_REPLY);
                TurnOutcome::Fallback { error: e.to_string() }
            }
        }
    }

    /// Clear transcript, summary and stage. Valid in every phase; a reply
    /// still in flight is dropped when it arrives.
    pub fn reset_session(&self) {
        let mut st = self.state.lock();
        st.transcript.clear();
        st.summary.reset();
        st.stage = Stage::default();
        st.phase = Phase::NotStarted;
        st.generation += 1;
        tracing::info!(session_id = %self.id, generation = st.generation, "session reset");
    }

    /// One model round-trip with the system prompt prepended. Timeouts map
    /// to [`Error::Timeout`].
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(Message::system(self.options.system_prompt.clone()));
        all.extend(messages);

        let req = ChatRequest {
            messages: all,
            temperature: self.options.temperature,
            max_tokens: Some(self.options.max_tokens),
            model: self.options.model.clone(),
        };

        let timeout = self.options.request_timeout;
        match tokio::time::timeout(timeout, self.provider.chat(&req)).await {
            Ok(resp) => Ok(resp?.content),
            Err(_) => Err(Error::Timeout(format!(
                "no reply from {} within {}ms",
                self.provider.provider_id(),
                timeout.as_millis()
            ))),
        }
    }
}
