//! End-to-end turns through `WizardSession` with a scripted model.
//!
//! The scripted provider replays queued replies, counts calls, and can hold
//! a call open until the test releases it, which makes the in-flight window
//! observable without timing assumptions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bfi_domain::error::{Error, Result};
use bfi_domain::message::Role;
use bfi_providers::{ChatRequest, ChatResponse, LlmProvider};
use bfi_wizard::prompt::{FALLBACK_REPLY, OPENING_GREETING};
use bfi_wizard::{Field, Phase, SessionOptions, SkipReason, TurnOutcome, UpdateOutcome, WizardSession};
use parking_lot::Mutex;
use tokio::sync::Notify;

enum Reply {
    Text(String),
    Fail(String),
    /// Wait for the notify, then answer.
    Held(Arc<Notify>, String),
    /// Never answer.
    Hang,
}

struct Scripted {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn ok(content: String) -> Result<ChatResponse> {
    Ok(ChatResponse {
        content,
        usage: None,
        model: "scripted".into(),
        finish_reason: Some("stop".into()),
    })
}

#[async_trait::async_trait]
impl LlmProvider for Scripted {
    async fn chat(&self, _req: &ChatRequest) -> Result<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.replies.lock().pop_front();
        match next {
            Some(Reply::Text(t)) => ok(t),
            Some(Reply::Fail(msg)) => Err(Error::Http(msg)),
            Some(Reply::Held(gate, t)) => {
                gate.notified().await;
                ok(t)
            }
            Some(Reply::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(Error::Other("script exhausted".into())),
        }
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }
}

fn text(s: &str) -> Reply {
    Reply::Text(s.to_string())
}

fn new_session(provider: Arc<Scripted>) -> Arc<WizardSession> {
    Arc::new(WizardSession::new(provider, SessionOptions::default()))
}

async fn wait_until_busy(session: &WizardSession) {
    while !session.is_busy() {
        tokio::task::yield_now().await;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Happy path
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn marker_reply_moves_stage_from_zero_to_one() {
    let provider = Scripted::new(vec![
        text("Hey! What do you want to build?"),
        text(r#"Got it!|||SUMMARY:{"field":"problem","value":"no easy expense splitting"}|||"#),
    ]);
    let session = new_session(provider);

    session.start().await;
    assert_eq!(session.snapshot().stage.index(), 0);

    let outcome = session.send("Splitting rent with roommates is a pain").await;
    match outcome {
        TurnOutcome::Replied { update, stage } => {
            assert_eq!(update, Some(UpdateOutcome::Applied(Field::Problem)));
            assert_eq!(stage.index(), 1);
        }
        other => panic!("expected a reply, got {other:?}"),
    }

    let snap = session.snapshot();
    assert_eq!(snap.summary.get(Field::Problem), Some("no easy expense splitting"));
    let last = snap.transcript.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, "Got it!");
    assert_eq!(snap.phase, Phase::Idle);
}

#[tokio::test]
async fn full_walkthrough_caps_at_decision() {
    let fields = ["problem", "users", "competition", "differentiation", "complexity", "recommendation"];
    let mut script = vec![text("hello")];
    script.extend(fields.iter().map(|f| {
        text(&format!(r#"Noted. |||SUMMARY:{{"field":"{f}","value":"{f} answer"}}|||"#))
    }));
    let session = new_session(Scripted::new(script));
    session.start().await;

    let mut stages = Vec::new();
    for f in fields {
        session.send(&format!("about {f}")).await;
        stages.push(session.snapshot().stage.index());
    }

    assert_eq!(stages, [1, 2, 3, 4, 5, 5]);
    let snap = session.snapshot();
    assert_eq!(snap.stage.label(), "Decision");
    assert_eq!(snap.summary.len(), 6);
    assert_eq!(snap.transcript.len(), 13);
    assert!(session.export_summary().starts_with("PROBLEM: problem answer\n\nUSERS: users answer"));
    assert!(session.export_summary().ends_with("RECOMMENDATION: recommendation answer"));
}

#[tokio::test]
async fn malformed_marker_is_shown_and_ignored() {
    let raw = r#"Interesting |||SUMMARY:{"field":"users" "value":"x"}|||"#;
    let session = new_session(Scripted::new(vec![text("hi"), text(raw)]));
    session.start().await;

    let outcome = session.send("nurses").await;
    assert!(matches!(outcome, TurnOutcome::Replied { update: None, .. }));

    let snap = session.snapshot();
    assert_eq!(snap.transcript.last().unwrap().content, raw);
    assert!(snap.summary.is_empty());
    assert_eq!(snap.stage.index(), 0);
}

#[tokio::test]
async fn unknown_field_is_dropped_without_touching_summary() {
    let session = new_session(Scripted::new(vec![
        text("hi"),
        text(r#"Cool |||SUMMARY:{"field":"pricing","value":"freemium"}|||"#),
    ]));
    session.start().await;

    let outcome = session.send("it'd be freemium").await;
    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            update: Some(UpdateOutcome::DroppedUnknown("pricing".into())),
            stage: Default::default(),
        }
    );
    let snap = session.snapshot();
    assert!(snap.summary.is_empty());
    assert_eq!(snap.transcript.last().unwrap().content, "Cool");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// No-op intents
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn blank_input_is_a_no_op() {
    let provider = Scripted::new(vec![text("hi")]);
    let session = new_session(provider.clone());
    session.start().await;

    for input in ["", "   ", "\n\t"] {
        assert_eq!(session.send(input).await, TurnOutcome::Skipped(SkipReason::EmptyInput));
    }
    assert_eq!(session.snapshot().transcript.len(), 1);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn send_while_busy_is_a_no_op() {
    let release = Arc::new(Notify::new());
    let provider = Scripted::new(vec![text("hi"), Reply::Held(release.clone(), "first reply".into())]);
    let session = new_session(provider.clone());
    session.start().await;

    let in_flight = {
        let session = session.clone();
        tokio::spawn(async move { session.send("first").await })
    };
    wait_until_busy(&session).await;

    assert!(session.snapshot().busy);
    assert_eq!(session.phase(), Phase::AwaitingResponse);
    assert_eq!(session.send("second").await, TurnOutcome::Skipped(SkipReason::Busy));
    assert_eq!(session.start().await, TurnOutcome::Skipped(SkipReason::Busy));
    assert_eq!(provider.calls(), 2);
    // Optimistic append: the user turn is visible while waiting.
    assert_eq!(session.snapshot().transcript.last().unwrap().content, "first");

    release.notify_one();
    let outcome = in_flight.await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Replied { .. }));

    let contents: Vec<String> = session
        .snapshot()
        .transcript
        .into_iter()
        .map(|e| e.content)
        .collect();
    assert_eq!(contents, ["hi", "first", "first reply"]);
    assert!(!session.is_busy());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Failures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn failed_opening_uses_builtin_greeting() {
    let session = new_session(Scripted::new(vec![Reply::Fail("connection refused".into())]));

    let outcome = session.start().await;
    assert!(matches!(outcome, TurnOutcome::Fallback { .. }));

    let snap = session.snapshot();
    assert_eq!(snap.phase, Phase::Idle);
    assert_eq!(snap.transcript.len(), 1);
    assert_eq!(snap.transcript[0].content, OPENING_GREETING);
}

#[tokio::test]
async fn transport_failure_keeps_user_turn_and_appends_fallback() {
    let session = new_session(Scripted::new(vec![
        text("hi"),
        text(r#"ok|||SUMMARY:{"field":"problem","value":"p"}|||"#),
        Reply::Fail("502 bad gateway".into()),
    ]));
    session.start().await;
    session.send("my problem").await;
    let before = session.snapshot();

    let outcome = session.send("I want to build X").await;
    assert!(matches!(outcome, TurnOutcome::Fallback { .. }));

    let after = session.snapshot();
    let tail: Vec<(Role, &str)> = after.transcript[before.transcript.len()..]
        .iter()
        .map(|e| (e.role, e.content.as_str()))
        .collect();
    assert_eq!(tail, [(Role::User, "I want to build X"), (Role::Assistant, FALLBACK_REPLY)]);
    assert_eq!(after.summary, before.summary);
    assert_eq!(after.stage, before.stage);
    assert_eq!(after.phase, Phase::Idle);
}

#[tokio::test]
async fn session_recovers_after_failure() {
    let session = new_session(Scripted::new(vec![
        text("hi"),
        Reply::Fail("timeout".into()),
        text("Welcome back"),
    ]));
    session.start().await;
    session.send("one").await;

    assert!(matches!(session.send("two").await, TurnOutcome::Replied { .. }));
    assert_eq!(session.snapshot().transcript.last().unwrap().content, "Welcome back");
}

#[tokio::test]
async fn slow_model_times_out_into_fallback() {
    let provider = Scripted::new(vec![text("hi"), Reply::Hang]);
    let options = SessionOptions {
        request_timeout: Duration::from_millis(50),
        ..Default::default()
    };
    let session = WizardSession::new(provider, options);
    session.start().await;

    match session.send("hello?").await {
        TurnOutcome::Fallback { error } => assert!(error.contains("timeout"), "{error}"),
        other => panic!("expected fallback, got {other:?}"),
    }
    assert_eq!(session.snapshot().transcript.last().unwrap().content, FALLBACK_REPLY);
    assert!(!session.is_busy());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reset
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn reset_then_start_again() {
    let session = new_session(Scripted::new(vec![
        text("first greeting"),
        text(r#"ok|||SUMMARY:{"field":"users","value":"teachers"}|||"#),
        text("second greeting"),
    ]));
    session.start().await;
    session.send("teachers").await;

    session.reset_session();
    let snap = session.snapshot();
    assert!(snap.transcript.is_empty());
    assert!(snap.summary.is_empty());
    assert_eq!(snap.stage.index(), 0);

    assert!(matches!(session.start().await, TurnOutcome::Replied { .. }));
    let snap = session.snapshot();
    assert_eq!(snap.transcript.len(), 1);
    assert_eq!(snap.transcript[0].content, "second greeting");
}

#[tokio::test]
async fn reply_arriving_after_reset_is_discarded() {
    let release = Arc::new(Notify::new());
    let session = new_session(Scripted::new(vec![
        text("hi"),
        Reply::Held(release.clone(), r#"late|||SUMMARY:{"field":"problem","value":"p"}|||"#.into()),
    ]));
    session.start().await;

    let in_flight = {
        let session = session.clone();
        tokio::spawn(async move { session.send("question").await })
    };
    wait_until_busy(&session).await;

    session.reset_session();
    assert_eq!(session.phase(), Phase::NotStarted);

    release.notify_one();
    assert_eq!(in_flight.await.unwrap(), TurnOutcome::Discarded);

    let snap = session.snapshot();
    assert!(snap.transcript.is_empty());
    assert!(snap.summary.is_empty());
    assert_eq!(snap.phase, Phase::NotStarted);
}
