//! Tests for the session reducer.

use std::time::{Duration, Instant};

use super::*;
use crate::clear_flow::ClearState;
use crate::session::{Limits, SessionSettings};

struct Harness {
    session: Session,
    registry: ModeRegistry,
    now: Instant,
}

impl Harness {
    fn new() -> Self {
        Self::with_settings(SessionSettings::default())
    }

    fn with_settings(settings: SessionSettings) -> Self {
        let now = Instant::now();
        Self {
            session: Session::new(&settings, now),
            registry: ModeRegistry::builtin(),
            now,
        }
    }

    fn apply(&mut self, action: Action) -> Result<Vec<Effect>, SessionError> {
        reduce(&mut self.session, &self.registry, action, self.now)
    }

    /// Send `text` and resolve the request with `reply`.
    fn exchange(&mut self, text: &str, reply: Result<&str, CompletionError>) {
        let effects = self.apply(Action::Send(text.into())).unwrap();
        let mode = effects
            .iter()
            .find_map(|e| match e {
                Effect::Complete { mode, .. } => Some(mode.clone()),
                _ => None,
            })
            .expect("send should request a completion");
        self.apply(Action::CompletionResolved {
            mode,
            result: reply.map(String::from),
        })
        .unwrap();
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

fn small_cap(max_messages: usize) -> SessionSettings {
    SessionSettings {
        limits: Limits {
            max_messages,
            ..Limits::default()
        },
        rate_limit: 1000,
        ..SessionSettings::default()
    }
}

#[test]
fn hello_scenario() {
    let mut h = Harness::new();
    h.exchange("Hello", Ok("Hi there"));

    assert_eq!(
        h.session.messages(),
        [
            Message::user(0, "Hello"),
            Message::assistant(1, "Hi there", "random"),
        ]
    );
    assert!(!h.session.is_loading());
    assert_eq!(h.session.request_count(), 1);
}

#[test]
fn send_emits_effects_in_order() {
    let mut h = Harness::new();
    let effects = h.apply(Action::Send("Hello".into())).unwrap();

    assert_eq!(
        effects,
        vec![
            Effect::Notify(Event::MessageAppended {
                id: 0,
                sent_by_user: true
            }),
            Effect::Notify(Event::LoadingChanged(true)),
            Effect::SaveMessages(vec![Message::user(0, "Hello")]),
            Effect::Complete {
                prompt: "User: Hello".into(),
                mode: "random".into()
            },
        ]
    );
    assert!(h.session.is_loading());
}

#[test]
fn prompt_contains_prior_history() {
    let mut h = Harness::new();
    h.exchange("Hello", Ok("Hi there"));
    let effects = h.apply(Action::Send("More".into())).unwrap();
    assert!(effects.contains(&Effect::Complete {
        prompt: "Hello\nHi there\nUser: More".into(),
        mode: "random".into()
    }));
}

#[test]
fn failure_appends_fallback() {
    let mut h = Harness::new();
    h.exchange("X", Err(CompletionError::Timeout));

    let reply = &h.session.messages()[1];
    assert_eq!(reply.text, FALLBACK_TEXT);
    assert!(!reply.sent_by_user);
    assert_eq!(reply.mode.as_deref(), Some("random"));
    assert!(!h.session.is_loading());
    assert_eq!(h.session.request_count(), 0);
}

#[test]
fn empty_and_whitespace_input_is_ignored() {
    let mut h = Harness::new();
    for text in ["", "   ", "\n\t "] {
        assert_eq!(
            h.apply(Action::Send(text.into())),
            Err(SessionError::EmptyInput)
        );
    }
    assert!(h.session.messages().is_empty());
    assert_eq!(h.session.request_count(), 0);
    assert!(!h.session.is_loading());
}

#[test]
fn ids_match_positions() {
    let mut h = Harness::new();
    for i in 0..5 {
        h.exchange(&format!("q{i}"), Ok("a"));
    }
    for (index, message) in h.session.messages().iter().enumerate() {
        assert_eq!(message.id, index as u64);
    }
}

#[test]
fn second_send_while_loading_is_busy() {
    let mut h = Harness::new();
    h.apply(Action::Send("first".into())).unwrap();
    assert_eq!(
        h.apply(Action::Send("second".into())),
        Err(SessionError::Busy)
    );
    assert_eq!(h.session.messages().len(), 1);
}

#[test]
fn draft_is_truncated_and_cleared_on_send() {
    let mut h = Harness::new();
    h.apply(Action::UpdateDraft("x".repeat(300))).unwrap();
    assert_eq!(h.session.draft().chars().count(), 250);

    let draft = h.session.draft().to_string();
    h.apply(Action::Send(draft)).unwrap();
    assert!(h.session.draft().is_empty());
    assert_eq!(h.session.messages()[0].text.chars().count(), 250);
}

#[test]
fn long_send_is_truncated() {
    let mut h = Harness::new();
    h.apply(Action::Send("é".repeat(260))).unwrap();
    assert_eq!(h.session.messages()[0].text.chars().count(), 250);
}

#[test]
fn capacity_blocks_until_confirmed_clear() {
    let mut h = Harness::with_settings(small_cap(100));
    for i in 0..50 {
        h.exchange(&format!("q{i}"), Ok("a"));
    }
    assert_eq!(h.session.messages().len(), 100);
    assert!(h.session.needs_new_topic());
    assert_eq!(
        h.apply(Action::Send("one more".into())),
        Err(SessionError::CapacityExceeded { max: 100 })
    );

    h.apply(Action::RequestClear).unwrap();
    h.apply(Action::ConfirmClear).unwrap();
    h.exchange("fresh", Ok("start"));
    assert_eq!(h.session.messages()[0].id, 0);
    assert_eq!(h.session.messages()[1].id, 1);
}

#[test]
fn conversation_started_flips_once_at_six() {
    let mut h = Harness::new();
    h.exchange("a", Ok("b"));
    h.exchange("c", Ok("d"));
    assert!(!h.session.conversation_started());
    h.exchange("e", Ok("f"));
    assert_eq!(h.session.messages().len(), 6);
    assert!(h.session.conversation_started());

    h.exchange("g", Ok("h"));
    assert!(h.session.conversation_started());

    h.apply(Action::RequestClear).unwrap();
    h.apply(Action::CancelClear).unwrap();
    assert!(h.session.conversation_started());

    h.apply(Action::RequestClear).unwrap();
    h.apply(Action::ConfirmClear).unwrap();
    assert!(!h.session.conversation_started());
}

#[test]
fn cancel_clear_restores_messages_exactly() {
    let mut h = Harness::new();
    h.exchange("Hello", Ok("Hi there"));
    let before = h.session.messages().to_vec();

    let effects = h.apply(Action::RequestClear).unwrap();
    assert_eq!(effects, vec![Effect::Notify(Event::ClearRequested)]);
    assert_eq!(h.session.snapshot().clear_state, ClearState::PendingConfirm);

    let effects = h.apply(Action::CancelClear).unwrap();
    assert_eq!(effects, vec![Effect::Notify(Event::ClearCancelled)]);
    assert_eq!(h.session.messages(), before.as_slice());
    assert_eq!(h.session.snapshot().clear_state, ClearState::Idle);
}

#[test]
fn confirm_clear_empties_and_removes_record() {
    let mut h = Harness::new();
    h.exchange("Hello", Ok("Hi there"));
    h.apply(Action::RequestClear).unwrap();

    let effects = h.apply(Action::ConfirmClear).unwrap();
    assert_eq!(
        effects,
        vec![Effect::RemoveMessages, Effect::Notify(Event::Cleared)]
    );
    assert!(h.session.messages().is_empty());
}

#[test]
fn clear_transitions_require_pending_request() {
    let mut h = Harness::new();
    assert_eq!(
        h.apply(Action::ConfirmClear),
        Err(SessionError::NoClearPending)
    );
    assert_eq!(
        h.apply(Action::CancelClear),
        Err(SessionError::NoClearPending)
    );
}

#[test]
fn send_is_blocked_while_clear_pending() {
    let mut h = Harness::new();
    h.apply(Action::RequestClear).unwrap();
    assert_eq!(
        h.apply(Action::Send("hi".into())),
        Err(SessionError::ClearPending)
    );
}

#[test]
fn reply_landing_during_pending_clear_survives_cancel() {
    let mut h = Harness::new();
    h.apply(Action::Send("Hello".into())).unwrap();
    h.apply(Action::RequestClear).unwrap();
    h.apply(Action::CompletionResolved {
        mode: "random".into(),
        result: Ok("Hi there".into()),
    })
    .unwrap();

    h.apply(Action::CancelClear).unwrap();
    assert_eq!(h.session.messages().len(), 2);
    assert_eq!(h.session.messages()[1].text, "Hi there");
}

#[test]
fn reply_after_confirmed_clear_starts_new_conversation() {
    let mut h = Harness::new();
    h.apply(Action::Send("Hello".into())).unwrap();
    h.apply(Action::RequestClear).unwrap();
    h.apply(Action::ConfirmClear).unwrap();
    h.apply(Action::CompletionResolved {
        mode: "random".into(),
        result: Ok("Hi there".into()),
    })
    .unwrap();

    assert_eq!(
        h.session.messages(),
        [Message::assistant(0, "Hi there", "random")]
    );
}

#[test]
fn reply_keeps_send_time_mode() {
    let mut h = Harness::new();
    h.apply(Action::Send("Hello".into())).unwrap();
    h.apply(Action::SelectMode("short".into())).unwrap();
    h.apply(Action::CompletionResolved {
        mode: "random".into(),
        result: Ok("Hi".into()),
    })
    .unwrap();

    assert_eq!(h.session.mode(), "short");
    assert_eq!(h.session.messages()[1].mode.as_deref(), Some("random"));
}

#[test]
fn select_available_mode_persists() {
    let mut h = Harness::new();
    let effects = h.apply(Action::SelectMode("short".into())).unwrap();
    assert_eq!(
        effects,
        vec![
            Effect::SaveMode("short".into()),
            Effect::Notify(Event::ModeChanged("short".into())),
        ]
    );
    assert_eq!(h.session.mode(), "short");
}

#[test]
fn select_unavailable_or_unknown_mode_is_ignored() {
    let mut h = Harness::new();
    assert_eq!(
        h.apply(Action::SelectMode("code".into())),
        Err(SessionError::ModeUnavailable("code".into()))
    );
    assert_eq!(
        h.apply(Action::SelectMode("pirate".into())),
        Err(SessionError::ModeUnavailable("pirate".into()))
    );
    assert_eq!(h.session.mode(), "random");
}

#[test]
fn rate_limit_ten_per_minute() {
    let mut h = Harness::new();
    for i in 0..10 {
        h.exchange(&format!("q{i}"), Ok("a"));
        h.advance(Duration::from_secs(1));
    }
    assert_eq!(h.session.request_count(), 10);

    let err = h.apply(Action::Send("eleventh".into())).unwrap_err();
    assert!(matches!(err, SessionError::RateLimited { .. }));
    assert_eq!(h.session.messages().len(), 20);

    h.advance(Duration::from_secs(60));
    h.exchange("after the window", Ok("ok"));
    assert_eq!(h.session.request_count(), 1);
}

#[test]
fn failed_completions_do_not_count() {
    let mut h = Harness::new();
    for _ in 0..12 {
        h.exchange("q", Err(CompletionError::NetworkError("down".into())));
    }
    assert_eq!(h.session.request_count(), 0);
    assert_eq!(h.session.messages().len(), 24);
}

#[test]
fn tick_resets_exhausted_window() {
    let mut h = Harness::new();
    for _ in 0..10 {
        h.exchange("q", Ok("a"));
    }
    assert!(h.apply(Action::Tick).unwrap().is_empty());

    h.advance(Duration::from_secs(60));
    let effects = h.apply(Action::Tick).unwrap();
    assert_eq!(effects, vec![Effect::Notify(Event::RateWindowReset)]);
    assert_eq!(h.session.request_count(), 0);
    assert!(!h.session.snapshot().rate_limited);
}

#[test]
fn tick_without_requests_is_silent() {
    let mut h = Harness::new();
    h.advance(Duration::from_secs(120));
    assert!(h.apply(Action::Tick).unwrap().is_empty());
}

#[test]
fn restored_odd_length_history_is_full_one_short_of_cap() {
    let mut h = Harness::with_settings(small_cap(100));
    let history: Vec<Message> = (0..99).map(|i| Message::user(i, "x")).collect();
    h.session.restore(history, "random".into(), None);

    assert!(h.session.needs_new_topic());
    assert_eq!(
        h.apply(Action::Send("one more".into())),
        Err(SessionError::CapacityExceeded { max: 100 })
    );
    assert_eq!(h.session.messages().len(), 99);

    h.apply(Action::RequestClear).unwrap();
    h.apply(Action::ConfirmClear).unwrap();
    h.exchange("fresh", Ok("start"));
    assert_eq!(h.session.messages().len(), 2);
}

#[test]
fn restored_history_with_room_for_one_exchange_accepts_it() {
    let mut h = Harness::with_settings(small_cap(100));
    let history: Vec<Message> = (0..98).map(|i| Message::user(i, "x")).collect();
    h.session.restore(history, "random".into(), None);

    h.exchange("last", Ok("reply"));
    assert_eq!(h.session.messages().len(), 100);
    assert_eq!(h.session.messages()[99].id, 99);
}
