use std::sync::Once;

use launcher_core::{
    update, AppState, DialogKind, Effect, Msg, SeedConfig, SeedPhase, Tag, SEED_TIP,
    WELCOME_ERROR_NOTICE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(launcher_logging::initialize_for_tests);
}

/// Drives the state machine against a virtual millisecond clock.
struct Harness {
    state: Option<AppState>,
    now_ms: u64,
    timers: Vec<(u64, u64)>,
    fired_at: Vec<(u64, Effect)>,
}

impl Harness {
    fn new(seed: SeedConfig) -> Self {
        Self {
            state: Some(AppState::new(seed)),
            now_ms: 0,
            timers: Vec::new(),
            fired_at: Vec::new(),
        }
    }

    fn state(&self) -> &AppState {
        self.state.as_ref().unwrap()
    }

    fn send(&mut self, msg: Msg) -> Vec<Effect> {
        let state = self.state.take().unwrap();
        let (state, effects) = update(state, msg);
        self.state = Some(state);
        for effect in &effects {
            match effect {
                Effect::ScheduleSeedCheck { after_ms, epoch } => {
                    self.timers.push((self.now_ms + after_ms, *epoch))
                }
                Effect::StartGeneration { .. } => self.fired_at.push((self.now_ms, effect.clone())),
                _ => {}
            }
        }
        effects
    }

    /// Delivers every timer due at or before `until_ms`, in deadline order.
    fn advance_to(&mut self, until_ms: u64) {
        loop {
            self.timers.sort_unstable();
            match self.timers.first().copied() {
                Some((due, epoch)) if due <= until_ms => {
                    self.timers.remove(0);
                    self.now_ms = due;
                    self.send(Msg::SeedCheckDue { epoch });
                }
                _ => break,
            }
        }
        self.now_ms = until_ms;
    }
}

fn generation_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartGeneration { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("start generation effect")
}

#[test]
fn construction_with_seed_is_pending_behind_overlay() {
    init_logging();
    let state = AppState::new(SeedConfig::new(Some("  Hello  "), false, 250));

    assert_eq!(state.seed().text(), "Hello");
    assert!(state.seed_pending());
    assert_eq!(state.seed_phase(), SeedPhase::PendingOverlayClose);
    assert!(state.launcher_visible());
    assert_eq!(state.transcript().text(), "— Welcome seeding enabled. —\n");
}

#[test]
fn show_seed_echoes_the_configured_text() {
    init_logging();
    let state = AppState::new(SeedConfig::new(Some("Greet me"), true, 250));

    assert_eq!(
        state.transcript().text(),
        "— Welcome seeding enabled (showing configured seed): —\nGreet me\n"
    );
    assert!(state.transcript().spans().iter().all(|span| span.tag == Tag::Sys));
}

#[test]
fn blank_seed_is_never_pending() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("   \n"), true, 250));

    assert!(!harness.state().seed_pending());
    assert_eq!(harness.state().seed_phase(), SeedPhase::Idle);
    assert_eq!(harness.state().transcript().text(), SEED_TIP);

    let effects = harness.send(Msg::HideLauncher);
    assert!(effects.is_empty());
    let effects = harness.send(Msg::SeedCheckDue { epoch: 0 });
    assert!(effects.is_empty());
    assert_eq!(harness.state().seed_phase(), SeedPhase::Idle);
}

#[test]
fn first_check_runs_after_configured_delay_from_dismissal() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));

    harness.advance_to(50);
    let effects = harness.send(Msg::HideLauncher);
    assert_eq!(
        effects,
        vec![Effect::ScheduleSeedCheck {
            after_ms: 250,
            epoch: 1
        }]
    );
    assert_eq!(harness.state().seed_phase(), SeedPhase::PendingReady);
    assert!(harness.fired_at.is_empty());

    harness.advance_to(299);
    assert!(harness.fired_at.is_empty());
    assert!(harness.state().seed_pending());

    harness.advance_to(300);
    assert_eq!(
        harness.fired_at,
        vec![(
            300,
            Effect::StartGeneration {
                request_id: 1,
                prompt: "Hello".to_string(),
            }
        )]
    );
    assert!(!harness.state().seed_pending());
    assert!(harness.state().is_streaming());
    assert!(!harness.state().input_enabled());
    assert_eq!(harness.state().seed_phase(), SeedPhase::Firing);
    assert!(harness.state().transcript().text().ends_with("Bot: "));
}

#[test]
fn dismissal_alone_never_fires() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 0));

    let effects = harness.send(Msg::HideLauncher);

    assert_eq!(
        effects,
        vec![Effect::ScheduleSeedCheck {
            after_ms: 0,
            epoch: 1
        }]
    );
    assert!(harness.state().seed_pending());
    assert!(harness.fired_at.is_empty());
}

#[test]
fn never_fires_while_overlay_visible() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));

    for _ in 0..10 {
        let epoch = harness.state().seed_epoch();
        let effects = harness.send(Msg::SeedCheckDue { epoch });
        assert!(effects.is_empty());
    }

    assert!(harness.fired_at.is_empty());
    assert!(harness.state().seed_pending());
    assert_eq!(harness.state().seed_phase(), SeedPhase::PendingOverlayClose);
}

#[test]
fn never_fires_while_another_stream_is_active() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));
    harness.send(Msg::HideLauncher);
    harness.send(Msg::InputChanged("hi".to_string()));
    let chat = harness.send(Msg::InputSubmitted);
    let chat_id = generation_id(&chat);

    harness.advance_to(5_000);
    assert_eq!(harness.fired_at.len(), 1, "only the chat generation started");
    assert!(harness.state().seed_pending());
    assert_eq!(harness.state().seed_phase(), SeedPhase::PendingReady);

    harness.send(Msg::GenerationFinished {
        request_id: chat_id,
        result: Ok(()),
    });
    harness.advance_to(5_300);

    assert_eq!(harness.fired_at.len(), 2);
    assert_eq!(
        harness.fired_at[1].1,
        Effect::StartGeneration {
            request_id: 2,
            prompt: "Hello".to_string(),
        }
    );
}

#[test]
fn recheck_interval_is_independent_of_initial_delay() {
    init_logging();
    let seed = SeedConfig::new(Some("Hello"), false, 40).with_recheck_ms(1_000);
    let mut harness = Harness::new(seed);
    harness.send(Msg::HideLauncher);
    harness.send(Msg::InputChanged("hi".to_string()));
    harness.send(Msg::InputSubmitted);
    let epoch = harness.state().seed_epoch();

    let effects = harness.send(Msg::SeedCheckDue { epoch });

    assert_eq!(
        effects,
        vec![Effect::ScheduleSeedCheck {
            after_ms: 1_000,
            epoch
        }]
    );
}

#[test]
fn seed_fires_at_most_once() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));
    harness.send(Msg::HideLauncher);
    harness.advance_to(250);
    assert_eq!(harness.fired_at.len(), 1);
    let seed_id = generation_id(&[harness.fired_at[0].1.clone()]);

    // Stray rechecks and re-dismissals after firing are harmless.
    for _ in 0..5 {
        let epoch = harness.state().seed_epoch();
        assert!(harness.send(Msg::SeedCheckDue { epoch }).is_empty());
    }
    harness.send(Msg::GenerationFinished {
        request_id: seed_id,
        result: Ok(()),
    });
    harness.send(Msg::ShowLauncher);
    assert!(harness.send(Msg::HideLauncher).is_empty());
    let epoch = harness.state().seed_epoch();
    assert!(harness.send(Msg::SeedCheckDue { epoch }).is_empty());

    assert_eq!(harness.fired_at.len(), 1);
    assert!(!harness.state().seed_pending());
    assert_eq!(harness.state().seed_phase(), SeedPhase::Done);
}

#[test]
fn reopened_launcher_holds_the_seed_back() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));
    harness.send(Msg::HideLauncher);
    harness.advance_to(100);
    harness.send(Msg::ShowLauncher);
    assert_eq!(harness.state().seed_phase(), SeedPhase::PendingOverlayClose);

    harness.advance_to(2_000);
    assert!(harness.fired_at.is_empty());

    harness.send(Msg::HideLauncher);
    harness.advance_to(2_249);
    assert!(harness.fired_at.is_empty());
    harness.advance_to(2_250);
    assert_eq!(harness.fired_at.len(), 1);
    assert_eq!(harness.fired_at[0].0, 2_250);
}

#[test]
fn checks_from_an_earlier_dismissal_are_dropped() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));
    harness.send(Msg::HideLauncher);
    let first_epoch = harness.state().seed_epoch();
    harness.send(Msg::ShowLauncher);
    harness.send(Msg::HideLauncher);

    assert!(harness.send(Msg::SeedCheckDue { epoch: first_epoch }).is_empty());
    assert!(harness.state().seed_pending());
    assert_eq!(harness.state().seed_phase(), SeedPhase::PendingReady);
}

#[test]
fn repeated_show_hide_cycles_fire_once_after_the_last_dismissal() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));

    // Dismiss and reopen every 200 ms so no check ever sees a closed overlay.
    for cycle in 0..5u64 {
        harness.advance_to(cycle * 200);
        harness.send(Msg::HideLauncher);
        harness.advance_to(cycle * 200 + 100);
        harness.send(Msg::ShowLauncher);
    }
    harness.advance_to(3_000);
    assert!(harness.fired_at.is_empty());

    harness.send(Msg::HideLauncher);
    harness.advance_to(10_000);
    assert_eq!(harness.fired_at.len(), 1);
    assert_eq!(harness.fired_at[0].0, 3_250);
}

#[test]
fn tokens_stream_into_transcript_and_completion_resets_input() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));
    harness.send(Msg::HideLauncher);
    harness.advance_to(250);
    let request_id = generation_id(&[harness.fired_at[0].1.clone()]);

    for token in ["Welcome", " back", "!"] {
        harness.send(Msg::GenerationToken {
            request_id,
            token: token.to_string(),
        });
    }
    harness.send(Msg::GenerationFinished {
        request_id,
        result: Ok(()),
    });

    let state = harness.state();
    assert!(state.transcript().text().ends_with("Bot: Welcome back!\n"));
    let last = state.transcript().spans().last().unwrap();
    assert_eq!(last.tag, Tag::Bot);
    assert!(!state.is_streaming());
    assert!(state.input_enabled());
    assert_eq!(state.seed_phase(), SeedPhase::Done);
    assert!(state.dialog().is_none());
}

#[test]
fn failure_mid_stream_keeps_tokens_then_reports_error() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));
    harness.send(Msg::HideLauncher);
    harness.advance_to(250);
    let request_id = generation_id(&[harness.fired_at[0].1.clone()]);

    harness.send(Msg::GenerationToken {
        request_id,
        token: "Partial".to_string(),
    });
    harness.send(Msg::GenerationFinished {
        request_id,
        result: Err("backend returned http status 500".to_string()),
    });

    let state = harness.state();
    let expected_tail = format!("Bot: Partial{WELCOME_ERROR_NOTICE}\n");
    assert!(state.transcript().text().ends_with(&expected_tail));
    assert!(state.input_enabled());
    assert!(!state.is_streaming());
    assert_eq!(state.seed_phase(), SeedPhase::Done);

    let dialog = state.dialog().expect("error dialog");
    assert_eq!(dialog.kind, DialogKind::Error);
    assert_eq!(dialog.title, "Welcome Error");
    assert_eq!(dialog.message, "backend returned http status 500");
}

#[test]
fn stale_tokens_are_ignored() {
    init_logging();
    let mut harness = Harness::new(SeedConfig::new(Some("Hello"), false, 250));
    harness.send(Msg::HideLauncher);
    harness.advance_to(250);
    let before = harness.state().transcript().text();

    harness.send(Msg::GenerationToken {
        request_id: 99,
        token: "ghost".to_string(),
    });
    harness.send(Msg::GenerationFinished {
        request_id: 99,
        result: Ok(()),
    });

    assert_eq!(harness.state().transcript().text(), before);
    assert!(harness.state().is_streaming());
}
