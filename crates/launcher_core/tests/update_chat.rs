use launcher_core::{update, AppState, Effect, Msg, Tag, CHAT_ERROR_NOTICE};

fn init_logging() {
    launcher_logging::initialize_for_tests();
}

fn typed(state: AppState, text: &str) -> AppState {
    let (state, _) = update(state, Msg::InputChanged(text.to_string()));
    state
}

#[test]
fn submit_appends_turns_and_starts_generation() {
    init_logging();
    let mut state = typed(AppState::default(), "  What is Rust?  ");
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::InputSubmitted);

    assert_eq!(
        effects,
        vec![Effect::StartGeneration {
            request_id: 1,
            prompt: "What is Rust?".to_string(),
        }]
    );
    assert_eq!(state.input(), "");
    assert!(state.is_streaming());
    assert!(!state.input_enabled());
    assert!(state.consume_dirty());

    let spans = state.transcript().spans();
    let user = &spans[spans.len() - 2];
    assert_eq!(user.tag, Tag::User);
    assert_eq!(user.text, "You: What is Rust?\n");
    assert_eq!(spans.last().unwrap().text, "Bot: ");
}

#[test]
fn blank_input_is_ignored() {
    init_logging();
    let state = typed(AppState::default(), "   ");
    let (state, effects) = update(state, Msg::InputSubmitted);

    assert!(effects.is_empty());
    assert!(!state.is_streaming());
}

#[test]
fn submit_while_streaming_is_ignored() {
    init_logging();
    let state = typed(AppState::default(), "one");
    let (state, _) = update(state, Msg::InputSubmitted);
    let state = typed(state, "two");
    let (state, effects) = update(state, Msg::InputSubmitted);

    assert!(effects.is_empty());
    assert_eq!(state.input(), "two");
}

#[test]
fn chat_failure_reports_generation_error() {
    init_logging();
    let state = typed(AppState::default(), "hi");
    let (state, _) = update(state, Msg::InputSubmitted);
    let (state, _) = update(
        state,
        Msg::GenerationToken {
            request_id: 1,
            token: "Hel".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::GenerationFinished {
            request_id: 1,
            result: Err("timeout".to_string()),
        },
    );

    let expected_tail = format!("Bot: Hel{CHAT_ERROR_NOTICE}\n");
    assert!(state.transcript().text().ends_with(&expected_tail));
    assert_eq!(state.dialog().unwrap().title, "Generation Error");
    assert!(state.input_enabled());
}

#[test]
fn unchanged_input_does_not_mark_dirty() {
    init_logging();
    let mut state = typed(AppState::default(), "same");
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::InputChanged("same".to_string()));
    assert!(!state.consume_dirty());
}
