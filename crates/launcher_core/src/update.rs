use crate::{
    AppState, DialogKind, Effect, GenerationOrigin, Msg, RequestId, SeedPhase, Tag,
};

pub const WELCOME_ERROR_NOTICE: &str = "\n[Error: failed to generate welcome message]\n";
pub const CHAT_ERROR_NOTICE: &str = "\n[Error: generation failed]\n";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ProgramsLoaded(rows) => {
            state.set_programs(rows);
            Vec::new()
        }
        Msg::StoreFailed(reason) => {
            state.open_dialog(DialogKind::Error, "Programs", reason);
            Vec::new()
        }
        Msg::RefreshPrograms => vec![Effect::LoadPrograms],
        Msg::ProgramSelected(name) => {
            state.select_program(name);
            Vec::new()
        }
        Msg::ProgramActivated(name) => {
            state.select_program(name.clone());
            if state.selected_program() == Some(name.as_str()) {
                run_selected(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::RunSelectedClicked => run_selected(&mut state),
        Msg::CreateProgramSubmitted { name, prompt } => {
            create_program(&mut state, name.trim(), prompt.trim())
        }
        Msg::ManageToggled => {
            state.toggle_manage_mode();
            Vec::new()
        }
        Msg::DeleteSelectedClicked => match state.selected_program().map(ToOwned::to_owned) {
            Some(name) => vec![Effect::DeleteProgram { name }],
            None => {
                state.open_dialog(DialogKind::Info, "Programs", "Select a program to delete.");
                Vec::new()
            }
        },
        Msg::ProgramLoaded { name, prompts } => run_program(&mut state, &name, prompts),
        Msg::ProgramLoadFailed { name, reason } => {
            state.open_dialog(
                DialogKind::Error,
                "Programs",
                format!("Could not load program '{name}': {reason}"),
            );
            Vec::new()
        }
        Msg::HideLauncher => hide_launcher(&mut state),
        Msg::ShowLauncher => {
            state.set_launcher_visible(true);
            if state.seed_pending() {
                // Cancels any check chain started by an earlier dismissal.
                state.bump_seed_epoch();
                state.set_seed_phase(SeedPhase::PendingOverlayClose);
            }
            vec![Effect::LoadPrograms]
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::InputSubmitted => submit_input(&mut state),
        Msg::SeedCheckDue { epoch } => try_fire_seed(&mut state, epoch),
        Msg::GenerationToken { request_id, token } => {
            if is_active_request(&state, request_id) {
                state.append(&token, Tag::Bot);
            }
            Vec::new()
        }
        Msg::GenerationFinished { request_id, result } => {
            finish_generation(&mut state, request_id, result)
        }
        Msg::DialogDismissed => {
            state.close_dialog();
            Vec::new()
        }
        Msg::ExitClicked => vec![Effect::Quit],
    };

    (state, effects)
}

fn hide_launcher(state: &mut AppState) -> Vec<Effect> {
    if !state.launcher_visible() {
        return Vec::new();
    }
    state.set_launcher_visible(false);
    if !(state.seed_pending() && state.seed().is_enabled()) {
        return Vec::new();
    }
    // Never fire straight from the dismissal; the first check is always deferred.
    let epoch = state.bump_seed_epoch();
    state.set_seed_phase(SeedPhase::PendingReady);
    vec![Effect::ScheduleSeedCheck {
        after_ms: state.seed().delay_ms(),
        epoch,
    }]
}

fn try_fire_seed(state: &mut AppState, epoch: u64) -> Vec<Effect> {
    if !state.seed().is_enabled() || !state.seed_pending() || epoch != state.seed_epoch() {
        return Vec::new();
    }

    // The chain ends here; the next dismissal starts a fresh one.
    if state.launcher_visible() {
        state.set_seed_phase(SeedPhase::PendingOverlayClose);
        return Vec::new();
    }

    if state.is_streaming() {
        state.set_seed_phase(SeedPhase::PendingReady);
        return vec![Effect::ScheduleSeedCheck {
            after_ms: state.seed().recheck_ms(),
            epoch,
        }];
    }

    if !state.take_pending_seed() {
        return Vec::new();
    }
    state.set_seed_phase(SeedPhase::Firing);
    let prompt = state.seed().text().to_string();
    let request_id = state.begin_generation(GenerationOrigin::Seed);
    state.append("Bot: ", Tag::Bot);
    vec![Effect::StartGeneration { request_id, prompt }]
}

fn is_active_request(state: &AppState, request_id: RequestId) -> bool {
    state
        .active_generation()
        .is_some_and(|active| active.request_id == request_id)
}

fn finish_generation(
    state: &mut AppState,
    request_id: RequestId,
    result: Result<(), String>,
) -> Vec<Effect> {
    let Some(active) = state
        .active_generation()
        .filter(|active| active.request_id == request_id)
    else {
        return Vec::new();
    };

    if let Err(detail) = result {
        match active.origin {
            GenerationOrigin::Seed => {
                state.append(WELCOME_ERROR_NOTICE, Tag::Sys);
                state.open_dialog(DialogKind::Error, "Welcome Error", detail);
            }
            GenerationOrigin::Chat | GenerationOrigin::Program => {
                state.append(CHAT_ERROR_NOTICE, Tag::Sys);
                state.open_dialog(DialogKind::Error, "Generation Error", detail);
                if active.origin == GenerationOrigin::Program {
                    state.clear_program_queue();
                }
            }
        }
    }

    state.append("\n", Tag::Bot);
    state.end_generation();
    if active.origin == GenerationOrigin::Seed {
        state.set_seed_phase(SeedPhase::Done);
    }

    start_next_program_prompt(state)
}

fn submit_input(state: &mut AppState) -> Vec<Effect> {
    if state.is_streaming() || !state.input_enabled() || state.input().trim().is_empty() {
        return Vec::new();
    }
    let prompt = state.take_input().trim().to_string();
    vec![start_prompt(state, prompt, GenerationOrigin::Chat)]
}

fn start_prompt(state: &mut AppState, prompt: String, origin: GenerationOrigin) -> Effect {
    state.append(&format!("You: {prompt}\n"), Tag::User);
    let request_id = state.begin_generation(origin);
    state.append("Bot: ", Tag::Bot);
    Effect::StartGeneration { request_id, prompt }
}

fn start_next_program_prompt(state: &mut AppState) -> Vec<Effect> {
    if state.is_streaming() {
        return Vec::new();
    }
    match state.next_queued_prompt() {
        Some(prompt) => vec![start_prompt(state, prompt, GenerationOrigin::Program)],
        None => Vec::new(),
    }
}

fn run_selected(state: &mut AppState) -> Vec<Effect> {
    let Some(name) = state.selected_program().map(ToOwned::to_owned) else {
        state.open_dialog(DialogKind::Info, "Programs", "Select a program to run.");
        return Vec::new();
    };
    let mut effects = hide_launcher(state);
    effects.push(Effect::RunProgram { name });
    effects
}

fn run_program(state: &mut AppState, name: &str, prompts: Vec<String>) -> Vec<Effect> {
    state.append(&format!("— Running program: {name} —\n"), Tag::Sys);
    let prompts: Vec<String> = prompts
        .iter()
        .map(|prompt| prompt.trim())
        .filter(|prompt| !prompt.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if prompts.is_empty() {
        state.append("— Program has no steps. —\n", Tag::Sys);
        return Vec::new();
    }
    state.queue_prompts(prompts);
    start_next_program_prompt(state)
}

fn create_program(state: &mut AppState, name: &str, prompt: &str) -> Vec<Effect> {
    if name.is_empty() || prompt.is_empty() {
        state.open_dialog(
            DialogKind::Info,
            "Create Program",
            "Enter a program name and a priming prompt.",
        );
        return Vec::new();
    }
    if state.has_program(name) {
        state.open_dialog(
            DialogKind::Info,
            "Create Program",
            format!("A program named '{name}' already exists."),
        );
        return Vec::new();
    }
    vec![Effect::CreateProgram {
        name: name.to_string(),
        prompt: prompt.to_string(),
    }]
}
