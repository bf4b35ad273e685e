use std::collections::VecDeque;

use crate::seed::{SeedConfig, SeedPhase};
use crate::view_model::{AppViewModel, LauncherView, ProgramRowView};

pub type RequestId = u64;

pub const SEED_TIP: &str = "— Tip: launch with --seed-prompt \"...\" or set env CHATBOT_SEED_PROMPT to auto-generate a welcome message. —\n";
pub const EMPTY_PROGRAMS_HINT: &str = "No programs found. Click 'Create Program' to add one.";

/// Style tag attached to transcript text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Sys,
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSpan {
    pub tag: Tag,
    pub text: String,
}

/// Append-only chat transcript. Adjacent text with the same tag shares a span.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    spans: Vec<TranscriptSpan>,
}

impl Transcript {
    pub fn append(&mut self, text: &str, tag: Tag) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(text),
            _ => self.spans.push(TranscriptSpan {
                tag,
                text: text.to_string(),
            }),
        }
    }

    pub fn spans(&self) -> &[TranscriptSpan] {
        &self.spans
    }

    /// Plain text of the whole transcript, tags dropped.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRow {
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

/// Who asked for the generation currently streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOrigin {
    Seed,
    Chat,
    Program,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActiveGeneration {
    pub(crate) request_id: RequestId,
    pub(crate) origin: GenerationOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    seed: SeedConfig,
    seed_phase: SeedPhase,
    pending_seed: bool,
    seed_epoch: u64,
    streaming: bool,
    active: Option<ActiveGeneration>,
    next_request_id: RequestId,
    launcher_visible: bool,
    programs: Vec<ProgramRow>,
    programs_loaded: bool,
    selected_program: Option<String>,
    manage_mode: bool,
    program_queue: VecDeque<String>,
    transcript: Transcript,
    input: String,
    input_enabled: bool,
    dialog: Option<Dialog>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SeedConfig::default())
    }
}

impl AppState {
    pub fn new(seed: SeedConfig) -> Self {
        let mut state = Self {
            seed,
            seed_phase: SeedPhase::Idle,
            pending_seed: false,
            seed_epoch: 0,
            streaming: false,
            active: None,
            next_request_id: 1,
            launcher_visible: true,
            programs: Vec::new(),
            programs_loaded: false,
            selected_program: None,
            manage_mode: false,
            program_queue: VecDeque::new(),
            transcript: Transcript::default(),
            input: String::new(),
            input_enabled: true,
            dialog: None,
            dirty: true,
        };
        state.announce_seed();
        state
    }

    fn announce_seed(&mut self) {
        if self.seed.is_enabled() {
            if self.seed.show_text() {
                self.transcript.append(
                    "— Welcome seeding enabled (showing configured seed): —\n",
                    Tag::Sys,
                );
                let line = format!("{}\n", self.seed.text());
                self.transcript.append(&line, Tag::Sys);
            } else {
                self.transcript
                    .append("— Welcome seeding enabled. —\n", Tag::Sys);
            }
            self.pending_seed = true;
            self.seed_phase = SeedPhase::PendingOverlayClose;
        } else {
            self.transcript.append(SEED_TIP, Tag::Sys);
        }
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .programs
            .iter()
            .map(|row| ProgramRowView {
                name: row.name.clone(),
                created_at: row.created_at.clone(),
                selected: self.selected_program.as_deref() == Some(row.name.as_str()),
            })
            .collect();
        let empty_hint = (self.programs_loaded && self.programs.is_empty())
            .then(|| EMPTY_PROGRAMS_HINT.to_string());

        AppViewModel {
            launcher: LauncherView {
                visible: self.launcher_visible,
                rows,
                empty_hint,
                manage_mode: self.manage_mode,
                has_selection: self.selected_program.is_some(),
            },
            transcript: self.transcript.spans().to_vec(),
            input: self.input.clone(),
            input_enabled: self.input_enabled,
            streaming: self.streaming,
            seed_phase: self.seed_phase,
            dialog: self.dialog.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn seed(&self) -> &SeedConfig {
        &self.seed
    }

    pub fn seed_phase(&self) -> SeedPhase {
        self.seed_phase
    }

    pub fn seed_pending(&self) -> bool {
        self.pending_seed
    }

    /// Generation of the current readiness-check chain. Checks from older chains are dropped.
    pub fn seed_epoch(&self) -> u64 {
        self.seed_epoch
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn launcher_visible(&self) -> bool {
        self.launcher_visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn selected_program(&self) -> Option<&str> {
        self.selected_program.as_deref()
    }

    pub fn queued_prompts(&self) -> usize {
        self.program_queue.len()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn append(&mut self, text: &str, tag: Tag) {
        self.transcript.append(text, tag);
        self.mark_dirty();
    }

    pub(crate) fn set_seed_phase(&mut self, phase: SeedPhase) {
        if self.seed_phase != phase {
            self.seed_phase = phase;
            self.mark_dirty();
        }
    }

    pub(crate) fn bump_seed_epoch(&mut self) -> u64 {
        self.seed_epoch += 1;
        self.seed_epoch
    }

    /// Clears the pending flag. Returns false if the seed already fired.
    pub(crate) fn take_pending_seed(&mut self) -> bool {
        std::mem::take(&mut self.pending_seed)
    }

    pub(crate) fn set_launcher_visible(&mut self, visible: bool) {
        if self.launcher_visible != visible {
            self.launcher_visible = visible;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_programs(&mut self, programs: Vec<ProgramRow>) {
        if let Some(selected) = self.selected_program.as_deref() {
            if !programs.iter().any(|row| row.name == selected) {
                self.selected_program = None;
            }
        }
        self.programs = programs;
        self.programs_loaded = true;
        self.mark_dirty();
    }

    pub(crate) fn has_program(&self, name: &str) -> bool {
        self.programs.iter().any(|row| row.name == name)
    }

    pub(crate) fn select_program(&mut self, name: String) {
        if self.has_program(&name) {
            self.selected_program = Some(name);
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_manage_mode(&mut self) {
        self.manage_mode = !self.manage_mode;
        self.mark_dirty();
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn take_input(&mut self) -> String {
        self.mark_dirty();
        std::mem::take(&mut self.input)
    }

    pub(crate) fn open_dialog(&mut self, kind: DialogKind, title: &str, message: impl Into<String>) {
        self.dialog = Some(Dialog {
            kind,
            title: title.to_string(),
            message: message.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn close_dialog(&mut self) {
        if self.dialog.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn queue_prompts(&mut self, prompts: Vec<String>) {
        self.program_queue.extend(prompts);
    }

    pub(crate) fn clear_program_queue(&mut self) {
        self.program_queue.clear();
    }

    pub(crate) fn next_queued_prompt(&mut self) -> Option<String> {
        self.program_queue.pop_front()
    }

    /// Marks the chat busy and hands out the id for the new generation.
    pub(crate) fn begin_generation(&mut self, origin: GenerationOrigin) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.active = Some(ActiveGeneration { request_id, origin });
        self.streaming = true;
        self.input_enabled = false;
        self.mark_dirty();
        request_id
    }

    pub(crate) fn active_generation(&self) -> Option<ActiveGeneration> {
        self.active
    }

    pub(crate) fn end_generation(&mut self) {
        self.active = None;
        self.streaming = false;
        self.input_enabled = true;
        self.mark_dirty();
    }
}
