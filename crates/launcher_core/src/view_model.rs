use crate::{Dialog, SeedPhase, TranscriptSpan};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LauncherView {
    pub visible: bool,
    pub rows: Vec<ProgramRowView>,
    pub empty_hint: Option<String>,
    pub manage_mode: bool,
    pub has_selection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRowView {
    pub name: String,
    pub created_at: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub launcher: LauncherView,
    pub transcript: Vec<TranscriptSpan>,
    pub input: String,
    pub input_enabled: bool,
    pub streaming: bool,
    pub seed_phase: SeedPhase,
    pub dialog: Option<Dialog>,
    pub dirty: bool,
}
