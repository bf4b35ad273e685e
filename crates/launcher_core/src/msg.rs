#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Program list read from the store.
    ProgramsLoaded(Vec<crate::ProgramRow>),
    /// Store access failed; the message is shown to the user.
    StoreFailed(String),
    /// User asked for a fresh program list.
    RefreshPrograms,
    /// User clicked a row in the programs table.
    ProgramSelected(String),
    /// User double-clicked a row in the programs table.
    ProgramActivated(String),
    /// User clicked Run Program.
    RunSelectedClicked,
    /// User submitted the Create Program form.
    CreateProgramSubmitted { name: String, prompt: String },
    /// User toggled Manage Programs.
    ManageToggled,
    /// User clicked Delete in manage mode.
    DeleteSelectedClicked,
    /// Program record fetched for a run.
    ProgramLoaded { name: String, prompts: Vec<String> },
    /// Program record could not be fetched for a run.
    ProgramLoadFailed { name: String, reason: String },
    /// Launcher overlay dismissed.
    HideLauncher,
    /// Launcher overlay re-opened from the chat.
    ShowLauncher,
    /// User edited the chat input.
    InputChanged(String),
    /// User pressed Send / Enter.
    InputSubmitted,
    /// Deferred welcome seed readiness check.
    SeedCheckDue { epoch: u64 },
    /// Token streamed back from the engine.
    GenerationToken {
        request_id: crate::RequestId,
        token: String,
    },
    /// Engine finished a generation.
    GenerationFinished {
        request_id: crate::RequestId,
        result: Result<(), String>,
    },
    /// User closed the visible dialog.
    DialogDismissed,
    /// User clicked Exit.
    ExitClicked,
}
