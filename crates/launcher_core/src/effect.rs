#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `Msg::SeedCheckDue { epoch }` after the given delay.
    ScheduleSeedCheck { after_ms: u64, epoch: u64 },
    StartGeneration {
        request_id: crate::RequestId,
        prompt: String,
    },
    LoadPrograms,
    RunProgram { name: String },
    CreateProgram { name: String, prompt: String },
    DeleteProgram { name: String },
    Quit,
}
