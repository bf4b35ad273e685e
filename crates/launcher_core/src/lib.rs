//! Launcher core: pure state machine for the programs launcher, chat, and welcome seeding.
mod effect;
mod msg;
mod seed;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use seed::{SeedConfig, SeedPhase, DEFAULT_SEED_DELAY_MS, DEFAULT_SEED_RECHECK_MS};
pub use state::{
    AppState, Dialog, DialogKind, GenerationOrigin, ProgramRow, RequestId, Tag, Transcript,
    TranscriptSpan, EMPTY_PROGRAMS_HINT, SEED_TIP,
};
pub use update::{update, CHAT_ERROR_NOTICE, WELCOME_ERROR_NOTICE};
pub use view_model::{AppViewModel, LauncherView, ProgramRowView};
