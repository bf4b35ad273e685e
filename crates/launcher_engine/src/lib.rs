//! Launcher engine: chat backend, generation worker, seed resolution, and file IO.
mod backend;
mod engine;
mod persist;
mod seed;
mod sse;
mod types;

pub use backend::{
    completions_url, BackendSettings, ChannelTokenSink, ChatBackend, OpenAiCompatBackend,
    TokenSink,
};
pub use engine::{EngineEvents, EngineHandle};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use seed::{
    read_seed_file, resolve_seed, resolve_seed_with, SeedError, SeedSources, DEFAULT_SEED_ENV,
};
pub use sse::{ChatStreamParser, StreamEvent};
pub use types::{BackendError, EngineEvent, RequestId};
