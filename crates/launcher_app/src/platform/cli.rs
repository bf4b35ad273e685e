use std::path::PathBuf;

use clap::Parser;
use launcher_core::{SeedConfig, DEFAULT_SEED_DELAY_MS, DEFAULT_SEED_RECHECK_MS};
use launcher_engine::{BackendSettings, SeedSources};
use log::LevelFilter;

/// Local chat with a programs launcher and an optional auto-generated welcome message.
#[derive(Debug, Clone, Parser)]
#[command(name = "programs-launcher", version)]
pub struct Args {
    /// Prompt used to generate the welcome message.
    #[arg(long, value_name = "TEXT")]
    pub seed_prompt: Option<String>,

    /// UTF-8 file whose contents are the welcome prompt.
    #[arg(long, value_name = "PATH")]
    pub seed_file: Option<PathBuf>,

    /// Environment variable holding the welcome prompt [default: CHATBOT_SEED_PROMPT].
    #[arg(long, value_name = "NAME")]
    pub seed_env: Option<String>,

    /// Milliseconds to wait after the launcher closes before seeding. Negative values count as 0.
    #[arg(
        long,
        value_name = "MS",
        default_value_t = DEFAULT_SEED_DELAY_MS as i64,
        allow_negative_numbers = true
    )]
    pub seed_delay: i64,

    /// Milliseconds between readiness checks while the chat is busy.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_SEED_RECHECK_MS)]
    pub seed_recheck: u64,

    /// Echo the welcome prompt into the transcript.
    #[arg(long)]
    pub show_seed: bool,

    /// Disable welcome seeding regardless of other sources.
    #[arg(long)]
    pub skip_seed: bool,

    /// Base URL of an OpenAI-compatible API.
    #[arg(
        long,
        value_name = "URL",
        env = "CHATBOT_BACKEND_URL",
        default_value = "http://localhost:1234/v1"
    )]
    pub backend_url: String,

    /// Model name sent with each request.
    #[arg(long, value_name = "NAME", env = "CHATBOT_MODEL", default_value = "local-model")]
    pub model: String,

    #[arg(long, value_name = "PATH", default_value = "programs.ron")]
    pub programs_file: PathBuf,

    #[arg(long, value_name = "PATH", default_value = "launcher.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn seed_sources(&self) -> SeedSources {
        SeedSources {
            skip: self.skip_seed,
            prompt: self.seed_prompt.clone(),
            file: self.seed_file.clone(),
            env_name: self.seed_env.clone(),
        }
    }

    pub fn seed_delay_ms(&self) -> u64 {
        self.seed_delay.max(0).unsigned_abs()
    }

    pub fn seed_config(&self, text: Option<&str>) -> SeedConfig {
        SeedConfig::new(text, self.show_seed, self.seed_delay_ms())
            .with_recheck_ms(self.seed_recheck)
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            model: self.model.clone(),
            ..BackendSettings::default()
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
