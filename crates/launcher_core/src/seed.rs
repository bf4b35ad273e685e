/// Delay between leaving the launcher and the first readiness check.
pub const DEFAULT_SEED_DELAY_MS: u64 = 250;

/// Interval used when a readiness check finds the chat busy or still covered.
pub const DEFAULT_SEED_RECHECK_MS: u64 = 300;

/// Welcome seed settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    text: String,
    show_text: bool,
    delay_ms: u64,
    recheck_ms: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl SeedConfig {
    /// Builds a config from the resolved seed text. Whitespace-only text disables seeding.
    pub fn new(text: Option<&str>, show_text: bool, delay_ms: u64) -> Self {
        Self {
            text: text.map(str::trim).unwrap_or_default().to_string(),
            show_text,
            delay_ms,
            recheck_ms: DEFAULT_SEED_RECHECK_MS,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, false, DEFAULT_SEED_DELAY_MS)
    }

    pub fn with_recheck_ms(mut self, recheck_ms: u64) -> Self {
        self.recheck_ms = recheck_ms;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_enabled(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn show_text(&self) -> bool {
        self.show_text
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn recheck_ms(&self) -> u64 {
        self.recheck_ms
    }
}

/// Where the welcome seed is in its one-shot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPhase {
    /// No seed configured; nothing will ever fire.
    #[default]
    Idle,
    /// Seed configured but the launcher still covers the chat.
    PendingOverlayClose,
    /// Launcher dismissed; waiting for the chat to be idle.
    PendingReady,
    /// Generation dispatched and streaming.
    Firing,
    /// Generation finished (successfully or not). Terminal.
    Done,
}
