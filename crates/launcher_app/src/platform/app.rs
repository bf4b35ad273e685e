use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use crossbeam_channel::{unbounded, Receiver};
use launcher_core::{update, AppState, AppViewModel, Msg, SeedConfig};
use launcher_engine::{resolve_seed, EngineEvents, EngineHandle};
use launcher_logging::{launcher_debug, launcher_info};

use super::cli::Args;
use super::effects::EffectRunner;
use super::frontpage::Frontpage;
use super::logging::{self, LogDestination};
use super::programs::ProgramStore;
use super::timers::DeferredQueue;
use super::ui::{self, launcher::CreateDraft, theme::ThemeProvider};

const STREAMING_REPAINT: Duration = Duration::from_millis(100);

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::initialize(LogDestination::Both(&args.log_file), args.log_level());
    launcher_info!("Starting programs launcher");

    let seed_text = resolve_seed(&args.seed_sources());
    let seed = args.seed_config(seed_text.as_deref());
    launcher_info!(
        "Welcome seeding {} (delay {} ms)",
        if seed.is_enabled() { "enabled" } else { "disabled" },
        seed.delay_ms()
    );

    let (engine, events) = EngineHandle::new(args.backend_settings())
        .with_context(|| format!("invalid backend url {:?}", args.backend_url))?;
    let store = ProgramStore::new(args.programs_file.clone());
    let theme = ThemeProvider::from_env();
    launcher_debug!("Theme provider {:?}", theme);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Offline Chatbot")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "programs-launcher",
        options,
        Box::new(move |cc| {
            theme.apply(&cc.egui_ctx);
            let repaint_ctx = cc.egui_ctx.clone();
            Ok(Box::new(LauncherApp::new(
                seed,
                engine,
                events,
                store,
                theme,
                move || repaint_ctx.request_repaint(),
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to open the main window: {err}"))
}

struct LauncherApp {
    state: AppState,
    view: AppViewModel,
    runner: EffectRunner,
    timers: DeferredQueue,
    msg_rx: Receiver<Msg>,
    draft: CreateDraft,
    theme: ThemeProvider,
    closing: bool,
}

impl LauncherApp {
    fn new<W>(
        seed: SeedConfig,
        engine: EngineHandle,
        events: EngineEvents,
        store: ProgramStore,
        theme: ThemeProvider,
        wake: W,
    ) -> Self
    where
        W: Fn() + Send + 'static,
    {
        let (msg_tx, msg_rx) = unbounded();
        let runner = EffectRunner::new(engine, events, store, msg_tx, wake);
        let mut state = AppState::new(seed);
        state.consume_dirty();
        let view = state.view();

        let mut app = Self {
            state,
            view,
            runner,
            timers: DeferredQueue::default(),
            msg_rx,
            draft: CreateDraft::default(),
            theme,
            closing: false,
        };
        app.refresh_frontpage_list();
        app
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.view = state.view();
        }
        self.state = state;
        self.runner.run(effects, &mut self.timers, Instant::now());
    }

    fn process_pending_messages(&mut self) {
        for msg in self.timers.drain_due(Instant::now()) {
            self.dispatch_msg(msg);
        }
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch_msg(msg);
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        if let Some(deadline) = self.timers.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        } else if self.view.streaming {
            ctx.request_repaint_after(STREAMING_REPAINT);
        }
    }
}

impl Frontpage for LauncherApp {
    fn build_frontpage(&mut self, ctx: &egui::Context) {
        if !self.view.launcher.visible {
            return;
        }
        let mut outbox = Vec::new();
        ui::launcher::show(ctx, &self.view.launcher, self.theme, &mut self.draft, &mut outbox);
        for msg in outbox {
            match msg {
                Msg::HideLauncher => self.hide_frontpage(),
                Msg::ProgramActivated(name) => self.run_program_by_name(&name),
                Msg::RefreshPrograms => self.refresh_frontpage_list(),
                other => self.dispatch_msg(other),
            }
        }
    }

    fn refresh_frontpage_list(&mut self) {
        self.dispatch_msg(Msg::RefreshPrograms);
    }

    fn hide_frontpage(&mut self) {
        self.dispatch_msg(Msg::HideLauncher);
    }

    fn run_program_by_name(&mut self, name: &str) {
        self.dispatch_msg(Msg::ProgramActivated(name.to_string()));
    }
}

impl eframe::App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_pending_messages();

        if self.runner.quit_requested() && !self.closing {
            self.closing = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let mut outbox = Vec::new();
        ui::chat::show(ctx, &self.view, self.theme, &mut outbox);
        self.build_frontpage(ctx);
        if let Some(dialog) = &self.view.dialog {
            ui::dialog::show(ctx, dialog, self.theme, &mut outbox);
        }

        for msg in outbox {
            self.dispatch_msg(msg);
        }

        if !self.msg_rx.is_empty() {
            ctx.request_repaint();
        }
        self.schedule_repaint(ctx);
    }
}
