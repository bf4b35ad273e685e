use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, SecondsFormat};
use crossbeam_channel::Sender;
use launcher_core::{Effect, Msg};
use launcher_engine::{EngineEvent, EngineEvents, EngineHandle};
use launcher_logging::{launcher_debug, launcher_info, launcher_warn};

use super::programs::ProgramStore;
use super::timers::DeferredQueue;

/// Executes effects produced by `update`. Results come back as `Msg`s on `msg_tx`.
pub struct EffectRunner {
    engine: EngineHandle,
    store: ProgramStore,
    msg_tx: Sender<Msg>,
    quit_requested: bool,
}

impl EffectRunner {
    /// `wake` is called after each forwarded engine event so the UI loop
    /// notices messages that arrive while it is idle.
    pub fn new<W>(
        engine: EngineHandle,
        events: EngineEvents,
        store: ProgramStore,
        msg_tx: Sender<Msg>,
        wake: W,
    ) -> Self
    where
        W: Fn() + Send + 'static,
    {
        spawn_event_forwarder(events, msg_tx.clone(), wake);
        Self {
            engine,
            store,
            msg_tx,
            quit_requested: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn run(&mut self, effects: Vec<Effect>, timers: &mut DeferredQueue, now: Instant) {
        for effect in effects {
            match effect {
                Effect::ScheduleSeedCheck { after_ms, epoch } => {
                    launcher_debug!("Seed check {} scheduled in {} ms", epoch, after_ms);
                    timers.schedule(
                        now,
                        Duration::from_millis(after_ms),
                        Msg::SeedCheckDue { epoch },
                    );
                }
                Effect::StartGeneration { request_id, prompt } => {
                    launcher_info!(
                        "StartGeneration request_id={} prompt_len={}",
                        request_id,
                        prompt.len()
                    );
                    if let Err(err) = self.engine.generate(request_id, prompt) {
                        launcher_warn!("Generation {} not started: {}", request_id, err);
                        self.send(Msg::GenerationFinished {
                            request_id,
                            result: Err(err.to_string()),
                        });
                    }
                }
                Effect::LoadPrograms => self.load_programs(),
                Effect::RunProgram { name } => {
                    let msg = match self.store.get(&name) {
                        Ok(record) => Msg::ProgramLoaded {
                            prompts: record.prompts(),
                            name,
                        },
                        Err(err) => {
                            launcher_warn!("Program '{}' not loaded: {}", name, err);
                            Msg::ProgramLoadFailed {
                                name,
                                reason: err.to_string(),
                            }
                        }
                    };
                    self.send(msg);
                }
                Effect::CreateProgram { name, prompt } => {
                    let created_at = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
                    match self.store.create(&name, &prompt, &created_at) {
                        Ok(()) => self.load_programs(),
                        Err(err) => self.store_failed(err),
                    }
                }
                Effect::DeleteProgram { name } => match self.store.delete(&name) {
                    Ok(()) => self.load_programs(),
                    Err(err) => self.store_failed(err),
                },
                Effect::Quit => {
                    launcher_info!("Quit requested");
                    self.quit_requested = true;
                }
            }
        }
    }

    fn load_programs(&self) {
        match self.store.rows() {
            Ok(rows) => self.send(Msg::ProgramsLoaded(rows)),
            Err(err) => self.store_failed(err),
        }
    }

    fn store_failed(&self, err: impl std::fmt::Display) {
        launcher_warn!("Program store at {:?}: {}", self.store.path(), err);
        self.send(Msg::StoreFailed(err.to_string()));
    }

    fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }
}

fn spawn_event_forwarder<W>(events: EngineEvents, msg_tx: Sender<Msg>, wake: W)
where
    W: Fn() + Send + 'static,
{
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            let msg = match event {
                EngineEvent::Token { request_id, text } => Msg::GenerationToken {
                    request_id,
                    token: text,
                },
                EngineEvent::Finished { request_id, result } => Msg::GenerationFinished {
                    request_id,
                    result: result.map_err(|err| err.to_string()),
                },
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
            wake();
        }
        launcher_debug!("Engine event forwarder stopped");
    });
}
