use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use launcher_logging::{launcher_error, launcher_info, launcher_warn};

use crate::backend::{BackendSettings, ChannelTokenSink, ChatBackend, OpenAiCompatBackend};
use crate::{BackendError, EngineEvent, RequestId};

enum EngineCommand {
    Generate { request_id: RequestId, prompt: String },
}

/// Sending half of the engine: queues generations onto the worker thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving half of the engine: tokens and completions in arrival order.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<(Self, EngineEvents), BackendError> {
        let backend = OpenAiCompatBackend::new(settings)?;
        launcher_info!("Chat backend endpoint {}", backend.endpoint());
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// Spawns the worker thread around any backend implementation.
    pub fn with_backend(backend: Arc<dyn ChatBackend>) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    launcher_error!("Failed to build engine runtime: {}", err);
                    fail_all(cmd_rx, event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx).await;
                });
            }
            // Let in-flight generations report before the runtime is dropped.
            runtime.shutdown_timeout(Duration::from_secs(5));
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    /// Queues a generation. Fails only when the worker thread is gone.
    pub fn generate(
        &self,
        request_id: RequestId,
        prompt: impl Into<String>,
    ) -> Result<(), BackendError> {
        self.cmd_tx
            .send(EngineCommand::Generate {
                request_id,
                prompt: prompt.into(),
            })
            .map_err(|_| BackendError::Unavailable("engine worker stopped".to_string()))
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the worker and all senders are gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    backend: &dyn ChatBackend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Generate { request_id, prompt } => {
            let sink = ChannelTokenSink::new(request_id, event_tx.clone());
            let result = AssertUnwindSafe(backend.respond_stream(&prompt, &sink))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(BackendError::Remote("backend panicked".to_string())));
            if let Err(err) = &result {
                launcher_warn!("Generation {} failed: {}", request_id, err);
            }
            let _ = event_tx.send(EngineEvent::Finished { request_id, result });
        }
    }
}

fn fail_all(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: &str,
) {
    while let Ok(EngineCommand::Generate { request_id, .. }) = cmd_rx.recv() {
        let _ = event_tx.send(EngineEvent::Finished {
            request_id,
            result: Err(BackendError::Unavailable(reason.to_string())),
        });
    }
}
