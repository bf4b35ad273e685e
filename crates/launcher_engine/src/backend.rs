use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use launcher_logging::{launcher_debug, launcher_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::json;
use url::Url;

use crate::sse::{ChatStreamParser, StreamEvent};
use crate::{BackendError, EngineEvent, RequestId};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Base of an OpenAI-compatible API, e.g. `http://localhost:1234/v1`.
    pub base_url: String,
    pub model: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            model: "local-model".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Receives generated text as it streams in.
pub trait TokenSink: Send + Sync {
    fn token(&self, text: &str);
}

pub struct ChannelTokenSink {
    request_id: RequestId,
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelTokenSink {
    pub fn new(request_id: RequestId, tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { request_id, tx }
    }
}

impl TokenSink for ChannelTokenSink {
    fn token(&self, text: &str) {
        let _ = self.tx.send(EngineEvent::Token {
            request_id: self.request_id,
            text: text.to_string(),
        });
    }
}

#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Streams a response to `prompt`, handing each token to `sink`.
    async fn respond_stream(&self, prompt: &str, sink: &dyn TokenSink)
        -> Result<(), BackendError>;
}

/// Backend for local servers speaking the OpenAI chat completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatBackend {
    settings: BackendSettings,
    endpoint: Url,
    client: reqwest::Client,
}

impl OpenAiCompatBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let endpoint = completions_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::Unavailable(err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatBackend for OpenAiCompatBackend {
    async fn respond_stream(
        &self,
        prompt: &str,
        sink: &dyn TokenSink,
    ) -> Result<(), BackendError> {
        let body = json!({
            "model": self.settings.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": true,
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .body(body.to_string())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            launcher_warn!("Backend {} answered {}", self.endpoint, status);
            return Err(BackendError::HttpStatus(status.as_u16()));
        }

        let mut parser = ChatStreamParser::default();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            for event in parser.feed(&chunk) {
                if apply_event(event, sink)? {
                    return Ok(());
                }
            }
        }
        for event in parser.finish() {
            if apply_event(event, sink)? {
                return Ok(());
            }
        }

        launcher_debug!("Stream from {} ended without [DONE]", self.endpoint);
        Ok(())
    }
}

/// Returns `Ok(true)` once the stream signals completion.
fn apply_event(event: StreamEvent, sink: &dyn TokenSink) -> Result<bool, BackendError> {
    match event {
        StreamEvent::Delta(text) => {
            sink.token(&text);
            Ok(false)
        }
        StreamEvent::Done => Ok(true),
        StreamEvent::Error(message) => Err(BackendError::Remote(message)),
    }
}

/// Resolves `{base}/chat/completions`, tolerating a missing trailing slash.
pub fn completions_url(base: &str) -> Result<Url, BackendError> {
    let mut normalized = base.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let base_url = Url::parse(&normalized)
        .map_err(|err| BackendError::InvalidUrl(format!("{base}: {err}")))?;
    if base_url.cannot_be_a_base() {
        return Err(BackendError::InvalidUrl(base.to_string()));
    }
    base_url
        .join("chat/completions")
        .map_err(|err| BackendError::InvalidUrl(format!("{base}: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Timeout;
    }
    BackendError::Network(err.to_string())
}
