use thiserror::Error;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Token {
        request_id: RequestId,
        text: String,
    },
    Finished {
        request_id: RequestId,
        result: Result<(), BackendError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("backend returned http status {0}")]
    HttpStatus(u16),
    #[error("backend request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("backend reported an error: {0}")]
    Remote(String),
    #[error("engine unavailable: {0}")]
    Unavailable(String),
}
