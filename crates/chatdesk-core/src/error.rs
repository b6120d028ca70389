use thiserror::Error;

/// Failures talking to the agent endpoint.
///
/// These never reach the user: the conversation turns all of them into the
/// same apology entry.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("agent request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("agent endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("agent response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("agent task ended before replying: {0}")]
    TaskFailed(String),
}
