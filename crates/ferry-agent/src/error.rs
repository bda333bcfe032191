use thiserror::Error;

/// Errors from a single agent round-trip.
///
/// None of these are retried; each is reported once in the originating
/// channel and the bridge moves on to the next message.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent did not respond within {secs}s")]
    Timeout { secs: u64 },

    #[error("cannot reach agent API: {0}")]
    Transport(String),

    #[error("agent rejected the API key (HTTP {status})")]
    Auth { status: u16 },

    #[error("agent returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed agent response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
