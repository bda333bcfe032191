//! HTTP client for the agent's message endpoint.
//!
//! One POST per user message: `{"message": ..., "context_id": ...}` with an
//! `X-API-KEY` header, answered by `{"context_id": ..., "response": ...}`.
//! The whole round-trip is bounded by the configured timeout.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ferry_core::config::AgentConfig;

use crate::error::AgentError;

/// Upper bound on the error-body excerpt reported back to the channel.
const ERROR_BODY_MAX: usize = 500;

#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    message: &'a str,
    context_id: &'a str,
}

/// Parsed agent reply.
#[derive(Debug, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub context_id: Option<String>,
    #[serde(default)]
    pub response: String,
}

impl AgentReply {
    /// Reply text, with a placeholder when the agent sent nothing back.
    pub fn into_text(self) -> String {
        if self.response.is_empty() {
            "(agent returned an empty response)".to_string()
        } else {
            self.response
        }
    }
}

/// Client for the agent API endpoint.
pub struct AgentClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl AgentClient {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Send one message and block until the agent answers or the timeout
    /// elapses. Never retries.
    pub async fn send(&self, context_id: &str, message: &str) -> Result<AgentReply, AgentError> {
        let response = self
            .http
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("X-API-KEY", &self.api_key)
            .json(&AgentRequest {
                message,
                context_id,
            })
            .send()
            .await
            .map_err(|e| classify_request_error(&e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(&e, self.timeout))?;

        debug!(status = %status, bytes = body.len(), "agent responded");
        parse_reply(status, &body)
    }
}

/// Map a reqwest failure onto the bridge's error taxonomy.
fn classify_request_error(e: &reqwest::Error, timeout: Duration) -> AgentError {
    if e.is_timeout() {
        AgentError::Timeout {
            secs: timeout.as_secs(),
        }
    } else {
        AgentError::Transport(e.to_string())
    }
}

/// Classify the HTTP status and decode the reply body.
fn parse_reply(status: StatusCode, body: &str) -> Result<AgentReply, AgentError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AgentError::Auth {
            status: status.as_u16(),
        }),
        s if !s.is_success() => Err(AgentError::Api {
            status: s.as_u16(),
            body: truncate(body, ERROR_BODY_MAX),
        }),
        _ => Ok(serde_json::from_str(body)?),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}
