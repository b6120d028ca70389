//! The boundary with the remote dialogue agent.
//!
//! The conversation never talks to the network itself: it hands out an
//! [`AgentRequest`] for each accepted turn, and whoever drives it performs the
//! call through an [`AgentTransport`] and feeds the outcome back.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::error::TransportError;

pub use http::HttpAgentClient;

/// Per-call options forwarded to the agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub session_id: Option<String>,
}

/// What the agent said about a request that reached it.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// Raw, untyped reply payload. See [`crate::normalize`].
    Success(Value),
    Unsuccessful,
}

#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn send(
        &self,
        message: &str,
        agent_id: &str,
        options: &SendOptions,
    ) -> Result<AgentOutcome, TransportError>;
}

/// Identifies one dispatched turn. Monotonic within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// One outbound call owed to the agent for an accepted turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    pub id: RequestId,
    pub message: String,
    pub agent_id: String,
    pub session_id: String,
}

/// Perform the call for `request`.
pub async fn dispatch(
    transport: &dyn AgentTransport,
    request: &AgentRequest,
) -> Result<AgentOutcome, TransportError> {
    let options = SendOptions {
        session_id: Some(request.session_id.clone()),
    };
    transport
        .send(&request.message, &request.agent_id, &options)
        .await
}
