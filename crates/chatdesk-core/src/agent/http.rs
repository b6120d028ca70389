use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{AgentOutcome, AgentTransport, SendOptions};
use crate::error::TransportError;

#[derive(Serialize)]
struct AgentChatRequest<'a> {
    message: &'a str,
    agent_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

/// Body returned by the agent endpoint.
#[derive(Debug, Deserialize)]
struct AgentEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    response: Option<Value>,
}

impl AgentEnvelope {
    fn into_outcome(self) -> AgentOutcome {
        match (self.success, self.response) {
            (true, Some(response)) => AgentOutcome::Success(response),
            _ => AgentOutcome::Unsuccessful,
        }
    }
}

/// Agent transport over JSON-over-HTTP.
#[derive(Clone)]
pub struct HttpAgentClient {
    client: Client,
    endpoint: String,
}

impl HttpAgentClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AgentTransport for HttpAgentClient {
    async fn send(
        &self,
        message: &str,
        agent_id: &str,
        options: &SendOptions,
    ) -> Result<AgentOutcome, TransportError> {
        let request = AgentChatRequest {
            message,
            agent_id,
            session_id: options.session_id.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let envelope: AgentEnvelope = serde_json::from_slice(&body)?;
        debug!(success = envelope.success, "agent endpoint replied");
        Ok(envelope.into_outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(body: &str) -> AgentOutcome {
        serde_json::from_str::<AgentEnvelope>(body)
            .expect("envelope parses")
            .into_outcome()
    }

    #[test]
    fn test_success_with_response() {
        assert_eq!(
            outcome(r#"{"success": true, "response": {"result": {"answer": "hi"}}}"#),
            AgentOutcome::Success(json!({"result": {"answer": "hi"}}))
        );
    }

    #[test]
    fn test_success_without_response_is_unsuccessful() {
        assert_eq!(outcome(r#"{"success": true}"#), AgentOutcome::Unsuccessful);
        assert_eq!(
            outcome(r#"{"success": true, "response": null}"#),
            AgentOutcome::Unsuccessful
        );
    }

    #[test]
    fn test_explicit_failure() {
        assert_eq!(
            outcome(r#"{"success": false, "response": {"result": "x"}}"#),
            AgentOutcome::Unsuccessful
        );
        assert_eq!(outcome("{}"), AgentOutcome::Unsuccessful);
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(AgentChatRequest {
            message: "Pricing & Plans",
            agent_id: "agent-1",
            session_id: Some("session_1_abc"),
        })
        .expect("serializes");
        assert_eq!(
            body,
            json!({"message": "Pricing & Plans", "agent_id": "agent-1", "session_id": "session_1_abc"})
        );

        let body = serde_json::to_value(AgentChatRequest {
            message: "hi",
            agent_id: "agent-1",
            session_id: None,
        })
        .expect("serializes");
        assert!(body.get("session_id").is_none());
    }

    #[test]
    fn test_client_keeps_endpoint() {
        let client = HttpAgentClient::new("http://localhost:3000/api/agent", Duration::from_secs(5))
            .expect("client builds");
        assert_eq!(client.endpoint(), "http://localhost:3000/api/agent");
    }
}
