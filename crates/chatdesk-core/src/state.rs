//! UI-agnostic conversation state.
//!
//! [`Conversation`] owns the transcript and the turn-taking rules. Frontends
//! read it through shared references and drive it through the operations
//! below; nothing else can mutate the transcript.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agent::{self, AgentOutcome, AgentRequest, AgentTransport, RequestId};
use crate::config::Config;
use crate::error::TransportError;
use crate::normalize::normalize;
use crate::session::mint_session_id;

/// Shown in place of an answer when the agent could not be reached.
pub const ERROR_APOLOGY: &str = "I'm having trouble connecting. Please try again.";

/// A chat message in the conversation transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub is_error: bool,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingReply(RequestId),
}

pub struct Conversation {
    transcript: Vec<ChatMessage>,
    turn: TurnState,
    active_chips: Vec<String>,
    default_chips: Vec<String>,
    session_id: String,
    agent_id: String,
    active_agent: Option<String>,
    next_message: u64,
    next_request: u64,
}

impl Conversation {
    pub fn new(session_id: String, agent_id: String, default_chips: Vec<String>) -> Self {
        Self {
            transcript: Vec::new(),
            turn: TurnState::Idle,
            active_chips: default_chips.clone(),
            default_chips,
            session_id,
            agent_id,
            active_agent: None,
            next_message: 0,
            next_request: 0,
        }
    }

    /// Start a conversation with a freshly minted session id.
    pub fn start(config: &Config) -> Self {
        let conversation = Self::new(
            mint_session_id(),
            config.agent_id().to_string(),
            config.chips(),
        );
        info!(session = %conversation.session_id, agent = %conversation.agent_id, "conversation started");
        conversation
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.transcript.last()
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.turn, TurnState::AwaitingReply(_))
    }

    pub fn active_chips(&self) -> &[String] {
        &self.active_chips
    }

    pub fn default_chips(&self) -> &[String] {
        &self.default_chips
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The agent currently working on a request, if any.
    pub fn active_agent(&self) -> Option<&str> {
        self.active_agent.as_deref()
    }

    /// Append a user turn and hand back the request to send.
    ///
    /// Returns `None` without touching anything when the text is blank or a
    /// reply is still pending.
    pub fn submit_turn(&mut self, text: &str) -> Option<AgentRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let TurnState::AwaitingReply(pending) = self.turn {
            debug!(%pending, "turn rejected while awaiting reply");
            return None;
        }

        let message = self.message(ChatRole::User, "user", trimmed.to_string());
        self.transcript.push(message);

        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.turn = TurnState::AwaitingReply(id);
        self.active_agent = Some(self.agent_id.clone());

        info!(
            session = %self.session_id,
            request = %id,
            chars = trimmed.chars().count(),
            "turn submitted"
        );

        Some(AgentRequest {
            id,
            message: trimmed.to_string(),
            agent_id: self.agent_id.clone(),
            session_id: self.session_id.clone(),
        })
    }

    /// Record a successful reply to request `id`.
    ///
    /// Returns `false` if `id` is not the request in flight.
    pub fn accept_reply(&mut self, id: RequestId, raw: &Value) -> bool {
        if !self.settle(id) {
            return false;
        }

        let reply = normalize(raw);
        info!(
            request = %id,
            answer_chars = reply.answer.chars().count(),
            suggestions = reply.suggested_questions.len(),
            sources = reply.sources.len(),
            "reply accepted"
        );

        self.active_chips = if reply.suggested_questions.is_empty() {
            self.default_chips.clone()
        } else {
            reply.suggested_questions.clone()
        };

        let mut message = self.message(ChatRole::Assistant, "assistant", reply.answer);
        message.suggested_questions = reply.suggested_questions;
        message.sources = reply.sources;
        self.transcript.push(message);
        true
    }

    /// Record that request `id` failed. The chip set is left alone.
    ///
    /// Returns `false` if `id` is not the request in flight.
    pub fn reject_reply(&mut self, id: RequestId) -> bool {
        if !self.settle(id) {
            return false;
        }

        let mut message = self.message(ChatRole::Assistant, "error", ERROR_APOLOGY.to_string());
        message.is_error = true;
        self.transcript.push(message);
        true
    }

    /// Fold any transport result into [`accept_reply`](Self::accept_reply) or
    /// [`reject_reply`](Self::reject_reply).
    pub fn resolve(
        &mut self,
        id: RequestId,
        outcome: Result<AgentOutcome, TransportError>,
    ) -> bool {
        match outcome {
            Ok(AgentOutcome::Success(raw)) => self.accept_reply(id, &raw),
            Ok(AgentOutcome::Unsuccessful) => {
                warn!(request = %id, "agent reported an unsuccessful result");
                self.reject_reply(id)
            }
            Err(e) => {
                warn!(request = %id, error = %e, "agent request failed");
                self.reject_reply(id)
            }
        }
    }

    /// Drop the trailing error entries and send the last user turn again.
    pub fn retry_last_failed(&mut self) -> Option<AgentRequest> {
        if !self.last_message().is_some_and(|m| m.is_error) {
            return None;
        }

        let content = self
            .transcript
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.clone())?;

        let keep = self
            .transcript
            .iter()
            .rposition(|m| !m.is_error)
            .map_or(0, |i| i + 1);
        let removed = self.transcript.len() - keep;
        self.transcript.truncate(keep);

        info!(removed, "retrying last failed turn");
        self.submit_turn(&content)
    }

    /// Submit `text`, perform the call, and apply its outcome.
    ///
    /// Returns `false` if the turn was not accepted.
    pub async fn send_turn(&mut self, transport: &dyn AgentTransport, text: &str) -> bool {
        let Some(request) = self.submit_turn(text) else {
            return false;
        };
        let outcome = agent::dispatch(transport, &request).await;
        self.resolve(request.id, outcome);
        true
    }

    /// Leave `AwaitingReply` if `id` is the request in flight.
    fn settle(&mut self, id: RequestId) -> bool {
        match self.turn {
            TurnState::AwaitingReply(pending) if pending == id => {
                self.turn = TurnState::Idle;
                self.active_agent = None;
                true
            }
            _ => {
                warn!(request = %id, turn = ?self.turn, "ignoring stale agent resolution");
                false
            }
        }
    }

    fn message(&mut self, role: ChatRole, prefix: &str, content: String) -> ChatMessage {
        self.next_message += 1;
        ChatMessage {
            id: format!("{}-{}", prefix, self.next_message),
            role,
            content,
            suggested_questions: Vec::new(),
            sources: Vec::new(),
            is_error: false,
        }
    }
}
