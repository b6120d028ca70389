//! Read-only projection of a conversation for presenters.

use reqwest::Url;

use crate::sample::{sample_chips, sample_transcript};
use crate::state::{ChatMessage, ChatRole, Conversation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Online,
    Processing,
}

impl AgentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AgentStatus::Online => "Online",
            AgentStatus::Processing => "Processing",
        }
    }
}

/// What a presenter should draw for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptView<'a> {
    pub messages: &'a [ChatMessage],
    /// Nothing to show yet; draw the welcome screen with the default chips.
    pub welcome: bool,
    /// Chips to offer right now (empty when none should be shown).
    pub chips: &'a [String],
    pub show_retry: bool,
    pub is_loading: bool,
    pub status: AgentStatus,
}

/// Project `conversation` for display. With `show_sample` set and an empty
/// transcript, the canned sample conversation is shown instead.
pub fn project(conversation: &Conversation, show_sample: bool) -> TranscriptView<'_> {
    let use_sample = show_sample && conversation.transcript().is_empty();
    let messages = if use_sample {
        sample_transcript()
    } else {
        conversation.transcript()
    };
    let is_loading = conversation.is_loading();
    let welcome = messages.is_empty();

    let last = messages.last();
    let show_retry = last.is_some_and(|m| m.is_error) && !is_loading;
    let show_chips_after_response = last
        .is_some_and(|m| m.role == ChatRole::Assistant && !m.is_error)
        && !is_loading;

    let chips: &[String] = if welcome {
        conversation.default_chips()
    } else if show_chips_after_response {
        if use_sample {
            sample_chips()
        } else {
            conversation.active_chips()
        }
    } else {
        &[]
    };

    let status = if conversation.active_agent().is_some() {
        AgentStatus::Processing
    } else {
        AgentStatus::Online
    };

    TranscriptView {
        messages,
        welcome,
        chips,
        show_retry,
        is_loading,
        status,
    }
}

/// Short label for a source link: its host name, or the raw text if it is
/// not a URL.
pub fn source_label(source: &str) -> String {
    Url::parse(source)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| source.to_string())
}
