//! Canonicalization of loosely-typed agent replies.
//!
//! Different versions of the agent name the same fields differently, and any
//! field may be missing or carry the wrong type. Every access below is guarded;
//! a malformed payload degrades to the fallback answer and empty lists.

use serde_json::Value;
use tracing::debug;

/// Answer used when the payload carries no usable text.
pub const FALLBACK_ANSWER: &str = "I apologize, I could not process your request.";

/// The canonical shape of one agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    pub answer: String,
    pub suggested_questions: Vec<String>,
    pub sources: Vec<String>,
}

/// Extract `{answer, suggested_questions, sources}` from a raw agent payload.
pub fn normalize(raw: &Value) -> NormalizedReply {
    let result = raw.get("result");

    let answer = result
        .and_then(|r| non_empty_str(r.get("answer")))
        .or_else(|| result.and_then(|r| non_empty_str(r.get("text"))))
        .or_else(|| result.and_then(|r| non_empty_str(r.get("message"))))
        .or_else(|| non_empty_str(raw.get("message")))
        .or_else(|| non_empty_str(result))
        .map(str::to_string)
        .unwrap_or_else(|| {
            debug!("agent payload has no answer text, using fallback");
            FALLBACK_ANSWER.to_string()
        });

    let suggested_questions = result
        .and_then(|r| r.get("suggested_questions").and_then(Value::as_array))
        .or_else(|| result.and_then(|r| r.get("suggestedQuestions").and_then(Value::as_array)))
        .map(|items| strings(items))
        .unwrap_or_default();

    let sources = result
        .and_then(|r| r.get("sources").and_then(Value::as_array))
        .map(|items| strings(items))
        .unwrap_or_default();

    NormalizedReply {
        answer,
        suggested_questions,
        sources,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Keep the string entries of a list; anything else is dropped.
fn strings(items: &[Value]) -> Vec<String> {
    let kept: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect();
    if kept.len() != items.len() {
        debug!(
            dropped = items.len() - kept.len(),
            "ignoring non-string entries in agent payload list"
        );
    }
    kept
}
