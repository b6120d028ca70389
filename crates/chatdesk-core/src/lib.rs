pub mod agent;
pub mod config;
pub mod error;
pub mod markdown;
pub mod normalize;
pub mod sample;
pub mod session;
pub mod state;
pub mod view;

// Re-export main types for convenience
pub use agent::{AgentOutcome, AgentRequest, AgentTransport, HttpAgentClient, RequestId, SendOptions};
pub use config::Config;
pub use error::TransportError;
pub use markdown::{format_inline, render_blocks, Block, Span};
pub use normalize::{normalize, NormalizedReply, FALLBACK_ANSWER};
pub use session::mint_session_id;
pub use state::{ChatMessage, ChatRole, Conversation, TurnState, ERROR_APOLOGY};
pub use view::{project, source_label, AgentStatus, TranscriptView};
