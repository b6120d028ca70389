use std::sync::Arc;

use chatdesk_core::agent::{self, AgentRequest, AgentTransport};
use chatdesk_core::view::project;
use chatdesk_core::{AgentOutcome, Conversation, RequestId, TranscriptView, TransportError};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::tui::AppEvent;

/// Longest message the input box accepts, in characters.
pub const MAX_INPUT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Chips,
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,

    pub conversation: Conversation,
    pub agent_name: String,
    pub show_sample: bool,

    // Input box
    pub input: String,
    pub cursor: usize, // char index into input

    // Suggestion chips
    pub chip_index: usize,

    // Transcript scrolling
    pub scroll: u16,
    pub follow_tail: bool,
    pub chat_height: u16, // inner height of the transcript pane
    pub total_lines: u16, // wrapped line count of the last render
    pub chat_area: Option<Rect>,

    // Typing indicator frame, 0-2
    pub animation_frame: u8,

    transport: Arc<dyn AgentTransport>,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        conversation: Conversation,
        agent_name: String,
        transport: Arc<dyn AgentTransport>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Input,

            conversation,
            agent_name,
            show_sample: false,

            input: String::new(),
            cursor: 0,

            chip_index: 0,

            scroll: 0,
            follow_tail: true,
            chat_height: 0,
            total_lines: 0,
            chat_area: None,

            animation_frame: 0,

            transport,
            events,
        }
    }

    pub fn view(&self) -> TranscriptView<'_> {
        project(&self.conversation, self.show_sample)
    }

    /// Send whatever is in the input box.
    pub fn send_input(&mut self) -> bool {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Send the highlighted suggestion chip.
    pub fn send_selected_chip(&mut self) -> bool {
        let chip = self.view().chips.get(self.chip_index).cloned();
        match chip {
            Some(chip) => self.submit(&chip),
            None => false,
        }
    }

    /// Send a suggestion chip by position.
    pub fn send_chip(&mut self, index: usize) -> bool {
        self.chip_index = index;
        self.send_selected_chip()
    }

    pub fn submit(&mut self, text: &str) -> bool {
        match self.conversation.submit_turn(text) {
            Some(request) => {
                self.begin_request(request);
                true
            }
            None => false,
        }
    }

    pub fn retry(&mut self) -> bool {
        match self.conversation.retry_last_failed() {
            Some(request) => {
                self.begin_request(request);
                true
            }
            None => false,
        }
    }

    pub fn apply_reply(&mut self, id: RequestId, outcome: Result<AgentOutcome, TransportError>) {
        self.conversation.resolve(id, outcome);
        self.chip_index = 0;
        self.follow_tail = true;
    }

    pub fn toggle_sample(&mut self) {
        self.show_sample = !self.show_sample;
        self.chip_index = 0;
        self.follow_tail = true;
        self.scroll = 0;
    }

    pub fn tick_animation(&mut self) {
        if self.conversation.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    fn begin_request(&mut self, request: AgentRequest) {
        self.input.clear();
        self.cursor = 0;
        self.focus = Focus::Input;
        self.follow_tail = true;
        self.dispatch(request);
    }

    /// Run the agent call in the background and post the outcome back.
    ///
    /// The call runs in its own task so a panic inside the transport still
    /// produces a reply event and the conversation leaves the loading state.
    fn dispatch(&self, request: AgentRequest) {
        let transport = Arc::clone(&self.transport);
        let events = self.events.clone();
        let id = request.id;

        tokio::spawn(async move {
            let call = tokio::spawn(async move { agent::dispatch(transport.as_ref(), &request).await });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(e) => Err(TransportError::TaskFailed(e.to_string())),
            };
            if events.send(AppEvent::AgentReply { id, outcome }).is_err() {
                debug!(request = %id, "event loop gone, dropping agent reply");
            }
        });
    }

    // Input editing
    pub fn input_char_count(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        if self.conversation.is_loading() || self.input_char_count() >= MAX_INPUT_CHARS {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.conversation.is_loading() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
    }

    pub fn delete(&mut self) {
        if self.conversation.is_loading() || self.cursor >= self.input_char_count() {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input_char_count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input_char_count();
    }

    // Chips
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if !self.view().chips.is_empty() => {
                self.chip_index = 0;
                Focus::Chips
            }
            _ => Focus::Input,
        };
    }

    pub fn next_chip(&mut self) {
        let len = self.view().chips.len();
        if len > 0 {
            self.chip_index = (self.chip_index + 1).min(len - 1);
        }
    }

    pub fn prev_chip(&mut self) {
        self.chip_index = self.chip_index.saturating_sub(1);
    }

    // Transcript scrolling
    pub fn max_scroll(&self) -> u16 {
        self.total_lines.saturating_sub(self.chat_height)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_tail = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
        self.follow_tail = self.scroll >= self.max_scroll();
    }

    pub fn page_up(&mut self) {
        self.scroll_up((self.chat_height / 2).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down((self.chat_height / 2).max(1));
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
