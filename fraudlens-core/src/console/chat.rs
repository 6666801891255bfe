//! Conversation with the backend assistant.
//!
//! The transcript is append-only. A send appends the analyst's message at
//! once and the reply (or a fixed fallback) when the request completes.

use std::collections::HashSet;

use crate::error::Result;
use crate::types::ChatMessage;

use super::effects::Request;
use super::ticket::{Ticket, TicketCounter};

/// First agent message of every session.
pub const GREETING: &str = "Social Media Fraud Detection Agent Online. How can I help?";

/// Agent message appended when a chat request fails, whatever the cause.
pub const FALLBACK_REPLY: &str = "Connection Error.";

/// Transcript, input buffer, and in-flight assistant turns.
#[derive(Debug)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    input: String,
    in_flight: HashSet<Ticket>,
    tickets: TicketCounter,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatMessage::agent(GREETING)],
            input: String::new(),
            in_flight: HashSet::new(),
            tickets: TicketCounter::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while any assistant turn is outstanding.
    pub fn pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn push_input(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Send the input buffer.
    pub fn submit(&mut self) -> Option<Request> {
        let text = self.input.clone();
        self.send(&text)
    }

    /// Send `text` to the assistant.
    ///
    /// Blank text changes nothing and produces no request. Otherwise the
    /// message is appended right away, the input buffer is cleared and the
    /// session becomes pending.
    pub fn send(&mut self, text: &str) -> Option<Request> {
        if text.trim().is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage::user(text));
        self.input.clear();

        let ticket = self.tickets.issue();
        self.in_flight.insert(ticket);
        tracing::info!(%ticket, len = text.len(), "Sending chat message");

        Some(Request::Chat {
            ticket,
            message: text.to_string(),
        })
    }

    /// Record the outcome of an assistant turn.
    ///
    /// The turn's pending slot is released before either branch runs, so a
    /// completion can never leave the session stuck. Unknown tickets are
    /// ignored and return false.
    pub fn on_reply(&mut self, ticket: Ticket, result: Result<String>) -> bool {
        if !self.in_flight.remove(&ticket) {
            tracing::debug!(%ticket, "Ignoring reply for unknown chat turn");
            return false;
        }
        let text = match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%ticket, error = %e, "Chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };
        self.transcript.push(ChatMessage::agent(text));
        true
    }
}
