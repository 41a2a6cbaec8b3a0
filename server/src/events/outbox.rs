use std::mem;

use helm_shared::{ServerMessage, ServerMessageKind, SessionKey};

/// Messages produced while handling input, in the order they were produced.
/// The transport drains it after every call into the server.
#[derive(Default)]
pub struct Outbox {
    messages: Vec<(SessionKey, ServerMessage)>,
}

impl Outbox {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SessionKey, ServerMessage)> {
        self.messages.iter()
    }

    pub fn take(&mut self) -> Vec<(SessionKey, ServerMessage)> {
        mem::take(&mut self.messages)
    }

    pub(crate) fn push(&mut self, session: SessionKey, message: ServerMessage) {
        self.messages.push((session, message));
    }

    pub(crate) fn push_all(&mut self, sessions: &[SessionKey], message: &ServerMessage) {
        for session in sessions {
            self.messages.push((*session, message.clone()));
        }
    }

    /// Everything queued for `session`
    pub fn for_session(&self, session: &SessionKey) -> Vec<&ServerMessage> {
        self.messages
            .iter()
            .filter(|(key, _)| key == session)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn count_kind(&self, kind: ServerMessageKind) -> usize {
        self.messages
            .iter()
            .filter(|(_, message)| message.kind() == kind)
            .count()
    }
}
