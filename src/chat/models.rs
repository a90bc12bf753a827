//! The core models for the chat transcript.
use crate::gemini::Role;

use super::render::render_markdown;

/// One message in the conversation. Never changed once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_string(),
        }
    }

    pub fn model(text: &str) -> Self {
        Self {
            role: Role::Model,
            text: text.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Question,
    Loading,
    Answer,
    Error,
}

/// A turn as it appears on screen, rendered to HTML when it is
/// appended.
#[derive(Clone, Debug)]
pub struct TranscriptEntry {
    pub turn: Turn,
    pub kind: EntryKind,
    pub html: String,
}

impl TranscriptEntry {
    pub fn new(turn: Turn, kind: EntryKind) -> Self {
        let html = render_markdown(&turn.text);
        Self { turn, kind, html }
    }
}

/// Append-only list of rendered turns. Entries have no identity
/// beyond their position.
#[derive(Default, Debug)]
pub struct Transcript(Vec<TranscriptEntry>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an entry and return its position.
    pub fn push(&mut self, entry: TranscriptEntry) -> usize {
        self.0.push(entry);
        self.0.len() - 1
    }

    /// Remove the loading placeholder at `idx`. Anything else at that
    /// position is left alone.
    pub(crate) fn remove_placeholder(&mut self, idx: usize) -> Option<TranscriptEntry> {
        match self.0.get(idx) {
            Some(entry) if entry.kind == EntryKind::Loading => Some(self.0.remove(idx)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.0.iter()
    }
}
