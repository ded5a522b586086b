//! Append-only conversation history.
//!
//! Recorded for display only; dispatch logic never reads it back.

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One recorded line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub speaker: Speaker,
    pub text: String,
}

/// Ordered record of the conversation so far.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_user(&mut self, text: impl Into<String>) {
        self.entries.push(Entry {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    pub fn record_assistant(&mut self, text: impl Into<String>) {
        self.entries.push(Entry {
            speaker: Speaker::Assistant,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}
