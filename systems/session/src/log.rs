//! Player-facing message log.

use std::collections::VecDeque;

/// Number of entries retained before the oldest are dropped.
pub const MESSAGE_LOG_CAPACITY: usize = 50;

/// Tone of a log entry, used by adapters to pick a colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Routine progress.
    Neutral,
    /// Failed or refused action.
    Error,
    /// Combat report.
    Combat,
    /// Favourable outcome such as a capture or a new game.
    Victory,
    /// Production, save or load confirmation.
    Production,
}

/// Single line of the message log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Tone of the message.
    pub kind: LogKind,
    /// Text shown to the player.
    pub message: String,
}

/// Bounded log holding the most recent messages, oldest first.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
}

impl MessageLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, evicting the oldest once the log is full.
    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        if self.entries.len() == MESSAGE_LOG_CAPACITY {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            kind,
            message: message.into(),
        });
    }

    /// Iterates over the retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
