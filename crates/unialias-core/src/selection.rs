//! Selection state machine for the main window.
//!
//! Owns the query text, the current candidate list and the cursor. It knows
//! nothing about rendering or the engine: callers feed it transitions and act
//! on what it returns (a [`QueryTicket`] to send to the engine, a [`Change`]
//! to render, a [`Candidate`] to commit).
//!
//! Queries are tagged with a sequence number. Only the response for the most
//! recently issued, still-awaited query is applied; anything older, or
//! anything arriving after a clear, is stale and dropped.

use tracing::debug;
use unialias_types::Candidate;

/// Index of the highlighted candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    NoSelection,
    Selected(usize),
}

impl Cursor {
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Cursor::NoSelection => None,
            Cursor::Selected(index) => Some(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Empty query, empty list
    #[default]
    Idle,
    /// Query issued, response not applied yet
    Querying,
    HasSelection,
    /// Engine answered with nothing (or was unavailable)
    NoMatches,
}

/// A query the caller must send to the matching engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub text: String,
}

/// What a transition changed, from the renderer's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    None,
    /// The list was replaced and must be rendered again in full
    List,
    /// Only the selected marker moved
    Cursor { from: Option<usize>, to: usize },
}

#[derive(Debug, Default)]
pub struct SelectionMachine {
    query: String,
    candidates: Vec<Candidate>,
    cursor: Cursor,
    phase: Phase,
    last_issued: u64,
    awaiting: Option<u64>,
}

impl SelectionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sequence number of the query whose response would be applied
    #[must_use]
    pub fn awaiting(&self) -> Option<u64> {
        self.awaiting
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Candidate> {
        self.cursor.index().and_then(|i| self.candidates.get(i))
    }

    /// The input text changed.
    ///
    /// Invalidates the current list and cursor. Returns the query to issue,
    /// or `None` when the text is empty.
    pub fn input_changed(&mut self, text: &str) -> (Change, Option<QueryTicket>) {
        self.query = text.to_string();
        self.candidates.clear();
        self.cursor = Cursor::NoSelection;

        if text.is_empty() {
            self.phase = Phase::Idle;
            self.awaiting = None;
            return (Change::List, None);
        }

        self.last_issued += 1;
        self.awaiting = Some(self.last_issued);
        self.phase = Phase::Querying;
        (
            Change::List,
            Some(QueryTicket {
                seq: self.last_issued,
                text: self.query.clone(),
            }),
        )
    }

    /// A query response arrived. Returns `false` if it was stale and dropped.
    pub fn candidates_arrived(&mut self, seq: u64, candidates: Vec<Candidate>) -> bool {
        if self.awaiting != Some(seq) {
            debug!(
                "Dropping stale response seq={seq} (awaiting {:?})",
                self.awaiting
            );
            return false;
        }

        self.awaiting = None;
        self.candidates = candidates;
        if self.candidates.is_empty() {
            self.cursor = Cursor::NoSelection;
            self.phase = Phase::NoMatches;
        } else {
            self.cursor = Cursor::Selected(0);
            self.phase = Phase::HasSelection;
        }
        true
    }

    pub fn navigate_next(&mut self) -> Change {
        let len = self.candidates.len();
        if len == 0 {
            return Change::None;
        }
        let from = self.cursor.index();
        let to = from.map_or(0, |c| (c + 1) % len);
        self.move_to(from, to)
    }

    pub fn navigate_prev(&mut self) -> Change {
        let len = self.candidates.len();
        if len == 0 {
            return Change::None;
        }
        let from = self.cursor.index();
        let to = from.map_or(len - 1, |c| (c + len - 1) % len);
        self.move_to(from, to)
    }

    fn move_to(&mut self, from: Option<usize>, to: usize) -> Change {
        self.cursor = Cursor::Selected(to);
        self.phase = Phase::HasSelection;
        Change::Cursor { from, to }
    }

    /// Commit the highlighted candidate and reset.
    ///
    /// Returns `None`, leaving everything untouched, when nothing is selected.
    pub fn confirm(&mut self) -> Option<Candidate> {
        if self.phase != Phase::HasSelection {
            return None;
        }
        let index = self.cursor.index()?;
        self.take(index)
    }

    /// Commit the candidate at `index` (mouse click) and reset.
    pub fn confirm_at(&mut self, index: usize) -> Option<Candidate> {
        self.take(index)
    }

    fn take(&mut self, index: usize) -> Option<Candidate> {
        if index >= self.candidates.len() {
            return None;
        }
        let candidate = self.candidates.swap_remove(index);
        self.clear();
        Some(candidate)
    }

    /// Back to `Idle`. A query still in flight is abandoned.
    pub fn clear(&mut self) {
        self.query.clear();
        self.candidates.clear();
        self.cursor = Cursor::NoSelection;
        self.phase = Phase::Idle;
        self.awaiting = None;
    }
}
