//! Pure rendering of the candidate list.

use crate::selection::Cursor;
use std::fmt;
use unialias_types::Candidate;

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub index: usize,
    /// Highlighted (matched) part of the alias
    pub matched: String,
    pub rest: String,
    pub value: String,
    /// Full alias handed to the engine when this row is chosen
    pub alias: String,
    pub selected: bool,
}

impl fmt::Display for ItemView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.selected { '>' } else { ' ' };
        write!(f, "{marker} [{}]{} ({})", self.matched, self.rest, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListView {
    pub items: Vec<ItemView>,
}

impl ListView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.selected)
    }
}

/// Describe the list exactly in engine order, with the cursor row marked.
#[must_use]
pub fn render(candidates: &[Candidate], cursor: Cursor) -> ListView {
    let selected = cursor.index();
    let items = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let (matched, rest) = candidate.split_match();
            ItemView {
                index,
                matched: matched.to_string(),
                rest: rest.to_string(),
                value: candidate.value.clone(),
                alias: candidate.text.clone(),
                selected: selected == Some(index),
            }
        })
        .collect();
    ListView { items }
}
