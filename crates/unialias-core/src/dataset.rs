//! Dataset management panel: one tab per loaded dataset.

use crate::markdown::{HelpBlock, Span, render_help};

/// Shown instead of tabs when no dataset is loaded
pub const EMPTY_NOTICE: &str = "No datasets loaded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetTab {
    pub id: String,
    pub help: Vec<HelpBlock>,
}

impl DatasetTab {
    #[must_use]
    pub fn from_markdown(id: impl Into<String>, markdown: &str) -> Self {
        Self {
            id: id.into(),
            help: render_help(markdown),
        }
    }

    /// Tab whose help text could not be read
    #[must_use]
    pub fn unreadable(id: impl Into<String>) -> Self {
        let id = id.into();
        let notice = format!("No help available for {id}");
        Self {
            id,
            help: vec![HelpBlock::Paragraph(vec![Span::plain(notice)])],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetPanel {
    Empty { notice: String },
    Tabs { tabs: Vec<DatasetTab>, active: usize },
}

impl Default for DatasetPanel {
    fn default() -> Self {
        Self::empty()
    }
}

impl DatasetPanel {
    #[must_use]
    pub fn empty() -> Self {
        DatasetPanel::Empty {
            notice: EMPTY_NOTICE.to_string(),
        }
    }

    /// Panel for `tabs` in order, first tab active.
    #[must_use]
    pub fn from_tabs(tabs: Vec<DatasetTab>) -> Self {
        if tabs.is_empty() {
            Self::empty()
        } else {
            DatasetPanel::Tabs { tabs, active: 0 }
        }
    }

    #[must_use]
    pub fn tabs(&self) -> &[DatasetTab] {
        match self {
            DatasetPanel::Empty { .. } => &[],
            DatasetPanel::Tabs { tabs, .. } => tabs,
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<usize> {
        match self {
            DatasetPanel::Empty { .. } => None,
            DatasetPanel::Tabs { active, .. } => Some(*active),
        }
    }

    /// Make tab `index` the only active one. Returns false if out of range.
    pub fn activate(&mut self, index: usize) -> bool {
        match self {
            DatasetPanel::Tabs { tabs, active } if index < tabs.len() => {
                *active = index;
                true
            }
            _ => false,
        }
    }
}
