//! The public output model: what a decoded session looks like to a caller,
//! independent of how it was reconstructed.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultHistoryItem {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTab {
    pub active: bool,
    pub deleted: bool,
    pub group: String,
    pub url: String,
    pub title: String,
    pub history: Vec<ResultHistoryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultWindow {
    pub active: bool,
    pub deleted: bool,
    pub tabs: Vec<ResultTab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SessionState {
    pub windows: Vec<ResultWindow>,
}

impl SessionState {
    /// `count = Σ over non-deleted windows of (count of non-deleted tabs)`,
    /// the tab-count consumer contract.
    pub fn count_tabs(&self) -> usize {
        self.windows
            .iter()
            .filter(|w| !w.deleted)
            .map(|w| w.tabs.iter().filter(|t| !t.deleted).count())
            .sum()
    }
}
