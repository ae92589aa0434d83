//! The in-memory state store replay mutates: tabs, windows, and groups keyed
//! by their on-wire identifiers, created lazily on first reference.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct HistoryItem {
    pub idx: u32,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: u32,
    pub win: u32,
    pub idx: u32,
    pub deleted: bool,
    pub current_history_idx: u32,
    pub group: Option<String>,
    pub history: Vec<HistoryItem>,
}

impl Tab {
    fn new(id: u32) -> Self {
        Self {
            id,
            win: 0,
            idx: 0,
            deleted: false,
            current_history_idx: 0,
            group: None,
            history: Vec::new(),
        }
    }

    /// Upserts the history entry at `idx`, overwriting url/title if it
    /// already existed.
    pub fn set_history(&mut self, idx: u32, url: String, title: String) {
        match self.history.iter_mut().find(|h| h.idx == idx) {
            Some(item) => {
                item.url = url;
                item.title = title;
            }
            None => self.history.push(HistoryItem { idx, url, title }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Window {
    pub id: u32,
    pub active_tab_idx: u32,
    pub deleted: bool,
}

impl Window {
    fn new(id: u32) -> Self {
        Self {
            id,
            active_tab_idx: 0,
            deleted: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Group {
    pub high: u64,
    pub low: u64,
    pub name: String,
}

/// Key a group by the concatenated lowercase hex of its (high, low) pair, as
/// specified: two distinct `(high, low)` pairs never collide, and the key is
/// cheap to hash.
pub fn group_key(high: u64, low: u64) -> String {
    format!("{high:x}{low:x}")
}

/// The replay-time entity tables. `get_or_create_*` is the only mutation
/// entry point -- handlers never construct entities directly, so "first
/// reference creates, later references reuse" is enforced in one place.
#[derive(Debug, Default)]
pub struct SessionStore {
    tabs: HashMap<u32, Tab>,
    tab_order: Vec<u32>,
    windows: HashMap<u32, Window>,
    window_order: Vec<u32>,
    groups: HashMap<String, Group>,
    active_window: Option<u32>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_tab(&mut self, id: u32) -> &mut Tab {
        if !self.tabs.contains_key(&id) {
            self.tabs.insert(id, Tab::new(id));
            self.tab_order.push(id);
        }
        self.tabs.get_mut(&id).unwrap()
    }

    pub fn get_or_create_window(&mut self, id: u32) -> &mut Window {
        if !self.windows.contains_key(&id) {
            self.windows.insert(id, Window::new(id));
            self.window_order.push(id);
        }
        self.windows.get_mut(&id).unwrap()
    }

    /// Ensures a group for `(high, low)` exists and returns its key.
    pub fn get_or_create_group(&mut self, high: u64, low: u64) -> String {
        let key = group_key(high, low);
        self.groups.entry(key.clone()).or_insert(Group {
            high,
            low,
            name: String::new(),
        });
        key
    }

    pub fn set_group_name(&mut self, high: u64, low: u64, name: String) {
        let key = group_key(high, low);
        let group = self.groups.entry(key).or_insert(Group {
            high,
            low,
            name: String::new(),
        });
        group.name = name;
    }

    pub fn set_active_window(&mut self, id: u32) {
        self.get_or_create_window(id);
        self.active_window = Some(id);
    }

    pub fn active_window(&self) -> Option<u32> {
        self.active_window
    }

    pub fn group_name(&self, key: &str) -> Option<&str> {
        self.groups.get(key).map(|g| g.name.as_str())
    }

    /// Windows in first-insertion order, as required for stable output.
    pub fn windows_in_order(&self) -> impl Iterator<Item = &Window> + '_ {
        self.window_order.iter().map(|id| &self.windows[id])
    }

    /// Tabs in first-reference order -- the order the command stream first
    /// mentioned each tab id, independent of tab id value.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> + '_ {
        self.tab_order.iter().map(|id| &self.tabs[id])
    }

    pub fn window_exists(&self, id: u32) -> bool {
        self.windows.contains_key(&id)
    }
}
