//! Component E: the one-shot projection of a fully-replayed [`SessionStore`]
//! into the public [`SessionState`].

use std::collections::HashMap;

use crate::model::{ResultHistoryItem, ResultTab, ResultWindow, SessionState};
use crate::store::{SessionStore, Tab};

/// Projects the store into the ordered, public result model. Takes `&mut
/// SessionStore` because a tab whose window-id was never explicitly
/// referenced (the default 0) must still get a window 0 in the output --
/// creating it here reuses the same lazy-creation path replay itself uses.
pub fn materialize(store: &mut SessionStore) -> SessionState {
    // Walk tabs in first-reference order so the implicit creation of window 0
    // below (when some tab's win id was never explicitly touched during
    // replay) lands windows in the same order the command stream first
    // mentioned them, matching the store's own window_order bookkeeping.
    let tabs: Vec<Tab> = store.tabs().cloned().collect();

    let mut by_window: HashMap<u32, Vec<Tab>> = HashMap::new();
    for mut tab in tabs {
        tab.history.sort_by_key(|h| h.idx);
        store.get_or_create_window(tab.win);
        by_window.entry(tab.win).or_default().push(tab);
    }

    let active_window = store.active_window();

    let windows = store
        .windows_in_order()
        .map(|window| {
            let mut window_tabs = by_window.remove(&window.id).unwrap_or_default();
            window_tabs.sort_by_key(|t| (t.idx, t.id));

            let mut visible = 0u32;
            let tabs = window_tabs
                .into_iter()
                .map(|tab| {
                    let active = !tab.deleted && visible == window.active_tab_idx;
                    if !tab.deleted {
                        visible += 1;
                    }
                    project_tab(store, tab, active)
                })
                .collect();

            ResultWindow {
                active: active_window == Some(window.id),
                deleted: window.deleted,
                tabs,
            }
        })
        .collect();

    SessionState { windows }
}

fn project_tab(store: &SessionStore, tab: Tab, active: bool) -> ResultTab {
    let group = tab
        .group
        .as_deref()
        .and_then(|key| store.group_name(key))
        .unwrap_or("")
        .to_string();

    let mut url = String::new();
    let mut title = String::new();
    let mut history = Vec::with_capacity(tab.history.len());
    for item in &tab.history {
        history.push(ResultHistoryItem {
            url: item.url.clone(),
            title: item.title.clone(),
        });
        if item.idx == tab.current_history_idx {
            url = item.url.clone();
            title = item.title.clone();
            break;
        }
    }

    ResultTab {
        active,
        deleted: tab.deleted,
        group,
        url,
        title,
        history,
    }
}
