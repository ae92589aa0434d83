use rstest::rstest;

use std::io::Cursor;

use crate::*;

fn le_string(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = (bytes.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(bytes);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

fn le_string16(s: &str) -> Vec<u8> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut out = (units.len() as u32).to_le_bytes().to_vec();
    for unit in &units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

fn record(opcode: u8, payload: &[u8]) -> Vec<u8> {
    let total_size = (payload.len() + 1) as u16;
    let mut out = total_size.to_le_bytes().to_vec();
    out.push(opcode);
    out.extend_from_slice(payload);
    out
}

fn log(version: u32, records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"SNSS".to_vec();
    out.extend_from_slice(&version.to_le_bytes());
    for r in records {
        out.extend_from_slice(r);
    }
    out
}

fn set_tab_window(win: u32, tab: u32) -> Vec<u8> {
    let mut p = win.to_le_bytes().to_vec();
    p.extend_from_slice(&tab.to_le_bytes());
    record(0, &p)
}

fn update_tab_navigation(tab: u32, idx: u32, url: &str, title: &str) -> Vec<u8> {
    let mut p = 0u32.to_le_bytes().to_vec(); // inner size, ignored
    p.extend_from_slice(&tab.to_le_bytes());
    p.extend_from_slice(&idx.to_le_bytes());
    p.extend_from_slice(&le_string(url));
    p.extend_from_slice(&le_string16(title));
    record(6, &p)
}

fn set_selected_navigation_index(tab: u32, idx: u32) -> Vec<u8> {
    let mut p = tab.to_le_bytes().to_vec();
    p.extend_from_slice(&idx.to_le_bytes());
    record(7, &p)
}

fn set_selected_tab_in_index(win: u32, idx: u32) -> Vec<u8> {
    let mut p = win.to_le_bytes().to_vec();
    p.extend_from_slice(&idx.to_le_bytes());
    record(8, &p)
}

fn tab_closed(tab: u32) -> Vec<u8> {
    record(16, &tab.to_le_bytes())
}

fn set_tab_index_in_window(tab: u32, idx: u32) -> Vec<u8> {
    let mut p = tab.to_le_bytes().to_vec();
    p.extend_from_slice(&idx.to_le_bytes());
    record(2, &p)
}

fn set_tab_group(tab: u32, high: u64, low: u64) -> Vec<u8> {
    let mut p = tab.to_le_bytes().to_vec();
    p.extend_from_slice(&0u32.to_le_bytes()); // the "struct padding" word
    p.extend_from_slice(&high.to_le_bytes());
    p.extend_from_slice(&low.to_le_bytes());
    record(25, &p)
}

fn set_tab_group_metadata2(high: u64, low: u64, name: &str) -> Vec<u8> {
    let mut p = 0u32.to_le_bytes().to_vec(); // inner size, ignored
    p.extend_from_slice(&high.to_le_bytes());
    p.extend_from_slice(&low.to_le_bytes());
    p.extend_from_slice(&le_string16(name));
    record(27, &p)
}

// S1 -- empty log yields an empty result, nothing more.
#[test]
fn s1_empty_log() {
    let data = log(1, &[]);
    let state = parse_session(Cursor::new(data)).unwrap();
    assert!(state.windows.is_empty());
}

#[rstest]
#[case(1)]
#[case(3)]
fn empty_log_accepted_for_both_supported_versions(#[case] version: u32) {
    let data = log(version, &[]);
    assert!(parse_session(Cursor::new(data)).is_ok());
}

// S2 -- one tab, one nav: the only tab is active and its history and
// current url/title line up.
#[test]
fn s2_one_tab_one_navigation() {
    let data = log(
        1,
        &[
            set_tab_window(1, 42),
            update_tab_navigation(42, 0, "https://a", "A"),
            set_selected_navigation_index(42, 0),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();

    assert_eq!(state.windows.len(), 1);
    let window = &state.windows[0];
    assert!(!window.active);
    assert!(!window.deleted);
    assert_eq!(window.tabs.len(), 1);

    let tab = &window.tabs[0];
    assert!(tab.active);
    assert_eq!(tab.url, "https://a");
    assert_eq!(tab.title, "A");
    assert_eq!(tab.group, "");
    assert!(!tab.deleted);
    assert_eq!(tab.history.len(), 1);
    assert_eq!(tab.history[0].url, "https://a");
    assert_eq!(tab.history[0].title, "A");
}

// S3 -- a closed tab is skipped by the visible counter, so
// SetSelectedTabInIndex(idx=1) lands on the *second visible* tab.
#[test]
fn s3_closed_tab_does_not_advance_active_index() {
    let data = log(
        1,
        &[
            set_tab_window(1, 10),
            set_tab_window(1, 11),
            set_tab_window(1, 12),
            set_tab_index_in_window(10, 0),
            set_tab_index_in_window(11, 1),
            set_tab_index_in_window(12, 2),
            tab_closed(11),
            set_selected_tab_in_index(1, 1),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    let window = &state.windows[0];
    assert_eq!(window.tabs.len(), 3);

    let by_idx: Vec<_> = window.tabs.iter().collect();
    assert!(!by_idx[0].active); // tab 10, first visible, idx 0
    assert!(!by_idx[1].active); // tab 11, deleted, never active
    assert!(by_idx[1].deleted);
    assert!(by_idx[2].active); // tab 12, second visible, idx 1
}

// S4 -- group binding precedes naming; the group name still resolves once
// materialized, since resolution happens after replay, not during it.
#[test]
fn s4_group_binding_precedes_naming() {
    let data = log(
        1,
        &[
            set_tab_window(1, 5),
            set_tab_group(5, 0xAAAA, 0xBBBB),
            set_tab_group_metadata2(0xAAAA, 0xBBBB, "Work"),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    assert_eq!(state.windows[0].tabs[0].group, "Work");
}

// S5 -- a UTF-16 title with a non-ASCII character round-trips exactly.
#[test]
fn s5_utf16_title_round_trips() {
    let data = log(
        1,
        &[
            set_tab_window(1, 1),
            update_tab_navigation(1, 0, "https://a", "héllo"),
            set_selected_navigation_index(1, 0),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    assert_eq!(state.windows[0].tabs[0].title, "héllo");
}

// S6 -- bad magic is fatal, no partial result.
#[test]
fn s6_bad_magic_is_fatal() {
    let data = b"XXXX\x01\x00\x00\x00".to_vec();
    assert!(matches!(
        parse_session(Cursor::new(data)),
        Err(SnssError::BadMagic)
    ));
}

// Invariant 1: window count equals the number of distinct window ids ever
// referenced, including the implicit default window 0.
#[test]
fn window_count_matches_distinct_window_ids_referenced() {
    let data = log(
        1,
        &[
            set_tab_window(1, 1),
            set_tab_window(2, 2),
            update_tab_navigation(3, 0, "https://default", "Default"), // win untouched, defaults to 0
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    assert_eq!(state.windows.len(), 3);
}

// Invariant 2: history is sorted ascending by idx with no duplicates, even
// when records arrive out of order and an idx is overwritten.
#[test]
fn history_sorted_ascending_with_overwrite() {
    let data = log(
        1,
        &[
            set_tab_window(1, 1),
            update_tab_navigation(1, 2, "https://c", "C"),
            update_tab_navigation(1, 0, "https://a", "A"),
            update_tab_navigation(1, 1, "https://b-first", "B-first"),
            update_tab_navigation(1, 1, "https://b", "B"),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    let history = &state.windows[0].tabs[0].history;
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].url, "https://a");
    assert_eq!(history[1].url, "https://b");
    assert_eq!(history[2].url, "https://c");
}

// Invariant 3: an unmatched current_history_idx leaves url/title empty but
// still includes the full history.
#[test]
fn unmatched_current_history_idx_leaves_url_title_empty() {
    let data = log(
        1,
        &[
            set_tab_window(1, 1),
            update_tab_navigation(1, 0, "https://a", "A"),
            set_selected_navigation_index(1, 99),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    let tab = &state.windows[0].tabs[0];
    assert_eq!(tab.url, "");
    assert_eq!(tab.title, "");
    assert_eq!(tab.history.len(), 1);
}

// Invariant 4: at most one tab per window is active.
#[test]
fn at_most_one_active_tab_per_window() {
    let data = log(
        1,
        &[
            set_tab_window(1, 1),
            set_tab_window(1, 2),
            set_tab_index_in_window(1, 0),
            set_tab_index_in_window(2, 1),
            set_selected_tab_in_index(1, 0),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    let active_count = state.windows[0].tabs.iter().filter(|t| t.active).count();
    assert_eq!(active_count, 1);
}

// Invariant 6: an unknown opcode is skipped without altering the result.
#[test]
fn unknown_opcode_does_not_change_result() {
    let base = vec![set_tab_window(1, 1)];
    let mut injected = base.clone();
    injected.push(record(200, &[0xDE, 0xAD, 0xBE, 0xEF]));

    let a = parse_session(Cursor::new(log(1, &base))).unwrap();
    let b = parse_session(Cursor::new(log(1, &injected))).unwrap();
    assert_eq!(a, b);
}

// Invariant 7: string alignment consumes exactly ceil(S/4)*4 bytes; if it
// didn't, the following record's opcode byte would be misread and this
// tab wouldn't end up deleted.
#[test]
fn string_alignment_consumes_padding() {
    let data = log(
        1,
        &[
            set_tab_window(1, 1),
            update_tab_navigation(1, 0, "odd", "t"), // "odd" is 3 bytes, pads to 4
            tab_closed(1),
        ],
    );
    let state = parse_session(Cursor::new(data)).unwrap();
    assert!(state.windows[0].tabs[0].deleted);
}

#[rstest]
#[case(vec![set_tab_window(1, 1)], 1)]
#[case(vec![set_tab_window(1, 1), set_tab_window(2, 2)], 2)]
#[case(vec![set_tab_window(1, 1), set_tab_window(1, 2)], 1)]
fn window_count_table(#[case] records: Vec<Vec<u8>>, #[case] expected_windows: usize) {
    let state = parse_session(Cursor::new(log(1, &records))).unwrap();
    assert_eq!(state.windows.len(), expected_windows);
}
