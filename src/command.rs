//! Component C: classifies each record by opcode and mutates the state
//! store accordingly. Unknown opcodes are not errors -- the frame splitter
//! already isolated this record's payload, so skipping it costs nothing and
//! keeps the decoder forward-compatible with producer versions that add new
//! commands.

use crate::error::SnssError;
use crate::reader::ByteReader;
use crate::store::SessionStore;

mod opcode {
    pub const SET_TAB_WINDOW: u8 = 0;
    pub const SET_TAB_INDEX_IN_WINDOW: u8 = 2;
    pub const UPDATE_TAB_NAVIGATION: u8 = 6;
    pub const SET_SELECTED_NAVIGATION_INDEX: u8 = 7;
    pub const SET_SELECTED_TAB_IN_INDEX: u8 = 8;
    pub const TAB_CLOSED: u8 = 16;
    pub const WINDOW_CLOSED: u8 = 17;
    pub const SET_ACTIVE_WINDOW: u8 = 20;
    pub const LAST_ACTIVE_TIME: u8 = 21;
    pub const SET_TAB_GROUP: u8 = 25;
    pub const SET_TAB_GROUP_METADATA2: u8 = 27;
}

/// Applies one record to the store. `payload` is this record's bytes only --
/// handlers can't under- or over-read into neighboring records.
pub fn apply(opcode: u8, payload: &[u8], store: &mut SessionStore) -> Result<(), SnssError> {
    let mut r = ByteReader::new(payload);
    match opcode {
        opcode::UPDATE_TAB_NAVIGATION => {
            let _inner_size = r.u32()?;
            let tab_id = r.u32()?;
            let hist_idx = r.u32()?;
            let url = r.string()?;
            let title = r.string16()?;
            store.get_or_create_tab(tab_id).set_history(hist_idx, url, title);
        }
        opcode::SET_SELECTED_TAB_IN_INDEX => {
            let window_id = r.u32()?;
            let idx = r.u32()?;
            store.get_or_create_window(window_id).active_tab_idx = idx;
        }
        opcode::SET_TAB_GROUP_METADATA2 => {
            let _inner_size = r.u32()?;
            let high = r.u64()?;
            let low = r.u64()?;
            let name = r.string16()?;
            store.set_group_name(high, low, name);
        }
        opcode::SET_TAB_GROUP => {
            let tab_id = r.u32()?;
            let _padding = r.u32()?;
            let high = r.u64()?;
            let low = r.u64()?;
            let key = store.get_or_create_group(high, low);
            store.get_or_create_tab(tab_id).group = Some(key);
        }
        opcode::SET_TAB_WINDOW => {
            let window_id = r.u32()?;
            let tab_id = r.u32()?;
            store.get_or_create_tab(tab_id).win = window_id;
        }
        opcode::WINDOW_CLOSED => {
            let window_id = r.u32()?;
            store.get_or_create_window(window_id).deleted = true;
        }
        opcode::TAB_CLOSED => {
            let tab_id = r.u32()?;
            store.get_or_create_tab(tab_id).deleted = true;
        }
        opcode::SET_TAB_INDEX_IN_WINDOW => {
            let tab_id = r.u32()?;
            let index = r.u32()?;
            store.get_or_create_tab(tab_id).idx = index;
        }
        opcode::SET_ACTIVE_WINDOW => {
            let window_id = r.u32()?;
            store.set_active_window(window_id);
        }
        opcode::SET_SELECTED_NAVIGATION_INDEX => {
            let tab_id = r.u32()?;
            let idx = r.u32()?;
            store.get_or_create_tab(tab_id).current_history_idx = idx;
        }
        opcode::LAST_ACTIVE_TIME => {
            // reserved, recognized but ignored
        }
        _unknown => {
            // forward compatibility: the frame splitter already sliced off
            // exactly this record's bytes, so there's nothing to skip here
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_opcode_is_not_an_error() {
        let mut store = SessionStore::new();
        apply(200, &[0xDE, 0xAD, 0xBE, 0xEF], &mut store).unwrap();
        assert_eq!(store.tabs().count(), 0);
    }

    #[test]
    fn set_tab_window_creates_both_entities() {
        let mut store = SessionStore::new();
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u32.to_le_bytes()); // window id
        payload.extend_from_slice(&42u32.to_le_bytes()); // tab id
        apply(opcode::SET_TAB_WINDOW, &payload, &mut store).unwrap();
        assert!(store.window_exists(1));
        assert_eq!(store.get_or_create_tab(42).win, 1);
    }

    #[test]
    fn set_tab_group_before_metadata_resolves_name_later() {
        let mut store = SessionStore::new();
        let mut group_payload = Vec::new();
        group_payload.extend_from_slice(&5u32.to_le_bytes()); // tab id
        group_payload.extend_from_slice(&0u32.to_le_bytes()); // padding
        group_payload.extend_from_slice(&0xAAAAu64.to_le_bytes());
        group_payload.extend_from_slice(&0xBBBBu64.to_le_bytes());
        apply(opcode::SET_TAB_GROUP, &group_payload, &mut store).unwrap();

        let key = store.get_or_create_tab(5).group.clone().unwrap();
        assert_eq!(store.group_name(&key), Some(""));

        let mut meta_payload = Vec::new();
        meta_payload.extend_from_slice(&0u32.to_le_bytes()); // inner size
        meta_payload.extend_from_slice(&0xAAAAu64.to_le_bytes());
        meta_payload.extend_from_slice(&0xBBBBu64.to_le_bytes());
        meta_payload.extend_from_slice(&4u32.to_le_bytes());
        for unit in "Work".encode_utf16() {
            meta_payload.extend_from_slice(&unit.to_le_bytes());
        }
        apply(opcode::SET_TAB_GROUP_METADATA2, &meta_payload, &mut store).unwrap();

        assert_eq!(store.group_name(&key), Some("Work"));
    }
}
