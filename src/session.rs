//! Ties components A-E together: replay a session log end to end and hand
//! back the materialized result.

use std::io::Read;

use crate::command;
use crate::error::SnssError;
use crate::frame::FrameReader;
use crate::materialize::materialize;
use crate::model::SessionState;
use crate::store::SessionStore;

/// Decodes an SNSS log from `input`, replaying every record into a fresh
/// store and materializing the result once the stream is exhausted. This is
/// the core's single public entry point; everything upstream of it (file
/// discovery, CLI argument parsing) is a boundary concern.
pub fn parse_session<R: Read>(input: R) -> Result<SessionState, SnssError> {
    let mut frames = FrameReader::open(input)?;
    let mut store = SessionStore::new();

    while let Some((opcode, payload)) = frames.next_frame()? {
        command::apply(opcode, &payload, &mut store)?;
    }

    Ok(materialize(&mut store))
}
