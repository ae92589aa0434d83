//! The core's error taxonomy.
//!
//! Every fatal condition the decoder can hit is one of these kinds; nothing
//! else escapes [`crate::session::parse_session`]. Boundary collaborators
//! (discovery, the Firefox reader, historical-count persistence) deliberately
//! don't participate in this enum — they degrade to `Option`/`anyhow::Result`
//! instead, because they answer a different question ("is a file available")
//! than "did the bytes decode".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnssError {
    #[error("not a session log: leading bytes are not \"SNSS\"")]
    BadMagic,

    #[error("unsupported SNSS version {0}, expected 1 or 3")]
    UnsupportedVersion(u32),

    #[error("frame declares more payload than remains in the log")]
    TruncatedFrame,

    #[error("a command handler could not read a required field")]
    TruncatedField,

    #[error("io error reading session log: {0}")]
    Io(#[from] std::io::Error),
}
