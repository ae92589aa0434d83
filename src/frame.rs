//! Outer SNSS stream framing: the file header and the size-prefixed record
//! loop.

use std::io::Read;

use crate::error::SnssError;
use crate::reader::read_exact_io;

const MAGIC: &[u8; 4] = b"SNSS";

/// Splits an SNSS byte stream into `(opcode, payload)` records after
/// validating and consuming the file header.
pub struct FrameReader<R> {
    input: R,
}

impl<R: Read> FrameReader<R> {
    /// Validates the `"SNSS"` magic and version, leaving the stream
    /// positioned at the first record.
    pub fn open(mut input: R) -> Result<Self, SnssError> {
        let mut magic = [0u8; 4];
        read_exact_io(&mut input, &mut magic)?;
        if &magic != MAGIC {
            return Err(SnssError::BadMagic);
        }

        let mut version_bytes = [0u8; 4];
        read_exact_io(&mut input, &mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != 1 && version != 3 {
            return Err(SnssError::UnsupportedVersion(version));
        }

        Ok(Self { input })
    }

    /// Pops the next record off the stream, or `None` on clean EOF (no bytes
    /// of the next size header were read).
    ///
    /// A size header that's only partially present is tolerated as EOF too
    /// -- some producers truncate the log mid-header rather than mid-record,
    /// and that's not distinguishable from a clean stop from the outside.
    pub fn next_frame(&mut self) -> Result<Option<(u8, Vec<u8>)>, SnssError> {
        let mut size_bytes = [0u8; 2];
        let read = read_partial(&mut self.input, &mut size_bytes)?;
        if read == 0 {
            return Ok(None);
        }
        if read < 2 {
            // a size header was started but not finished: treat as clean EOF
            return Ok(None);
        }
        let total_size = u16::from_le_bytes(size_bytes) as usize;
        if total_size == 0 {
            return Err(SnssError::TruncatedFrame);
        }
        let payload_len = total_size - 1;

        let mut command_type = [0u8; 1];
        read_exact_io(&mut self.input, &mut command_type)
            .map_err(|_| SnssError::TruncatedFrame)?;

        let mut payload = vec![0u8; payload_len];
        read_exact_io(&mut self.input, &mut payload)
            .map_err(|_| SnssError::TruncatedFrame)?;

        Ok(Some((command_type[0], payload)))
    }
}

/// Reads up to `buf.len()` bytes, returning how many were actually read
/// before hitting EOF (as opposed to `read_exact`, which only tells you
/// "enough" or "not enough").
fn read_partial<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize, SnssError> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(SnssError::Io(e)),
        }
    }
    Ok(filled)
}
