//! Bounds policy for instruction fetch and indexed data access.

use std::ops::Range;

use crate::memory::MEMORY_BYTES;
use crate::FaultCode;

/// Byte width of one instruction word.
pub const INSTRUCTION_BYTES: u16 = 2;

/// Highest address from which a full instruction word can be fetched.
pub const LAST_FETCH_ADDR: u16 = MEMORY_BYTES as u16 - INSTRUCTION_BYTES;

/// Validates that a complete instruction word can be fetched at `pc`.
///
/// # Errors
///
/// Returns [`FaultCode::FetchOutOfBounds`] when `pc > 0xFFE`.
pub const fn validate_fetch_access(pc: u16) -> Result<(), FaultCode> {
    if pc <= LAST_FETCH_ADDR {
        Ok(())
    } else {
        Err(FaultCode::FetchOutOfBounds)
    }
}

/// Validates an indexed data access of `len` bytes starting at `start`.
///
/// Returns the byte range to use for slicing memory.
///
/// # Errors
///
/// Returns [`FaultCode::MemoryOutOfBounds`] when any byte of the range lies
/// at or past `0x1000`.
pub fn validate_data_range(start: u16, len: usize) -> Result<Range<usize>, FaultCode> {
    let start = usize::from(start);
    let end = start
        .checked_add(len)
        .ok_or(FaultCode::MemoryOutOfBounds)?;
    if end > MEMORY_BYTES {
        return Err(FaultCode::MemoryOutOfBounds);
    }
    Ok(start..end)
}
