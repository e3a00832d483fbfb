//! Memory model primitives, glyph table, and fixed address-space policies.

/// Bounds policy for fetch and indexed data access.
pub mod access;
/// Fixed memory-region map and address decoder.
pub mod map;

pub use access::{validate_data_range, validate_fetch_access, INSTRUCTION_BYTES, LAST_FETCH_ADDR};
pub use map::{
    decode_memory_region, MemoryRegion, RegionDescriptor, FIXED_MEMORY_REGIONS, FONT_END,
    FONT_START, PROGRAM_END, PROGRAM_START, RESERVED_END, RESERVED_START,
};

use crate::FaultCode;

/// Size in bytes of the flat address space (4 KiB).
pub const MEMORY_BYTES: usize = 4096;

/// Bytes per hexadecimal glyph.
pub const GLYPH_BYTES: u16 = 5;

/// Built-in 4×5 glyphs for the hexadecimal digits `0..=F`, stored at `0x000`.
#[rustfmt::skip]
pub const GLYPH_TABLE: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

const _: () = assert!(GLYPH_TABLE.len() == (FONT_END - FONT_START + 1) as usize);

/// Address of the glyph for the low nibble of `digit`.
#[must_use]
pub const fn glyph_address(digit: u8) -> u16 {
    FONT_START + (digit & 0x0F) as u16 * GLYPH_BYTES
}

/// Allocates a zeroed 4 KiB backing store.
#[must_use]
pub fn new_address_space() -> Box<[u8]> {
    vec![0; MEMORY_BYTES].into_boxed_slice()
}

/// Reads the big-endian instruction word at `pc`.
///
/// # Errors
///
/// Returns [`FaultCode::FetchOutOfBounds`] when the word would extend past
/// the end of memory.
pub fn read_u16_be(memory: &[u8], pc: u16) -> Result<u16, FaultCode> {
    validate_fetch_access(pc)?;
    let addr = usize::from(pc);
    Ok(u16::from_be_bytes([memory[addr], memory[addr + 1]]))
}
