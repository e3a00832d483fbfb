//! Fixed memory-region map and decoding helpers.

/// Inclusive start address of the built-in glyph table.
pub const FONT_START: u16 = 0x000;
/// Inclusive end address of the built-in glyph table.
pub const FONT_END: u16 = 0x04F;
/// Inclusive start address of the reserved interpreter area.
pub const RESERVED_START: u16 = 0x050;
/// Inclusive end address of the reserved interpreter area.
pub const RESERVED_END: u16 = 0x1FF;
/// Inclusive start address of the program area; also the reset program counter.
pub const PROGRAM_START: u16 = 0x200;
/// Inclusive end address of the program area.
pub const PROGRAM_END: u16 = 0xFFF;

/// Canonical fixed-region descriptor for the memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    /// Region classification.
    pub region: MemoryRegion,
    /// Inclusive start address.
    pub start: u16,
    /// Inclusive end address.
    pub end: u16,
}

/// Region classification for addresses inside the 4 KiB address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    /// Glyph table (`0x000..=0x04F`).
    Font,
    /// Reserved interpreter area (`0x050..=0x1FF`).
    Reserved,
    /// Program area (`0x200..=0xFFF`).
    Program,
}

impl MemoryRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Font => (FONT_START, FONT_END),
            Self::Reserved => (RESERVED_START, RESERVED_END),
            Self::Program => (PROGRAM_START, PROGRAM_END),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }

    /// Number of bytes covered by this region.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        let (start, end) = self.bounds();
        (end - start) as usize + 1
    }

    /// Returns the canonical descriptor for this region.
    #[must_use]
    pub const fn descriptor(self) -> RegionDescriptor {
        let (start, end) = self.bounds();
        RegionDescriptor {
            region: self,
            start,
            end,
        }
    }
}

/// Canonical fixed region layout in ascending address order.
pub const FIXED_MEMORY_REGIONS: [RegionDescriptor; 3] = [
    MemoryRegion::Font.descriptor(),
    MemoryRegion::Reserved.descriptor(),
    MemoryRegion::Program.descriptor(),
];

const _: () = assert_fixed_region_layout();

const fn assert_fixed_region_layout() {
    assert!(
        FIXED_MEMORY_REGIONS[0].start == 0,
        "glyph table must start the address space"
    );
    assert!(
        FIXED_MEMORY_REGIONS[0].end + 1 == FIXED_MEMORY_REGIONS[1].start,
        "reserved area must follow the glyph table"
    );
    assert!(
        FIXED_MEMORY_REGIONS[1].end + 1 == FIXED_MEMORY_REGIONS[2].start,
        "program area must follow the reserved area"
    );
    assert!(
        FIXED_MEMORY_REGIONS[2].end as usize + 1 == super::MEMORY_BYTES,
        "program area must end the address space"
    );
}

/// Decodes an address into its region, or `None` past the end of memory.
#[must_use]
pub const fn decode_memory_region(addr: u16) -> Option<MemoryRegion> {
    if addr <= FONT_END {
        Some(MemoryRegion::Font)
    } else if addr <= RESERVED_END {
        Some(MemoryRegion::Reserved)
    } else if addr <= PROGRAM_END {
        Some(MemoryRegion::Program)
    } else {
        None
    }
}
