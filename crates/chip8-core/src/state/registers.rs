use std::fmt;

use crate::memory::PROGRAM_START;

/// Number of general-purpose data registers (`V0..VF`).
pub const DATA_REGISTER_COUNT: usize = 16;

/// General-purpose data register identifier.
///
/// `VF` doubles as the carry, borrow and collision flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    V0 = 0x0,
    V1 = 0x1,
    V2 = 0x2,
    V3 = 0x3,
    V4 = 0x4,
    V5 = 0x5,
    V6 = 0x6,
    V7 = 0x7,
    V8 = 0x8,
    V9 = 0x9,
    VA = 0xA,
    VB = 0xB,
    VC = 0xC,
    VD = 0xD,
    VE = 0xE,
    VF = 0xF,
}

impl Register {
    /// Ordered list of all data registers.
    pub const ALL: [Self; DATA_REGISTER_COUNT] = [
        Self::V0,
        Self::V1,
        Self::V2,
        Self::V3,
        Self::V4,
        Self::V5,
        Self::V6,
        Self::V7,
        Self::V8,
        Self::V9,
        Self::VA,
        Self::VB,
        Self::VC,
        Self::VD,
        Self::VE,
        Self::VF,
    ];

    /// Decodes the low nibble of `bits` into a register.
    #[must_use]
    pub const fn from_nibble(bits: u8) -> Self {
        Self::ALL[(bits & 0x0F) as usize]
    }

    /// Returns the array index for this register (`0..=15`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the 4-bit encoding of this register.
    #[must_use]
    pub const fn nibble(self) -> u8 {
        self as u8
    }

    /// Registers `V0` through `self`, inclusive, in ascending order.
    pub fn up_to(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().take(self.index() + 1)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.nibble())
    }
}

/// Data registers plus the index register and program counter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    v: [u8; DATA_REGISTER_COUNT],
    index: u16,
    pc: u16,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            v: [0; DATA_REGISTER_COUNT],
            index: 0,
            pc: PROGRAM_START,
        }
    }
}

impl RegisterFile {
    /// Reads a data register.
    #[must_use]
    pub const fn v(&self, reg: Register) -> u8 {
        self.v[reg.index()]
    }

    /// Writes a data register.
    pub const fn set_v(&mut self, reg: Register, value: u8) {
        self.v[reg.index()] = value;
    }

    /// Reads all data registers in `V0..VF` order.
    #[must_use]
    pub const fn data(&self) -> &[u8; DATA_REGISTER_COUNT] {
        &self.v
    }

    /// Reads the `VF` flag register.
    #[must_use]
    pub const fn flag(&self) -> u8 {
        self.v[Register::VF.index()]
    }

    /// Writes `1` or `0` into `VF`.
    pub const fn set_flag(&mut self, flag: bool) {
        self.v[Register::VF.index()] = flag as u8;
    }

    /// Reads the `I` register.
    #[must_use]
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// Writes the `I` register.
    pub const fn set_index(&mut self, value: u16) {
        self.index = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Moves the program counter past one instruction word.
    pub const fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(crate::memory::INSTRUCTION_BYTES);
    }

    /// Skips the next instruction when `condition` holds.
    pub const fn skip_next_if(&mut self, condition: bool) {
        if condition {
            self.advance_pc();
        }
    }
}
