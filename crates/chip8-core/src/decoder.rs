//! Instruction decoder for the CHIP-8 instruction set.
//!
//! Decoding is total: every 16-bit word maps to exactly one [`Instruction`].
//! Words that match no known encoding inside a group decode to
//! [`Instruction::Unknown`] and are left for the engine to report.

#![allow(missing_docs)]

use crate::Register;

/// Operand fields shared by every instruction word.
///
/// Not every instruction uses every field; the decoder picks the ones the
/// opcode group defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordFields {
    /// Top nibble, selects the opcode group.
    pub group: u8,
    /// Bits 8..=11.
    pub x: Register,
    /// Bits 4..=7.
    pub y: Register,
    /// Bits 0..=3.
    pub n: u8,
    /// Low byte.
    pub kk: u8,
    /// Low 12 bits.
    pub nnn: u16,
}

impl WordFields {
    /// Splits a word into its operand fields.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn split(word: u16) -> Self {
        Self {
            group: (word >> 12) as u8,
            x: Register::from_nibble((word >> 8) as u8),
            y: Register::from_nibble((word >> 4) as u8),
            n: (word & 0x000F) as u8,
            kk: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }
}

/// Decoded instruction, named after the conventional assembler mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// `00E0` clear the framebuffer.
    Cls,
    /// `00EE` return from subroutine.
    Ret,
    /// `1nnn` jump.
    Jp { addr: u16 },
    /// `2nnn` call subroutine.
    Call { addr: u16 },
    /// `3xkk` skip if `Vx == kk`.
    SeByte { x: Register, byte: u8 },
    /// `4xkk` skip if `Vx != kk`.
    SneByte { x: Register, byte: u8 },
    /// `5xy0` skip if `Vx == Vy`.
    SeReg { x: Register, y: Register },
    /// `6xkk` load immediate.
    LdByte { x: Register, byte: u8 },
    /// `7xkk` add immediate without carry.
    AddByte { x: Register, byte: u8 },
    /// `8xy0` copy register.
    LdReg { x: Register, y: Register },
    /// `8xy1` bitwise OR.
    Or { x: Register, y: Register },
    /// `8xy2` bitwise AND.
    And { x: Register, y: Register },
    /// `8xy3` bitwise XOR.
    Xor { x: Register, y: Register },
    /// `8xy4` add with carry into `VF`.
    AddReg { x: Register, y: Register },
    /// `8xy5` `Vx - Vy` with no-borrow into `VF`.
    Sub { x: Register, y: Register },
    /// `8xy6` shift right, old bit 0 into `VF`.
    Shr { x: Register, y: Register },
    /// `8xy7` `Vy - Vx` with no-borrow into `VF`.
    Subn { x: Register, y: Register },
    /// `8xyE` shift left, old bit 7 into `VF`.
    Shl { x: Register, y: Register },
    /// `9xy0` skip if `Vx != Vy`.
    SneReg { x: Register, y: Register },
    /// `Annn` load index register.
    LdI { addr: u16 },
    /// `Bnnn` jump to `nnn + V0`.
    JpV0 { addr: u16 },
    /// `Cxkk` random byte masked with `kk`.
    Rnd { x: Register, mask: u8 },
    /// `Dxyn` draw an `n`-row sprite from `I` at `(Vx, Vy)`.
    Drw { x: Register, y: Register, rows: u8 },
    /// `Ex9E` skip if key `Vx` is pressed.
    Skp { x: Register },
    /// `ExA1` skip if key `Vx` is not pressed.
    Sknp { x: Register },
    /// `Fx07` read the delay timer.
    LdRegDt { x: Register },
    /// `Fx0A` block until a key is pressed.
    LdKey { x: Register },
    /// `Fx15` set the delay timer.
    LdDtReg { x: Register },
    /// `Fx18` set the sound timer.
    LdSt { x: Register },
    /// `Fx1E` add `Vx` to `I`.
    AddI { x: Register },
    /// `Fx29` point `I` at the glyph for `Vx`.
    LdF { x: Register },
    /// `Fx33` store the decimal digits of `Vx` at `I`.
    LdB { x: Register },
    /// `Fx55` store `V0..=Vx` at `I`.
    StoreRegs { x: Register },
    /// `Fx65` load `V0..=Vx` from `I`.
    LoadRegs { x: Register },
    /// Any word that matches no encoding above.
    Unknown(u16),
}

impl Instruction {
    /// Re-encodes this instruction to its canonical word.
    ///
    /// Ignored operand bits (the low nibble of `5xy_`/`9xy_`) encode as
    /// zero. [`Instruction::Unknown`] returns the word it was decoded from.
    #[must_use]
    pub const fn encode(self) -> u16 {
        const fn xkk(group: u16, x: Register, kk: u8) -> u16 {
            (group << 12) | ((x.nibble() as u16) << 8) | kk as u16
        }
        const fn xyn(group: u16, x: Register, y: Register, n: u8) -> u16 {
            (group << 12) | ((x.nibble() as u16) << 8) | ((y.nibble() as u16) << 4) | n as u16
        }

        match self {
            Self::Cls => 0x00E0,
            Self::Ret => 0x00EE,
            Self::Jp { addr } => 0x1000 | (addr & 0x0FFF),
            Self::Call { addr } => 0x2000 | (addr & 0x0FFF),
            Self::SeByte { x, byte } => xkk(0x3, x, byte),
            Self::SneByte { x, byte } => xkk(0x4, x, byte),
            Self::SeReg { x, y } => xyn(0x5, x, y, 0x0),
            Self::LdByte { x, byte } => xkk(0x6, x, byte),
            Self::AddByte { x, byte } => xkk(0x7, x, byte),
            Self::LdReg { x, y } => xyn(0x8, x, y, 0x0),
            Self::Or { x, y } => xyn(0x8, x, y, 0x1),
            Self::And { x, y } => xyn(0x8, x, y, 0x2),
            Self::Xor { x, y } => xyn(0x8, x, y, 0x3),
            Self::AddReg { x, y } => xyn(0x8, x, y, 0x4),
            Self::Sub { x, y } => xyn(0x8, x, y, 0x5),
            Self::Shr { x, y } => xyn(0x8, x, y, 0x6),
            Self::Subn { x, y } => xyn(0x8, x, y, 0x7),
            Self::Shl { x, y } => xyn(0x8, x, y, 0xE),
            Self::SneReg { x, y } => xyn(0x9, x, y, 0x0),
            Self::LdI { addr } => 0xA000 | (addr & 0x0FFF),
            Self::JpV0 { addr } => 0xB000 | (addr & 0x0FFF),
            Self::Rnd { x, mask } => xkk(0xC, x, mask),
            Self::Drw { x, y, rows } => xyn(0xD, x, y, rows & 0x0F),
            Self::Skp { x } => xkk(0xE, x, 0x9E),
            Self::Sknp { x } => xkk(0xE, x, 0xA1),
            Self::LdRegDt { x } => xkk(0xF, x, 0x07),
            Self::LdKey { x } => xkk(0xF, x, 0x0A),
            Self::LdDtReg { x } => xkk(0xF, x, 0x15),
            Self::LdSt { x } => xkk(0xF, x, 0x18),
            Self::AddI { x } => xkk(0xF, x, 0x1E),
            Self::LdF { x } => xkk(0xF, x, 0x29),
            Self::LdB { x } => xkk(0xF, x, 0x33),
            Self::StoreRegs { x } => xkk(0xF, x, 0x55),
            Self::LoadRegs { x } => xkk(0xF, x, 0x65),
            Self::Unknown(word) => word,
        }
    }

    /// Returns `true` for words the decoder did not recognise.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// Instruction decoder for the CHIP-8 instruction set.
pub struct Decoder;

impl Decoder {
    /// Decodes a 16-bit instruction word.
    ///
    /// Dispatches on the top nibble, then on the sub-opcode field the group
    /// defines (the whole low byte for groups `0`, `E` and `F`, the low
    /// nibble for group `8`).
    #[must_use]
    pub const fn decode(word: u16) -> Instruction {
        let WordFields {
            group,
            x,
            y,
            n,
            kk,
            nnn,
        } = WordFields::split(word);

        match group {
            0x0 => match word {
                0x00E0 => Instruction::Cls,
                0x00EE => Instruction::Ret,
                _ => Instruction::Unknown(word),
            },
            0x1 => Instruction::Jp { addr: nnn },
            0x2 => Instruction::Call { addr: nnn },
            0x3 => Instruction::SeByte { x, byte: kk },
            0x4 => Instruction::SneByte { x, byte: kk },
            0x5 => Instruction::SeReg { x, y },
            0x6 => Instruction::LdByte { x, byte: kk },
            0x7 => Instruction::AddByte { x, byte: kk },
            0x8 => match n {
                0x0 => Instruction::LdReg { x, y },
                0x1 => Instruction::Or { x, y },
                0x2 => Instruction::And { x, y },
                0x3 => Instruction::Xor { x, y },
                0x4 => Instruction::AddReg { x, y },
                0x5 => Instruction::Sub { x, y },
                0x6 => Instruction::Shr { x, y },
                0x7 => Instruction::Subn { x, y },
                0xE => Instruction::Shl { x, y },
                _ => Instruction::Unknown(word),
            },
            0x9 => Instruction::SneReg { x, y },
            0xA => Instruction::LdI { addr: nnn },
            0xB => Instruction::JpV0 { addr: nnn },
            0xC => Instruction::Rnd { x, mask: kk },
            0xD => Instruction::Drw { x, y, rows: n },
            0xE => match kk {
                0x9E => Instruction::Skp { x },
                0xA1 => Instruction::Sknp { x },
                _ => Instruction::Unknown(word),
            },
            _ => match kk {
                0x07 => Instruction::LdRegDt { x },
                0x0A => Instruction::LdKey { x },
                0x15 => Instruction::LdDtReg { x },
                0x18 => Instruction::LdSt { x },
                0x1E => Instruction::AddI { x },
                0x29 => Instruction::LdF { x },
                0x33 => Instruction::LdB { x },
                0x55 => Instruction::StoreRegs { x },
                0x65 => Instruction::LoadRegs { x },
                _ => Instruction::Unknown(word),
            },
        }
    }
}
