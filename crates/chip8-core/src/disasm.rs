//! Instruction disassembly for CHIP-8 programs.
//!
//! Renders decoded instructions with the conventional mnemonics and builds
//! address-ordered rows for diagnostics views.

use std::fmt;

use crate::decoder::{Decoder, Instruction};
use crate::memory::INSTRUCTION_BYTES;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the first byte of the instruction.
    pub addr_start: u16,
    /// Raw big-endian instruction word.
    pub raw_word: u16,
    /// The instruction mnemonic (e.g., "LD", "DRW", ".word").
    pub mnemonic: String,
    /// The formatted operands (e.g., "V3, 0x2A").
    pub operands: String,
    /// Whether the word did not decode to a known instruction.
    pub is_unknown: bool,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}: {:04X}  {}", self.addr_start, self.raw_word, self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands)?;
        }
        Ok(())
    }
}

impl Instruction {
    /// Returns the assembler mnemonic for this instruction.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Cls => "CLS",
            Self::Ret => "RET",
            Self::Jp { .. } | Self::JpV0 { .. } => "JP",
            Self::Call { .. } => "CALL",
            Self::SeByte { .. } | Self::SeReg { .. } => "SE",
            Self::SneByte { .. } | Self::SneReg { .. } => "SNE",
            Self::LdByte { .. }
            | Self::LdReg { .. }
            | Self::LdI { .. }
            | Self::LdRegDt { .. }
            | Self::LdKey { .. }
            | Self::LdDtReg { .. }
            | Self::LdSt { .. }
            | Self::LdF { .. }
            | Self::LdB { .. }
            | Self::StoreRegs { .. }
            | Self::LoadRegs { .. } => "LD",
            Self::AddByte { .. } | Self::AddReg { .. } | Self::AddI { .. } => "ADD",
            Self::Or { .. } => "OR",
            Self::And { .. } => "AND",
            Self::Xor { .. } => "XOR",
            Self::Sub { .. } => "SUB",
            Self::Shr { .. } => "SHR",
            Self::Subn { .. } => "SUBN",
            Self::Shl { .. } => "SHL",
            Self::Rnd { .. } => "RND",
            Self::Drw { .. } => "DRW",
            Self::Skp { .. } => "SKP",
            Self::Sknp { .. } => "SKNP",
            Self::Unknown(_) => ".word",
        }
    }

    /// Returns the formatted operand list, empty for `CLS` and `RET`.
    #[must_use]
    pub fn operands(self) -> String {
        match self {
            Self::Cls | Self::Ret => String::new(),
            Self::Jp { addr } | Self::Call { addr } => format!("0x{addr:03X}"),
            Self::JpV0 { addr } => format!("V0, 0x{addr:03X}"),
            Self::LdI { addr } => format!("I, 0x{addr:03X}"),
            Self::SeByte { x, byte }
            | Self::SneByte { x, byte }
            | Self::LdByte { x, byte }
            | Self::AddByte { x, byte }
            | Self::Rnd { x, mask: byte } => format!("{x}, 0x{byte:02X}"),
            Self::SeReg { x, y }
            | Self::SneReg { x, y }
            | Self::LdReg { x, y }
            | Self::Or { x, y }
            | Self::And { x, y }
            | Self::Xor { x, y }
            | Self::AddReg { x, y }
            | Self::Sub { x, y }
            | Self::Shr { x, y }
            | Self::Subn { x, y }
            | Self::Shl { x, y } => format!("{x}, {y}"),
            Self::Drw { x, y, rows } => format!("{x}, {y}, {rows}"),
            Self::Skp { x } | Self::Sknp { x } => x.to_string(),
            Self::LdRegDt { x } => format!("{x}, DT"),
            Self::LdKey { x } => format!("{x}, K"),
            Self::LdDtReg { x } => format!("DT, {x}"),
            Self::LdSt { x } => format!("ST, {x}"),
            Self::AddI { x } => format!("I, {x}"),
            Self::LdF { x } => format!("F, {x}"),
            Self::LdB { x } => format!("B, {x}"),
            Self::StoreRegs { x } => format!("[I], {x}"),
            Self::LoadRegs { x } => format!("{x}, [I]"),
            Self::Unknown(word) => format!("0x{word:04X}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();
        if operands.is_empty() {
            f.write_str(self.mnemonic())
        } else {
            write!(f, "{} {operands}", self.mnemonic())
        }
    }
}

/// Disassembles the instruction word at `addr`.
///
/// Returns `None` when either byte of the word lies outside `memory`.
#[must_use]
pub fn disassemble_one(addr: u16, memory: &[u8]) -> Option<DisassemblyRow> {
    let hi = *memory.get(usize::from(addr))?;
    let lo = *memory.get(usize::from(addr) + 1)?;
    let raw_word = u16::from_be_bytes([hi, lo]);
    let instruction = Decoder::decode(raw_word);

    Some(DisassemblyRow {
        addr_start: addr,
        raw_word,
        mnemonic: instruction.mnemonic().to_string(),
        operands: instruction.operands(),
        is_unknown: instruction.is_unknown(),
    })
}

/// Disassembles a window of instructions around a given program counter.
///
/// Every instruction is two bytes wide, so the window is the rows at
/// `center_pc - 2 * before ..= center_pc + 2 * after`. Rows that would start
/// below address zero or read past the end of `memory` are omitted.
///
/// Note: `after` specifies the number of instructions AFTER the center, not including center.
#[must_use]
pub fn disassemble_window(
    center_pc: u16,
    before: usize,
    after: usize,
    memory: &[u8],
) -> Vec<DisassemblyRow> {
    let step = usize::from(INSTRUCTION_BYTES);
    let center = usize::from(center_pc);
    let available_before = before.min(center / step);
    let first = center - available_before * step;
    let last = center.saturating_add(after.saturating_mul(step));

    (first..=last)
        .step_by(step)
        .map_while(|addr| u16::try_from(addr).ok())
        .map_while(|addr| disassemble_one(addr, memory))
        .collect()
}
