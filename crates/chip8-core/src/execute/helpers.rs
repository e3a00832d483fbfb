//! Helper functions for instruction execution.

use super::flags::FlagUpdate;

/// Register-to-register operations of group `8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    /// `Vx = Vy`.
    Load,
    /// `Vx |= Vy`.
    Or,
    /// `Vx &= Vy`.
    And,
    /// `Vx ^= Vy`.
    Xor,
    /// `Vx += Vy`, carry into `VF`.
    Add,
    /// `Vx -= Vy`, no-borrow into `VF`.
    Sub,
    /// `Vx >>= 1`, shifted-out bit into `VF`.
    Shr,
    /// `Vx = Vy - Vx`, no-borrow into `VF`.
    Subn,
    /// `Vx <<= 1`, shifted-out bit into `VF`.
    Shl,
}

/// Computes the new `Vx` and the `VF` update for `op` applied to `vx`, `vy`.
#[must_use]
pub const fn alu(op: AluOp, vx: u8, vy: u8) -> (u8, FlagUpdate) {
    match op {
        AluOp::Load => (vy, FlagUpdate::None),
        AluOp::Or => (vx | vy, FlagUpdate::None),
        AluOp::And => (vx & vy, FlagUpdate::None),
        AluOp::Xor => (vx ^ vy, FlagUpdate::None),
        AluOp::Add => {
            let (sum, carry) = vx.overflowing_add(vy);
            (sum, FlagUpdate::Set(carry))
        }
        AluOp::Sub => (vx.wrapping_sub(vy), FlagUpdate::Set(vx >= vy)),
        AluOp::Shr => (vx >> 1, FlagUpdate::Set(vx & 0x01 != 0)),
        AluOp::Subn => (vy.wrapping_sub(vx), FlagUpdate::Set(vy >= vx)),
        AluOp::Shl => (vx << 1, FlagUpdate::Set(vx & 0x80 != 0)),
    }
}

/// Hundreds, tens and ones digits of `value`.
#[must_use]
pub const fn bcd_digits(value: u8) -> [u8; 3] {
    [value / 100, (value / 10) % 10, value % 10]
}
