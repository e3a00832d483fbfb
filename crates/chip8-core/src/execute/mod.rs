//! Fetch-decode-execute pipeline.
//!
//! One cycle fetches the word at `pc`, advances `pc` past it, executes it and
//! then ticks both timers. Faults are precise: every operand and memory range
//! is validated before the first write, so a faulting instruction leaves the
//! machine as it was with `pc` back at the fetch address.

mod flags;
mod helpers;

pub use flags::FlagUpdate;
pub use helpers::{alu, bcd_digits, AluOp};

use crate::decoder::{Decoder, Instruction};
use crate::keypad::Key;
use crate::memory::{glyph_address, read_u16_be, validate_data_range};
use crate::state::{Register, RegisterFile, RunState};
use crate::{CycleReport, FaultCode, Machine, StepOutcome};

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Instruction retired.
    Retired,
    /// `Fx0A` suspended execution until a key press.
    EnteredKeyWait {
        /// Register that will receive the key.
        register: Register,
    },
    /// Unrecognised word, executed as a no-op.
    Ignored,
}

/// Runs one cycle against `machine`.
///
/// # Errors
///
/// Returns the fault raised while fetching or executing, after latching it,
/// or the previously latched fault.
pub fn step_one(machine: &mut Machine) -> Result<CycleReport, FaultCode> {
    match machine.run_state {
        RunState::FaultLatched(cause) => return Err(cause),
        RunState::AwaitingKey { register } => {
            return Ok(CycleReport {
                pc: machine.registers.pc(),
                outcome: StepOutcome::AwaitingKey { register },
                sound_triggered: false,
            });
        }
        RunState::Running => {}
    }

    let pc = machine.registers.pc();
    let word = match read_u16_be(&machine.memory, pc) {
        Ok(word) => word,
        Err(cause) => return Err(latch_fault(machine, pc, cause)),
    };
    let instruction = Decoder::decode(word);
    machine.registers.advance_pc();

    match execute_instruction(instruction, machine) {
        Ok(ExecuteOutcome::Retired) => {}
        Ok(ExecuteOutcome::EnteredKeyWait { register }) => {
            log::debug!("waiting for a key press into {register} at {pc:#05x}");
        }
        Ok(ExecuteOutcome::Ignored) => {
            log::warn!("unknown instruction {word:#06x} at {pc:#05x} ignored");
        }
        Err(cause) => {
            machine.registers.set_pc(pc);
            return Err(latch_fault(machine, pc, cause));
        }
    }

    let tick = machine.timers.tick();
    if tick.sound_expired {
        log::info!("BEEP");
    }

    Ok(CycleReport {
        pc,
        outcome: StepOutcome::Executed { word, instruction },
        sound_triggered: tick.sound_expired,
    })
}

fn latch_fault(machine: &mut Machine, pc: u16, cause: FaultCode) -> FaultCode {
    log::warn!("{cause} at {pc:#05x}, machine halted");
    machine.run_state = RunState::FaultLatched(cause);
    cause
}

/// Executes a decoded instruction.
///
/// Expects `pc` to already point past the instruction.
///
/// # Errors
///
/// Returns the fault the instruction raised. No state has been modified when
/// an error is returned.
pub fn execute_instruction(
    instruction: Instruction,
    machine: &mut Machine,
) -> Result<ExecuteOutcome, FaultCode> {
    let regs = &mut machine.registers;

    match instruction {
        Instruction::Cls => machine.framebuffer.clear(),
        Instruction::Ret => {
            let addr = machine.stack.pop()?;
            regs.set_pc(addr);
        }
        Instruction::Jp { addr } => regs.set_pc(addr),
        Instruction::Call { addr } => {
            machine.stack.push(regs.pc())?;
            regs.set_pc(addr);
        }
        Instruction::SeByte { x, byte } => regs.skip_next_if(regs.v(x) == byte),
        Instruction::SneByte { x, byte } => regs.skip_next_if(regs.v(x) != byte),
        Instruction::SeReg { x, y } => regs.skip_next_if(regs.v(x) == regs.v(y)),
        Instruction::SneReg { x, y } => regs.skip_next_if(regs.v(x) != regs.v(y)),
        Instruction::LdByte { x, byte } => regs.set_v(x, byte),
        Instruction::AddByte { x, byte } => regs.set_v(x, regs.v(x).wrapping_add(byte)),
        Instruction::LdReg { x, y } => apply_alu(regs, AluOp::Load, x, y),
        Instruction::Or { x, y } => apply_alu(regs, AluOp::Or, x, y),
        Instruction::And { x, y } => apply_alu(regs, AluOp::And, x, y),
        Instruction::Xor { x, y } => apply_alu(regs, AluOp::Xor, x, y),
        Instruction::AddReg { x, y } => apply_alu(regs, AluOp::Add, x, y),
        Instruction::Sub { x, y } => apply_alu(regs, AluOp::Sub, x, y),
        Instruction::Shr { x, y } => apply_alu(regs, AluOp::Shr, x, y),
        Instruction::Subn { x, y } => apply_alu(regs, AluOp::Subn, x, y),
        Instruction::Shl { x, y } => apply_alu(regs, AluOp::Shl, x, y),
        Instruction::LdI { addr } => regs.set_index(addr),
        Instruction::JpV0 { addr } => {
            regs.set_pc(addr.wrapping_add(u16::from(regs.v(Register::V0))));
        }
        Instruction::Rnd { x, mask } => {
            let value = machine.random_byte() & mask;
            machine.registers.set_v(x, value);
        }
        Instruction::Drw { x, y, rows } => execute_draw(machine, x, y, rows)?,
        Instruction::Skp { x } => {
            let pressed = machine.keypad.is_pressed(Key::from_low_nibble(regs.v(x)));
            regs.skip_next_if(pressed);
        }
        Instruction::Sknp { x } => {
            let pressed = machine.keypad.is_pressed(Key::from_low_nibble(regs.v(x)));
            regs.skip_next_if(!pressed);
        }
        Instruction::LdRegDt { x } => regs.set_v(x, machine.timers.delay),
        Instruction::LdKey { x } => {
            machine.run_state = RunState::AwaitingKey { register: x };
            return Ok(ExecuteOutcome::EnteredKeyWait { register: x });
        }
        Instruction::LdDtReg { x } => machine.timers.delay = regs.v(x),
        Instruction::LdSt { x } => machine.timers.sound = regs.v(x),
        Instruction::AddI { x } => {
            regs.set_index(regs.index().wrapping_add(u16::from(regs.v(x))));
        }
        Instruction::LdF { x } => regs.set_index(glyph_address(regs.v(x))),
        Instruction::LdB { x } => {
            let range = validate_data_range(regs.index(), 3)?;
            machine.memory[range].copy_from_slice(&bcd_digits(regs.v(x)));
        }
        Instruction::StoreRegs { x } => {
            let range = validate_data_range(regs.index(), x.index() + 1)?;
            machine.memory[range].copy_from_slice(&regs.data()[..=x.index()]);
        }
        Instruction::LoadRegs { x } => {
            let range = validate_data_range(regs.index(), x.index() + 1)?;
            for (reg, byte) in x.up_to().zip(machine.memory[range].iter()) {
                regs.set_v(reg, *byte);
            }
        }
        Instruction::Unknown(_) => return Ok(ExecuteOutcome::Ignored),
    }

    Ok(ExecuteOutcome::Retired)
}

/// Writes `Vx` first and `VF` second, so the flag wins when `x` is `VF`.
fn apply_alu(regs: &mut RegisterFile, op: AluOp, x: Register, y: Register) {
    let (value, flag) = alu(op, regs.v(x), regs.v(y));
    regs.set_v(x, value);
    if let Some(flag) = flag.value() {
        regs.set_v(Register::VF, flag);
    }
}

fn execute_draw(
    machine: &mut Machine,
    x: Register,
    y: Register,
    rows: u8,
) -> Result<(), FaultCode> {
    let regs = &mut machine.registers;
    let range = validate_data_range(regs.index(), usize::from(rows))?;
    let collision = machine
        .framebuffer
        .draw_sprite(regs.v(x), regs.v(y), &machine.memory[range]);
    regs.set_flag(collision);
    Ok(())
}
