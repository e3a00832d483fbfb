//! Host-facing machine aggregate, configuration and cycle reporting.

use std::io::Read;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::decoder::Instruction;
use crate::display::Framebuffer;
use crate::keypad::{Key, Keypad};
use crate::memory::{new_address_space, GLYPH_TABLE, FONT_START, MEMORY_BYTES, PROGRAM_START};
use crate::state::{CallStack, Register, RegisterFile, RunState};
use crate::timing::Timers;
use crate::{FaultCode, LoadError};

/// Bytes available to a program image, from `0x200` to the end of memory.
pub const PROGRAM_CAPACITY: usize = MEMORY_BYTES - PROGRAM_START as usize;

/// Top-level configuration for a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Seed for the `Cxkk` random source. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl CoreConfig {
    /// Configuration with a fixed random seed, for reproducible runs.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
        }
    }

    fn build_rng(&self) -> StdRng {
        self.rng_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

/// What one call to [`Machine::cycle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// An instruction was fetched and executed.
    Executed {
        /// Raw instruction word.
        word: u16,
        /// Decoded form of `word`.
        instruction: Instruction,
    },
    /// The machine is blocked on `Fx0A`; nothing was fetched and the timers
    /// did not move.
    AwaitingKey {
        /// Register that will receive the next pressed key.
        register: Register,
    },
}

/// Diagnostics for one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CycleReport {
    /// Fetch address of the executed instruction, or the current program
    /// counter while waiting for a key.
    pub pc: u16,
    /// Executed instruction or key wait.
    pub outcome: StepOutcome,
    /// The sound timer reached zero on this cycle.
    pub sound_triggered: bool,
}

impl CycleReport {
    /// Raw instruction word, when one was executed.
    #[must_use]
    pub const fn word(&self) -> Option<u16> {
        match self.outcome {
            StepOutcome::Executed { word, .. } => Some(word),
            StepOutcome::AwaitingKey { .. } => None,
        }
    }

    /// Decoded instruction, when one was executed.
    #[must_use]
    pub const fn instruction(&self) -> Option<Instruction> {
        match self.outcome {
            StepOutcome::Executed { instruction, .. } => Some(instruction),
            StepOutcome::AwaitingKey { .. } => None,
        }
    }
}

/// Complete CHIP-8 machine state.
///
/// Owned by the host and stepped with [`Machine::cycle`]. Fields are public
/// so hosts and tests can inspect and stage state between cycles.
#[derive(Debug, Clone)]
pub struct Machine {
    /// `V0..VF`, `I` and the program counter.
    pub registers: RegisterFile,
    /// Flat 4 KiB memory image.
    pub memory: Box<[u8]>,
    /// Return-address stack.
    pub stack: CallStack,
    /// Delay and sound timers.
    pub timers: Timers,
    /// Current key state.
    pub keypad: Keypad,
    /// 64×32 monochrome display.
    pub framebuffer: Framebuffer,
    /// Execution state.
    pub run_state: RunState,
    config: CoreConfig,
    rng: StdRng,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Creates a machine in its power-on state with an entropy-seeded RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Creates a machine in its power-on state.
    #[must_use]
    pub fn with_config(config: CoreConfig) -> Self {
        let mut memory = new_address_space();
        write_glyphs(&mut memory);
        Self {
            registers: RegisterFile::default(),
            memory,
            stack: CallStack::default(),
            timers: Timers::default(),
            keypad: Keypad::default(),
            framebuffer: Framebuffer::default(),
            run_state: RunState::Running,
            rng: config.build_rng(),
            config,
        }
    }

    /// Returns the configuration this machine was built with.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Restores the power-on state.
    ///
    /// Memory is zeroed and the glyph table rewritten at `0x000`, every
    /// register, timer, key and cell cleared, the program counter set to
    /// `0x200`, any latched fault or key wait cleared, and the random source
    /// reseeded from the configuration.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        write_glyphs(&mut self.memory);
        self.registers = RegisterFile::default();
        self.stack = CallStack::default();
        self.timers = Timers::default();
        self.keypad.release_all();
        self.framebuffer.reset();
        self.run_state = RunState::Running;
        self.rng = self.config.build_rng();
    }

    /// Copies a program image to `0x200`.
    ///
    /// Bytes outside `0x200..0x200 + program.len()` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::OutOfSpace`] without touching memory when the
    /// image does not fit below `0x1000`.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > PROGRAM_CAPACITY {
            return Err(LoadError::OutOfSpace {
                len: program.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let start = usize::from(PROGRAM_START);
        self.memory[start..start + program.len()].copy_from_slice(program);
        log::debug!("loaded {} byte program at {PROGRAM_START:#05x}", program.len());
        Ok(())
    }

    /// Reads a program image to the end of `reader` and loads it.
    ///
    /// Returns the number of bytes loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] when reading fails, or
    /// [`LoadError::OutOfSpace`] when the image is too large.
    pub fn load_program_from<R: Read>(&mut self, mut reader: R) -> Result<usize, LoadError> {
        let mut image = Vec::with_capacity(PROGRAM_CAPACITY);
        reader.read_to_end(&mut image)?;
        self.load_program(&image)?;
        Ok(image.len())
    }

    /// Marks `key` as held and completes a pending `Fx0A` wait.
    pub fn press_key(&mut self, key: Key) {
        self.keypad.press(key);
        if let RunState::AwaitingKey { register } = self.run_state {
            self.registers.set_v(register, key.index());
            self.run_state = RunState::Running;
            log::debug!("key {key} resumes execution into {register}");
        }
    }

    /// Marks `key` as released. Never completes a key wait.
    pub fn release_key(&mut self, key: Key) {
        self.keypad.release(key);
    }

    /// Runs one fetch-decode-execute cycle followed by one timer tick.
    ///
    /// # Errors
    ///
    /// Returns the fault raised by this cycle, or the fault latched by an
    /// earlier one. A latched fault persists until [`Machine::reset`].
    pub fn cycle(&mut self) -> Result<CycleReport, FaultCode> {
        crate::execute::step_one(self)
    }

    /// Returns the latched fault, if any.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<FaultCode> {
        self.run_state.latched_fault()
    }

    pub(crate) fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

fn write_glyphs(memory: &mut [u8]) {
    let start = usize::from(FONT_START);
    memory[start..start + GLYPH_TABLE.len()].copy_from_slice(&GLYPH_TABLE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_state_has_glyphs_and_nothing_else() {
        let machine = Machine::with_config(CoreConfig::seeded(1));
        assert_eq!(&machine.memory[..GLYPH_TABLE.len()], &GLYPH_TABLE);
        assert!(machine.memory[GLYPH_TABLE.len()..].iter().all(|b| *b == 0));
        assert_eq!(machine.registers.pc(), PROGRAM_START);
        assert_eq!(machine.run_state, RunState::Running);
        assert!(machine.stack.is_empty());
    }

    #[test]
    fn oversize_images_are_rejected_without_writes() {
        let mut machine = Machine::with_config(CoreConfig::seeded(1));
        let image = vec![0xAA; PROGRAM_CAPACITY + 1];
        assert_eq!(
            machine.load_program(&image),
            Err(LoadError::OutOfSpace {
                len: PROGRAM_CAPACITY + 1,
                capacity: PROGRAM_CAPACITY,
            })
        );
        assert!(machine.memory[usize::from(PROGRAM_START)..]
            .iter()
            .all(|b| *b == 0));
    }

    #[test]
    fn image_filling_all_program_memory_fits() {
        let mut machine = Machine::with_config(CoreConfig::seeded(1));
        let image = vec![0x55; PROGRAM_CAPACITY];
        assert_eq!(machine.load_program(&image), Ok(()));
        assert_eq!(machine.memory[MEMORY_BYTES - 1], 0x55);
    }

    #[test]
    fn load_from_reader_reports_length() {
        let mut machine = Machine::with_config(CoreConfig::seeded(1));
        let image: &[u8] = &[0x00, 0xE0, 0x12, 0x00];
        assert_eq!(machine.load_program_from(image), Ok(4));
        assert_eq!(&machine.memory[0x200..0x204], image);
    }

    #[test]
    fn seeded_machines_draw_identical_random_bytes() {
        let mut a = Machine::with_config(CoreConfig::seeded(42));
        let mut b = Machine::with_config(CoreConfig::seeded(42));
        let from_a: Vec<u8> = (0..8).map(|_| a.random_byte()).collect();
        let from_b: Vec<u8> = (0..8).map(|_| b.random_byte()).collect();
        assert_eq!(from_a, from_b);

        a.reset();
        let after_reset: Vec<u8> = (0..8).map(|_| a.random_byte()).collect();
        assert_eq!(after_reset, from_b);
    }

    #[test]
    fn press_completes_key_wait_and_release_does_not() {
        let mut machine = Machine::with_config(CoreConfig::seeded(1));
        machine.run_state = RunState::AwaitingKey {
            register: Register::V4,
        };
        let key = Key::from_low_nibble(0x9);
        machine.release_key(key);
        assert!(machine.run_state.awaiting_register().is_some());
        machine.press_key(key);
        assert_eq!(machine.run_state, RunState::Running);
        assert_eq!(machine.registers.v(Register::V4), 0x9);
        assert!(machine.keypad.is_pressed(key));
    }
}
