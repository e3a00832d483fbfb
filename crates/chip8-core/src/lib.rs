//! Interpreter core for the CHIP-8 virtual machine.
//!
//! [`Machine`] holds the complete machine state and advances one instruction
//! per [`Machine::cycle`]. [`Driver`] wraps a machine with host-side run
//! control and frame statistics.

/// Memory model primitives, glyph table and address-space bounds.
pub mod memory;
pub use memory::{
    decode_memory_region, glyph_address, new_address_space, read_u16_be, validate_data_range,
    validate_fetch_access, MemoryRegion, RegionDescriptor, FIXED_MEMORY_REGIONS, FONT_END,
    FONT_START, GLYPH_BYTES, GLYPH_TABLE, INSTRUCTION_BYTES, LAST_FETCH_ADDR, MEMORY_BYTES,
    PROGRAM_END, PROGRAM_START, RESERVED_END, RESERVED_START,
};

/// Host-facing machine aggregate and configuration.
pub mod api;
pub use api::{CoreConfig, CycleReport, Machine, StepOutcome, PROGRAM_CAPACITY};

/// Register file, call stack and run state.
pub mod state;
pub use state::{CallStack, Register, RegisterFile, RunState, DATA_REGISTER_COUNT, STACK_DEPTH};

/// Fault and load-error taxonomy.
pub mod fault;
pub use fault::{FaultClass, FaultCode, LoadError};

/// Delay and sound timers.
pub mod timing;
pub use timing::{TimerTick, Timers, TIMER_HZ};

/// Monochrome framebuffer.
pub mod display;
pub use display::{Framebuffer, DISPLAY_CELLS, DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_WIDTH};

/// Hexadecimal keypad.
pub mod keypad;
pub use keypad::{Key, KeyError, Keypad, KEY_COUNT};

/// Host key-name mappings.
pub mod keymap;
pub use keymap::{KeyLayout, KeyMap};

/// Instruction decoder.
pub mod decoder;
pub use decoder::{Decoder, Instruction, WordFields};

/// Instruction disassembly.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_window, DisassemblyRow};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    alu, bcd_digits, execute_instruction, step_one, AluOp, ExecuteOutcome, FlagUpdate,
};

/// Frame-paced host loop.
pub mod driver;
pub use driver::{
    Driver, DriverConfig, FpsCounter, FrameReport, HostEvent, RunControl, PAUSE_KEY_NAME,
    QUIT_KEY_NAME,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
