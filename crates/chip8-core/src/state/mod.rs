//! Machine state model primitives.

/// Data registers, index register and program counter.
pub mod registers;
/// Fixed-depth return-address stack.
pub mod stack;

mod run_state;

pub use registers::{Register, RegisterFile, DATA_REGISTER_COUNT};
pub use run_state::RunState;
pub use stack::{CallStack, STACK_DEPTH};
