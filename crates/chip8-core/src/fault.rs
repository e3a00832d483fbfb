use std::io;

use thiserror::Error;

/// Fault classes used for diagnostics aggregation and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Fetch or data access outside the 4 KiB address space.
    Memory,
    /// Call stack depth violation.
    Stack,
}

/// Stable fault taxonomy for conditions that stop instruction execution.
///
/// Every fault is latched by the engine: once raised, the machine refuses to
/// make progress until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// Program counter points past the last complete instruction word.
    #[error("instruction fetch past the end of memory")]
    FetchOutOfBounds = 0x01,
    /// `CALL` executed with all 16 stack frames in use.
    #[error("call stack overflow")]
    StackOverflow = 0x02,
    /// `RET` executed with an empty call stack.
    #[error("return with an empty call stack")]
    StackUnderflow = 0x03,
    /// Sprite, BCD or bulk register transfer touched memory past `0xFFF`.
    #[error("memory access past the end of the address space")]
    MemoryOutOfBounds = 0x04,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::FetchOutOfBounds),
            0x02 => Some(Self::StackOverflow),
            0x03 => Some(Self::StackUnderflow),
            0x04 => Some(Self::MemoryOutOfBounds),
            _ => None,
        }
    }

    /// Returns the diagnostics fault class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::FetchOutOfBounds | Self::MemoryOutOfBounds => FaultClass::Memory,
            Self::StackOverflow | Self::StackUnderflow => FaultClass::Stack,
        }
    }
}

/// Failure to place a program image into memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Image would extend past the end of the address space.
    #[error("program image of {len} bytes does not fit in {capacity} bytes of program memory")]
    OutOfSpace {
        /// Length of the rejected image in bytes.
        len: usize,
        /// Bytes available from the program start address.
        capacity: usize,
    },
    /// Reading the image from its source failed.
    #[error("failed to read program image: {0}")]
    Io(io::ErrorKind),
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}
