use crate::FaultCode;

/// Maximum number of nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

/// Fixed-depth return-address stack.
///
/// `depth` is the number of frames currently pushed; frames above it are
/// always zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    depth: u8,
}

impl CallStack {
    /// Number of frames currently pushed (the stack pointer).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth as usize
    }

    /// Returns `true` when no frames are pushed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Returns `true` when another push would overflow.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.depth() == STACK_DEPTH
    }

    /// Pushed return addresses, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.depth()]
    }

    /// Pushes a return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackOverflow`] when all frames are in use; the
    /// stack is left unchanged.
    pub const fn push(&mut self, addr: u16) -> Result<(), FaultCode> {
        if self.is_full() {
            return Err(FaultCode::StackOverflow);
        }
        self.frames[self.depth()] = addr;
        self.depth += 1;
        Ok(())
    }

    /// Pops the most recent return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackUnderflow`] when the stack is empty.
    pub const fn pop(&mut self) -> Result<u16, FaultCode> {
        if self.is_empty() {
            return Err(FaultCode::StackUnderflow);
        }
        self.depth -= 1;
        let addr = self.frames[self.depth()];
        self.frames[self.depth()] = 0;
        Ok(addr)
    }
}
