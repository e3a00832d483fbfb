use crate::{FaultCode, Register};

/// Execution-state machine for host-observable engine control flow.
///
/// Pausing and single-stepping are not engine states; hosts get those by not
/// calling `cycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Suspended by `Fx0A` until the next key press, which lands in `register`.
    AwaitingKey {
        /// Destination register for the pressed key's index.
        register: Register,
    },
    /// Fault is latched and no further progress is possible without reset.
    FaultLatched(FaultCode),
}

impl RunState {
    /// Returns the currently latched fault, if this state is fault-latched.
    #[must_use]
    pub const fn latched_fault(self) -> Option<FaultCode> {
        match self {
            Self::FaultLatched(cause) => Some(cause),
            Self::Running | Self::AwaitingKey { .. } => None,
        }
    }

    /// Returns the destination register of a pending key wait.
    #[must_use]
    pub const fn awaiting_register(self) -> Option<Register> {
        match self {
            Self::AwaitingKey { register } => Some(register),
            Self::Running | Self::FaultLatched(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;
    use crate::{FaultCode, Register};

    #[test]
    fn run_state_default_is_running() {
        assert_eq!(RunState::default(), RunState::Running);
    }

    #[test]
    fn latched_fault_accessor_reports_only_fault_latched_variant() {
        assert_eq!(RunState::Running.latched_fault(), None);
        assert_eq!(
            RunState::AwaitingKey {
                register: Register::V2
            }
            .latched_fault(),
            None
        );
        assert_eq!(
            RunState::FaultLatched(FaultCode::StackUnderflow).latched_fault(),
            Some(FaultCode::StackUnderflow)
        );
    }

    #[test]
    fn awaiting_register_accessor_reports_only_key_wait() {
        assert_eq!(RunState::Running.awaiting_register(), None);
        assert_eq!(
            RunState::AwaitingKey {
                register: Register::VC
            }
            .awaiting_register(),
            Some(Register::VC)
        );
        assert_eq!(
            RunState::FaultLatched(FaultCode::FetchOutOfBounds).awaiting_register(),
            None
        );
    }
}
