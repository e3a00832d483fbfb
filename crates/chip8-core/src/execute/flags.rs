//! `VF` update behaviors for different instruction classes.

/// Describes how `VF` should be updated after an instruction writes `Vx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagUpdate {
    /// `VF` keeps its value.
    #[default]
    None,
    /// `VF` becomes `1` or `0`.
    Set(bool),
}

impl FlagUpdate {
    /// Value to store in `VF`, if any.
    #[must_use]
    pub const fn value(self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::Set(flag) => Some(flag as u8),
        }
    }
}
