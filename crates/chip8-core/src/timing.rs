//! Delay and sound timers.

/// Conventional rate at which hosts call `cycle`, and so at which the timers
/// count down.
pub const TIMER_HZ: u32 = 60;

/// Result of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerTick {
    /// The sound timer went from 1 to 0 on this tick.
    pub sound_expired: bool,
}

/// The two 8-bit countdown timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Timers {
    /// Delay timer, readable by programs through `Fx07`.
    pub delay: u8,
    /// Sound timer; a tone plays while it is non-zero.
    pub sound: u8,
}

impl Timers {
    /// Decrements each non-zero timer by one.
    pub const fn tick(&mut self) -> TimerTick {
        if self.delay > 0 {
            self.delay -= 1;
        }
        let mut tick = TimerTick {
            sound_expired: false,
        };
        if self.sound > 0 {
            self.sound -= 1;
            tick.sound_expired = self.sound == 0;
        }
        tick
    }

    /// Returns `true` while the sound timer is running.
    #[must_use]
    pub const fn sound_active(&self) -> bool {
        self.sound > 0
    }
}
