//! Frame-paced host loop: run control, key routing and frame statistics.
//!
//! The [`Driver`] owns a [`Machine`] and everything the machine deliberately
//! does not model: pausing, single-stepping, quitting, host key names and
//! the frames-per-second readout. Hosts feed it [`HostEvent`]s and call
//! [`Driver::tick`] once per frame.

use std::time::{Duration, Instant};

use crate::keymap::{KeyLayout, KeyMap};
use crate::{FaultCode, Machine};

/// Host key name that toggles pause.
pub const PAUSE_KEY_NAME: &str = "P";
/// Host key name that stops the driver.
pub const QUIT_KEY_NAME: &str = "Escape";

/// Driver-owned execution control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunControl {
    /// Cycles run every frame.
    #[default]
    Running,
    /// No cycles run until resumed or stepped.
    Paused,
    /// Paused, with one cycle requested for the next frame.
    StepOnce,
    /// The host loop should exit.
    Stopped,
}

/// Input delivered by the host between frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// A host key went down. Unmapped names may drive run control.
    KeyDown(String),
    /// A host key came up.
    KeyUp(String),
    /// Toggle between running and paused.
    TogglePause,
    /// Request a single cycle while paused.
    Step,
    /// Stop the driver.
    Quit,
}

/// Driver tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DriverConfig {
    /// Machine cycles run per frame while running.
    pub cycles_per_frame: u32,
    /// Host key layout.
    pub layout: KeyLayout,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            cycles_per_frame: 1,
            layout: KeyLayout::Original,
        }
    }
}

/// Summary of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Cycles that completed this frame, key-wait cycles included.
    pub executed: u32,
    /// Last instruction word executed, if any this frame.
    pub last_word: Option<u16>,
    /// Fetch address of `last_word`.
    pub last_pc: Option<u16>,
    /// The framebuffer has changes the host has not rendered yet.
    pub draw_requested: bool,
    /// The sound timer expired during this frame.
    pub sound: bool,
    /// Fault that stopped the driver this frame.
    pub fault: Option<FaultCode>,
}

/// Frames-per-second counter over one-second windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    /// Counts one frame ending at `now` and returns the current rate.
    ///
    /// The rate updates once at least a second has passed since the window
    /// opened.
    pub fn record_frame(&mut self, now: Instant) -> u32 {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        if now.duration_since(start) >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now);
        }
        self.fps
    }

    /// Rate measured over the last completed window.
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }
}

/// Frame-paced host loop around a [`Machine`].
#[derive(Debug, Clone)]
pub struct Driver {
    machine: Machine,
    config: DriverConfig,
    keymap: KeyMap,
    control: RunControl,
    fps: FpsCounter,
    last_word: u16,
    last_pc: u16,
}

impl Driver {
    /// Wraps a machine that already has its program loaded.
    #[must_use]
    pub fn new(machine: Machine, config: DriverConfig) -> Self {
        Self {
            machine,
            keymap: KeyMap::for_layout(config.layout),
            config,
            control: RunControl::Running,
            fps: FpsCounter::default(),
            last_word: 0,
            last_pc: 0,
        }
    }

    /// The driven machine.
    #[must_use]
    pub const fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Mutable access to the driven machine, e.g. to clear the draw request
    /// after rendering.
    pub const fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Current run control.
    #[must_use]
    pub const fn control(&self) -> RunControl {
        self.control
    }

    /// Returns `true` once the driver has been stopped.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        matches!(self.control, RunControl::Stopped)
    }

    /// Driver configuration.
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Applies one host event.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::KeyDown(name) => self.key_down(&name),
            HostEvent::KeyUp(name) => {
                if let Some(key) = self.keymap.lookup(&name) {
                    self.machine.release_key(key);
                    log::debug!("released key {key}");
                }
            }
            HostEvent::TogglePause => self.toggle_pause(),
            HostEvent::Step => {
                if self.control == RunControl::Paused {
                    self.control = RunControl::StepOnce;
                }
            }
            HostEvent::Quit => self.control = RunControl::Stopped,
        }
    }

    fn key_down(&mut self, name: &str) {
        if let Some(key) = self.keymap.lookup(name) {
            if !self.machine.keypad.is_pressed(key) {
                log::debug!("pressed key {key}");
            }
            self.machine.press_key(key);
        } else if name.eq_ignore_ascii_case(PAUSE_KEY_NAME) {
            self.toggle_pause();
        } else if name == QUIT_KEY_NAME {
            self.control = RunControl::Stopped;
        } else if self.control == RunControl::Paused {
            self.control = RunControl::StepOnce;
        }
    }

    fn toggle_pause(&mut self) {
        self.control = match self.control {
            RunControl::Running => {
                log::info!("paused");
                RunControl::Paused
            }
            RunControl::Paused | RunControl::StepOnce => {
                log::info!("resumed");
                RunControl::Running
            }
            RunControl::Stopped => RunControl::Stopped,
        };
    }

    /// Runs one frame and counts it towards the frame rate.
    ///
    /// While running, executes `cycles_per_frame` cycles; with a pending
    /// single step, executes exactly one and returns to paused. A fault
    /// stops the driver.
    pub fn tick(&mut self, now: Instant) -> FrameReport {
        let budget = match self.control {
            RunControl::Running => self.config.cycles_per_frame,
            RunControl::StepOnce => {
                self.control = RunControl::Paused;
                1
            }
            RunControl::Paused | RunControl::Stopped => 0,
        };

        let mut report = FrameReport::default();
        for _ in 0..budget {
            match self.machine.cycle() {
                Ok(cycle) => {
                    report.executed += 1;
                    report.sound |= cycle.sound_triggered;
                    if let Some(word) = cycle.word() {
                        self.last_word = word;
                        self.last_pc = cycle.pc;
                        report.last_word = Some(word);
                        report.last_pc = Some(cycle.pc);
                    }
                }
                Err(fault) => {
                    log::error!("stopping after fault: {fault}");
                    self.control = RunControl::Stopped;
                    report.fault = Some(fault);
                    break;
                }
            }
        }
        report.draw_requested = self.machine.framebuffer.draw_requested();
        self.fps.record_frame(now);
        report
    }

    /// Status line in the format of the original front end's stats bar.
    #[must_use]
    pub fn stats_line(&self) -> String {
        format!(
            "FPS: {:2} Last OpCode: 0x{:4X} Program Counter(pc): {:4}",
            self.fps.fps(),
            self.last_word,
            self.last_pc
        )
    }

    /// Banner shown while paused.
    #[must_use]
    pub const fn status_banner(&self) -> Option<&'static str> {
        match self.control {
            RunControl::Paused | RunControl::StepOnce => Some("paused, press P to resume"),
            RunControl::Running | RunControl::Stopped => None,
        }
    }

    /// Releases the machine.
    #[must_use]
    pub fn into_machine(self) -> Machine {
        self.machine
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::FpsCounter;

    #[test]
    fn fps_updates_once_per_second() {
        let start = Instant::now();
        let mut counter = FpsCounter::default();
        for frame in 0..60u32 {
            let rate = counter.record_frame(start + Duration::from_millis(u64::from(frame) * 16));
            assert_eq!(rate, 0);
        }
        assert_eq!(counter.record_frame(start + Duration::from_millis(1000)), 61);
        assert_eq!(counter.record_frame(start + Duration::from_millis(1016)), 61);
    }
}
