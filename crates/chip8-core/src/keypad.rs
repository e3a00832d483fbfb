//! Sixteen-key hexadecimal keypad.

use std::fmt;

use thiserror::Error;

/// Number of logical keys.
pub const KEY_COUNT: usize = 16;

/// Rejected key index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum KeyError {
    /// Key indices run from `0x0` to `0xF`.
    #[error("key index {0:#04x} is outside 0x0..=0xF")]
    OutOfRange(u8),
}

/// One of the sixteen logical keys, `0x0..=0xF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Key(u8);

impl Key {
    /// Validates a key index.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::OutOfRange`] for values above `0xF`.
    pub const fn new(index: u8) -> Result<Self, KeyError> {
        if (index as usize) < KEY_COUNT {
            Ok(Self(index))
        } else {
            Err(KeyError::OutOfRange(index))
        }
    }

    /// Selects a key by the low nibble of `value`, as `Ex9E`/`ExA1` do.
    #[must_use]
    pub const fn from_low_nibble(value: u8) -> Self {
        Self(value & 0x0F)
    }

    /// Returns the key index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// All keys in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..KEY_COUNT as u8).map(Self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl TryFrom<u8> for Key {
    type Error = KeyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Pressed/released state of every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    /// Marks a key as held down. Returns `true` when it was previously up.
    pub const fn press(&mut self, key: Key) -> bool {
        let was_up = !self.pressed[key.0 as usize];
        self.pressed[key.0 as usize] = true;
        was_up
    }

    /// Marks a key as released. Returns `true` when it was previously down.
    pub const fn release(&mut self, key: Key) -> bool {
        let was_down = self.pressed[key.0 as usize];
        self.pressed[key.0 as usize] = false;
        was_down
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub const fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key.0 as usize]
    }

    /// Keys currently held down, ascending.
    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        Key::all().filter(|key| self.is_pressed(*key))
    }

    /// Releases every key.
    pub fn release_all(&mut self) {
        self.pressed = [false; KEY_COUNT];
    }
}
