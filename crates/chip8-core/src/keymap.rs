//! Host key-name to logical key mapping tables.

use std::collections::HashMap;

use crate::Key;

/// Layout used by the original SDL front end: the left-hand 4×4 block of a
/// QWERTY keyboard numbered row by row, with `v` wrapping round to `0`.
const ORIGINAL_KEYMAP: [(char, u8); 16] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0x4),
    ('q', 0x5),
    ('w', 0x6),
    ('e', 0x7),
    ('r', 0x8),
    ('a', 0x9),
    ('s', 0xA),
    ('d', 0xB),
    ('f', 0xC),
    ('z', 0xD),
    ('x', 0xE),
    ('c', 0xF),
    ('v', 0x0),
];

/// COSMAC VIP hexadecimal keypad laid over the same 4×4 block.
const CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x0),
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('z', 0xA),
    ('c', 0xB),
    ('4', 0xC),
    ('r', 0xD),
    ('f', 0xE),
    ('v', 0xF),
];

/// Named key-map presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum KeyLayout {
    /// Row-by-row numbering inherited from the original front end.
    #[default]
    Original,
    /// COSMAC VIP keypad arrangement.
    Conventional,
}

impl KeyLayout {
    /// Parses a layout name (`original` or `conventional`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "original" => Some(Self::Original),
            "conventional" | "cosmac" => Some(Self::Conventional),
            _ => None,
        }
    }
}

/// Case-insensitive lookup from single-character host key names to keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<char, Key>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::original()
    }
}

impl KeyMap {
    /// Builds the map for a preset layout.
    #[must_use]
    pub fn for_layout(layout: KeyLayout) -> Self {
        let table = match layout {
            KeyLayout::Original => &ORIGINAL_KEYMAP,
            KeyLayout::Conventional => &CONVENTIONAL_KEYMAP,
        };
        Self {
            bindings: table
                .iter()
                .map(|(name, index)| (*name, Key::from_low_nibble(*index)))
                .collect(),
        }
    }

    /// The original front end's layout.
    #[must_use]
    pub fn original() -> Self {
        Self::for_layout(KeyLayout::Original)
    }

    /// The COSMAC VIP layout.
    #[must_use]
    pub fn conventional() -> Self {
        Self::for_layout(KeyLayout::Conventional)
    }

    /// Resolves a host key name. Only single-character names are mapped.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Key> {
        let mut chars = name.chars();
        let first = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        self.bindings.get(&first.to_ascii_lowercase()).copied()
    }

    /// Host key name bound to `key`.
    #[must_use]
    pub fn name_of(&self, key: Key) -> Option<char> {
        self.bindings
            .iter()
            .find_map(|(name, bound)| (*bound == key).then_some(*name))
    }
}
