//! Keyboard state (boot protocol layout)
//!
//! Report layout (8 bytes, report ID 2):
//! ```text
//! Byte 0: Modifier bitfield (usage 0xE0 + n sets bit n)
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 held key usage codes
//! ```

use heapless::Vec;

/// Report ID of the keyboard report
pub const KEYBOARD_REPORT_ID: u8 = 2;

/// Keyboard report body size in bytes
pub const KEYBOARD_REPORT_LEN: usize = 8;

/// Simultaneously held non-modifier keys
pub const MAX_HELD_KEYS: usize = 6;

/// First modifier usage (Left Control)
const MODIFIER_FIRST: u8 = 0xE0;

/// Last modifier usage (Right GUI)
const MODIFIER_LAST: u8 = 0xE7;

/// Set of currently held keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardState {
    modifiers: u8,
    keys: Vec<u8, MAX_HELD_KEYS>,
}

fn modifier_bit(usage: u8) -> Option<u8> {
    (MODIFIER_FIRST..=MODIFIER_LAST)
        .contains(&usage)
        .then(|| 1 << (usage - MODIFIER_FIRST))
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> u8 {
        self.modifiers
    }

    /// Held non-modifier keys, in press order
    pub fn keys(&self) -> &[u8] {
        &self.keys
    }

    /// True when nothing is held
    pub fn is_empty(&self) -> bool {
        self.modifiers == 0 && self.keys.is_empty()
    }

    /// Hold a key
    ///
    /// Returns `true` if the state changed. Usage 0, repeated presses and
    /// presses beyond six held keys change nothing.
    pub fn press(&mut self, usage: u8) -> bool {
        if usage == 0 {
            return false;
        }
        if let Some(bit) = modifier_bit(usage) {
            let before = self.modifiers;
            self.modifiers |= bit;
            return before != self.modifiers;
        }
        if self.keys.contains(&usage) {
            return false;
        }
        self.keys.push(usage).is_ok()
    }

    /// Release a key
    ///
    /// Returns `true` if the state changed.
    pub fn release(&mut self, usage: u8) -> bool {
        if let Some(bit) = modifier_bit(usage) {
            let before = self.modifiers;
            self.modifiers &= !bit;
            return before != self.modifiers;
        }
        let before = self.keys.len();
        self.keys.retain(|&held| held != usage);
        before != self.keys.len()
    }

    /// Release every key and modifier
    pub fn release_all(&mut self) -> bool {
        let changed = !self.is_empty();
        self.modifiers = 0;
        self.keys.clear();
        changed
    }

    /// Encode the report body
    pub fn to_report(&self) -> [u8; KEYBOARD_REPORT_LEN] {
        let mut report = [0u8; KEYBOARD_REPORT_LEN];
        report[0] = self.modifiers;
        report[2..2 + self.keys.len()].copy_from_slice(&self.keys);
        report
    }
}
