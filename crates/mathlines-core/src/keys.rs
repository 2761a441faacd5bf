//! Platform-agnostic key model.
//!
//! Platform layers convert native keyboard events into [`KeyCombo`] so the
//! event router can decide which keystrokes are structural edits.

use smol_str::SmolStr;

/// Key values for keyboard input.
///
/// Only the keys that drive structural edits are named; everything else is
/// either a `Character` or `Unidentified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    Backspace,
    Enter,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }
}

/// Parse a DOM `KeyboardEvent.key` string.
pub fn parse_key(key: &str) -> Key {
    match key {
        "Enter" => Key::Enter,
        "Backspace" => Key::Backspace,
        s if s.chars().count() == 1 => Key::character(s),
        _ => Key::Unidentified,
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const ALT: Self = Self {
        ctrl: false,
        alt: true,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// True when Shift, Ctrl or Meta is held. Alt is not counted.
    pub fn blocks_line_break(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// A key together with the modifiers held while it was pressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::SHIFT,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::CTRL,
        }
    }

    /// Enter with no Shift/Ctrl/Meta: splits off a new line.
    pub fn is_line_break(&self) -> bool {
        self.key == Key::Enter && !self.modifiers.blocks_line_break()
    }

    /// Plain Backspace, candidate for removing an empty line.
    pub fn is_plain_backspace(&self) -> bool {
        self.key == Key::Backspace
            && !self.modifiers.ctrl
            && !self.modifiers.meta
            && !self.modifiers.alt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("Enter"), Key::Enter);
        assert_eq!(parse_key("Backspace"), Key::Backspace);
        assert_eq!(parse_key("x"), Key::character("x"));
        assert_eq!(parse_key("√"), Key::character("√"));
        assert_eq!(parse_key("F13"), Key::Unidentified);
        assert_eq!(parse_key("Delete"), Key::Unidentified);
    }

    #[test]
    fn test_line_break_modifiers() {
        assert!(KeyCombo::new(Key::Enter).is_line_break());
        assert!(KeyCombo::with_modifiers(Key::Enter, Modifiers::ALT).is_line_break());
        assert!(!KeyCombo::shift(Key::Enter).is_line_break());
        assert!(!KeyCombo::ctrl(Key::Enter).is_line_break());
        assert!(!KeyCombo::with_modifiers(Key::Enter, Modifiers::META).is_line_break());
        assert!(!KeyCombo::new(Key::character("x")).is_line_break());
    }

    #[test]
    fn test_plain_backspace() {
        assert!(KeyCombo::new(Key::Backspace).is_plain_backspace());
        assert!(KeyCombo::shift(Key::Backspace).is_plain_backspace());
        assert!(!KeyCombo::ctrl(Key::Backspace).is_plain_backspace());
        assert!(!KeyCombo::new(Key::Unidentified).is_plain_backspace());
    }
}
