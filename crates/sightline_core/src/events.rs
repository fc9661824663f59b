//! Platform-neutral input events
//!
//! Hosts translate their native key and touch events into these types before
//! handing them to the engine. Only the keys the roving-focus controller
//! understands get their own variant; everything else is `Key::Other`.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A key press relevant to list navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Tab,
    /// A character-producing key
    Char(char),
    /// Any key the engine does not interpret
    Other,
}

impl Key {
    /// Normalize host input: a literal space character is the Space key
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(' ') => Key::Space,
            other => other,
        }
    }
}

/// Modifier keys held during a key press
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS, Win on Windows
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether a command-style modifier is held (shift does not count)
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A key-down event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key: key.normalized(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The printable character for type-ahead, if this press produces one.
    ///
    /// Control characters and presses with a command modifier are not
    /// printable.
    pub fn printable_char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !c.is_control() && !c.is_whitespace() && !self.modifiers.has_command() => {
                Some(c)
            }
            _ => None,
        }
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        KeyEvent::new(key)
    }
}

/// A single touch contact position
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub position: Point,
}

impl TouchPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
        }
    }
}
