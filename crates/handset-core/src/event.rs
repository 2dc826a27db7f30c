#![forbid(unsafe_code)]

//! Key codes and game actions.
//!
//! A [`KeyCode`] is whatever integer the device reports for a physical key.
//! Printable keypad keys use their character value (`'0'..='9'`, `'*'`,
//! `'#'`); soft and navigation keys use negative, device-specific values.
//! A [`GameAction`] is the portable meaning of a key, resolved through the
//! device's mapping (see [`DeviceCapabilities`]).
//!
//! [`DeviceCapabilities`]: crate::device::DeviceCapabilities

use std::fmt;

// ---------------------------------------------------------------------------
// KeyCode
// ---------------------------------------------------------------------------

/// A raw device key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const NUM0: Self = Self('0' as i32);
    pub const NUM1: Self = Self('1' as i32);
    pub const NUM2: Self = Self('2' as i32);
    pub const NUM3: Self = Self('3' as i32);
    pub const NUM4: Self = Self('4' as i32);
    pub const NUM5: Self = Self('5' as i32);
    pub const NUM6: Self = Self('6' as i32);
    pub const NUM7: Self = Self('7' as i32);
    pub const NUM8: Self = Self('8' as i32);
    pub const NUM9: Self = Self('9' as i32);
    pub const STAR: Self = Self('*' as i32);
    pub const POUND: Self = Self('#' as i32);

    /// Create a key code from the raw device value.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw device value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True for the twelve ITU keypad keys.
    #[must_use]
    pub const fn is_keypad(self) -> bool {
        matches!(self.0, 0x30..=0x39 | 0x2A | 0x23)
    }
}

impl From<i32> for KeyCode {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_keypad() {
            // Keypad values are ASCII by construction.
            write!(f, "{}", self.0 as u8 as char)
        } else {
            write!(f, "key({})", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// GameAction
// ---------------------------------------------------------------------------

/// Portable meaning of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    Up,
    Down,
    Left,
    Right,
    Fire,
    GameA,
    GameB,
    GameC,
    GameD,
}

impl GameAction {
    /// Every action, in numeric code order.
    pub const ALL: [Self; 9] = [
        Self::Up,
        Self::Left,
        Self::Right,
        Self::Down,
        Self::Fire,
        Self::GameA,
        Self::GameB,
        Self::GameC,
        Self::GameD,
    ];

    /// Numeric action code used by applications.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Left => 2,
            Self::Right => 5,
            Self::Down => 6,
            Self::Fire => 8,
            Self::GameA => 9,
            Self::GameB => 10,
            Self::GameC => 11,
            Self::GameD => 12,
        }
    }

    /// Inverse of [`code`](Self::code).
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Up),
            2 => Some(Self::Left),
            5 => Some(Self::Right),
            6 => Some(Self::Down),
            8 => Some(Self::Fire),
            9 => Some(Self::GameA),
            10 => Some(Self::GameB),
            11 => Some(Self::GameC),
            12 => Some(Self::GameD),
            _ => None,
        }
    }

    /// True for the four directional actions.
    #[must_use]
    pub const fn is_directional(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}
