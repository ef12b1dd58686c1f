#![forbid(unsafe_code)]

//! Remote-control key events and the logical actions derived from them.
//!
//! A ten-foot interface is driven by a small vocabulary: four arrows, a
//! select key, a back key, and four color buttons. Hosts feed raw key
//! identifiers (DOM `KeyboardEvent.key` strings, or vendor remote codes)
//! through [`KeyCode::from_web_key`]; the engine consumes [`NavAction`]s.
//!
//! # Invariants
//! 1. Every [`KeyCode`] maps to at most one [`NavAction`]; unrecognized
//!    keys map to none and are ignored upstream.
//! 2. [`Direction::opposite`] is an involution.
//! 3. A direction's axis matches its `is_horizontal`/`is_vertical` flags.

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// KeyCode
// ---------------------------------------------------------------------------

/// Canonical key identity, normalized across keyboards and TV remotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
    Backspace,
    /// Red color button (LG: `ColorF0RED`, generic: `F1`).
    ColorRed,
    /// Green color button (LG: `ColorF1GREEN`, generic: `F2`).
    ColorGreen,
    /// Yellow color button (LG: `ColorF2YELLOW`, generic: `F3`).
    ColorYellow,
    /// Blue color button (LG: `ColorF3BLUE`, generic: `F4`).
    ColorBlue,
    /// A printable character not otherwise classified.
    Char(char),
    /// Anything the host reported that we do not recognize.
    Unidentified,
}

impl KeyCode {
    /// Decode a host key identifier (DOM `KeyboardEvent.key` or vendor
    /// remote code) into a canonical key.
    ///
    /// The color-button names cover LG webOS Magic Remote codes plus the
    /// `F1`–`F4` aliases emulators report for the same physical buttons.
    #[must_use]
    pub fn from_web_key(key: &str) -> Self {
        match key {
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "Enter" => Self::Enter,
            " " | "Space" => Self::Space,
            "Escape" => Self::Escape,
            "Backspace" => Self::Backspace,
            "F1" | "ColorF0RED" => Self::ColorRed,
            "F2" | "ColorF1GREEN" => Self::ColorGreen,
            "F3" | "ColorF2YELLOW" => Self::ColorYellow,
            "F4" | "ColorF3BLUE" => Self::ColorBlue,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Unidentified,
                }
            }
        }
    }
}

bitflags! {
    /// Keyboard modifier state accompanying a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const META  = 1 << 3;
    }
}

/// A single key press as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Key event with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::plain(code)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Navigation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Cardinal direction for focus movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The axis this direction moves along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }

    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Returns true for horizontal directions.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Whether this direction steps backward (-1) in an ordered list.
    #[must_use]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

// ---------------------------------------------------------------------------
// NavAction
// ---------------------------------------------------------------------------

/// A TV-remote color button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorButton {
    Red,
    Green,
    Yellow,
    Blue,
}

/// Logical action derived from a key event.
///
/// `Move` enters the directional resolver; the rest never do. Color
/// buttons are application-level toggles the engine surfaces to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    Move(Direction),
    Select,
    Back,
    Color(ColorButton),
}

impl NavAction {
    /// Translate a key event into a logical action, if it has one.
    #[must_use]
    pub fn from_key(event: KeyEvent) -> Option<Self> {
        match event.code {
            KeyCode::Up => Some(Self::Move(Direction::Up)),
            KeyCode::Down => Some(Self::Move(Direction::Down)),
            KeyCode::Left => Some(Self::Move(Direction::Left)),
            KeyCode::Right => Some(Self::Move(Direction::Right)),
            KeyCode::Enter | KeyCode::Space => Some(Self::Select),
            KeyCode::Escape | KeyCode::Backspace => Some(Self::Back),
            KeyCode::ColorRed => Some(Self::Color(ColorButton::Red)),
            KeyCode::ColorGreen => Some(Self::Color(ColorButton::Green)),
            KeyCode::ColorYellow => Some(Self::Color(ColorButton::Yellow)),
            KeyCode::ColorBlue => Some(Self::Color(ColorButton::Blue)),
            KeyCode::Char(_) | KeyCode::Unidentified => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
