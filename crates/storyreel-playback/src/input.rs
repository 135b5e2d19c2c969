//! Keyboard mapping for an open playback session.

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Manual next.
    ArrowRight,
    /// Previous.
    ArrowLeft,
    /// Close the viewer.
    Escape,
    /// Anything else; ignored.
    Other,
}

impl From<&str> for Key {
    /// Parses a DOM-style key name (`"ArrowRight"`, `"Escape"`, ...).
    fn from(name: &str) -> Self {
        match name {
            "ArrowRight" => Self::ArrowRight,
            "ArrowLeft" => Self::ArrowLeft,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Navigation a key asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Manual next.
    Next,
    /// Previous.
    Previous,
    /// Close.
    Close,
}

impl Key {
    /// The action bound to this key, if any.
    #[must_use]
    pub fn action(self) -> Option<KeyAction> {
        match self {
            Self::ArrowRight => Some(KeyAction::Next),
            Self::ArrowLeft => Some(KeyAction::Previous),
            Self::Escape => Some(KeyAction::Close),
            Self::Other => None,
        }
    }
}
