use serde::Deserialize;

/// Keyboard keys the carousel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    /// Signed index step for this direction.
    pub fn step(self) -> isize {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

/// Input routed into the carousel, either from the control socket or from tests.
///
/// On the wire each command is a JSON object tagged by `command`, e.g.
/// `{"command":"click","index":14}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Interaction {
    PointerEnter,
    PointerLeave,
    TouchStart,
    /// The user scrolled the container by hand to `offset`.
    Scrolled { offset: f64 },
    Click { index: usize },
    Key { key: Key },
    /// Carousel-level prev/next buttons.
    Navigate { direction: Direction },
    /// Prev/next buttons inside the detail overlay.
    OverlayNavigate { direction: Direction },
    /// Close button or backdrop.
    Close,
    Inquire,
    Resized { width: f64 },
}

impl From<Key> for Interaction {
    fn from(key: Key) -> Self {
        Interaction::Key { key }
    }
}
