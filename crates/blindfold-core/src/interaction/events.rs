//! Input events consumed by the interaction controller.

use serde::{Deserialize, Serialize};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The interactive region of the sprite at this index.
    Sprite(usize),
    /// The bare canvas background.
    Canvas,
    /// Anything else on the page.
    Outside,
}

/// Whether an event continues to bubble to outer handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

impl Propagation {
    pub fn is_stopped(self) -> bool {
        self == Propagation::Stop
    }
}

/// Keys the editor responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
    Plus,
    Equals,
    Minus,
    Escape,
    Other,
}

impl Key {
    /// Map a browser `KeyboardEvent.key` value.
    pub fn from_browser(key: &str) -> Self {
        match key {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "+" => Key::Plus,
            "=" => Key::Equals,
            "-" => Key::Minus,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }

    /// Editing command bound to this key, if any.
    pub fn command(self) -> Option<Command> {
        match self {
            Key::Delete | Key::Backspace => Some(Command::Control(ControlAction::Delete)),
            Key::ArrowLeft => Some(Command::Control(ControlAction::RotateLeft)),
            Key::ArrowRight => Some(Command::Control(ControlAction::RotateRight)),
            Key::Plus | Key::Equals => Some(Command::Control(ControlAction::ScaleUp)),
            Key::Minus => Some(Command::Control(ControlAction::ScaleDown)),
            Key::Escape => Some(Command::Deselect),
            Key::Other => None,
        }
    }
}

/// Per-sprite control shown on the selection overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlAction {
    RotateLeft,
    RotateRight,
    ScaleUp,
    ScaleDown,
    Delete,
}

impl ControlAction {
    /// Overlay controls in display order.
    pub const ALL: [ControlAction; 5] = [
        ControlAction::RotateLeft,
        ControlAction::RotateRight,
        ControlAction::ScaleUp,
        ControlAction::ScaleDown,
        ControlAction::Delete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlAction::RotateLeft => "↺",
            ControlAction::RotateRight => "↻",
            ControlAction::ScaleUp => "+",
            ControlAction::ScaleDown => "-",
            ControlAction::Delete => "×",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ControlAction::RotateLeft => "Rotate Counterclockwise",
            ControlAction::RotateRight => "Rotate Clockwise",
            ControlAction::ScaleUp => "Scale Up",
            ControlAction::ScaleDown => "Scale Down",
            ControlAction::Delete => "Delete",
        }
    }
}

/// Resolved keyboard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Control(ControlAction),
    Deselect,
}
