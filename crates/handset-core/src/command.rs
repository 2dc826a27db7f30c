#![forbid(unsafe_code)]

//! Abstract commands and the listeners that receive them.
//!
//! A [`Command`] carries only semantics (label, kind, priority). How it is
//! presented (softkey, menu entry) is the command bar's business; which
//! screen receives it is the runtime's.

use crate::screen::ScreenRef;
use std::fmt;

/// Semantic category of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Screen,
    Back,
    Cancel,
    Ok,
    Help,
    Stop,
    Exit,
    Item,
}

impl CommandKind {
    /// Stable lowercase name, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Back => "back",
            Self::Cancel => "cancel",
            Self::Ok => "ok",
            Self::Help => "help",
            Self::Stop => "stop",
            Self::Exit => "exit",
            Self::Item => "item",
        }
    }

    /// True for kinds that conventionally leave the current screen.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Back | Self::Cancel | Self::Stop | Self::Exit)
    }
}

/// An abstract command attached to a screen.
///
/// Lower `priority` values are more important.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    label: String,
    kind: CommandKind,
    priority: i32,
}

impl Command {
    /// Create a command.
    #[must_use]
    pub fn new(label: impl Into<String>, kind: CommandKind, priority: i32) -> Self {
        Self {
            label: label.into(),
            kind,
            priority,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.kind.as_str())
    }
}

/// Receives command activations for the screen it is registered on.
///
/// Called on the event thread; implementations may call back into the
/// display (for example to switch screens).
pub trait CommandListener: Send + Sync {
    fn command_action(&self, command: &Command, screen: &ScreenRef);
}

impl<F> CommandListener for F
where
    F: Fn(&Command, &ScreenRef) + Send + Sync,
{
    fn command_action(&self, command: &Command, screen: &ScreenRef) {
        self(command, screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let cmd = Command::new("Back", CommandKind::Back, 1);
        assert_eq!(cmd.label(), "Back");
        assert_eq!(cmd.kind(), CommandKind::Back);
        assert_eq!(cmd.priority(), 1);
        assert_eq!(cmd.to_string(), "Back (back)");
    }

    #[test]
    fn negative_kinds() {
        assert!(CommandKind::Exit.is_negative());
        assert!(CommandKind::Cancel.is_negative());
        assert!(!CommandKind::Ok.is_negative());
        assert!(!CommandKind::Screen.is_negative());
    }
}
