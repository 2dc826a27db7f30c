#![forbid(unsafe_code)]

//! The displayable unit.
//!
//! # Design
//!
//! A [`Screen`] is shared between the application, the display runtime and
//! background timers, so it is always handled as a [`ScreenRef`]
//! (`Arc<dyn Screen>`) and all callbacks take `&self`. Screens that keep
//! mutable state use interior mutability.
//!
//! Modal overlays are recognised through [`Screen::kind`] rather than by
//! concrete type: the runtime asks a screen what it is, it never downcasts.
//!
//! ## Invariants
//! 1. Screen identity is pointer identity ([`same_screen`]). Two screens that
//!    compare equal by value are still different screens.
//! 2. `kind()` may change over the life of a screen (an alert's timeout can
//!    be edited); the runtime reads it once, at the moment the screen is shown.

use crate::command::{Command, CommandListener};
use crate::event::KeyCode;
use crate::graphics::Graphics;
use crate::ticker::Ticker;
use std::sync::Arc;
use std::time::Duration;

/// Shared handle to a screen.
pub type ScreenRef = Arc<dyn Screen>;

// ---------------------------------------------------------------------------
// AlertTimeout
// ---------------------------------------------------------------------------

/// How long an alert stays up before it restores the previous screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertTimeout {
    /// Stays until dismissed explicitly.
    Forever,
    /// Expires after the given delay.
    After(Duration),
}

impl AlertTimeout {
    /// Convenience constructor for a millisecond delay.
    #[must_use]
    pub const fn millis(ms: u64) -> Self {
        Self::After(Duration::from_millis(ms))
    }

    /// The expiry delay, or `None` for [`Forever`](Self::Forever).
    #[must_use]
    pub const fn delay(self) -> Option<Duration> {
        match self {
            Self::Forever => None,
            Self::After(d) => Some(d),
        }
    }
}

// ---------------------------------------------------------------------------
// ScreenKind
// ---------------------------------------------------------------------------

/// What a screen is, as far as transitions are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenKind {
    /// An ordinary application screen.
    #[default]
    Plain,
    /// A modal overlay that returns to a restore target when it closes.
    Alert(AlertTimeout),
}

impl ScreenKind {
    #[must_use]
    pub const fn is_modal_overlay(self) -> bool {
        matches!(self, Self::Alert(_))
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// One visible UI surface.
///
/// Only [`paint`](Self::paint) is required; everything else defaults to
/// "nothing to do".
pub trait Screen: Send + Sync {
    /// Modal capability query.
    fn kind(&self) -> ScreenKind {
        ScreenKind::Plain
    }

    /// Short human-readable name, used in logs.
    fn title(&self) -> Option<String> {
        None
    }

    /// Draw the screen.
    fn paint(&self, g: &mut dyn Graphics);

    fn key_pressed(&self, _key: KeyCode) {}

    fn key_released(&self, _key: KeyCode) {}

    /// Called right after the screen becomes current.
    fn show_notify(&self) {}

    /// Called right before the screen stops being current.
    fn hide_notify(&self) {}

    /// Commands currently attached to the screen.
    fn commands(&self) -> Vec<Command> {
        Vec::new()
    }

    /// Listener that receives this screen's command activations.
    fn command_listener(&self) -> Option<Arc<dyn CommandListener>> {
        None
    }

    /// Status ticker shown with this screen, if any.
    fn ticker(&self) -> Option<Arc<Ticker>> {
        None
    }
}

/// Identity comparison for screens.
///
/// Compares data pointers only; vtable pointers for the same object may
/// differ between codegen units.
#[must_use]
pub fn same_screen(a: &ScreenRef, b: &ScreenRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Log-friendly label for an optional screen.
#[must_use]
pub fn describe(screen: Option<&ScreenRef>) -> String {
    match screen {
        None => "<none>".to_string(),
        Some(s) => s.title().unwrap_or_else(|| "<untitled>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank(&'static str);

    impl Screen for Blank {
        fn title(&self) -> Option<String> {
            Some(self.0.to_string())
        }

        fn paint(&self, _g: &mut dyn Graphics) {}
    }

    #[test]
    fn identity_not_equality() {
        let a: ScreenRef = Arc::new(Blank("same"));
        let b: ScreenRef = Arc::new(Blank("same"));
        let a2 = Arc::clone(&a);
        assert!(same_screen(&a, &a2));
        assert!(!same_screen(&a, &b));
    }

    #[test]
    fn default_kind_is_plain() {
        let a: ScreenRef = Arc::new(Blank("x"));
        assert_eq!(a.kind(), ScreenKind::Plain);
        assert!(!a.kind().is_modal_overlay());
        assert!(ScreenKind::Alert(AlertTimeout::Forever).is_modal_overlay());
    }

    #[test]
    fn timeout_delay() {
        assert_eq!(AlertTimeout::Forever.delay(), None);
        assert_eq!(
            AlertTimeout::millis(1500).delay(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn describe_labels() {
        let a: ScreenRef = Arc::new(Blank("menu"));
        assert_eq!(describe(Some(&a)), "menu");
        assert_eq!(describe(None), "<none>");
    }
}
