#![forbid(unsafe_code)]

//! What the display is presenting, as one replaceable value.
//!
//! # Design
//!
//! The current screen and the screen to restore after an alert are stored
//! together in a [`Presentation`], and the display keeps exactly one of those
//! in a [`PresentationCell`]. Every transition builds a new value and swaps it
//! in; readers take a snapshot. The cell's lock covers only the swap or the
//! clone, never a transition, so concurrent writers are ordered purely by
//! who stores last.
//!
//! ## Invariants
//! 1. `pending_after_alert()` is `Some` only while an alert is current.
//! 2. A snapshot is internally consistent: a reader never sees an alert
//!    paired with another transition's restore target.

use handset_core::screen::{ScreenRef, describe, same_screen};
use parking_lot::Mutex;
use std::fmt;

/// Snapshot of the screen register.
#[derive(Clone, Default)]
pub enum Presentation {
    /// Nothing has been shown yet.
    #[default]
    Empty,
    /// An ordinary screen is current.
    Screen(ScreenRef),
    /// An alert is current; `restore` is shown when it closes.
    Alert {
        alert: ScreenRef,
        restore: Option<ScreenRef>,
    },
}

impl Presentation {
    /// The visible screen.
    #[must_use]
    pub fn current(&self) -> Option<&ScreenRef> {
        match self {
            Self::Empty => None,
            Self::Screen(screen) => Some(screen),
            Self::Alert { alert, .. } => Some(alert),
        }
    }

    /// The restore target of the current alert.
    #[must_use]
    pub fn pending_after_alert(&self) -> Option<&ScreenRef> {
        match self {
            Self::Alert { restore, .. } => restore.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert { .. })
    }

    /// True when `screen` is the visible screen (identity, not equality).
    #[must_use]
    pub fn shows(&self, screen: &ScreenRef) -> bool {
        self.current().is_some_and(|current| same_screen(current, screen))
    }
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Screen(screen) => f
                .debug_tuple("Screen")
                .field(&describe(Some(screen)))
                .finish(),
            Self::Alert { alert, restore } => f
                .debug_struct("Alert")
                .field("alert", &describe(Some(alert)))
                .field("restore", &describe(restore.as_ref()))
                .finish(),
        }
    }
}

/// Single-slot holder for the register state.
#[derive(Default)]
pub(crate) struct PresentationCell {
    slot: Mutex<Presentation>,
}

impl PresentationCell {
    pub(crate) fn load(&self) -> Presentation {
        self.slot.lock().clone()
    }

    pub(crate) fn current(&self) -> Option<ScreenRef> {
        self.slot.lock().current().cloned()
    }

    /// Replace the whole value; returns what was there.
    pub(crate) fn store(&self, next: Presentation) -> Presentation {
        std::mem::replace(&mut *self.slot.lock(), next)
    }
}
