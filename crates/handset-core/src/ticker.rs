#![forbid(unsafe_code)]

//! Horizontally scrolling status text.
//!
//! # Design
//!
//! A [`Ticker`] holds a signed `text_position` that only ever decreases (the
//! text moves left) and a pending reset request. The display's animator owns
//! the motion: each tick it calls [`Ticker::advance`], which applies any
//! pending reset and then steps the position, all under the ticker's own
//! lock. Nothing else takes that lock.
//!
//! Readers (painting, tests) load the fields without locking. Both fields are
//! atomics, so a reader sees either the value before or after an advance,
//! never a torn one.
//!
//! ## Invariants
//! 1. Between resets, `text_position` is monotonically non-increasing.
//! 2. A reset requested before an advance is applied *before* that advance's
//!    decrement: after `request_reset(p)` and one `advance(s)`, the position
//!    is `p - s`.
//! 3. An advance consumes the reset request; the next advance does not
//!    re-apply it.

use crate::graphics::Graphics;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicI32, Ordering};
use unicode_width::UnicodeWidthStr;

/// Sentinel stored in the reset slot when no reset is pending.
const NO_RESET: i32 = i32::MIN;

/// Scrolling status text attached to a screen.
#[derive(Debug)]
pub struct Ticker {
    text: RwLock<String>,
    position: AtomicI32,
    reset_request: AtomicI32,
    /// Held only across the reset-then-decrement in [`advance`](Self::advance).
    step_lock: Mutex<()>,
}

impl Ticker {
    /// Create a ticker at position 0 with no pending reset.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            position: AtomicI32::new(0),
            reset_request: AtomicI32::new(NO_RESET),
            step_lock: Mutex::new(()),
        }
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    /// Replace the text and restart scrolling from position 0 on the next tick.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.write() = text.into();
        self.request_reset(0);
    }

    /// Current scroll offset. Unlocked read.
    #[must_use]
    pub fn text_position(&self) -> i32 {
        self.position.load(Ordering::Acquire)
    }

    /// Ask the animator to snap to `to` on its next tick.
    ///
    /// `i32::MIN` is reserved and is clamped to `i32::MIN + 1`.
    pub fn request_reset(&self, to: i32) {
        self.reset_request
            .store(to.max(NO_RESET + 1), Ordering::Release);
    }

    /// The pending reset target, if any.
    #[must_use]
    pub fn reset_request(&self) -> Option<i32> {
        match self.reset_request.load(Ordering::Acquire) {
            NO_RESET => None,
            to => Some(to),
        }
    }

    /// One animation step: apply a pending reset, then move left by `step`.
    ///
    /// Returns the new position.
    pub fn advance(&self, step: i32) -> i32 {
        let _guard = self.step_lock.lock();
        let reset = self.reset_request.swap(NO_RESET, Ordering::AcqRel);
        if reset != NO_RESET {
            self.position.store(reset, Ordering::Release);
        }
        let next = self.position.load(Ordering::Acquire).wrapping_sub(step);
        self.position.store(next, Ordering::Release);
        next
    }

    /// Display width of the text in columns.
    #[must_use]
    pub fn text_width(&self) -> usize {
        self.text.read().width()
    }

    /// Column at which the text starts for a strip `viewport` columns wide.
    ///
    /// Position 0 places the text just past the right edge; as the position
    /// falls the text slides left, and once it has fully left the strip it
    /// re-enters from the right.
    #[must_use]
    pub fn visible_start(&self, viewport: u32) -> i32 {
        let viewport = i64::from(viewport);
        let period = (self.text_width() as i64 + viewport).max(1);
        let travelled = (-i64::from(self.text_position())).rem_euclid(period);
        // Within [-text_width, viewport], which always fits in i32 for any
        // text that fits in memory alongside a sane viewport.
        (viewport - travelled).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// Draw the text into a strip `viewport` columns wide at row `y`.
    pub fn paint(&self, g: &mut dyn Graphics, viewport: u32, y: i32) {
        let x = self.visible_start(viewport);
        g.draw_text(&self.text.read(), x, y);
    }
}
