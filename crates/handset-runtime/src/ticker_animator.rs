#![forbid(unsafe_code)]

//! Ticker animation.
//!
//! One repeating task per display. Each tick looks at whatever screen is
//! current at that moment; if it carries a ticker, the ticker is stepped left
//! by the configured amount and the display repainted. Screens that are not
//! current are never touched, so a ticker only moves while it is visible.
//!
//! The cadence is work then sleep: the next tick is scheduled one interval
//! after the previous one finished. Ticks run on the scheduler, concurrently
//! with transitions on the event thread; a tick may step the ticker of a
//! screen that is being replaced, which is harmless.

use crate::display::Display;
use crate::scheduler::TimerHandle;
use handset_core::screen::describe;
use tracing::{debug, trace};

/// Start the animator for `display`.
pub(crate) fn start(display: &Display) -> TimerHandle {
    let weak = display.downgrade();
    let interval = display.config().ticker_interval;
    let step = display.config().ticker_step;
    debug!(
        interval_ms = interval.as_millis() as u64,
        step,
        "ticker animator started"
    );
    display.scheduler().schedule_repeating(interval, move || {
        if let Some(display) = weak.upgrade() {
            animate_once(&display);
        }
    })
}

/// Advance the current screen's ticker by one step and repaint.
///
/// Returns the ticker's new position, or `None` when no current screen has a
/// ticker.
pub fn animate_once(display: &Display) -> Option<i32> {
    let screen = display.current()?;
    let ticker = screen.ticker()?;
    let position = ticker.advance(display.config().ticker_step);
    trace!(screen = %describe(Some(&screen)), position, "ticker advanced");
    display.repaint();
    Some(position)
}
