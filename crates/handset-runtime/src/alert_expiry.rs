#![forbid(unsafe_code)]

//! Alert expiry timers.
//!
//! Each finite alert gets its own one-shot timer that, when it fires, makes
//! the restore target captured at scheduling time current again. The timer
//! does not check whether its alert is still showing: by then the register
//! may hold a newer alert or a screen the application chose, and the timer
//! overrides either. Earlier timers are never cancelled when a later alert
//! arrives, so with overlapping alerts the last timer to fire wins.
//!
//! The closure holds only a [`WeakDisplay`]; a timer that outlives its
//! display does nothing.

use crate::display::{Display, WeakDisplay};
use crate::scheduler::TimerHandle;
use handset_core::screen::{ScreenRef, describe};
use std::time::Duration;
use tracing::debug;

/// Schedule the restoration of `restore` after `delay`.
pub(crate) fn schedule(display: &Display, delay: Duration, restore: Option<ScreenRef>) -> TimerHandle {
    let weak = display.downgrade();
    debug!(
        delay_ms = delay.as_millis() as u64,
        restore = %describe(restore.as_ref()),
        "alert expiry scheduled"
    );
    display
        .scheduler()
        .schedule_once(delay, move || expire(&weak, restore))
}

fn expire(display: &WeakDisplay, restore: Option<ScreenRef>) {
    let Some(display) = display.upgrade() else {
        return;
    };
    debug!(restore = %describe(restore.as_ref()), "alert expired");
    display.set_current(restore);
}
