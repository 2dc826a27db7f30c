#![forbid(unsafe_code)]

//! Event routing from the device to the current screen.
//!
//! The device's event thread owns an [`EventRouter`] and calls it for key,
//! paint and command events. Each event is delivered to whichever screen is
//! current when the event is handled; nothing is delivered when no screen is
//! current.

use crate::display::Display;
use handset_core::command::Command;
use handset_core::event::KeyCode;
use handset_core::graphics::{Graphics, reset_translation};
use handset_core::screen::{ScreenRef, describe};
use tracing::trace;

/// Forwards device events to the display's current screen.
#[derive(Clone, Debug)]
pub struct EventRouter {
    display: Display,
}

impl EventRouter {
    #[must_use]
    pub fn new(display: Display) -> Self {
        Self { display }
    }

    #[must_use]
    pub fn display(&self) -> &Display {
        &self.display
    }

    #[must_use]
    pub fn current(&self) -> Option<ScreenRef> {
        self.display.current()
    }

    pub fn set_current(&self, screen: Option<ScreenRef>) {
        self.display.set_current(screen);
    }

    pub fn update_commands(&self) {
        self.display.update_commands();
    }

    pub fn key_pressed(&self, key: KeyCode) {
        if let Some(screen) = self.display.current() {
            screen.key_pressed(key);
        }
    }

    pub fn key_released(&self, key: KeyCode) {
        if let Some(screen) = self.display.current() {
            screen.key_released(key);
        }
    }

    /// Paint the current screen, then run queued serial calls.
    ///
    /// The graphics translation is back at the origin afterwards, whatever
    /// the screen did to it.
    pub fn paint(&self, g: &mut dyn Graphics) {
        if let Some(screen) = self.display.current() {
            screen.paint(g);
            reset_translation(g);
        }
        self.service_serial_calls();
    }

    /// Deliver `command` to the current screen's listener, if it has one.
    pub fn command_action(&self, command: &Command) {
        let Some(screen) = self.display.current() else {
            trace!(%command, "command dropped: no current screen");
            return;
        };
        let Some(listener) = screen.command_listener() else {
            trace!(%command, screen = %describe(Some(&screen)), "command dropped: no listener");
            return;
        };
        listener.command_action(command, &screen);
    }

    /// Run the serial calls queued so far; returns how many ran.
    pub fn service_serial_calls(&self) -> usize {
        self.display.run_serial_calls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Probe, TextLog, manual_display};
    use handset_core::command::CommandKind;
    use handset_core::screen::{ScreenKind, same_screen};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn keys_reach_current_screen_only() {
        let (display, _clock, _) = manual_display();
        let router = display.router();
        router.key_pressed(KeyCode::NUM1);

        let a = Probe::plain("a");
        let b = Probe::plain("b");
        router.set_current(Some(a.screen()));
        router.key_pressed(KeyCode::NUM2);
        router.set_current(Some(b.screen()));
        router.key_released(KeyCode::NUM2);

        assert_eq!(*a.state.keys.lock(), [(true, KeyCode::NUM2)]);
        assert_eq!(*b.state.keys.lock(), [(false, KeyCode::NUM2)]);
    }

    #[test]
    fn paint_resets_translation_and_runs_serial_calls() {
        let (display, _clock, _) = manual_display();
        let router = display.router();
        let s = Probe::plain("s");
        router.set_current(Some(s.screen()));

        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        display.call_serially(move || *flag.lock() = true);

        let mut g = TextLog::default();
        router.paint(&mut g);
        assert_eq!(s.paints(), 1);
        assert_eq!(g.origin, (0, 0));
        assert_eq!(g.drawn, [("s".to_string(), 2, 3)]);
        assert!(*ran.lock());
    }

    #[test]
    fn paint_without_screen_still_services_calls() {
        let (display, _clock, _) = manual_display();
        display.call_serially(|| {});
        let mut g = TextLog::default();
        display.router().paint(&mut g);
        assert!(g.drawn.is_empty());
        assert_eq!(display.router().service_serial_calls(), 0);
    }

    #[test]
    fn command_goes_to_listener_with_screen() {
        let (display, _clock, _) = manual_display();
        let seen: Arc<Mutex<Vec<(String, ScreenRef)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ok = Command::new("OK", CommandKind::Ok, 1);
        let s = Probe::builder("s", ScreenKind::Plain)
            .command(ok.clone())
            .listener(Arc::new(move |c: &Command, screen: &ScreenRef| {
                sink.lock().push((c.label().to_string(), Arc::clone(screen)));
            }))
            .build();

        let router = display.router();
        router.command_action(&ok);
        router.set_current(Some(s.screen()));
        router.command_action(&ok);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "OK");
        assert!(same_screen(&seen[0].1, &s.screen()));
    }

    #[test]
    fn command_without_listener_is_dropped() {
        let (display, _clock, _) = manual_display();
        display.set_current(Some(Probe::plain("s").screen()));
        display
            .router()
            .command_action(&Command::new("Back", CommandKind::Back, 1));
    }
}
