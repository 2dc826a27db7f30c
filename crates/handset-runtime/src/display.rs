#![forbid(unsafe_code)]

//! The screen register: which single screen is visible.
//!
//! # Design
//!
//! [`Display`] is a cheap, cloneable handle. It is shared by the event thread,
//! the alert expiry timers and the ticker animator, all of which may change
//! or read the current screen at any moment.
//!
//! A transition is a sequence of collaborator calls around one store into the
//! [`Presentation`] slot. The slot is the only synchronised piece; nothing
//! waits for in-flight timers and nothing serialises whole transitions. Two
//! overlapping transitions therefore interleave, and the one that stores last
//! decides what is current.
//!
//! # Transition order
//!
//! For an ordinary screen `S` replacing `P`:
//! 1. `P.hide_notify()`
//! 2. store `S` as current
//! 3. `S.show_notify()`
//! 4. clear both scroll indicators
//! 5. refresh the routable commands (and tell the environment)
//! 6. request a repaint of `S`
//!
//! For an alert `A` shown over `P` the same path runs up to step 1, then
//! [`Display::set_current_alert`] takes over with `P` as the restore target:
//! store `A` with its restore target, `A.show_notify()`, refresh commands,
//! repaint, and, unless the alert never expires, schedule one expiry timer
//! that will restore `P`.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Empty transition | `set_current(None)` | Ignored |
//! | Stale repaint | `repaint_screen(s)` after `s` was replaced | Dropped |
//! | Overlapping alerts | Second alert before the first expires | Both timers stay live; the later firing wins |
//! | Early dismissal | `clear_alert()` before expiry | Restores now; the timer still fires later |

use crate::alert_expiry;
use crate::commands::{CommandManager, CommandRouter};
use crate::config::{ConfigError, DisplayConfig};
use crate::presentation::{Presentation, PresentationCell};
use crate::registry::{EnvironmentBridge, NoopBridge};
use crate::router::EventRouter;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::ticker_animator;
use handset_core::device::{
    BorderStyle, ColorSpecifier, DeviceCapabilities, DeviceProfile, ImageType, RenderSurface,
};
use handset_core::event::{GameAction, KeyCode};
use handset_core::screen::{AlertTimeout, ScreenKind, ScreenRef, describe, same_screen};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;
use tracing::{debug, trace};

type SerialCall = Box<dyn FnOnce() + Send>;

pub(crate) struct DisplayInner {
    state: PresentationCell,
    surface: Arc<dyn RenderSurface>,
    device: Arc<dyn DeviceCapabilities>,
    commands: Arc<dyn CommandRouter>,
    bridge: Arc<dyn EnvironmentBridge>,
    config: DisplayConfig,
    scheduler: Scheduler,
    serial_calls: Mutex<VecDeque<SerialCall>>,
    ticker_task: OnceLock<TimerHandle>,
}

// ============================================================================
// Display
// ============================================================================

/// Handle to one display's screen register.
#[derive(Clone)]
pub struct Display {
    inner: Arc<DisplayInner>,
}

/// Non-owning handle held by background tasks.
#[derive(Clone)]
pub struct WeakDisplay {
    inner: Weak<DisplayInner>,
}

impl WeakDisplay {
    #[must_use]
    pub fn upgrade(&self) -> Option<Display> {
        self.inner.upgrade().map(|inner| Display { inner })
    }
}

impl Display {
    /// Start building a display that renders to `surface`.
    #[must_use]
    pub fn builder(surface: Arc<dyn RenderSurface>) -> DisplayBuilder {
        DisplayBuilder::new(surface)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakDisplay {
        WeakDisplay {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// True when both handles refer to the same display.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Event router bound to this display.
    #[must_use]
    pub fn router(&self) -> EventRouter {
        EventRouter::new(self.clone())
    }

    #[must_use]
    pub fn config(&self) -> &DisplayConfig {
        &self.inner.config
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    /// Handle of the ticker animator task, when animation is enabled.
    #[must_use]
    pub fn ticker_task(&self) -> Option<&TimerHandle> {
        self.inner.ticker_task.get()
    }

    // ------------------------------------------------------------------
    // Register state
    // ------------------------------------------------------------------

    /// The visible screen. No side effects.
    #[must_use]
    pub fn current(&self) -> Option<ScreenRef> {
        self.inner.state.current()
    }

    /// Consistent snapshot of the current screen and alert restore target.
    #[must_use]
    pub fn presentation(&self) -> Presentation {
        self.inner.state.load()
    }

    /// Screen that will be restored when the current alert closes.
    #[must_use]
    pub fn pending_after_alert(&self) -> Option<ScreenRef> {
        self.inner.state.load().pending_after_alert().cloned()
    }

    /// True iff `screen` is the current screen (identity comparison).
    #[must_use]
    pub fn is_shown(&self, screen: &ScreenRef) -> bool {
        self.current()
            .is_some_and(|current| same_screen(&current, screen))
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Make `next` the current screen. `None` is ignored.
    ///
    /// Alerts are shown over the screen that was current on entry, which
    /// becomes their restore target.
    pub fn set_current(&self, next: Option<ScreenRef>) {
        let Some(next) = next else {
            trace!("ignoring transition to no screen");
            return;
        };

        let previous = self.inner.state.current();
        if let Some(previous) = &previous {
            previous.hide_notify();
        }

        if next.kind().is_modal_overlay() {
            self.set_current_alert(next, previous);
            return;
        }

        debug!(
            from = %describe(previous.as_ref()),
            to = %describe(Some(&next)),
            "screen transition"
        );
        self.inner.state.store(Presentation::Screen(Arc::clone(&next)));
        next.show_notify();
        self.set_scroll_up(false);
        self.set_scroll_down(false);
        self.update_commands();
        self.repaint_screen(&next);
    }

    /// Show `alert` and restore `restore` when it expires or is cleared.
    ///
    /// The previously current screen is not hidden here; [`set_current`]
    /// does that before delegating. Any expiry timer already running for an
    /// earlier alert is left alone. Returns the new expiry timer, if the
    /// alert expires at all. A screen that does not report itself as an
    /// alert is shown as a modal that never expires.
    ///
    /// [`set_current`]: Self::set_current
    pub fn set_current_alert(
        &self,
        alert: ScreenRef,
        restore: Option<ScreenRef>,
    ) -> Option<TimerHandle> {
        let timeout = match alert.kind() {
            ScreenKind::Alert(timeout) => timeout,
            ScreenKind::Plain => AlertTimeout::Forever,
        };
        debug!(
            alert = %describe(Some(&alert)),
            restore = %describe(restore.as_ref()),
            ?timeout,
            "alert shown"
        );

        self.inner.state.store(Presentation::Alert {
            alert: Arc::clone(&alert),
            restore: restore.clone(),
        });
        alert.show_notify();
        self.update_commands();
        self.repaint_screen(&alert);

        timeout
            .delay()
            .map(|delay| alert_expiry::schedule(self, delay, restore))
    }

    /// Dismiss the current alert now and restore its target.
    ///
    /// The alert's expiry timer is not cancelled; it still fires later and
    /// restores the same target again.
    pub fn clear_alert(&self) {
        let restore = self.pending_after_alert();
        debug!(restore = %describe(restore.as_ref()), "alert cleared");
        self.set_current(restore);
    }

    // ------------------------------------------------------------------
    // Repaint and commands
    // ------------------------------------------------------------------

    /// Repaint the current screen, if any.
    pub fn repaint(&self) {
        if let Some(current) = self.current() {
            self.repaint_screen(&current);
        }
    }

    /// Repaint `screen` only if it is still current.
    pub fn repaint_screen(&self, screen: &ScreenRef) {
        if self.is_shown(screen) {
            self.inner.surface.repaint();
        } else {
            trace!(screen = %describe(Some(screen)), "dropping stale repaint");
        }
    }

    /// Push the current screen's commands to the router.
    ///
    /// The environment is told labels changed and the whole surface is
    /// repainted, even when no screen is current, because the command bar
    /// is drawn outside any screen.
    pub fn update_commands(&self) {
        let commands = self.current().map(|screen| screen.commands());
        trace!(
            count = commands.as_ref().map_or(0, Vec::len),
            "routable commands updated"
        );
        self.inner.commands.update_commands(commands.as_deref());
        self.inner.bridge.notify_labels_changed();
        self.inner.surface.repaint();
    }

    pub fn set_scroll_up(&self, active: bool) {
        self.inner.surface.set_scroll_up(active);
    }

    pub fn set_scroll_down(&self, active: bool) {
        self.inner.surface.set_scroll_down(active);
    }

    // ------------------------------------------------------------------
    // Serial calls
    // ------------------------------------------------------------------

    /// Queue `f` to run on the event thread after the next paint.
    pub fn call_serially<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.serial_calls.lock().push_back(Box::new(f));
    }

    /// Run the calls queued so far, in order. Calls queued while running
    /// wait for the next round.
    pub(crate) fn run_serial_calls(&self) -> usize {
        let batch: Vec<SerialCall> = self.inner.serial_calls.lock().drain(..).collect();
        let count = batch.len();
        for call in batch {
            call();
        }
        count
    }

    // ------------------------------------------------------------------
    // Device capabilities
    // ------------------------------------------------------------------

    #[must_use]
    pub fn is_color(&self) -> bool {
        self.inner.device.is_color()
    }

    #[must_use]
    pub fn num_colors(&self) -> u32 {
        self.inner.device.num_colors()
    }

    #[must_use]
    pub fn num_alpha_levels(&self) -> u32 {
        self.inner.device.num_alpha_levels()
    }

    #[must_use]
    pub fn color(&self, specifier: ColorSpecifier) -> u32 {
        self.inner.device.color(specifier)
    }

    #[must_use]
    pub fn border_style(&self, highlighted: bool) -> BorderStyle {
        self.inner.device.border_style(highlighted)
    }

    #[must_use]
    pub fn best_image_width(&self, image: ImageType) -> u32 {
        self.inner.device.best_image_size(image).0
    }

    #[must_use]
    pub fn best_image_height(&self, image: ImageType) -> u32 {
        self.inner.device.best_image_size(image).1
    }

    pub fn flash_backlight(&self, duration: Duration) -> bool {
        self.inner.device.flash_backlight(duration)
    }

    pub fn vibrate(&self, duration: Duration) -> bool {
        self.inner.device.vibrate(duration)
    }

    #[must_use]
    pub fn game_action(&self, key: KeyCode) -> Option<GameAction> {
        self.inner.device.game_action(key)
    }

    #[must_use]
    pub fn key_code(&self, action: GameAction) -> Option<KeyCode> {
        self.inner.device.key_code(action)
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("presentation", &self.presentation())
            .field("scheduler", &self.inner.scheduler)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Why a display could not be built.
#[derive(Debug)]
pub enum BuildError {
    /// The scheduler worker thread could not be started.
    Spawn(io::Error),
    /// The configuration failed validation.
    Config(Vec<ConfigError>),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to start display scheduler: {e}"),
            Self::Config(errors) => {
                write!(f, "invalid display configuration:")?;
                for e in errors {
                    write!(f, " {e};")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Config(errors) => errors.first().map(|e| e as _),
        }
    }
}

impl From<io::Error> for BuildError {
    fn from(e: io::Error) -> Self {
        Self::Spawn(e)
    }
}

/// Collects collaborators for a [`Display`].
pub struct DisplayBuilder {
    surface: Arc<dyn RenderSurface>,
    device: Option<Arc<dyn DeviceCapabilities>>,
    commands: Option<Arc<dyn CommandRouter>>,
    bridge: Option<Arc<dyn EnvironmentBridge>>,
    config: DisplayConfig,
    scheduler: Option<Scheduler>,
}

impl DisplayBuilder {
    fn new(surface: Arc<dyn RenderSurface>) -> Self {
        Self {
            surface,
            device: None,
            commands: None,
            bridge: None,
            config: DisplayConfig::default(),
            scheduler: None,
        }
    }

    /// Capability table; defaults to [`DeviceProfile::default`].
    #[must_use]
    pub fn device(mut self, device: Arc<dyn DeviceCapabilities>) -> Self {
        self.device = Some(device);
        self
    }

    /// Command router; defaults to a fresh [`CommandManager`].
    #[must_use]
    pub fn commands(mut self, commands: Arc<dyn CommandRouter>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Environment hook; defaults to [`NoopBridge`].
    #[must_use]
    pub fn bridge(mut self, bridge: Arc<dyn EnvironmentBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    #[must_use]
    pub fn config(mut self, config: DisplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing scheduler (for example a manual one) instead of
    /// spawning a worker thread.
    #[must_use]
    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Validate the configuration, start the scheduler and, if enabled, the
    /// ticker animator.
    pub fn build(self) -> Result<Display, BuildError> {
        self.config.validate().map_err(BuildError::Config)?;
        let scheduler = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Scheduler::spawn(&self.config.timer_thread_name)?,
        };

        let display = Display {
            inner: Arc::new(DisplayInner {
                state: PresentationCell::default(),
                surface: self.surface,
                device: self
                    .device
                    .unwrap_or_else(|| Arc::new(DeviceProfile::default())),
                commands: self
                    .commands
                    .unwrap_or_else(|| Arc::new(CommandManager::new())),
                bridge: self.bridge.unwrap_or_else(|| Arc::new(NoopBridge)),
                config: self.config,
                scheduler,
                serial_calls: Mutex::new(VecDeque::new()),
                ticker_task: OnceLock::new(),
            }),
        };

        let animate_tickers = display.config().animate_tickers;
        if animate_tickers {
            let handle = ticker_animator::start(&display);
            let _ = display.inner.ticker_task.set(handle);
        }
        let manual_clock = display.scheduler().is_manual();
        debug!(animate_tickers, manual_clock, "display built");
        Ok(display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Counters, Probe, manual_display};

    #[test]
    fn empty_transition_is_ignored() {
        let (display, _clock, _counters) = manual_display();
        display.set_current(None);
        assert!(display.current().is_none());

        let s = Probe::plain("s");
        display.set_current(Some(s.screen()));
        display.set_current(None);
        assert!(display.is_shown(&s.screen()));
        assert_eq!(s.hides(), 0);
    }

    #[test]
    fn plain_transition_hides_then_shows() {
        let (display, _clock, counters) = manual_display();
        let a = Probe::plain("a");
        let b = Probe::plain("b");
        display.set_current(Some(a.screen()));
        display.set_current(Some(b.screen()));
        assert_eq!(a.shows(), 1);
        assert_eq!(a.hides(), 1);
        assert_eq!(b.shows(), 1);
        assert!(display.is_shown(&b.screen()));
        assert!(!display.is_shown(&a.screen()));
        assert!(counters.repaints() > 0);
    }

    #[test]
    fn stale_repaint_is_dropped() {
        let (display, _clock, counters) = manual_display();
        let a = Probe::plain("a");
        let b = Probe::plain("b");
        display.set_current(Some(a.screen()));
        display.set_current(Some(b.screen()));
        let before = counters.repaints();
        display.repaint_screen(&a.screen());
        assert_eq!(counters.repaints(), before);
        display.repaint_screen(&b.screen());
        assert_eq!(counters.repaints(), before + 1);
    }

    #[test]
    fn repaint_without_current_is_noop() {
        let (display, _clock, counters) = manual_display();
        display.repaint();
        assert_eq!(counters.repaints(), 0);
    }

    #[test]
    fn plain_screen_as_alert_never_expires() {
        let (display, clock, _counters) = manual_display();
        let s = Probe::plain("s");
        let m = Probe::plain("modal");
        display.set_current(Some(s.screen()));
        assert!(display.set_current_alert(m.screen(), Some(s.screen())).is_none());
        clock.advance(Duration::from_secs(60));
        assert!(display.is_shown(&m.screen()));
    }

    #[test]
    fn unbounded_alert_timeout_behaves_like_forever() {
        let (display, clock, _counters) = manual_display();
        let s = Probe::plain("s");
        let a = Probe::builder("a", ScreenKind::Alert(AlertTimeout::After(Duration::MAX))).build();
        display.set_current(Some(s.screen()));
        display.set_current(Some(a.screen()));
        assert!(display.is_shown(&a.screen()));
        assert!(display.pending_after_alert().is_some());
        assert_eq!(display.scheduler().pending(), 0);
        assert_eq!(clock.advance(Duration::from_secs(86_400)), 0);
        assert!(display.is_shown(&a.screen()));

        display.clear_alert();
        assert!(display.is_shown(&s.screen()));
    }

    #[test]
    fn build_starts_ticker_animator_when_enabled() {
        let surface = Arc::new(Counters::default());
        let (scheduler, _clock) = Scheduler::manual();
        let display = Display::builder(surface)
            .scheduler(scheduler)
            .build()
            .expect("build");
        let ticker = display.ticker_task().expect("animator started");
        assert!(ticker.is_pending());
        assert_eq!(display.scheduler().pending(), 1);
    }

    #[test]
    fn oversized_ticker_interval_is_rejected_at_build() {
        let surface = Arc::new(Counters::default());
        let (scheduler, _clock) = Scheduler::manual();
        let err = Display::builder(surface)
            .config(DisplayConfig::default().with_ticker_interval(Duration::MAX))
            .scheduler(scheduler)
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::Config(ref e) if e[0].field == "ticker_interval"));
    }

    #[test]
    fn serial_calls_run_in_order_once() {
        let (display, _clock, _counters) = manual_display();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let log = Arc::clone(&log);
            display.call_serially(move || log.lock().push(i));
        }
        assert_eq!(display.run_serial_calls(), 3);
        assert_eq!(display.run_serial_calls(), 0);
        assert_eq!(*log.lock(), [0, 1, 2]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let surface = Arc::new(Counters::default());
        let (scheduler, _clock) = Scheduler::manual();
        let err = Display::builder(surface)
            .config(DisplayConfig::default().with_ticker_step(0))
            .scheduler(scheduler)
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::Config(ref e) if e.len() == 1));
        assert!(err.to_string().contains("ticker_step"));
    }

    #[test]
    fn capability_passthroughs_use_device() {
        let surface = Arc::new(Counters::default());
        let (scheduler, _clock) = Scheduler::manual();
        let display = Display::builder(surface)
            .device(Arc::new(DeviceProfile::color_handset()))
            .scheduler(scheduler)
            .build()
            .expect("build");
        assert!(display.is_color());
        assert_eq!(display.num_colors(), 65_536);
        assert_eq!(display.num_alpha_levels(), 256);
        assert_eq!(display.border_style(true), BorderStyle::Dotted);
        assert_eq!(display.best_image_width(ImageType::Alert), 48);
        assert_eq!(display.best_image_height(ImageType::ListElement), 16);
        assert!(display.vibrate(Duration::from_millis(200)));
        assert_eq!(display.game_action(KeyCode::NUM8), Some(GameAction::Down));
        assert_eq!(display.key_code(GameAction::Fire), Some(KeyCode::NUM5));
        assert_eq!(display.color(ColorSpecifier::Border), 0x0080_8080);
    }
}
