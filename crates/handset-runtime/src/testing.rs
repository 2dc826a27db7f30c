//! Shared fakes for unit tests.

use crate::config::DisplayConfig;
use crate::display::Display;
use crate::scheduler::{ManualClock, Scheduler};
use handset_core::command::{Command, CommandListener};
use handset_core::device::RenderSurface;
use handset_core::event::KeyCode;
use handset_core::graphics::Graphics;
use handset_core::screen::{AlertTimeout, Screen, ScreenKind, ScreenRef};
use handset_core::ticker::Ticker;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Counters {
    repaints: AtomicUsize,
    pub(crate) scroll_up: AtomicBool,
    pub(crate) scroll_down: AtomicBool,
}

impl Counters {
    pub(crate) fn repaints(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }
}

impl RenderSurface for Counters {
    fn repaint(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
    }

    fn set_scroll_up(&self, active: bool) {
        self.scroll_up.store(active, Ordering::SeqCst);
    }

    fn set_scroll_down(&self, active: bool) {
        self.scroll_down.store(active, Ordering::SeqCst);
    }
}

pub(crate) fn manual_display() -> (Display, ManualClock, Arc<Counters>) {
    manual_display_with(DisplayConfig::default().without_ticker())
}

pub(crate) fn manual_display_with(config: DisplayConfig) -> (Display, ManualClock, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let (scheduler, clock) = Scheduler::manual();
    let display = Display::builder(counters.clone())
        .config(config)
        .scheduler(scheduler)
        .build()
        .expect("manual display");
    (display, clock, counters)
}

#[derive(Default)]
pub(crate) struct ProbeState {
    shows: AtomicUsize,
    hides: AtomicUsize,
    paints: AtomicUsize,
    pub(crate) keys: Mutex<Vec<(bool, KeyCode)>>,
}

struct ProbeScreen {
    name: &'static str,
    kind: ScreenKind,
    ticker: Option<Arc<Ticker>>,
    commands: Vec<Command>,
    listener: Option<Arc<dyn CommandListener>>,
    state: Arc<ProbeState>,
}

impl Screen for ProbeScreen {
    fn kind(&self) -> ScreenKind {
        self.kind
    }

    fn title(&self) -> Option<String> {
        Some(self.name.to_string())
    }

    fn paint(&self, g: &mut dyn Graphics) {
        self.state.paints.fetch_add(1, Ordering::SeqCst);
        g.translate(2, 3);
        g.draw_text(self.name, 0, 0);
    }

    fn key_pressed(&self, key: KeyCode) {
        self.state.keys.lock().push((true, key));
    }

    fn key_released(&self, key: KeyCode) {
        self.state.keys.lock().push((false, key));
    }

    fn show_notify(&self) {
        self.state.shows.fetch_add(1, Ordering::SeqCst);
    }

    fn hide_notify(&self) {
        self.state.hides.fetch_add(1, Ordering::SeqCst);
    }

    fn commands(&self) -> Vec<Command> {
        self.commands.clone()
    }

    fn command_listener(&self) -> Option<Arc<dyn CommandListener>> {
        self.listener.clone()
    }

    fn ticker(&self) -> Option<Arc<Ticker>> {
        self.ticker.clone()
    }
}

/// A screen plus handles to what happened to it.
pub(crate) struct Probe {
    screen: ScreenRef,
    pub(crate) state: Arc<ProbeState>,
}

pub(crate) struct ProbeBuilder {
    name: &'static str,
    kind: ScreenKind,
    ticker: Option<Arc<Ticker>>,
    commands: Vec<Command>,
    listener: Option<Arc<dyn CommandListener>>,
}

impl ProbeBuilder {
    pub(crate) fn ticker(mut self, ticker: Arc<Ticker>) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub(crate) fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub(crate) fn listener(mut self, listener: Arc<dyn CommandListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub(crate) fn build(self) -> Probe {
        let state = Arc::new(ProbeState::default());
        let screen: ScreenRef = Arc::new(ProbeScreen {
            name: self.name,
            kind: self.kind,
            ticker: self.ticker,
            commands: self.commands,
            listener: self.listener,
            state: Arc::clone(&state),
        });
        Probe { screen, state }
    }
}

impl Probe {
    pub(crate) fn builder(name: &'static str, kind: ScreenKind) -> ProbeBuilder {
        ProbeBuilder {
            name,
            kind,
            ticker: None,
            commands: Vec::new(),
            listener: None,
        }
    }

    pub(crate) fn plain(name: &'static str) -> Self {
        Self::builder(name, ScreenKind::Plain).build()
    }

    pub(crate) fn alert(name: &'static str, ms: u64) -> Self {
        Self::builder(name, ScreenKind::Alert(AlertTimeout::millis(ms))).build()
    }

    pub(crate) fn screen(&self) -> ScreenRef {
        Arc::clone(&self.screen)
    }

    pub(crate) fn shows(&self) -> usize {
        self.state.shows.load(Ordering::SeqCst)
    }

    pub(crate) fn hides(&self) -> usize {
        self.state.hides.load(Ordering::SeqCst)
    }

    pub(crate) fn paints(&self) -> usize {
        self.state.paints.load(Ordering::SeqCst)
    }
}

/// Graphics that records text draws and tracks translation.
#[derive(Debug, Default)]
pub(crate) struct TextLog {
    pub(crate) origin: (i32, i32),
    pub(crate) drawn: Vec<(String, i32, i32)>,
}

impl Graphics for TextLog {
    fn translate(&mut self, dx: i32, dy: i32) {
        self.origin.0 += dx;
        self.origin.1 += dy;
    }

    fn translate_x(&self) -> i32 {
        self.origin.0
    }

    fn translate_y(&self) -> i32 {
        self.origin.1
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        self.drawn
            .push((text.to_string(), x + self.origin.0, y + self.origin.1));
    }
}
