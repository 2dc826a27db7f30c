#![forbid(unsafe_code)]

//! A transient modal overlay.

use crate::command::{Command, CommandListener};
use crate::graphics::Graphics;
use crate::screen::{AlertTimeout, Screen, ScreenKind};
use crate::ticker::Ticker;
use parking_lot::RwLock;
use std::sync::Arc;

/// Timeout given to alerts that do not choose one.
pub const DEFAULT_TIMEOUT: AlertTimeout = AlertTimeout::millis(2000);

/// Modal overlay with a title, body text and an optional expiry.
///
/// The display reads [`timeout`](Self::timeout) when the alert is shown;
/// changing it afterwards affects only later showings.
pub struct Alert {
    title: String,
    text: RwLock<String>,
    timeout: RwLock<AlertTimeout>,
    commands: RwLock<Vec<Command>>,
    listener: RwLock<Option<Arc<dyn CommandListener>>>,
    ticker: RwLock<Option<Arc<Ticker>>>,
}

impl Alert {
    /// Create an alert with [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: RwLock::new(String::new()),
            timeout: RwLock::new(DEFAULT_TIMEOUT),
            commands: RwLock::new(Vec::new()),
            listener: RwLock::new(None),
            ticker: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        *self.text.write() = text.into();
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: AlertTimeout) -> Self {
        *self.timeout.write() = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> AlertTimeout {
        *self.timeout.read()
    }

    pub fn set_timeout(&self, timeout: AlertTimeout) {
        *self.timeout.write() = timeout;
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.write() = text.into();
    }

    pub fn add_command(&self, command: Command) {
        let mut commands = self.commands.write();
        if !commands.contains(&command) {
            commands.push(command);
        }
    }

    pub fn remove_command(&self, command: &Command) {
        self.commands.write().retain(|c| c != command);
    }

    pub fn set_command_listener(&self, listener: Option<Arc<dyn CommandListener>>) {
        *self.listener.write() = listener;
    }

    pub fn set_ticker(&self, ticker: Option<Arc<Ticker>>) {
        *self.ticker.write() = ticker;
    }
}

impl Screen for Alert {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Alert(self.timeout())
    }

    fn title(&self) -> Option<String> {
        Some(self.title.clone())
    }

    fn paint(&self, g: &mut dyn Graphics) {
        g.draw_text(&self.title, 0, 0);
        // Body starts one text row below the title.
        g.translate(0, 1);
        g.draw_text(&self.text.read(), 0, 0);
    }

    fn commands(&self) -> Vec<Command> {
        self.commands.read().clone()
    }

    fn command_listener(&self) -> Option<Arc<dyn CommandListener>> {
        self.listener.read().clone()
    }

    fn ticker(&self) -> Option<Arc<Ticker>> {
        self.ticker.read().clone()
    }
}
