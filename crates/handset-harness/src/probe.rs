#![forbid(unsafe_code)]

//! Configurable screens that journal what happens to them.

use crate::journal::{Journal, JournalEvent};
use handset_core::command::{Command, CommandListener};
use handset_core::event::KeyCode;
use handset_core::graphics::Graphics;
use handset_core::screen::{AlertTimeout, Screen, ScreenKind, ScreenRef, describe};
use handset_core::ticker::Ticker;
use std::sync::Arc;

/// A screen whose every notification lands in a [`Journal`].
pub struct ProbeScreen {
    name: String,
    kind: ScreenKind,
    journal: Journal,
    commands: Vec<Command>,
    listener: Option<Arc<dyn CommandListener>>,
    ticker: Option<Arc<Ticker>>,
}

impl ProbeScreen {
    #[must_use]
    pub fn builder(name: impl Into<String>, journal: &Journal) -> ProbeBuilder {
        ProbeBuilder {
            screen: ProbeScreen {
                name: name.into(),
                kind: ScreenKind::Plain,
                journal: journal.clone(),
                commands: Vec::new(),
                listener: None,
                ticker: None,
            },
        }
    }

    /// An ordinary screen.
    #[must_use]
    pub fn plain(name: impl Into<String>, journal: &Journal) -> ScreenRef {
        Self::builder(name, journal).build()
    }

    /// An alert that expires after `ms` milliseconds.
    #[must_use]
    pub fn alert(name: impl Into<String>, ms: u64, journal: &Journal) -> ScreenRef {
        Self::builder(name, journal)
            .timeout(AlertTimeout::millis(ms))
            .build()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Screen for ProbeScreen {
    fn kind(&self) -> ScreenKind {
        self.kind
    }

    fn title(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn paint(&self, g: &mut dyn Graphics) {
        self.journal.record(JournalEvent::Painted {
            screen: self.name.clone(),
        });
        g.translate(1, 1);
        g.draw_text(&self.name, 0, 0);
        if let Some(ticker) = &self.ticker {
            ticker.paint(g, 96, 12);
        }
    }

    fn key_pressed(&self, key: KeyCode) {
        self.journal.record(JournalEvent::KeyPressed {
            screen: self.name.clone(),
            key: key.raw(),
        });
    }

    fn key_released(&self, key: KeyCode) {
        self.journal.record(JournalEvent::KeyReleased {
            screen: self.name.clone(),
            key: key.raw(),
        });
    }

    fn show_notify(&self) {
        self.journal.record(JournalEvent::shown(&self.name));
    }

    fn hide_notify(&self) {
        self.journal.record(JournalEvent::hidden(&self.name));
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

/// Builder for [`ProbeScreen`].
pub struct ProbeBuilder {
    screen: ProbeScreen,
}

impl ProbeBuilder {
    /// Make the screen an alert with the given timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: AlertTimeout) -> Self {
        self.screen.kind = ScreenKind::Alert(timeout);
        self
    }

    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.screen.commands.push(command);
        self
    }

    #[must_use]
    pub fn ticker(mut self, ticker: Arc<Ticker>) -> Self {
        self.screen.ticker = Some(ticker);
        self
    }

    #[must_use]
    pub fn listener(mut self, listener: Arc<dyn CommandListener>) -> Self {
        self.screen.listener = Some(listener);
        self
    }

    /// Install a listener that journals each command it receives.
    #[must_use]
    pub fn journal_commands(mut self) -> Self {
        let journal = self.screen.journal.clone();
        self.screen.listener = Some(Arc::new(move |command: &Command, screen: &ScreenRef| {
            journal.record(JournalEvent::CommandAction {
                screen: describe(Some(screen)),
                command: command.label().to_string(),
            });
        }));
        self
    }

    #[must_use]
    pub fn build(self) -> ScreenRef {
        Arc::new(self.screen)
    }
}
