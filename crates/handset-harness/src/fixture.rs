#![forbid(unsafe_code)]

//! A manually clocked display wired to recording collaborators.

use crate::journal::Journal;
use crate::probe::ProbeScreen;
use crate::recorders::{RecordingBridge, RecordingCommands, RecordingSurface};
use handset_core::device::{DeviceCapabilities, DeviceProfile};
use handset_core::screen::{ScreenRef, describe};
use handset_runtime::{BuildError, Display, DisplayConfig, ManualClock, Scheduler};
use std::sync::Arc;
use std::time::Duration;

/// Everything a transition test needs, sharing one [`Journal`].
pub struct DisplayFixture {
    pub display: Display,
    pub clock: ManualClock,
    pub journal: Journal,
    pub surface: Arc<RecordingSurface>,
    pub commands: Arc<RecordingCommands>,
    pub bridge: Arc<RecordingBridge>,
}

impl DisplayFixture {
    /// Default configuration with the ticker animator disabled.
    pub fn new() -> Result<Self, BuildError> {
        Self::with_config(DisplayConfig::default().without_ticker())
    }

    pub fn with_config(config: DisplayConfig) -> Result<Self, BuildError> {
        Self::with_device(config, Arc::new(DeviceProfile::default()))
    }

    pub fn with_device(
        config: DisplayConfig,
        device: Arc<dyn DeviceCapabilities>,
    ) -> Result<Self, BuildError> {
        let journal = Journal::new();
        let surface = Arc::new(RecordingSurface::new(journal.clone()));
        let commands = Arc::new(RecordingCommands::new(journal.clone()));
        let bridge = Arc::new(RecordingBridge::new(journal.clone()));
        let (scheduler, clock) = Scheduler::manual();
        let display = Display::builder(surface.clone())
            .device(device)
            .commands(commands.clone())
            .bridge(bridge.clone())
            .config(config)
            .scheduler(scheduler)
            .build()?;
        Ok(Self {
            display,
            clock,
            journal,
            surface,
            commands,
            bridge,
        })
    }

    /// Advance the manual clock by `ms`; returns how many tasks fired.
    pub fn advance_ms(&self, ms: u64) -> usize {
        self.clock.advance(Duration::from_millis(ms))
    }

    #[must_use]
    pub fn plain(&self, name: &str) -> ScreenRef {
        ProbeScreen::plain(name, &self.journal)
    }

    #[must_use]
    pub fn alert(&self, name: &str, ms: u64) -> ScreenRef {
        ProbeScreen::alert(name, ms, &self.journal)
    }

    /// Title of the current screen, `"<none>"` when empty.
    #[must_use]
    pub fn current_name(&self) -> String {
        describe(self.display.current().as_ref())
    }

    /// Title of the pending restore target, `"<none>"` when empty.
    #[must_use]
    pub fn pending_name(&self) -> String {
        describe(self.display.pending_after_alert().as_ref())
    }
}
