#![forbid(unsafe_code)]

//! Collaborators that journal every call the display makes.

use crate::journal::{Journal, JournalEvent};
use handset_core::command::Command;
use handset_core::device::RenderSurface;
use handset_core::graphics::Graphics;
use handset_runtime::{CommandRouter, EnvironmentBridge};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ============================================================================
// Surface
// ============================================================================

#[derive(Debug)]
pub struct RecordingSurface {
    journal: Journal,
    repaints: AtomicUsize,
    scroll_up: AtomicBool,
    scroll_down: AtomicBool,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            repaints: AtomicUsize::new(0),
            scroll_up: AtomicBool::new(false),
            scroll_down: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn repaints(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }

    /// Current `(up, down)` scroll indicator state.
    #[must_use]
    pub fn scroll_indicators(&self) -> (bool, bool) {
        (
            self.scroll_up.load(Ordering::SeqCst),
            self.scroll_down.load(Ordering::SeqCst),
        )
    }
}

impl RenderSurface for RecordingSurface {
    fn repaint(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
        self.journal.record(JournalEvent::Repaint);
    }

    fn set_scroll_up(&self, active: bool) {
        self.scroll_up.store(active, Ordering::SeqCst);
        self.journal.record(JournalEvent::ScrollUp { active });
    }

    fn set_scroll_down(&self, active: bool) {
        self.scroll_down.store(active, Ordering::SeqCst);
        self.journal.record(JournalEvent::ScrollDown { active });
    }
}

// ============================================================================
// Command router
// ============================================================================

#[derive(Debug)]
pub struct RecordingCommands {
    journal: Journal,
    latest: Mutex<Option<Vec<Command>>>,
    updates: AtomicUsize,
}

impl RecordingCommands {
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            latest: Mutex::new(None),
            updates: AtomicUsize::new(0),
        }
    }

    /// Labels of the latest routable set, in the order received.
    #[must_use]
    pub fn labels(&self) -> Option<Vec<String>> {
        self.latest
            .lock()
            .as_ref()
            .map(|commands| commands.iter().map(|c| c.label().to_string()).collect())
    }

    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl CommandRouter for RecordingCommands {
    fn update_commands(&self, commands: Option<&[Command]>) {
        *self.latest.lock() = commands.map(<[Command]>::to_vec);
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.journal.record(JournalEvent::Commands {
            labels: self.labels(),
        });
    }
}

// ============================================================================
// Environment bridge
// ============================================================================

#[derive(Debug)]
pub struct RecordingBridge {
    journal: Journal,
    notifications: AtomicUsize,
}

impl RecordingBridge {
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            notifications: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }
}

impl EnvironmentBridge for RecordingBridge {
    fn notify_labels_changed(&self) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
        self.journal.record(JournalEvent::LabelsChanged);
    }
}

// ============================================================================
// Graphics
// ============================================================================

/// Graphics context that keeps a translation and logs text draws in
/// absolute coordinates.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    origin: (i32, i32),
    translations: usize,
    texts: Vec<(String, i32, i32)>,
}

impl RecordingGraphics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Number of `translate` calls received.
    #[must_use]
    pub fn translations(&self) -> usize {
        self.translations
    }

    #[must_use]
    pub fn texts(&self) -> &[(String, i32, i32)] {
        &self.texts
    }
}

impl Graphics for RecordingGraphics {
    fn translate(&mut self, dx: i32, dy: i32) {
        self.translations += 1;
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
        self.texts
            .push((text.to_string(), x + self.origin.0, y + self.origin.1));
    }
}
