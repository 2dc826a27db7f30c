#![forbid(unsafe_code)]

//! Ordered event journal shared by recorders and probe screens.

use parking_lot::Mutex;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// One observable effect of the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    Shown { screen: String },
    Hidden { screen: String },
    Repaint,
    ScrollUp { active: bool },
    ScrollDown { active: bool },
    Commands { labels: Option<Vec<String>> },
    LabelsChanged,
    KeyPressed { screen: String, key: i32 },
    KeyReleased { screen: String, key: i32 },
    Painted { screen: String },
    CommandAction { screen: String, command: String },
}

impl JournalEvent {
    /// Show and hide notifications only.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Shown { .. } | Self::Hidden { .. })
    }

    #[must_use]
    pub fn shown(screen: &str) -> Self {
        Self::Shown {
            screen: screen.to_string(),
        }
    }

    #[must_use]
    pub fn hidden(screen: &str) -> Self {
        Self::Hidden {
            screen: screen.to_string(),
        }
    }
}

/// A journal event with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub seq: u64,
    #[serde(flatten)]
    pub event: JournalEvent,
}

/// Cloneable handle to a shared event log.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: JournalEvent) {
        let mut entries = self.entries.lock();
        let seq = entries.len() as u64;
        entries.push(JournalEntry { seq, event });
    }

    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().clone()
    }

    #[must_use]
    pub fn events(&self) -> Vec<JournalEvent> {
        self.entries.lock().iter().map(|e| e.event.clone()).collect()
    }

    /// Show/hide notifications in order.
    #[must_use]
    pub fn lifecycle(&self) -> Vec<JournalEvent> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.event.is_lifecycle())
            .map(|e| e.event.clone())
            .collect()
    }

    #[must_use]
    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&JournalEvent) -> bool,
    {
        self.entries.lock().iter().filter(|e| pred(&e.event)).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// One JSON object per line.
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for entry in self.entries.lock().iter() {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn write_jsonl<W: Write>(&self, mut w: W) -> io::Result<()> {
        for entry in self.entries.lock().iter() {
            serde_json::to_writer(&mut w, entry)?;
            w.write_all(b"\n")?;
        }
        w.flush()
    }

    /// Print the journal to stderr as JSONL when `E2E_JSONL` or `CI` is set.
    pub fn dump_if_enabled(&self, test: &str) {
        if !jsonl_enabled() {
            return;
        }
        eprintln!("{}", serde_json::json!({ "test": test, "entries": self.len() }));
        let stderr = io::stderr();
        if let Err(e) = self.write_jsonl(stderr.lock()) {
            tracing::warn!(test, error = %e, "failed to dump journal");
        }
    }
}

/// True when tests should emit JSONL journals.
#[must_use]
pub fn jsonl_enabled() -> bool {
    std::env::var("E2E_JSONL").is_ok() || std::env::var("CI").is_ok()
}
