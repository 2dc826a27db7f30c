#![forbid(unsafe_code)]

//! Test harness for the handset display runtime.
//!
//! # Role in the workspace
//! `handset-harness` wires a [`handset_runtime::Display`] to recording
//! collaborators and a manual clock so integration tests can drive exact
//! interleavings of application transitions and timer firings, then assert
//! on the resulting [`Journal`].
//!
//! # Pieces
//! - [`Journal`]: ordered, serialisable log of everything the display did
//!   to its collaborators and screens. Dumps as JSONL.
//! - [`recorders`]: surface, command router, environment bridge and
//!   graphics implementations that write to a journal.
//! - [`ProbeScreen`]: a configurable screen that journals its lifecycle.
//! - [`DisplayFixture`]: all of the above around one manually clocked
//!   display.

pub mod fixture;
pub mod journal;
pub mod probe;
pub mod recorders;

pub use fixture::DisplayFixture;
pub use journal::{Journal, JournalEntry, JournalEvent};
pub use probe::{ProbeBuilder, ProbeScreen};
pub use recorders::{RecordingBridge, RecordingCommands, RecordingGraphics, RecordingSurface};

use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`. Output goes through the test
/// writer so it is captured per test.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
