#![forbid(unsafe_code)]

//! Command routing collaborator.
//!
//! The display pushes the current screen's commands here on every
//! transition. Presentation (softkey labels, menus) reads them back from the
//! router; the display only guarantees the set is fresh.

use handset_core::command::Command;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Receives the routable command set.
pub trait CommandRouter: Send + Sync {
    /// Replace the routable commands; `None` means no screen is current.
    fn update_commands(&self, commands: Option<&[Command]>);
}

/// Default [`CommandRouter`]: remembers the latest set, ordered by priority.
#[derive(Debug, Default)]
pub struct CommandManager {
    commands: RwLock<Option<Vec<Command>>>,
    updates: AtomicU64,
}

impl CommandManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest routable commands, most important first.
    #[must_use]
    pub fn commands(&self) -> Option<Vec<Command>> {
        self.commands.read().clone()
    }

    /// Number of updates received so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// First routable command with the given label.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<Command> {
        self.commands
            .read()
            .as_ref()?
            .iter()
            .find(|c| c.label() == label)
            .cloned()
    }
}

impl CommandRouter for CommandManager {
    fn update_commands(&self, commands: Option<&[Command]>) {
        let sorted = commands.map(|commands| {
            let mut sorted = commands.to_vec();
            // Stable: equal priorities keep the screen's order.
            sorted.sort_by_key(Command::priority);
            sorted
        });
        *self.commands.write() = sorted;
        self.updates.fetch_add(1, Ordering::Relaxed);
    }
}
