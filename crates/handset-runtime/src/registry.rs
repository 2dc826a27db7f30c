#![forbid(unsafe_code)]

//! One display per application instance.
//!
//! Applications never construct a [`Display`] directly; they ask the
//! registry for theirs. The first request for an [`AppId`] builds the display
//! through the registry's factory, and every later request returns the same
//! handle until the application is removed.
//!
//! [`EnvironmentBridge`] is the hook through which a display tells the
//! surrounding environment (device skin, command bar) that the routable
//! command labels changed.

use crate::display::{BuildError, Display};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Notified when the set of routable commands changes.
pub trait EnvironmentBridge: Send + Sync {
    fn notify_labels_changed(&self);
}

/// Bridge for environments that draw no command labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBridge;

impl EnvironmentBridge for NoopBridge {
    fn notify_labels_changed(&self) {}
}

/// Opaque application instance identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(u64);

impl AppId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app#{}", self.0)
    }
}

type DisplayFactory = Box<dyn Fn(AppId) -> Result<Display, BuildError> + Send + Sync>;

/// Per-application cell; empty until the first successful build.
type Slot = Arc<Mutex<Option<Display>>>;

/// Lazily built displays keyed by application.
pub struct DisplayRegistry {
    factory: DisplayFactory,
    slots: Mutex<HashMap<AppId, Slot>>,
}

impl DisplayRegistry {
    /// Registry building displays through `factory`.
    ///
    /// The factory may look up other applications' displays in this
    /// registry. Asking for the display it is currently building deadlocks.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(AppId) -> Result<Display, BuildError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The display for `app`, building it on first use.
    ///
    /// Only `app`'s slot is locked while building, so two racing first
    /// requests still yield a single display and other applications are not
    /// blocked. A failed build leaves no entry behind.
    pub fn display_for(&self, app: AppId) -> Result<Display, BuildError> {
        let slot = Arc::clone(self.slots.lock().entry(app).or_default());
        let mut built = slot.lock();
        if let Some(display) = built.as_ref() {
            return Ok(display.clone());
        }
        match (self.factory)(app) {
            Ok(display) => {
                debug!(%app, "display created");
                *built = Some(display.clone());
                Ok(display)
            }
            Err(e) => {
                drop(built);
                self.discard_empty(app, &slot);
                Err(e)
            }
        }
    }

    /// Drop `app`'s slot if it is still the empty one we tried to fill.
    fn discard_empty(&self, app: AppId, slot: &Slot) {
        let mut slots = self.slots.lock();
        let empty = slots.get(&app).is_some_and(|current| {
            // try_lock: a racing builder may hold the slot; leave it alone.
            Arc::ptr_eq(current, slot) && current.try_lock().is_some_and(|d| d.is_none())
        });
        if empty {
            slots.remove(&app);
        }
    }

    fn built(&self) -> Vec<(AppId, Display)> {
        let slots: Vec<(AppId, Slot)> = self
            .slots
            .lock()
            .iter()
            .map(|(app, slot)| (*app, Arc::clone(slot)))
            .collect();
        slots
            .into_iter()
            .filter_map(|(app, slot)| slot.lock().clone().map(|d| (app, d)))
            .collect()
    }

    /// The display for `app`, if one was built.
    #[must_use]
    pub fn get(&self, app: AppId) -> Option<Display> {
        let slot = Arc::clone(self.slots.lock().get(&app)?);
        slot.lock().clone()
    }

    /// Forget `app`'s display. Its timers stop once the last handle drops.
    pub fn remove(&self, app: AppId) -> Option<Display> {
        let slot = self.slots.lock().remove(&app)?;
        let removed = slot.lock().take();
        if removed.is_some() {
            debug!(%app, "display removed");
        }
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.built().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for DisplayRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut apps: Vec<AppId> = self.built().into_iter().map(|(app, _)| app).collect();
        apps.sort_unstable();
        f.debug_struct("DisplayRegistry").field("apps", &apps).finish()
    }
}
