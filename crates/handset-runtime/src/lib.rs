#![forbid(unsafe_code)]

//! Runtime: the display's screen register and the background work around it.
//!
//! # Role in the workspace
//! `handset-runtime` decides which single screen is visible. It mediates
//! between the screen the application asks for and transient alerts, runs
//! alert expiry and ticker animation in the background, and routes input,
//! paint and command events to whatever screen is current.
//!
//! # Primary responsibilities
//! - **Display**: the screen register and its transition operations.
//! - **Scheduler**: a delayed-task queue (threaded or manually clocked) that
//!   hosts alert expiry and ticker animation.
//! - **EventRouter**: key, paint and command forwarding.
//! - **DisplayRegistry**: one display per application instance.
//!
//! # Concurrency
//! The register's state is a single slot that is replaced wholesale on each
//! transition; no lock is held across a transition or a collaborator call.
//! Timer callbacks and the event thread therefore race exactly as the last
//! writer wins: a timer that fires after the application moved on still
//! restores the screen it captured.

pub mod alert_expiry;
pub mod commands;
pub mod config;
pub mod display;
pub mod presentation;
pub mod registry;
pub mod router;
pub mod scheduler;
pub mod ticker_animator;

#[cfg(test)]
mod testing;

pub use commands::{CommandManager, CommandRouter};
pub use config::{ConfigError, DisplayConfig};
pub use display::{BuildError, Display, DisplayBuilder, WeakDisplay};
pub use presentation::Presentation;
pub use registry::{AppId, DisplayRegistry, EnvironmentBridge, NoopBridge};
pub use router::EventRouter;
pub use scheduler::{ManualClock, Scheduler, TimerHandle};
