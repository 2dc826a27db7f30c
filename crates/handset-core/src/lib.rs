#![forbid(unsafe_code)]

//! Core: the types the display runtime and its collaborators agree on.
//!
//! # Role in the workspace
//! `handset-core` is the contract layer. It defines what a screen is, how
//! alerts and tickers describe themselves, what a command looks like, and the
//! narrow interfaces to the rendering surface and the device. It owns no
//! threads and does no logging; `handset-runtime` drives everything here.
//!
//! # Primary responsibilities
//! - **Screen**: the displayable unit, with a [`ScreenKind`] capability query
//!   instead of a subtype check.
//! - **Alert**: a modal overlay with an optional expiry.
//! - **Ticker**: horizontally scrolling status text with a lock scoped to the
//!   ticker's own fields.
//! - **Command**: abstract commands and the listener that receives them.
//! - **Device**: rendering surface and capability collaborators.
//!
//! [`ScreenKind`]: screen::ScreenKind

pub mod alert;
pub mod command;
pub mod device;
pub mod event;
pub mod graphics;
pub mod screen;
pub mod ticker;

pub use alert::Alert;
pub use command::{Command, CommandKind, CommandListener};
pub use device::{DeviceCapabilities, DeviceProfile, RenderSurface};
pub use event::{GameAction, KeyCode};
pub use graphics::Graphics;
pub use screen::{AlertTimeout, Screen, ScreenKind, ScreenRef, same_screen};
pub use ticker::Ticker;
