//! Interactive wildfire map controller.
//!
//! Owns the loaded data and every piece of UI state, and turns control events
//! into render diffs. Frontends (the web viewer, the CLI) only apply the
//! diffs and forward events.

pub mod config;
pub mod controls;
pub mod data;
pub mod map;

pub use config::*;
pub use controls::*;
pub use data::*;
pub use map::*;
