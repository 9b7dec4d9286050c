//! Application-level orchestration.
//!
//! The controller owns the dashboard state and is its only writer. Network chains
//! (`actions`) and the poll timer (`poll`) feed it through channels; UI and headless
//! layers only send commands and read snapshots.

mod actions;
mod controller;
mod dashboard;
mod poll;

pub(crate) use controller::{run_controller, UiCommand};
pub use poll::PollTimer;
