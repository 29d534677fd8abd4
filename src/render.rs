//! Rendering subsystem: the action-to-state loop helpers and the terminal dashboard.

pub mod service;
pub mod ui;

pub use service::{ActionOutcome, RenderLoopState};
