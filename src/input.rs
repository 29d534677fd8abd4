//! Input subsystem.
//!
//! `raw` turns crossterm events into primitive key/resize/wheel events, and `service` maps those
//! onto dashboard actions through a small modal state machine.

pub mod raw;
pub mod service;

pub use service::{
    spawn_input_thread, InputAction, InputService, InputState, InputStateMachine, ScrollDirection,
    YearBound,
};
