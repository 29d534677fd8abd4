//! UI renderer trait
//!
//! This module defines the `UIRenderer` trait for drawing the dashboard and managing terminal
//! lifecycle hooks such as initialization and cleanup.

use crate::error::Result;
use crate::pipeline::Snapshot;
use crate::render::ui::state::ViewState;

/// Core trait for dashboard rendering
pub trait UIRenderer {
    /// Draw the controls from `view_state` and the summaries from `snapshot`
    fn render(&mut self, view_state: &ViewState, snapshot: &Snapshot<'_>) -> Result<()>;

    /// Enter raw mode and the alternate screen
    fn initialize(&mut self) -> Result<()>;

    /// Restore terminal state
    fn cleanup(&mut self) -> Result<()>;

    /// Get current terminal dimensions
    fn get_terminal_size(&self) -> Result<(u16, u16)>; // (width, height)
}
