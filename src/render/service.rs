//! Render coordination helpers.
//!
//! [`RenderLoopState`] applies input actions to the [`ViewState`] and tells the render loop
//! what has to happen next: nothing beyond a redraw, a fresh snapshot, an export, or shutdown.

use crate::filter::FilterCriteria;
use crate::input::{InputAction, ScrollDirection};
use crate::render::ui::state::{Focus, ViewState};

/// What the render loop must do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Controls or scroll position changed; redraw the current snapshot
    Redraw,
    /// Filter criteria changed; recompute the snapshot before drawing
    Recompute,
    /// Write the current view to disk
    Export,
    Quit,
}

/// Tracks the criteria the current snapshot was computed from.
#[derive(Debug, Default)]
pub struct RenderLoopState {
    applied: FilterCriteria,
}

impl RenderLoopState {
    pub fn new(applied: FilterCriteria) -> Self {
        Self { applied }
    }

    /// Criteria behind the snapshot on screen
    pub fn applied(&self) -> &FilterCriteria {
        &self.applied
    }

    /// Apply `action` to `view_state`.
    ///
    /// `preview_len` is the number of preview rows in the current snapshot, used to bound
    /// scrolling in the preview table.
    pub fn process_action(
        &mut self,
        action: InputAction,
        view_state: &mut ViewState,
        preview_len: usize,
    ) -> ActionOutcome {
        match action {
            InputAction::Quit => return ActionOutcome::Quit,
            InputAction::Export => return ActionOutcome::Export,
            InputAction::Scroll { direction, lines } => {
                let lines = usize::try_from(lines).unwrap_or(usize::MAX);
                Self::move_focused(view_state, direction, lines, preview_len);
            }
            InputAction::PageUp => {
                let page = view_state.preview_page();
                Self::move_focused(view_state, ScrollDirection::Up, page, preview_len);
            }
            InputAction::PageDown => {
                let page = view_state.preview_page();
                Self::move_focused(view_state, ScrollDirection::Down, page, preview_len);
            }
            InputAction::GoToStart => {
                Self::move_focused(view_state, ScrollDirection::Up, usize::MAX, preview_len);
            }
            InputAction::GoToEnd => {
                Self::move_focused(view_state, ScrollDirection::Down, usize::MAX, preview_len);
            }
            InputAction::CycleFocus => view_state.focus = view_state.focus.next(),
            InputAction::ToggleSelection => {
                if view_state.focus == Focus::Journals {
                    view_state.toggle_journal_at_cursor();
                }
            }
            InputAction::StartKeyword => {
                view_state.status_line.clear_message();
                view_state.status_line.set_keyword_prompt(String::new());
            }
            InputAction::UpdateKeywordBuffer(buffer) => {
                view_state.status_line.set_keyword_prompt(buffer);
            }
            InputAction::CancelKeyword => view_state.status_line.clear_keyword_prompt(),
            InputAction::ApplyKeyword(keyword) => {
                view_state.status_line.clear_keyword_prompt();
                view_state.keyword = keyword;
            }
            InputAction::AdjustYear { bound, delta } => {
                view_state.adjust_year(bound, delta);
            }
            InputAction::ClearFilters => {
                if view_state.clear_filters() {
                    view_state
                        .status_line
                        .set_message("Filters cleared".to_string());
                }
            }
            InputAction::Resize { width, height } => {
                view_state.update_terminal_size(width, height);
            }
            InputAction::NoAction | InputAction::InvalidInput => {}
        }

        let criteria = view_state.criteria();
        if criteria != self.applied {
            self.applied = criteria;
            view_state.preview_offset = 0;
            ActionOutcome::Recompute
        } else {
            ActionOutcome::Redraw
        }
    }

    fn move_focused(
        view_state: &mut ViewState,
        direction: ScrollDirection,
        lines: usize,
        preview_len: usize,
    ) {
        match view_state.focus {
            Focus::Journals => view_state.move_journal_cursor(direction, lines),
            Focus::Preview => view_state.scroll_preview(direction, lines, preview_len),
        }
    }
}
