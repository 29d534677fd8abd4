//! Dashboard UI state.
//!
//! Holds the filter controls exactly as the user left them (keyword, year sliders, journal
//! checkboxes) plus focus and scroll positions. [`ViewState::criteria`] turns the controls into
//! a fresh [`FilterCriteria`] on demand.

use crate::data::Dataset;
use crate::filter::{FilterCriteria, YearRange};
use crate::input::{ScrollDirection, YearBound};
use std::collections::BTreeSet;

/// Which panel receives movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Journals,
    Preview,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Journals => Focus::Preview,
            Focus::Preview => Focus::Journals,
        }
    }
}

#[derive(Debug)]
pub struct ViewState {
    /// Source description for the status line
    pub source_name: String,

    /// Applied keyword (empty = inactive)
    pub keyword: String,

    /// Observed dataset years; `None` hides the year control
    pub year_bounds: Option<(i32, i32)>,

    /// Current slider positions, always within `year_bounds`
    pub year_selection: Option<(i32, i32)>,

    /// Journal choices, sorted
    pub journals: Vec<String>,
    pub selected_journals: BTreeSet<String>,
    pub journal_cursor: usize,

    /// First visible preview row
    pub preview_offset: usize,

    pub focus: Focus,

    pub viewport_width: u16,
    pub viewport_height: u16,

    pub status_line: StatusLine,
}

impl ViewState {
    pub fn new(
        source_name: impl Into<String>,
        dataset: &Dataset,
        viewport_width: u16,
        viewport_height: u16,
    ) -> Self {
        let year_bounds = dataset.year_bounds();
        Self {
            source_name: source_name.into(),
            keyword: String::new(),
            year_bounds,
            year_selection: year_bounds,
            journals: dataset.journals().into_iter().map(str::to_string).collect(),
            selected_journals: BTreeSet::new(),
            journal_cursor: 0,
            preview_offset: 0,
            focus: Focus::Journals,
            viewport_width,
            viewport_height,
            status_line: StatusLine::new(),
        }
    }

    /// Criteria for the current controls.
    ///
    /// The year selection always applies once the dataset has dated records, so undated
    /// records never appear on the dashboard. Only a dataset without any years yields no
    /// year range.
    pub fn criteria(&self) -> FilterCriteria {
        let year_range = self
            .year_selection
            .map(|(from, to)| YearRange::new(from, to));

        FilterCriteria {
            keyword: self.keyword.clone(),
            year_range,
            journals: self.selected_journals.clone(),
        }
    }

    /// Move one end of the year selection, clamped to the bounds and the other end.
    /// Returns true if the selection changed.
    pub fn adjust_year(&mut self, bound: YearBound, delta: i32) -> bool {
        let (Some((lo, hi)), Some((from, to))) = (self.year_bounds, self.year_selection) else {
            return false;
        };

        let updated = match bound {
            YearBound::Lower => (from.saturating_add(delta).clamp(lo, to), to),
            YearBound::Upper => (from, to.saturating_add(delta).clamp(from, hi)),
        };

        let changed = updated != (from, to);
        self.year_selection = Some(updated);
        changed
    }

    /// Toggle the journal under the cursor. Returns true if a journal was toggled.
    pub fn toggle_journal_at_cursor(&mut self) -> bool {
        let Some(journal) = self.journals.get(self.journal_cursor) else {
            return false;
        };
        if !self.selected_journals.remove(journal) {
            self.selected_journals.insert(journal.clone());
        }
        true
    }

    pub fn move_journal_cursor(&mut self, direction: ScrollDirection, lines: usize) {
        let last = self.journals.len().saturating_sub(1);
        self.journal_cursor = match direction {
            ScrollDirection::Up => self.journal_cursor.saturating_sub(lines),
            ScrollDirection::Down => self.journal_cursor.saturating_add(lines).min(last),
        };
    }

    /// Scroll the preview table, keeping at least one row visible.
    pub fn scroll_preview(&mut self, direction: ScrollDirection, lines: usize, preview_len: usize) {
        let last = preview_len.saturating_sub(1);
        self.preview_offset = match direction {
            ScrollDirection::Up => self.preview_offset.saturating_sub(lines),
            ScrollDirection::Down => self.preview_offset.saturating_add(lines).min(last),
        };
    }

    /// Reset every filter control. Returns true if anything was active.
    pub fn clear_filters(&mut self) -> bool {
        let was_active = !self.keyword.is_empty()
            || !self.selected_journals.is_empty()
            || self.year_selection != self.year_bounds;

        self.keyword.clear();
        self.selected_journals.clear();
        self.year_selection = self.year_bounds;
        was_active
    }

    /// Human-readable year selection for the sidebar
    pub fn year_label(&self) -> String {
        match (self.year_bounds, self.year_selection) {
            (Some(bounds), Some((from, to))) if bounds == (from, to) => {
                format!("{from} to {to} (all)")
            }
            (Some(_), Some((from, to))) => format!("{from} to {to}"),
            _ => "no dated records".to_string(),
        }
    }

    /// Rows available for the preview table (viewport minus chrome)
    pub fn preview_page(&self) -> usize {
        (self.viewport_height as usize * 2 / 5).saturating_sub(3).max(1)
    }

    /// Update terminal dimensions. Returns true if they changed.
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        let changed = self.viewport_width != width || self.viewport_height != height;
        if changed {
            self.viewport_width = width;
            self.viewport_height = height;
        }
        changed
    }
}

/// Status line information
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    pub message: Option<String>,
    pub keyword_prompt: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn set_keyword_prompt(&mut self, buffer: String) {
        self.keyword_prompt = Some(buffer);
    }

    pub fn clear_keyword_prompt(&mut self) {
        self.keyword_prompt = None;
    }

    pub fn is_editing(&self) -> bool {
        self.keyword_prompt.is_some()
    }

    /// Format the status line for display
    pub fn format_status_line(&self, source_name: &str) -> String {
        if let Some(buffer) = &self.keyword_prompt {
            return format!("/{buffer}");
        }

        match &self.message {
            Some(message) => format!("{source_name} | {message}"),
            None => format!(
                "{source_name} | / search  [ ] {{ }} years  space toggle  tab focus  c clear  e export  q quit"
            ),
        }
    }
}
