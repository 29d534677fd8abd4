//! High-level input service.
//!
//! Runs raw events through the dashboard's modal key map and yields [`InputAction`]s for the
//! render loop. Two modes exist: navigation, and editing the keyword.

use crate::error::Result;
use crate::input::raw::{RawInputCollector, RawInputEvent};
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Navigation,
    KeywordInput,
}

/// Direction for scroll actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Which end of the year range an adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearBound {
    Lower,
    Upper,
}

/// Dashboard-level actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Scroll {
        direction: ScrollDirection,
        lines: u64,
    },
    PageUp,
    PageDown,
    GoToStart,
    GoToEnd,
    CycleFocus,
    ToggleSelection,
    StartKeyword,
    UpdateKeywordBuffer(String),
    CancelKeyword,
    /// Apply the typed keyword; an empty string clears the keyword filter
    ApplyKeyword(String),
    AdjustYear {
        bound: YearBound,
        delta: i32,
    },
    ClearFilters,
    Export,
    Resize {
        width: u16,
        height: u16,
    },
    Quit,
    NoAction,
    InvalidInput,
}

/// Modal key map.
pub struct InputStateMachine {
    state: InputState,
    keyword_buffer: String,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self {
            state: InputState::Navigation,
            keyword_buffer: String::new(),
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> InputAction {
        if key_event.kind != KeyEventKind::Press {
            return InputAction::NoAction;
        }

        match self.state {
            InputState::Navigation => self.handle_navigation(key_event),
            InputState::KeywordInput => self.handle_keyword(key_event),
        }
    }

    fn handle_navigation(&mut self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => InputAction::Quit,
                _ => InputAction::InvalidInput,
            };
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            return InputAction::InvalidInput;
        }

        match key.code {
            KeyCode::Char('q') => InputAction::Quit,
            KeyCode::Char('j') | KeyCode::Down => InputAction::Scroll {
                direction: ScrollDirection::Down,
                lines: 1,
            },
            KeyCode::Char('k') | KeyCode::Up => InputAction::Scroll {
                direction: ScrollDirection::Up,
                lines: 1,
            },
            KeyCode::PageDown => InputAction::PageDown,
            KeyCode::PageUp => InputAction::PageUp,
            KeyCode::Char('g') | KeyCode::Home => InputAction::GoToStart,
            KeyCode::Char('G') | KeyCode::End => InputAction::GoToEnd,
            KeyCode::Tab | KeyCode::BackTab => InputAction::CycleFocus,
            KeyCode::Char(' ') | KeyCode::Enter => InputAction::ToggleSelection,
            KeyCode::Char('/') => {
                self.state = InputState::KeywordInput;
                self.keyword_buffer.clear();
                InputAction::StartKeyword
            }
            KeyCode::Char('[') => InputAction::AdjustYear {
                bound: YearBound::Lower,
                delta: -1,
            },
            KeyCode::Char(']') => InputAction::AdjustYear {
                bound: YearBound::Lower,
                delta: 1,
            },
            KeyCode::Char('{') => InputAction::AdjustYear {
                bound: YearBound::Upper,
                delta: -1,
            },
            KeyCode::Char('}') => InputAction::AdjustYear {
                bound: YearBound::Upper,
                delta: 1,
            },
            KeyCode::Char('c') => InputAction::ClearFilters,
            KeyCode::Char('e') => InputAction::Export,
            _ => InputAction::InvalidInput,
        }
    }

    fn handle_keyword(&mut self, key: KeyEvent) -> InputAction {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.state = InputState::Navigation;
                self.keyword_buffer.clear();
                InputAction::CancelKeyword
            }
            (KeyCode::Enter, _) => {
                self.state = InputState::Navigation;
                InputAction::ApplyKeyword(std::mem::take(&mut self.keyword_buffer))
            }
            (KeyCode::Backspace, _) => {
                self.keyword_buffer.pop();
                InputAction::UpdateKeywordBuffer(self.keyword_buffer.clone())
            }
            (KeyCode::Char(ch), modifiers)
                if !ch.is_control()
                    && !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.keyword_buffer.push(ch);
                InputAction::UpdateKeywordBuffer(self.keyword_buffer.clone())
            }
            _ => InputAction::InvalidInput,
        }
    }

    pub fn keyword_buffer(&self) -> &str {
        &self.keyword_buffer
    }

    pub fn state(&self) -> InputState {
        self.state
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces [`InputAction`]s from terminal events.
pub struct InputService {
    state_machine: InputStateMachine,
    raw_input: RawInputCollector,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            state_machine: InputStateMachine::new(),
            raw_input: RawInputCollector::new(),
        }
    }

    /// Wait up to `timeout` for input and return every action that became ready.
    pub fn poll_actions(&mut self, timeout: Option<Duration>) -> Result<Vec<InputAction>> {
        let mut actions = Vec::new();

        if let Some(raw_event) = self.raw_input.poll_event(timeout)? {
            actions.extend(self.translate(raw_event));
            while let Some(extra) = self.raw_input.next_ready() {
                actions.extend(self.translate(extra));
            }
        }

        Ok(actions)
    }

    /// Feed a synthetic event and drain the resulting actions.
    pub fn process_event(&mut self, event: Event) -> Vec<InputAction> {
        self.raw_input.push_event(event);
        let mut actions = Vec::new();
        while let Some(raw_event) = self.raw_input.next_ready() {
            actions.extend(self.translate(raw_event));
        }
        actions
    }

    fn translate(&mut self, event: RawInputEvent) -> Option<InputAction> {
        let action = match event {
            RawInputEvent::Key(key_event) => self.state_machine.handle_key_event(key_event),
            RawInputEvent::Resize { width, height } => InputAction::Resize { width, height },
            RawInputEvent::Wheel { direction, rows } => InputAction::Scroll {
                direction,
                lines: rows,
            },
        };

        match action {
            InputAction::NoAction | InputAction::InvalidInput => None,
            _ => Some(action),
        }
    }
}

impl Default for InputService {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a blocking thread that polls the terminal and forwards actions to the render loop.
pub fn spawn_input_thread(
    tx: UnboundedSender<InputAction>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut service = InputService::new();
        while !shutdown.load(Ordering::SeqCst) {
            match service.poll_actions(Some(poll_interval)) {
                Ok(actions) => {
                    for action in actions {
                        if tx.send(action).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    log::error!("input thread stopped: {err}");
                    break;
                }
            }
        }
    })
}
