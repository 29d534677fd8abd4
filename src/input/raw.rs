//! Low-level input collection.
//!
//! Polls crossterm and queues key and resize events. Mouse wheel ticks arrive in bursts, so they
//! are summed per direction and released once the wheel has been idle for a short window.

use crate::error::Result;
use crate::input::service::ScrollDirection;
use ratatui::crossterm::event::{self, Event, KeyEvent, MouseEventKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Idle time after which accumulated wheel ticks are released.
const WHEEL_IDLE_MS: u64 = 12;
/// Rows moved per wheel tick.
const ROWS_PER_WHEEL_TICK: u64 = 3;
const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;

/// Primitive events consumed by the input service.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Wheel { direction: ScrollDirection, rows: u64 },
}

/// Running total of wheel movement in one direction.
#[derive(Debug, Clone)]
struct WheelAccumulator {
    idle: Duration,
    pending: Option<(ScrollDirection, u64, Instant)>,
}

impl WheelAccumulator {
    fn new(idle: Duration) -> Self {
        Self {
            idle,
            pending: None,
        }
    }

    /// Add a tick; a direction change releases the previous total.
    fn add(&mut self, direction: ScrollDirection, now: Instant) -> Option<RawInputEvent> {
        if let Some((current, rows, last)) = self.pending.as_mut() {
            if *current == direction {
                *rows = rows.saturating_add(ROWS_PER_WHEEL_TICK);
                *last = now;
                return None;
            }
        }

        let released = self.take();
        self.pending = Some((direction, ROWS_PER_WHEEL_TICK, now));
        released
    }

    fn take_if_idle(&mut self, now: Instant) -> Option<RawInputEvent> {
        match self.pending {
            Some((_, _, last)) if now.duration_since(last) >= self.idle => self.take(),
            _ => None,
        }
    }

    fn take(&mut self) -> Option<RawInputEvent> {
        self.pending
            .take()
            .map(|(direction, rows, _)| RawInputEvent::Wheel { direction, rows })
    }
}

/// Collects terminal events into a queue of [`RawInputEvent`]s.
#[derive(Debug)]
pub struct RawInputCollector {
    wheel: WheelAccumulator,
    queue: VecDeque<RawInputEvent>,
}

impl Default for RawInputCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl RawInputCollector {
    pub fn new() -> Self {
        Self::with_idle_window(Duration::from_millis(WHEEL_IDLE_MS))
    }

    pub fn with_idle_window(idle: Duration) -> Self {
        Self {
            wheel: WheelAccumulator::new(idle),
            queue: VecDeque::new(),
        }
    }

    /// Feed an event without polling the terminal.
    pub fn push_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.queue.push_back(RawInputEvent::Key(key)),
            Event::Resize(width, height) => {
                // keep ordering: wheel movement before the resize
                if let Some(wheel) = self.wheel.take() {
                    self.queue.push_back(wheel);
                }
                self.queue.push_back(RawInputEvent::Resize { width, height });
            }
            Event::Mouse(mouse) => {
                let direction = match mouse.kind {
                    MouseEventKind::ScrollUp => ScrollDirection::Up,
                    MouseEventKind::ScrollDown => ScrollDirection::Down,
                    _ => return,
                };
                if let Some(released) = self.wheel.add(direction, Instant::now()) {
                    self.queue.push_back(released);
                }
            }
            _ => {}
        }
    }

    /// Next ready event without blocking.
    pub fn next_ready(&mut self) -> Option<RawInputEvent> {
        if let Some(event) = self.queue.pop_front() {
            return Some(event);
        }
        self.wheel.take_if_idle(Instant::now())
    }

    /// Wait up to `timeout` for the next event.
    pub fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        if let Some(event) = self.next_ready() {
            return Ok(Some(event));
        }

        let timeout = timeout.unwrap_or(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS));
        if event::poll(timeout)? {
            self.push_event(event::read()?);
        }
        Ok(self.next_ready())
    }
}
