use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::alarm::AlarmSink;
use crate::controller::Controller;
use crate::countdown::{Countdown, CountdownEvent};
use crate::runtime::ScrollDirection;

/// Longest text the duration field accepts
const EDIT_CAPACITY: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The timer widget: a controller plus the text-field edit buffer
#[derive(Debug)]
pub struct App<A: AlarmSink> {
    pub controller: Controller<A>,
    edit_buffer: Option<String>,
}

impl<A: AlarmSink> App<A> {
    pub fn new(controller: Controller<A>) -> Self {
        Self {
            controller,
            edit_buffer: None,
        }
    }

    pub fn countdown(&self) -> &Countdown {
        self.controller.countdown()
    }

    /// Contents of the duration field while it is being edited
    pub fn editing(&self) -> Option<&str> {
        self.edit_buffer.as_deref()
    }

    pub fn on_tick(&mut self, now: Instant) -> usize {
        self.controller.poll(now)
    }

    pub fn on_scroll(&mut self, direction: ScrollDirection, now: Instant) {
        if self.edit_buffer.is_some() {
            return;
        }
        let event = match direction {
            ScrollDirection::Up => CountdownEvent::Increment,
            ScrollDirection::Down => CountdownEvent::Decrement,
        };
        self.controller.handle(event, now);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.edit_buffer.is_some() {
            self.on_edit_key(key.code, now);
            return Flow::Continue;
        }

        let event = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char(' ') | KeyCode::Char('s') => CountdownEvent::Toggle,
            KeyCode::Char('r') => CountdownEvent::Reset,
            KeyCode::Char('m') => CountdownEvent::ToggleMute,
            KeyCode::Up | KeyCode::Char('k') => CountdownEvent::Increment,
            KeyCode::Down | KeyCode::Char('j') => CountdownEvent::Decrement,
            KeyCode::Char('e') | KeyCode::Enter => {
                if self.countdown().is_at_rest() {
                    self.edit_buffer = Some(self.countdown().edit_text());
                }
                return Flow::Continue;
            }
            _ => return Flow::Continue,
        };
        self.controller.handle(event, now);
        Flow::Continue
    }

    fn on_edit_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Esc => self.edit_buffer = None,
            KeyCode::Enter => {
                if let Some(text) = self.edit_buffer.take() {
                    self.controller.handle(CountdownEvent::Edit(text), now);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.edit_buffer.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => {
                if let Some(buffer) = self.edit_buffer.as_mut() {
                    if buffer.len() < EDIT_CAPACITY {
                        buffer.push(c);
                    }
                }
            }
            _ => {}
        }
    }
}
