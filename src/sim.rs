//! Virtual input sink for tests and rehearsal runs.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::input::{Button, InputSink, KeyState};
use crate::keyboard::{self, KEY_HOME, KEY_LEFTSHIFT, KEY_RIGHTSHIFT};
use crate::motion::Point;

/// One recorded injection call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CursorMove { x: i32, y: i32 },
    Click { button: Button },
    DoubleClick { button: Button },
    Scroll { pixels: i32 },
    Key { keycode: u32, state: KeyState },
}

/// Records every injection call instead of performing it.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    pub events: Vec<Event>,
    cursor: Point,
}

impl RecordingSink {
    pub fn new(cursor: Point) -> Self {
        Self {
            events: Vec::new(),
            cursor,
        }
    }

    /// Keycodes of every key-press event, in order.
    pub fn key_presses(&self) -> impl Iterator<Item = u32> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Key {
                keycode,
                state: KeyState::Pressed,
            } => Some(*keycode),
            _ => None,
        })
    }
}

impl InputSink for RecordingSink {
    fn cursor_position(&mut self) -> Result<Point> {
        Ok(self.cursor)
    }

    fn move_cursor(&mut self, to: Point) -> Result<()> {
        self.cursor = to;
        self.events.push(Event::CursorMove { x: to.x, y: to.y });
        Ok(())
    }

    fn click(&mut self, button: Button) -> Result<()> {
        self.events.push(Event::Click { button });
        Ok(())
    }

    fn double_click(&mut self, button: Button) -> Result<()> {
        self.events.push(Event::DoubleClick { button });
        Ok(())
    }

    fn scroll_down(&mut self, pixels: i32) -> Result<()> {
        self.events.push(Event::Scroll { pixels });
        Ok(())
    }

    fn key(&mut self, keycode: u32, state: KeyState) -> Result<()> {
        self.events.push(Event::Key { keycode, state });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventStats {
    pub cursor_moves: usize,
    pub clicks: usize,
    pub scrolls: usize,
    pub key_events: usize,
}

pub fn stats(events: &[Event]) -> EventStats {
    let mut out = EventStats::default();
    for event in events {
        match event {
            Event::CursorMove { .. } => out.cursor_moves += 1,
            Event::Click { .. } | Event::DoubleClick { .. } => out.clicks += 1,
            Event::Scroll { .. } => out.scrolls += 1,
            Event::Key { .. } => out.key_events += 1,
        }
    }
    out
}

/// Decode the text a plain editor would hold after the recorded key events.
///
/// Home moves the caret to the start of the current line; that is all the
/// cursor modelling the tab/newline checks need.
pub fn typed_text(events: &[Event]) -> Result<String> {
    let decode = reverse_keystroke_map();
    let mut buf: Vec<char> = Vec::new();
    let mut caret = 0usize;
    let mut shift = false;

    for event in events {
        let Event::Key { keycode, state } = event else {
            continue;
        };

        match (*keycode, *state) {
            (KEY_LEFTSHIFT | KEY_RIGHTSHIFT, KeyState::Pressed) => shift = true,
            (KEY_LEFTSHIFT | KEY_RIGHTSHIFT, KeyState::Released) => shift = false,
            (_, KeyState::Released) => {}
            (KEY_HOME, KeyState::Pressed) => {
                while caret > 0 && buf[caret - 1] != '\n' {
                    caret -= 1;
                }
            }
            (code, KeyState::Pressed) => {
                let c = decode.get(&(code, shift)).copied().ok_or_else(|| {
                    anyhow!("cannot decode keycode {code} (shift={shift}) in recorded events")
                })?;
                buf.insert(caret, c);
                caret += 1;
            }
        }
    }

    Ok(buf.into_iter().collect())
}

fn reverse_keystroke_map() -> HashMap<(u32, bool), char> {
    let mut map = HashMap::new();

    let mut candidates = vec!['\n', '\t', ' '];
    candidates.extend((33u8..=126u8).map(char::from));

    for c in candidates {
        if let Some(stroke) = keyboard::keystroke_for_char(c) {
            map.insert((stroke.keycode, stroke.shift), c);
        }
    }

    map
}
