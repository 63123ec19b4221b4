//! The typed-input driver: a text buffer becomes timed key emissions.

use std::sync::atomic::AtomicBool;

use anyhow::{anyhow, Result};
use rand::Rng;

use crate::breaks::BreakRoutine;
use crate::config::{Capabilities, SimConfig};
use crate::cursor;
use crate::input::{InputSink, KeyState};
use crate::keyboard::{keystroke_for_char, KeyStroke, KEY_ENTER, KEY_HOME, KEY_LEFTSHIFT, KEY_SPACE};
use crate::schedule::{Clock, SessionState};
use crate::timing::{key_delay_ms, key_hold_ms};
use crate::util::{sleep_interruptible, stopped};

/// Characters between progress log lines.
const PROGRESS_EVERY: u64 = 50;

/// Delay around the caret-to-start key after a line break, milliseconds.
const LINE_START_SETTLE_MS: u64 = 50;

/// One pass of the typed-input driver over a text buffer.
///
/// Borrows the session's sink, break routine, and counters; the session loop
/// builds a fresh `Typist` every cycle.
pub struct Typist<'a, S, B, C, R>
where
    S: InputSink,
    B: BreakRoutine + ?Sized,
    C: Clock,
    R: Rng,
{
    cfg: &'a SimConfig,
    caps: Capabilities,
    sink: &'a mut S,
    breaks: &'a mut B,
    clock: &'a C,
    rng: &'a mut R,
    stop: &'a AtomicBool,
    state: &'a mut SessionState,
    shift_down: bool,
}

impl<'a, S, B, C, R> Typist<'a, S, B, C, R>
where
    S: InputSink,
    B: BreakRoutine + ?Sized,
    C: Clock,
    R: Rng,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cfg: &'a SimConfig,
        caps: Capabilities,
        sink: &'a mut S,
        breaks: &'a mut B,
        clock: &'a C,
        rng: &'a mut R,
        stop: &'a AtomicBool,
        state: &'a mut SessionState,
    ) -> Self {
        Self {
            cfg,
            caps,
            sink,
            breaks,
            clock,
            rng,
            stop,
            state,
            shift_down: false,
        }
    }

    /// Type the whole buffer, running scheduler side-effects between
    /// characters — never mid-character. Returns early, with modifiers
    /// released, once the stop flag is observed.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        let total = text.chars().count() as u64;
        eprintln!("Typing {total} characters...");

        let mut typed = 0u64;
        let lines: Vec<&str> = text.split('\n').collect();
        let line_count = lines.len();

        for (line_index, line) in lines.into_iter().enumerate() {
            for c in line.chars() {
                if stopped(self.stop) {
                    return self.release_modifiers();
                }
                self.side_effects()?;
                self.emit_char(c)?;
                self.inter_key_delay();
                typed = self.record_progress(typed, total);
            }

            if line_index + 1 < line_count {
                if stopped(self.stop) {
                    return self.release_modifiers();
                }
                self.side_effects()?;
                self.emit_line_break()?;
                self.state.note_row();
                if self.caps.scrolling && self.state.scroll_due(self.cfg, self.rng) {
                    if let Err(err) = cursor::wheel_scroll(self.sink, self.cfg, self.rng, self.stop) {
                        eprintln!("Scroll failed ({err:#}); continuing.");
                    }
                    self.state.note_scroll();
                }
                self.inter_key_delay();
                typed = self.record_progress(typed, total);
            }
        }

        self.release_modifiers()?;
        eprintln!("Finished typing.");
        Ok(())
    }

    fn side_effects(&mut self) -> Result<()> {
        if self.caps.breaks {
            if let Some(duration) = self.state.break_due(self.clock.now(), self.cfg, self.rng) {
                eprintln!("Taking a {} second break...", duration.as_secs());
                self.breaks.pause(duration, self.stop)?;
                self.state.note_break(self.clock.now());
            }
        }

        if self.caps.drift && self.state.drift_due(self.clock.now(), self.cfg) {
            if let Err(err) = cursor::drift(self.sink, self.cfg, self.rng, self.stop) {
                eprintln!("Cursor drift failed ({err:#}); continuing.");
            }
            self.state.note_drift(self.clock.now());
        }

        Ok(())
    }

    fn emit_char(&mut self, c: char) -> Result<()> {
        if c == '\t' && self.caps.tab_expansion {
            // Four spaces keep indentation identical across editors that
            // disagree about tab stops.
            for i in 0..4 {
                if i > 0 {
                    self.inter_key_delay();
                }
                self.tap(KeyStroke {
                    keycode: KEY_SPACE,
                    shift: false,
                })?;
            }
            return Ok(());
        }

        let stroke = keystroke_for_char(c).ok_or_else(|| {
            anyhow!(
                "untypeable character {c:?} (U+{:04X}) reached the driver",
                c as u32
            )
        })?;
        self.tap(stroke)
    }

    fn emit_line_break(&mut self) -> Result<()> {
        self.tap(KeyStroke {
            keycode: KEY_ENTER,
            shift: false,
        })?;

        if self.caps.line_start_reset {
            // The editor may auto-indent the fresh line; Home puts the caret
            // back at column one before the next character lands.
            sleep_interruptible(self.stop, LINE_START_SETTLE_MS);
            self.tap(KeyStroke {
                keycode: KEY_HOME,
                shift: false,
            })?;
            sleep_interruptible(self.stop, LINE_START_SETTLE_MS);
        }

        Ok(())
    }

    /// Full press/release pair with a randomized hold. The pair is never
    /// split by the stop flag; cancellation lands between keys.
    fn tap(&mut self, stroke: KeyStroke) -> Result<()> {
        self.set_shift(stroke.shift)?;
        self.sink.key(stroke.keycode, KeyState::Pressed)?;
        sleep_interruptible(self.stop, key_hold_ms(self.cfg, self.rng));
        self.sink.key(stroke.keycode, KeyState::Released)
    }

    fn set_shift(&mut self, down: bool) -> Result<()> {
        if self.shift_down == down {
            return Ok(());
        }
        let state = if down {
            KeyState::Pressed
        } else {
            KeyState::Released
        };
        self.sink.key(KEY_LEFTSHIFT, state)?;
        sleep_interruptible(self.stop, self.rng.gen_range(5..=20));
        self.shift_down = down;
        Ok(())
    }

    fn release_modifiers(&mut self) -> Result<()> {
        self.set_shift(false)
    }

    fn inter_key_delay(&mut self) {
        sleep_interruptible(self.stop, key_delay_ms(self.cfg, self.rng));
    }

    fn record_progress(&mut self, typed: u64, total: u64) -> u64 {
        let typed = typed + 1;
        self.state.note_chars(1);
        if typed % PROGRESS_EVERY == 0 {
            eprintln!("Typed {typed}/{total} characters...");
        }
        typed
    }
}
