//! The repeating position/click/type/wait cycle.

use std::sync::atomic::AtomicBool;

use anyhow::Result;
use rand::Rng;

use crate::breaks::BreakRoutine;
use crate::config::{Capabilities, SimConfig};
use crate::cursor;
use crate::driver::Typist;
use crate::input::InputSink;
use crate::motion::Point;
use crate::schedule::{Clock, SessionState};
use crate::timing::random_offset;
use crate::util::{sleep_interruptible, stopped};

/// Why the session loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operator asked for a stop; no input is left half-applied.
    Stopped,
}

/// Interruptible pre-flight countdown, one line per second. Returns false
/// when the operator stopped during the wait.
pub fn countdown(stop: &AtomicBool, secs: u64) -> bool {
    if secs == 0 {
        return true;
    }
    eprintln!("Focus the target editor window. Starting in {secs}s... (Ctrl+C stops at any time)");
    for remaining in (1..=secs).rev() {
        if stopped(stop) {
            return false;
        }
        eprintln!("{remaining}...");
        sleep_interruptible(stop, 1000);
    }
    !stopped(stop)
}

/// Run cycles until the stop flag is set. There is no other exit short of an
/// injection error.
#[allow(clippy::too_many_arguments)]
pub fn run<S, B, C>(
    text: &str,
    cfg: &SimConfig,
    caps: Capabilities,
    sink: &mut S,
    breaks: &mut B,
    clock: &C,
    rng: &mut impl Rng,
    stop: &AtomicBool,
) -> Result<Outcome>
where
    S: InputSink,
    B: BreakRoutine + ?Sized,
    C: Clock,
{
    cfg.validate()?;
    let mut state = SessionState::new(clock.now());

    loop {
        if stopped(stop) {
            let _ = sink.neutralize();
            return Ok(Outcome::Stopped);
        }
        run_cycle(
            text,
            cfg,
            caps,
            &mut *sink,
            &mut *breaks,
            clock,
            &mut *rng,
            stop,
            &mut state,
        )?;
    }
}

/// One position/click/type/wait pass. The cycle counter advances only after
/// the trailing wait; a pass cut short by the stop flag leaves it untouched.
#[allow(clippy::too_many_arguments)]
pub fn run_cycle<S, B, C>(
    text: &str,
    cfg: &SimConfig,
    caps: Capabilities,
    sink: &mut S,
    breaks: &mut B,
    clock: &C,
    rng: &mut impl Rng,
    stop: &AtomicBool,
    state: &mut SessionState,
) -> Result<()>
where
    S: InputSink,
    B: BreakRoutine + ?Sized,
    C: Clock,
{
    eprintln!("{}", "=".repeat(50));
    eprintln!("Cycle {} starting...", state.cycle());
    eprintln!("{}", "=".repeat(50));

    let cycle_offset = (state.cycle().saturating_sub(1)) as i32 * cfg.cycle_y_offset_px;
    let row_target = Point {
        x: cfg.row_anchor.x,
        y: cfg.row_anchor.y + cycle_offset,
    };
    eprintln!(
        "Clicking the row anchor at ({}, {})...",
        row_target.x, row_target.y
    );
    cursor::glide_and_click(&mut *sink, cfg, row_target, &mut *rng, stop)?;
    if stopped(stop) {
        return Ok(());
    }

    let file_target = Point {
        x: cfg.file_anchor.x + random_offset(cfg.file_anchor_jitter_px, rng),
        y: cfg.file_anchor.y + random_offset(cfg.file_anchor_jitter_px, rng),
    };
    eprintln!(
        "Clicking the file area at ({}, {})...",
        file_target.x, file_target.y
    );
    cursor::glide_and_click(&mut *sink, cfg, file_target, &mut *rng, stop)?;
    if stopped(stop) {
        return Ok(());
    }

    Typist::new(
        cfg,
        caps,
        &mut *sink,
        &mut *breaks,
        clock,
        &mut *rng,
        stop,
        &mut *state,
    )
    .type_text(text)?;
    if stopped(stop) {
        return Ok(());
    }

    eprintln!(
        "Cycle {} complete. Waiting {} ms before the next cycle...",
        state.cycle(),
        cfg.cycle_pause_ms
    );
    sleep_interruptible(stop, cfg.cycle_pause_ms);
    state.next_cycle();
    Ok(())
}
