//! Session counters and the break/drift/scroll scheduler.

use std::cell::Cell;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::SimConfig;
use crate::timing::jittered;

/// Time source for the scheduler. Production uses the system clock; tests
/// and rehearsal runs drive a manual one.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Mutable counters for one session. Each counter only grows until its event
/// fires, at which point it resets; nothing here survives the process.
#[derive(Debug, Clone)]
pub struct SessionState {
    last_break_at: Instant,
    last_drift_at: Instant,
    rows_since_scroll: u32,
    chars_typed: u64,
    cycle: u64,
}

impl SessionState {
    pub fn new(now: Instant) -> Self {
        Self {
            last_break_at: now,
            last_drift_at: now,
            rows_since_scroll: 0,
            chars_typed: 0,
            cycle: 1,
        }
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn chars_typed(&self) -> u64 {
        self.chars_typed
    }

    pub fn rows_since_scroll(&self) -> u32 {
        self.rows_since_scroll
    }

    pub fn next_cycle(&mut self) {
        self.cycle += 1;
    }

    pub fn note_chars(&mut self, count: u64) {
        self.chars_typed += count;
    }

    /// Returns the break duration when a break is due.
    ///
    /// The interval is re-sampled on every check, so across checks a break
    /// always lands within `base ± jitter` of the previous one.
    pub fn break_due(
        &self,
        now: Instant,
        cfg: &SimConfig,
        rng: &mut impl Rng,
    ) -> Option<Duration> {
        let interval = jittered(cfg.break_interval_ms, cfg.break_interval_jitter_ms, rng);
        if now.duration_since(self.last_break_at) < Duration::from_millis(interval) {
            return None;
        }
        let duration = jittered(cfg.break_duration_ms, cfg.break_duration_jitter_ms, rng);
        Some(Duration::from_millis(duration))
    }

    /// Record a completed break. The drift timer resets with it.
    pub fn note_break(&mut self, now: Instant) {
        self.last_break_at = now;
        self.last_drift_at = now;
    }

    pub fn drift_due(&self, now: Instant, cfg: &SimConfig) -> bool {
        now.duration_since(self.last_drift_at) >= Duration::from_millis(cfg.drift_interval_ms)
    }

    pub fn note_drift(&mut self, now: Instant) {
        self.last_drift_at = now;
    }

    pub fn note_row(&mut self) {
        self.rows_since_scroll += 1;
    }

    pub fn scroll_due(&self, cfg: &SimConfig, rng: &mut impl Rng) -> bool {
        let threshold = jittered(
            u64::from(cfg.scroll_every_rows),
            u64::from(cfg.scroll_rows_jitter),
            rng,
        );
        u64::from(self.rows_since_scroll) >= threshold
    }

    pub fn note_scroll(&mut self) {
        self.rows_since_scroll = 0;
    }
}
