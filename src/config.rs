use anyhow::{ensure, Result};

use crate::motion::Point;

/// Behavior profile. The two profiles reproduce two historically separate
/// deployments of this tool; their tab handling genuinely differs and must
/// stay selectable rather than being merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Plain typing: tab stays a Tab key, no scheduled side-effects.
    Basic,
    /// Breaks, cursor drift, scrolling, tab-as-spaces, caret reset on Enter.
    Enhanced,
}

/// Capability flags consumed by the typed-input driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Long scheduled pauses through the platform break routine.
    pub breaks: bool,
    /// Small random cursor displacements during idle typing stretches.
    pub drift: bool,
    /// Wheel scrolling every few typed rows.
    pub scrolling: bool,
    /// Emit four spaces instead of the Tab key.
    pub tab_expansion: bool,
    /// Send a caret-to-line-start key after every Enter.
    pub line_start_reset: bool,
}

impl Variant {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Variant::Basic => Capabilities {
                breaks: false,
                drift: false,
                scrolling: false,
                tab_expansion: false,
                line_start_reset: false,
            },
            Variant::Enhanced => Capabilities {
                breaks: true,
                drift: true,
                scrolling: true,
                tab_expansion: true,
                line_start_reset: true,
            },
        }
    }
}

/// Numeric bounds for one session. Fixed at startup and never mutated; the
/// production constants live in `Default`. Nothing is read from a config
/// file or the environment.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Inter-keystroke delay bounds, milliseconds.
    pub key_delay_min_ms: u64,
    pub key_delay_max_ms: u64,
    /// How long a key stays pressed, milliseconds.
    pub key_hold_min_ms: u64,
    pub key_hold_max_ms: u64,

    /// Per-axis random offset applied to human-like move targets, pixels.
    pub pointer_inaccuracy_px: i32,
    /// Intermediate positions per human-like cursor move.
    pub glide_steps: u32,
    pub glide_step_delay_ms: u64,
    pub glide_settle_ms: u64,
    pub post_click_ms: u64,
    pub post_scroll_ms: u64,

    pub break_interval_ms: u64,
    pub break_interval_jitter_ms: u64,
    pub break_duration_ms: u64,
    pub break_duration_jitter_ms: u64,

    pub drift_interval_ms: u64,
    pub drift_range_px: i32,
    pub drift_range_jitter_px: i32,

    pub scroll_every_rows: u32,
    pub scroll_rows_jitter: u32,
    pub scroll_amount_px: i32,
    pub scroll_amount_jitter_px: i32,

    /// First click anchor of a cycle; its y coordinate advances by
    /// `cycle_y_offset_px` every cycle.
    pub row_anchor: Point,
    pub cycle_y_offset_px: i32,
    /// Second click anchor, perturbed by `file_anchor_jitter_px` per axis.
    pub file_anchor: Point,
    pub file_anchor_jitter_px: i32,

    pub cycle_pause_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            key_delay_min_ms: 50,
            key_delay_max_ms: 150,
            key_hold_min_ms: 18,
            key_hold_max_ms: 70,

            pointer_inaccuracy_px: 5,
            glide_steps: 10,
            glide_step_delay_ms: 10,
            glide_settle_ms: 100,
            post_click_ms: 300,
            post_scroll_ms: 200,

            break_interval_ms: 20 * 60 * 1000,
            break_interval_jitter_ms: 2 * 60 * 1000,
            break_duration_ms: 2 * 60 * 1000,
            break_duration_jitter_ms: 30 * 1000,

            drift_interval_ms: 30 * 1000,
            drift_range_px: 40,
            drift_range_jitter_px: 5,

            scroll_every_rows: 10,
            scroll_rows_jitter: 1,
            scroll_amount_px: 50,
            scroll_amount_jitter_px: 5,

            row_anchor: Point::new(200, 400),
            cycle_y_offset_px: 50,
            file_anchor: Point::new(600, 600),
            file_anchor_jitter_px: 20,

            cycle_pause_ms: 2000,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.key_delay_min_ms <= self.key_delay_max_ms,
            "key_delay_min_ms must be <= key_delay_max_ms"
        );
        ensure!(
            self.key_hold_min_ms <= self.key_hold_max_ms,
            "key_hold_min_ms must be <= key_hold_max_ms"
        );
        ensure!(
            self.pointer_inaccuracy_px >= 0,
            "pointer_inaccuracy_px must be >= 0"
        );
        ensure!(self.glide_steps >= 1, "glide_steps must be >= 1");
        ensure!(
            self.drift_range_px >= 0 && self.drift_range_jitter_px >= 0,
            "drift ranges must be >= 0"
        );
        ensure!(
            self.scroll_amount_px >= 0 && self.scroll_amount_jitter_px >= 0,
            "scroll amounts must be >= 0"
        );
        ensure!(
            self.file_anchor_jitter_px >= 0,
            "file_anchor_jitter_px must be >= 0"
        );
        Ok(())
    }

    /// Delays zeroed and timed side-effects pushed out of reach. Used by
    /// rehearsal runs and by tests that drive a full cycle without waiting.
    pub fn instant() -> Self {
        Self {
            key_delay_min_ms: 0,
            key_delay_max_ms: 0,
            key_hold_min_ms: 0,
            key_hold_max_ms: 0,
            glide_step_delay_ms: 0,
            glide_settle_ms: 0,
            post_click_ms: 0,
            post_scroll_ms: 0,
            break_interval_ms: u64::MAX,
            drift_interval_ms: u64::MAX,
            cycle_pause_ms: 0,
            ..Self::default()
        }
    }
}
