//! Live cursor work: eased glides, clicks, drift, wheel scrolling.

use std::sync::atomic::AtomicBool;

use anyhow::Result;
use rand::Rng;

use crate::config::SimConfig;
use crate::input::{Button, InputSink};
use crate::motion::{plan_path, Point};
use crate::timing::{jittered_px, random_offset};
use crate::util::{sleep_interruptible, stopped};

/// Glide the cursor to `target`.
///
/// Human-like movement perturbs the target by the configured inaccuracy and
/// walks an eased multi-step path with a short delay per step; precise
/// movement warps in one jump. Either way the cursor settles briefly before
/// the caller continues.
pub fn glide_to<S: InputSink>(
    sink: &mut S,
    cfg: &SimConfig,
    target: Point,
    human_like: bool,
    rng: &mut impl Rng,
    stop: &AtomicBool,
) -> Result<()> {
    let landing = if human_like {
        Point {
            x: target.x + random_offset(cfg.pointer_inaccuracy_px, rng),
            y: target.y + random_offset(cfg.pointer_inaccuracy_px, rng),
        }
    } else {
        target
    };

    eprintln!("Moving cursor to ({}, {})...", target.x, target.y);

    if human_like {
        let start = sink.cursor_position()?;
        for waypoint in plan_path(start, landing, cfg.glide_steps) {
            if stopped(stop) {
                return Ok(());
            }
            sink.move_cursor(waypoint)?;
            sleep_interruptible(stop, cfg.glide_step_delay_ms);
        }
    } else {
        sink.move_cursor(landing)?;
    }

    sleep_interruptible(stop, cfg.glide_settle_ms);
    Ok(())
}

pub fn glide_and_click<S: InputSink>(
    sink: &mut S,
    cfg: &SimConfig,
    target: Point,
    rng: &mut impl Rng,
    stop: &AtomicBool,
) -> Result<()> {
    glide_to(sink, cfg, target, true, rng, stop)?;
    if stopped(stop) {
        return Ok(());
    }
    eprintln!("Clicking at ({}, {})...", target.x, target.y);
    sink.click(Button::Left)?;
    sleep_interruptible(stop, cfg.post_click_ms);
    Ok(())
}

/// Small random displacement from the current position, fired by the
/// scheduler during long typing stretches.
pub fn drift<S: InputSink>(
    sink: &mut S,
    cfg: &SimConfig,
    rng: &mut impl Rng,
    stop: &AtomicBool,
) -> Result<()> {
    let range = jittered_px(cfg.drift_range_px, cfg.drift_range_jitter_px, rng);
    let from = sink.cursor_position()?;
    let dx = random_offset(range, rng);
    let dy = random_offset(range, rng);
    eprintln!("Drifting cursor by ({dx}, {dy}) px...");
    glide_to(
        sink,
        cfg,
        Point {
            x: from.x + dx,
            y: from.y + dy,
        },
        true,
        rng,
        stop,
    )
}

pub fn wheel_scroll<S: InputSink>(
    sink: &mut S,
    cfg: &SimConfig,
    rng: &mut impl Rng,
    stop: &AtomicBool,
) -> Result<()> {
    let amount = jittered_px(cfg.scroll_amount_px, cfg.scroll_amount_jitter_px, rng);
    sink.scroll_down(amount)?;
    eprintln!("Scrolled {amount} px.");
    sleep_interruptible(stop, cfg.post_scroll_ms);
    Ok(())
}
