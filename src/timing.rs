use rand::Rng;

use crate::config::SimConfig;

/// Uniform inter-keystroke delay in `[key_delay_min_ms, key_delay_max_ms]`.
pub fn key_delay_ms(cfg: &SimConfig, rng: &mut impl Rng) -> u64 {
    rng.gen_range(cfg.key_delay_min_ms..=cfg.key_delay_max_ms)
}

/// Uniform key hold time in `[key_hold_min_ms, key_hold_max_ms]`.
pub fn key_hold_ms(cfg: &SimConfig, rng: &mut impl Rng) -> u64 {
    rng.gen_range(cfg.key_hold_min_ms..=cfg.key_hold_max_ms)
}

/// Uniform signed offset in `[-radius, +radius]`. A radius of 0 yields 0.
pub fn random_offset(radius: i32, rng: &mut impl Rng) -> i32 {
    if radius == 0 {
        return 0;
    }
    rng.gen_range(-radius..=radius)
}

/// `base ± spread` with uniform jitter, saturating at the `u64` boundaries.
pub fn jittered(base: u64, spread: u64, rng: &mut impl Rng) -> u64 {
    if spread == 0 {
        return base;
    }
    let offset = rng.gen_range(-(spread as i64)..=spread as i64);
    base.saturating_add_signed(offset)
}

/// `base ± spread` in pixels.
pub fn jittered_px(base: i32, spread: i32, rng: &mut impl Rng) -> i32 {
    base + random_offset(spread, rng)
}
