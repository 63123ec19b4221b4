use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub(crate) fn stopped(stop: &AtomicBool) -> bool {
    stop.load(Ordering::SeqCst)
}

/// Sleep in short slices so an operator stop is observed sub-second, not at
/// the end of a multi-minute wait.
pub(crate) fn sleep_interruptible(stop: &AtomicBool, ms: u64) {
    let mut remaining = ms;
    while remaining > 0 {
        if stopped(stop) {
            return;
        }
        let step = remaining.min(50);
        std::thread::sleep(Duration::from_millis(step));
        remaining -= step;
    }
}
