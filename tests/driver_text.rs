use std::sync::atomic::AtomicBool;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use scrivener::breaks::{BreakRoutine, PlainWait};
use scrivener::config::{SimConfig, Variant};
use scrivener::driver::Typist;
use scrivener::keyboard::{KEY_ENTER, KEY_HOME, KEY_TAB};
use scrivener::motion::Point;
use scrivener::schedule::{Clock, ManualClock, SessionState};
use scrivener::sim::{typed_text, Event, RecordingSink};

fn type_through(text: &str, variant: Variant, cfg: &SimConfig) -> (RecordingSink, SessionState) {
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut rng = StdRng::seed_from_u64(11);
    let mut sink = RecordingSink::new(Point::new(0, 0));
    let mut breaks = PlainWait;
    let mut state = SessionState::new(clock.now());

    Typist::new(
        cfg,
        variant.capabilities(),
        &mut sink,
        &mut breaks,
        &clock,
        &mut rng,
        &stop,
        &mut state,
    )
    .type_text(text)
    .expect("typing should succeed");

    (sink, state)
}

#[test]
fn enhanced_expands_tab_to_four_spaces() {
    let (sink, _) = type_through("a\tb", Variant::Enhanced, &SimConfig::instant());
    assert_eq!(typed_text(&sink.events).unwrap(), "a    b");
    assert_eq!(sink.key_presses().filter(|&k| k == KEY_TAB).count(), 0);
}

#[test]
fn basic_keeps_the_tab_key() {
    let (sink, _) = type_through("a\tb", Variant::Basic, &SimConfig::instant());
    assert_eq!(typed_text(&sink.events).unwrap(), "a\tb");
    assert_eq!(sink.key_presses().filter(|&k| k == KEY_TAB).count(), 1);
}

#[test]
fn newline_emits_one_enter_and_one_caret_reset() {
    let (sink, state) = type_through("line1\nline2", Variant::Enhanced, &SimConfig::instant());

    assert_eq!(sink.key_presses().filter(|&k| k == KEY_ENTER).count(), 1);
    assert_eq!(sink.key_presses().filter(|&k| k == KEY_HOME).count(), 1);
    assert_eq!(state.rows_since_scroll(), 1);
    assert_eq!(typed_text(&sink.events).unwrap(), "line1\nline2");
}

#[test]
fn basic_newline_skips_the_caret_reset() {
    let (sink, _) = type_through("line1\nline2", Variant::Basic, &SimConfig::instant());

    assert_eq!(sink.key_presses().filter(|&k| k == KEY_ENTER).count(), 1);
    assert_eq!(sink.key_presses().filter(|&k| k == KEY_HOME).count(), 0);
}

#[test]
fn every_character_counts_towards_the_session_total() {
    let (_, state) = type_through("one\ntwo\n", Variant::Enhanced, &SimConfig::instant());
    assert_eq!(state.chars_typed(), 8);
}

#[test]
fn shift_wraps_uppercase_runs() {
    let (sink, _) = type_through("aA", Variant::Basic, &SimConfig::instant());
    assert_eq!(typed_text(&sink.events).unwrap(), "aA");
}

#[test]
fn scrolling_fires_after_enough_rows() {
    let text = "a\n".repeat(12);
    let (sink, state) = type_through(&text, Variant::Enhanced, &SimConfig::instant());

    let scrolls = sink
        .events
        .iter()
        .filter(|event| matches!(event, Event::Scroll { .. }))
        .count();
    assert!(scrolls >= 1, "expected at least one scroll for 12 rows");
    assert!(state.rows_since_scroll() < 12, "row counter must reset");
}

#[test]
fn drift_interleaves_with_typing_when_due() {
    let cfg = SimConfig {
        drift_interval_ms: 0,
        ..SimConfig::instant()
    };
    let (sink, _) = type_through("hi", Variant::Enhanced, &cfg);

    let moves = sink
        .events
        .iter()
        .filter(|event| matches!(event, Event::CursorMove { .. }))
        .count();
    assert!(moves >= 1, "expected drift moves between characters");
    assert_eq!(typed_text(&sink.events).unwrap(), "hi");
}

struct CountingPause {
    pauses: usize,
    last_duration: Option<Duration>,
}

impl BreakRoutine for CountingPause {
    fn pause(&mut self, duration: Duration, _stop: &AtomicBool) -> anyhow::Result<()> {
        self.pauses += 1;
        self.last_duration = Some(duration);
        Ok(())
    }
}

#[test]
fn breaks_run_before_characters_and_never_mid_character() {
    let cfg = SimConfig {
        break_interval_ms: 0,
        break_interval_jitter_ms: 0,
        ..SimConfig::instant()
    };
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut rng = StdRng::seed_from_u64(21);
    let mut sink = RecordingSink::new(Point::new(0, 0));
    let mut breaks = CountingPause {
        pauses: 0,
        last_duration: None,
    };
    let mut state = SessionState::new(clock.now());

    Typist::new(
        &cfg,
        Variant::Enhanced.capabilities(),
        &mut sink,
        &mut breaks,
        &clock,
        &mut rng,
        &stop,
        &mut state,
    )
    .type_text("hi")
    .expect("typing should succeed");

    // An always-due interval pauses once per character, never inside one.
    assert_eq!(breaks.pauses, 2);
    let duration = breaks.last_duration.expect("a break must have run");
    assert!((90..=150).contains(&duration.as_secs()));
    assert_eq!(typed_text(&sink.events).unwrap(), "hi");
}

#[test]
fn basic_variant_never_breaks_even_when_due() {
    let cfg = SimConfig {
        break_interval_ms: 0,
        break_interval_jitter_ms: 0,
        drift_interval_ms: 0,
        ..SimConfig::instant()
    };
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut rng = StdRng::seed_from_u64(22);
    let mut sink = RecordingSink::new(Point::new(0, 0));
    let mut breaks = CountingPause {
        pauses: 0,
        last_duration: None,
    };
    let mut state = SessionState::new(clock.now());

    Typist::new(
        &cfg,
        Variant::Basic.capabilities(),
        &mut sink,
        &mut breaks,
        &clock,
        &mut rng,
        &stop,
        &mut state,
    )
    .type_text("hi")
    .expect("typing should succeed");

    assert_eq!(breaks.pauses, 0);
    let moves = sink
        .events
        .iter()
        .filter(|event| matches!(event, Event::CursorMove { .. }))
        .count();
    assert_eq!(moves, 0, "basic variant must not drift");
}
