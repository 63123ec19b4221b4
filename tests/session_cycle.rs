use std::sync::atomic::AtomicBool;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use scrivener::breaks::PlainWait;
use scrivener::config::{SimConfig, Variant};
use scrivener::motion::Point;
use scrivener::schedule::{Clock, ManualClock, SessionState};
use scrivener::session::{self, Outcome};
use scrivener::sim::{self, Event, RecordingSink};

#[test]
fn one_cycle_clicks_twice_types_the_buffer_and_advances_the_counter() {
    let cfg = SimConfig::instant();
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut rng = StdRng::seed_from_u64(0);
    let mut sink = RecordingSink::new(Point::new(50, 50));
    let mut breaks = PlainWait;
    let mut state = SessionState::new(clock.now());

    session::run_cycle(
        "hi",
        &cfg,
        Variant::Enhanced.capabilities(),
        &mut sink,
        &mut breaks,
        &clock,
        &mut rng,
        &stop,
        &mut state,
    )
    .expect("the cycle should succeed");

    let stats = sim::stats(&sink.events);
    assert_eq!(stats.clicks, 2);
    assert_eq!(sink.key_presses().count(), 2);
    assert_eq!(sim::typed_text(&sink.events).unwrap(), "hi");
    assert_eq!(state.cycle(), 2);
    assert_eq!(state.chars_typed(), 2);
}

#[test]
fn cycle_anchors_shift_down_each_iteration() {
    let cfg = SimConfig::instant();
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut rng = StdRng::seed_from_u64(9);
    let mut sink = RecordingSink::new(Point::new(0, 0));
    let mut breaks = PlainWait;
    let mut state = SessionState::new(clock.now());

    for _ in 0..2 {
        session::run_cycle(
            "x",
            &cfg,
            Variant::Enhanced.capabilities(),
            &mut sink,
            &mut breaks,
            &clock,
            &mut rng,
            &stop,
            &mut state,
        )
        .expect("the cycle should succeed");
    }

    // With ±5 px inaccuracy, the first cycle's row glide lands near
    // (200, 400) and the second near (200, 450).
    let near = |x: i32, y: i32, tx: i32, ty: i32| {
        (x - tx).abs() <= cfg.pointer_inaccuracy_px && (y - ty).abs() <= cfg.pointer_inaccuracy_px
    };
    let landed_near = |tx: i32, ty: i32| {
        sink.events.iter().any(|event| match event {
            Event::CursorMove { x, y } => near(*x, *y, tx, ty),
            _ => false,
        })
    };

    assert!(landed_near(200, 400), "first cycle must visit the row anchor");
    assert!(
        landed_near(200, 450),
        "second cycle must visit the shifted row anchor"
    );
    assert_eq!(state.cycle(), 3);
}

#[test]
fn run_stops_immediately_when_the_flag_is_set() {
    let cfg = SimConfig::instant();
    let clock = ManualClock::new();
    let stop = AtomicBool::new(true);
    let mut rng = StdRng::seed_from_u64(1);
    let mut sink = RecordingSink::new(Point::new(0, 0));
    let mut breaks = PlainWait;

    let outcome = session::run(
        "hi",
        &cfg,
        Variant::Enhanced.capabilities(),
        &mut sink,
        &mut breaks,
        &clock,
        &mut rng,
        &stop,
    )
    .expect("a stopped run is not an error");

    assert_eq!(outcome, Outcome::Stopped);
    assert!(sink.events.is_empty(), "no input may be injected after stop");
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let cfg = SimConfig {
        key_delay_min_ms: 10,
        key_delay_max_ms: 5,
        ..SimConfig::instant()
    };
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut rng = StdRng::seed_from_u64(2);
    let mut sink = RecordingSink::new(Point::new(0, 0));
    let mut breaks = PlainWait;

    let err = session::run(
        "hi",
        &cfg,
        Variant::Basic.capabilities(),
        &mut sink,
        &mut breaks,
        &clock,
        &mut rng,
        &stop,
    )
    .unwrap_err();

    assert!(format!("{err:#}").contains("key_delay_min_ms"));
    assert!(sink.events.is_empty());
}
