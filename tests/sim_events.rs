use anyhow::Result;

use scrivener::input::{Button, InputSink, KeyState};
use scrivener::keyboard::{keystroke_for_char, KEY_LEFTSHIFT};
use scrivener::motion::Point;
use scrivener::sim::{self, Event, RecordingSink};

fn tap(sink: &mut RecordingSink, c: char) -> Result<()> {
    let stroke = keystroke_for_char(c).expect("test characters must be typeable");
    if stroke.shift {
        sink.key(KEY_LEFTSHIFT, KeyState::Pressed)?;
    }
    sink.key(stroke.keycode, KeyState::Pressed)?;
    sink.key(stroke.keycode, KeyState::Released)?;
    if stroke.shift {
        sink.key(KEY_LEFTSHIFT, KeyState::Released)?;
    }
    Ok(())
}

#[test]
fn typed_text_decodes_shifted_keystrokes() -> Result<()> {
    let mut sink = RecordingSink::new(Point::new(0, 0));
    for c in "Hello, World?".chars() {
        tap(&mut sink, c)?;
    }
    assert_eq!(sim::typed_text(&sink.events)?, "Hello, World?");
    Ok(())
}

#[test]
fn stats_bucket_every_event_kind() -> Result<()> {
    let mut sink = RecordingSink::new(Point::new(1, 1));
    sink.move_cursor(Point::new(5, 5))?;
    sink.click(Button::Left)?;
    sink.double_click(Button::Left)?;
    sink.scroll_down(50)?;
    tap(&mut sink, 'x')?;

    let stats = sim::stats(&sink.events);
    assert_eq!(stats.cursor_moves, 1);
    assert_eq!(stats.clicks, 2);
    assert_eq!(stats.scrolls, 1);
    assert_eq!(stats.key_events, 2);
    Ok(())
}

#[test]
fn recording_sink_tracks_its_own_cursor() -> Result<()> {
    let mut sink = RecordingSink::new(Point::new(10, 20));
    assert_eq!(sink.cursor_position()?, Point::new(10, 20));

    sink.move_cursor(Point::new(300, 400))?;
    assert_eq!(sink.cursor_position()?, Point::new(300, 400));
    Ok(())
}

#[test]
fn event_log_serializes_with_snake_case_tags() -> Result<()> {
    let events = vec![
        Event::CursorMove { x: 1, y: 2 },
        Event::Click {
            button: Button::Left,
        },
        Event::Scroll { pixels: 50 },
    ];

    let json = serde_json::to_string(&events)?;
    assert!(json.contains("\"type\":\"cursor_move\""));
    assert!(json.contains("\"button\":\"left\""));

    let back: Vec<Event> = serde_json::from_str(&json)?;
    assert_eq!(back, events);
    Ok(())
}
