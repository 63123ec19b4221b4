//! XTEST-based input sink.

use anyhow::{anyhow, Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, ConnectionExt as _};
use x11rb::protocol::xtest;
use x11rb::protocol::xtest::ConnectionExt as _;
use x11rb::rust_connection::RustConnection;

use crate::input::{Button, InputSink, KeyState};
use crate::keyboard::{KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_RIGHTCTRL, KEY_RIGHTSHIFT};
use crate::motion::Point;

/// One X11 wheel detent moves content by roughly this many pixels.
const WHEEL_DETENT_PX: i32 = 15;
const WHEEL_DOWN_BUTTON: u8 = 5;

fn evdev_to_x11_keycode(evdev_keycode: u32) -> Result<u8> {
    // On most Linux Xorg setups, X11 keycodes are evdev + 8.
    let x11 = evdev_keycode
        .checked_add(8)
        .ok_or_else(|| anyhow!("evdev keycode overflow"))?;
    u8::try_from(x11).map_err(|_| anyhow!("evdev keycode {evdev_keycode} out of range for X11"))
}

fn button_detail(button: Button) -> u8 {
    match button {
        Button::Left => 1,
        Button::Middle => 2,
        Button::Right => 3,
    }
}

fn screen_coord(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

fn query_xtest(conn: &impl Connection) -> Result<()> {
    let ext = conn
        .extension_information(xtest::X11_EXTENSION_NAME)
        .context("failed to query X11 extension info")?;

    if ext.is_none() {
        return Err(anyhow!(
            "input injection requires the XTEST extension (not present on this X server)"
        ));
    }

    // Optional sanity check: ask for a version. If this fails, we still treat
    // the extension as unsupported.
    let _ = conn
        .xtest_get_version(2, 2)
        .ok()
        .and_then(|cookie| cookie.reply().ok());

    Ok(())
}

pub struct X11Sink {
    conn: RustConnection,
    root: xproto::Window,
}

impl X11Sink {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("failed to connect to X11")?;
        query_xtest(&conn)?;

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| anyhow!("invalid X11 screen index"))?
            .root;

        Ok(Self { conn, root })
    }

    fn fake_input(&self, type_: u8, detail: u8, x: i16, y: i16) -> Result<()> {
        self.conn
            .xtest_fake_input(type_, detail, x11rb::CURRENT_TIME, self.root, x, y, 0)
            .context("failed to send XTEST fake input")?;
        self.conn.flush().context("failed to flush X11 connection")?;
        Ok(())
    }

    fn button_tap(&self, detail: u8) -> Result<()> {
        self.fake_input(xproto::BUTTON_PRESS_EVENT, detail, 0, 0)?;
        self.fake_input(xproto::BUTTON_RELEASE_EVENT, detail, 0, 0)
    }
}

impl InputSink for X11Sink {
    fn cursor_position(&mut self) -> Result<Point> {
        let pointer = self
            .conn
            .query_pointer(self.root)
            .context("failed to query the pointer")?
            .reply()
            .context("failed to read the pointer reply")?;

        Ok(Point {
            x: i32::from(pointer.root_x),
            y: i32::from(pointer.root_y),
        })
    }

    fn move_cursor(&mut self, to: Point) -> Result<()> {
        // XTEST motion with detail 0 is an absolute warp.
        self.fake_input(
            xproto::MOTION_NOTIFY_EVENT,
            0,
            screen_coord(to.x),
            screen_coord(to.y),
        )
    }

    fn click(&mut self, button: Button) -> Result<()> {
        self.button_tap(button_detail(button))
    }

    fn double_click(&mut self, button: Button) -> Result<()> {
        let detail = button_detail(button);
        self.button_tap(detail)?;
        std::thread::sleep(std::time::Duration::from_millis(50));
        self.button_tap(detail)
    }

    fn scroll_down(&mut self, pixels: i32) -> Result<()> {
        let detents = (pixels.max(0) + WHEEL_DETENT_PX - 1) / WHEEL_DETENT_PX;
        for _ in 0..detents {
            self.button_tap(WHEEL_DOWN_BUTTON)?;
        }
        Ok(())
    }

    fn key(&mut self, keycode: u32, state: KeyState) -> Result<()> {
        let type_ = match state {
            KeyState::Pressed => xproto::KEY_PRESS_EVENT,
            KeyState::Released => xproto::KEY_RELEASE_EVENT,
        };
        self.fake_input(type_, evdev_to_x11_keycode(keycode)?, 0, 0)
    }

    fn neutralize(&mut self) -> Result<()> {
        // Releases may be sent for keys that are already up; that is harmless
        // and avoids a stuck modifier after an aborted run.
        for keycode in [
            KEY_LEFTSHIFT,
            KEY_RIGHTSHIFT,
            KEY_LEFTCTRL,
            KEY_RIGHTCTRL,
            KEY_LEFTALT,
        ] {
            let code = evdev_to_x11_keycode(keycode)?;
            let _ = self.conn.xtest_fake_input(
                xproto::KEY_RELEASE_EVENT,
                code,
                x11rb::CURRENT_TIME,
                self.root,
                0,
                0,
                0,
            );
        }
        self.conn.flush().context("failed to flush X11 connection")?;
        Ok(())
    }
}
