use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::motion::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    Pressed,
    Released,
}

/// The OS input-injection surface the simulator drives.
///
/// The session owns exactly one sink and issues calls strictly in sequence;
/// implementations never have to cope with overlapping injections.
pub trait InputSink {
    fn cursor_position(&mut self) -> Result<Point>;
    fn move_cursor(&mut self, to: Point) -> Result<()>;
    fn click(&mut self, button: Button) -> Result<()>;
    fn double_click(&mut self, button: Button) -> Result<()>;
    /// Scroll the wheel down by roughly `pixels`.
    fn scroll_down(&mut self, pixels: i32) -> Result<()>;
    fn key(&mut self, keycode: u32, state: KeyState) -> Result<()>;

    /// Best-effort release of anything the sink may have left held down
    /// after an aborted run.
    fn neutralize(&mut self) -> Result<()> {
        Ok(())
    }
}
