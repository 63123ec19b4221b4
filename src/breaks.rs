//! Long scheduled pauses, optionally with scripted application switching.

use std::process::Command;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::util::sleep_interruptible;

/// How a scheduled break is spent. Implementations must return promptly once
/// `stop` is set.
pub trait BreakRoutine {
    fn pause(&mut self, duration: Duration, stop: &AtomicBool) -> Result<()>;
}

/// Waits out the break without touching any other application.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainWait;

impl BreakRoutine for PlainWait {
    fn pause(&mut self, duration: Duration, stop: &AtomicBool) -> Result<()> {
        sleep_interruptible(stop, duration.as_millis() as u64);
        eprintln!("Resuming typing...");
        Ok(())
    }
}

/// macOS break: hop to the browser, refresh it, sit in the chat app for the
/// pause, then return to the editor. Any failure in the scripted sequence
/// degrades to a plain wait.
#[derive(Debug, Clone)]
pub struct AppSwitchPause {
    pub browser_app: String,
    pub chat_app: String,
    pub editor_app: String,
}

impl Default for AppSwitchPause {
    fn default() -> Self {
        Self {
            browser_app: "Google Chrome".to_string(),
            chat_app: "Slack".to_string(),
            editor_app: "Cursor".to_string(),
        }
    }
}

impl AppSwitchPause {
    fn open_app(&self, name: &str) -> Result<()> {
        let status = Command::new("open")
            .args(["-a", name])
            .status()
            .with_context(|| format!("failed to run `open -a {name}`"))?;
        ensure!(status.success(), "`open -a {name}` exited with {status}");
        Ok(())
    }

    fn refresh_browser(&self) -> Result<()> {
        let activate = format!("tell application \"{}\" to activate", self.browser_app);
        let status = Command::new("osascript")
            .args([
                "-e",
                &activate,
                "-e",
                "tell application \"System Events\" to keystroke \"r\" using command down",
            ])
            .status()
            .context("failed to run osascript")?;
        ensure!(status.success(), "osascript exited with {status}");
        Ok(())
    }

    fn switch_apps(&self, duration: Duration, stop: &AtomicBool) -> Result<()> {
        eprintln!("Opening {}...", self.browser_app);
        self.open_app(&self.browser_app)?;
        sleep_interruptible(stop, 1000);

        eprintln!("Refreshing the browser page...");
        self.refresh_browser()?;
        sleep_interruptible(stop, 1000);

        eprintln!("Opening {}...", self.chat_app);
        self.open_app(&self.chat_app)?;
        sleep_interruptible(stop, 1000);

        eprintln!(
            "Pausing in {} for {} seconds...",
            self.chat_app,
            duration.as_secs()
        );
        sleep_interruptible(stop, duration.as_millis() as u64);

        eprintln!("Returning to {}...", self.editor_app);
        self.open_app(&self.editor_app)?;
        sleep_interruptible(stop, 1000);
        Ok(())
    }
}

impl BreakRoutine for AppSwitchPause {
    fn pause(&mut self, duration: Duration, stop: &AtomicBool) -> Result<()> {
        if let Err(err) = self.switch_apps(duration, stop) {
            eprintln!("App switching failed ({err:#}); falling back to a plain wait.");
            sleep_interruptible(stop, duration.as_millis() as u64);
        }
        eprintln!("Resuming typing...");
        Ok(())
    }
}

/// Break routine for the current platform. Only macOS has the scripted
/// application dance; everywhere else waits in place.
pub fn platform_routine() -> Box<dyn BreakRoutine> {
    if cfg!(target_os = "macos") {
        Box::new(AppSwitchPause::default())
    } else {
        Box::new(PlainWait)
    }
}
