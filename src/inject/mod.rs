//! OS input-injection backends.

#[cfg(feature = "x11")]
pub mod x11;

use anyhow::{anyhow, Result};

fn env_is_set(name: &str) -> bool {
    std::env::var_os(name)
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}

fn environment_details() -> String {
    let xdg_session_type = std::env::var("XDG_SESSION_TYPE").unwrap_or_default();

    let mut parts = Vec::new();
    if env_is_set("DISPLAY") {
        parts.push("DISPLAY is set".to_string());
    }
    if env_is_set("WAYLAND_DISPLAY") {
        parts.push("WAYLAND_DISPLAY is set".to_string());
    }
    if !xdg_session_type.is_empty() {
        parts.push(format!("XDG_SESSION_TYPE={xdg_session_type}"));
    }

    if parts.is_empty() {
        "No display session detected (expected an X11 environment).".to_string()
    } else {
        format!("Detected environment: {}", parts.join(", "))
    }
}

/// Check that X11 injection can work here, before connecting.
///
/// Pointer injection goes through XTEST, so an X11 session (or XWayland with
/// the extension) is required; Wayland-native sessions without XWayland
/// cannot host this simulator.
pub fn require_x11_environment() -> Result<()> {
    if !cfg!(feature = "x11") {
        return Err(anyhow!(
            "X11 injection is disabled in this build. (Rebuild with `--features x11`.) {}",
            environment_details()
        ));
    }

    if !env_is_set("DISPLAY") {
        return Err(anyhow!(
            "No X11 display detected; input injection needs a DISPLAY. {}",
            environment_details()
        ));
    }

    Ok(())
}
