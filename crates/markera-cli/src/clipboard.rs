//! Clipboard copy with a fallback: arboard first, then a platform
//! clipboard utility fed over stdin. Failures are logged only; the
//! caller's state is left unchanged when both mechanisms fail.

use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{error, warn};

pub fn copy(text: &str) -> bool {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()))
    {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "clipboard copy failed, trying fallback utility");
            copy_via_utility(text)
        }
    }
}

fn copy_via_utility(text: &str) -> bool {
    for command in fallback_commands() {
        let spawned = Command::new(command[0])
            .args(&command[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let Ok(mut child) = spawned else {
            continue;
        };
        if let Some(stdin) = child.stdin.as_mut() {
            if stdin.write_all(text.as_bytes()).is_err() {
                continue;
            }
        }
        drop(child.stdin.take());
        if matches!(child.wait(), Ok(status) if status.success()) {
            return true;
        }
    }
    error!("all clipboard mechanisms failed");
    false
}

#[cfg(target_os = "macos")]
fn fallback_commands() -> Vec<Vec<&'static str>> {
    vec![vec!["pbcopy"]]
}

#[cfg(not(target_os = "macos"))]
fn fallback_commands() -> Vec<Vec<&'static str>> {
    vec![vec!["wl-copy"], vec!["xclip", "-selection", "clipboard"]]
}
