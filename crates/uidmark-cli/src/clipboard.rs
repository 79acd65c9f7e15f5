//! System clipboard access
//!
//! Shells out to the platform tool:
//! - macOS: pbcopy
//! - Linux: xclip, falling back to xsel
//! - Windows: clip.exe

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// Copy `text` to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        pipe_to(Command::new("pbcopy"), "pbcopy", text)
    }

    #[cfg(target_os = "linux")]
    {
        let mut xclip = Command::new("xclip");
        xclip.args(["-selection", "clipboard"]);
        match pipe_to(xclip, "xclip", text) {
            Ok(()) => Ok(()),
            Err(first) => {
                let mut xsel = Command::new("xsel");
                xsel.args(["--clipboard", "--input"]);
                pipe_to(xsel, "xsel", text).with_context(|| {
                    format!("{}. Install xclip or xsel to use the clipboard.", first)
                })
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        pipe_to(Command::new("clip"), "clip", text)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = text;
        bail!("Clipboard not supported on this platform")
    }
}

/// Run `command` with `text` on its stdin and wait for it
fn pipe_to(mut command: Command, name: &str, text: &str) -> Result<()> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn {}", name))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {}", name))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {}", name))?;

    if !status.success() {
        bail!("{} exited with error", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_pipe_to_success_and_failure() {
        assert!(pipe_to(Command::new("cat"), "cat", "hello").is_ok());
        assert!(pipe_to(Command::new("false"), "false", "").is_err());
    }

    #[test]
    fn test_pipe_to_missing_command() {
        let err = pipe_to(
            Command::new("uidmark-no-such-clipboard-tool"),
            "uidmark-no-such-clipboard-tool",
            "x",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to spawn"));
    }
}
