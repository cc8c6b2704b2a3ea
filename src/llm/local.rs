use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Run a prompt through the LM Studio `lms chat` CLI and return its stdout.
pub async fn complete_with_lms(lms_path: &str, model: &str, prompt: &str) -> Result<String> {
    let lms_binary = if lms_path.is_empty() {
        find_lms_binary()
            .context("Could not find lms CLI. Install LM Studio or set local_lms_path in config.")?
    } else {
        lms_path.to_string()
    };

    tracing::info!("Running LM Studio CLI: {} chat {}", lms_binary, model);

    let output = Command::new(&lms_binary)
        .args(["chat", model, "-p", prompt, "-y"])
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .context("Failed to spawn lms process. Is LM Studio installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("lms exited with status {}: {}", output.status, stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(strip_terminal_escapes(&stdout).trim().to_string())
}

/// Drop CSI escape sequences, carriage returns and NULs that the CLI emits
/// while rendering its progress spinner.
fn strip_terminal_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' if chars.peek() == Some(&'[') => {
                chars.next();
                for next in chars.by_ref() {
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            '\r' | '\x00' => {}
            _ => result.push(c),
        }
    }

    result
}

pub fn find_lms_binary() -> Option<String> {
    let home = std::env::var("HOME").ok()?;
    let lmstudio_path = format!("{}/.lmstudio/bin/lms", home);

    if Path::new(&lmstudio_path).exists() {
        return Some(lmstudio_path);
    }

    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join("lms"))
            .find(|candidate| candidate.is_file())
            .map(|p| p.to_string_lossy().into_owned())
    })
}
