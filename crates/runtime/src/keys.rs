//! Terminal keyboard for human demonstrations.
//!
//! Each line typed on stdin replaces the set of held keys with the characters
//! on that line; an empty line releases everything.

use std::io::BufRead;
use std::thread::JoinHandle;

use embodied::SharedKeys;

fn apply_line(keys: &SharedKeys, line: &str) {
    keys.set(line.chars().filter(|c| !c.is_whitespace()));
}

/// Read stdin on a background thread until it closes.
pub fn spawn_stdin_listener(keys: SharedKeys) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("keyboard".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        apply_line(&keys, &line);
                        tracing::debug!(keys = %line.trim(), "holding keys");
                    }
                    Err(e) => {
                        tracing::error!("error reading keyboard input: {e:?}");
                        break;
                    }
                }
            }
            keys.clear();
            tracing::info!("keyboard input closed");
        })
}
