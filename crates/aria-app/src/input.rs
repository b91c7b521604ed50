//! Terminal input: one line per user action.

use std::io::BufRead;
use std::sync::mpsc;

use aria_common::Emotion;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A chat message for the avatar.
    Say(String),
    /// Click/touch; counts as a user gesture for audio.
    Click,
    /// Pointer moved to pixel coordinates.
    Look { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
    Character(String),
    Clip,
    Emotion(Emotion),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Some(Command::Say(line.to_string())));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match (name, args.as_slice()) {
        ("click", []) => Command::Click,
        ("look", [x, y]) => {
            let (x, y) = (number(x)?, number(y)?);
            Command::Look { x, y }
        }
        ("resize", [w, h]) => Command::Resize {
            width: number(w)?,
            height: number(h)?,
        },
        ("character", [id]) => Command::Character((*id).to_string()),
        ("clip", []) => Command::Clip,
        ("emotion", [label]) => Command::Emotion(Emotion::parse_lenient(label)),
        ("quit" | "q", []) => Command::Quit,
        _ => return Err(ParseError(format!("unknown command: :{rest}"))),
    };
    Ok(Some(command))
}

fn number(s: &str) -> Result<f32, ParseError> {
    s.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError(format!("not a number: {s}")))
}

/// Read stdin on a background thread. The channel closes at EOF.
pub fn spawn_stdin_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    let spawned = std::thread::Builder::new()
        .name("aria-stdin".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed");
                        break;
                    }
                };
                match parse_line(&line) {
                    Ok(Some(cmd)) => {
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{e}"),
                }
            }
            tracing::debug!("stdin closed");
        });
    if let Err(e) = spawned {
        tracing::error!(error = %e, "failed to spawn stdin reader");
    }
    rx
}
