// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::ssh::{LineSink, OutputChannel};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
///
/// Also serves as the line sink for streamed remote command output, so
/// progress reporting and command output share one collaborator.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet mode).
    pub fn progress(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonEvent::plain("progress", message)) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print a success message, with the elapsed time when a timer ran.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                if self.start_time.is_some() {
                    println!("{message} ({:.1}s)", self.elapsed_secs());
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    duration_secs: self.start_time.map(|t| t.elapsed().as_secs_f64()),
                    ..JsonEvent::plain("success", message)
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print a warning message (kept on stderr in quiet mode).
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Warning: {message}");
            }
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonEvent::plain("warning", message)) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonEvent::plain("error", message)) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

impl LineSink for Output {
    fn line(&self, channel: OutputChannel, line: &str) {
        match self.mode {
            OutputMode::Normal => match channel {
                OutputChannel::Stdout => println!("{line}"),
                OutputChannel::Stderr => eprintln!("{line}"),
            },
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let event = JsonEvent {
                    stream: Some(match channel {
                        OutputChannel::Stdout => "stdout",
                        OutputChannel::Stderr => "stderr",
                    }),
                    ..JsonEvent::plain("output", line)
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> JsonEvent<'a> {
    fn plain(event: &'a str, message: &'a str) -> Self {
        Self {
            event,
            message,
            stream: None,
            duration_secs: None,
        }
    }
}
