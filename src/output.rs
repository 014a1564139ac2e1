// ABOUTME: Output formatting for one-shot command results.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    #[default]
    Normal,
    /// Only the final result, for CI
    Quiet,
    /// `{"image": ..}` or `{"err": ..}`, matching the server's bodies
    Json,
}

/// Handles CLI output based on the configured mode.
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

    pub fn mode(&self) -> OutputMode {
        self.mode
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

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            eprintln!("{message}");
        }
    }

    /// Report the image tag (or removed name) a pipeline produced.
    pub fn success(&self, image: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    eprintln!("done ({:.1}s)", elapsed);
                }
                println!("{image}");
            }
            OutputMode::Quiet => println!("{image}"),
            OutputMode::Json => print_json(&ImageBody { image }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => print_json(&ErrBody { err: message }),
        }
    }
}

fn print_json<T: Serialize>(body: &T) {
    if let Ok(json) = serde_json::to_string(body) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct ImageBody<'a> {
    image: &'a str,
}

#[derive(Serialize)]
struct ErrBody<'a> {
    err: &'a str,
}
