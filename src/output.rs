// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Renders progress events in normal, quiet (CI), and JSON modes.

use crate::reconcile::{ProgressEvent, PullProgress};
use serde::Serialize;
use std::io::Write;

const BAR_WIDTH: usize = 50;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with an inline download bar
    Normal,
    /// Minimal output for CI (only final result and errors)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    bar_open: bool,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            bar_open: false,
        }
    }

    /// Render one progress event.
    pub fn handle(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ImageFound => self.step("image_found", "Found image locally"),
            ProgressEvent::PullStarted => self.step("pull_started", "Pulling image"),
            ProgressEvent::PullDownloading(progress) => self.downloading(progress),
            ProgressEvent::PullExtracting => {
                self.finish_bar();
                self.step("extracting", "Extracting image");
            }
            ProgressEvent::PullDone => {
                self.finish_bar();
                self.step("pull_done", "Image ready");
            }
            ProgressEvent::ContainerFound => {
                self.step("container_found", "Container already exists");
            }
            ProgressEvent::ContainerConfigModified => {
                self.step("config_modified", "Container configuration changed, replacing");
            }
            ProgressEvent::ContainerCreated => self.step("container_created", "Creating container"),
            ProgressEvent::ContainerStarted(id) => {
                match self.mode {
                    OutputMode::Normal => println!("Container started: {id}"),
                    OutputMode::Quiet => {}
                    OutputMode::Json => {
                        Self::json_line(&JsonEvent {
                            event: "container_started",
                            message: None,
                            percent: None,
                            id: Some(id.as_str()),
                        });
                    }
                }
            }
        }
    }

    /// Print the final result of an operation (shown in every mode).
    pub fn result(&mut self, message: &str) {
        self.finish_bar();
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => Self::json_line(&JsonEvent {
                event: "done",
                message: Some(message),
                percent: None,
                id: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&mut self, message: &str) {
        self.finish_bar();
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message: Some(message),
                    percent: None,
                    id: None,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    fn step(&mut self, event: &str, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => Self::json_line(&JsonEvent {
                event,
                message: Some(message),
                percent: None,
                id: None,
            }),
        }
    }

    fn downloading(&mut self, progress: &PullProgress) {
        match self.mode {
            OutputMode::Normal => self.draw_bar(progress),
            OutputMode::Quiet => {}
            OutputMode::Json => Self::json_line(&JsonEvent {
                event: "downloading",
                message: None,
                percent: Some(progress.percent()),
                id: None,
            }),
        }
    }

    /// Redraw the inline download bar on the current line.
    ///
    /// Early percentages may shrink as more layers announce their totals;
    /// the bar simply renders whatever the accumulator reports.
    fn draw_bar(&mut self, progress: &PullProgress) {
        let percent = progress.percent().clamp(0.0, 100.0);
        let filled = (percent / 100.0 * BAR_WIDTH as f64).round() as usize;
        print!(
            "\rDownloading [{}{}] {:5.1}%",
            "=".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            percent
        );
        let _ = std::io::stdout().flush();
        self.bar_open = true;
    }

    fn finish_bar(&mut self) {
        if self.bar_open {
            println!();
            self.bar_open = false;
        }
    }

    fn json_line(event: &JsonEvent<'_>) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}
