//! # Scrawl Headless
//!
//! Headless host for the Scrawl canvas core.
//!
//! Replays a JSON script of input frames against a [`scrawl_core::Canvas`],
//! with an in-memory clipboard and a renderer that records draw calls
//! instead of drawing. Useful for reproducing interaction bugs and for
//! end-to-end tests without a window.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p scrawl-headless -- --script session.json --clipboard-image logo.png
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `HeadlessConfig` - What to load and how to report
//! - `MemoryClipboard` - Clipboard provider, optionally seeded from a file
//! - `RecordingRenderer` - Renderer that logs every draw call
//! - `run` - Loads everything and plays the script

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod clipboard;
mod error;
mod renderer;
mod runner;
mod script;

pub use clipboard::{to_padded_bgra, MemoryClipboard};
pub use error::HeadlessError;
pub use renderer::{DrawCommand, RecordingRenderer};
pub use runner::{play, run, RunSummary};
pub use script::{OverlayCapture, Script, ScriptFrame};

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for scrawl-headless.
#[derive(Debug, Clone, Parser)]
#[command(name = "scrawl-headless")]
#[command(about = "Replay scripted input against the Scrawl canvas")]
#[command(version)]
pub struct CliArgs {
    /// JSON script of input frames
    #[arg(long, env = "SCRAWL_SCRIPT")]
    pub script: Option<PathBuf>,

    /// JSON canvas configuration (styles and thresholds)
    #[arg(long, env = "SCRAWL_CANVAS_CONFIG")]
    pub canvas_config: Option<PathBuf>,

    /// Image file placed on the clipboard before playback
    #[arg(long, env = "SCRAWL_CLIPBOARD_IMAGE")]
    pub clipboard_image: Option<PathBuf>,

    /// Text placed on the clipboard before playback
    #[arg(long)]
    pub clipboard_text: Option<String>,

    /// Extra empty frames after the script, to flush deferred commands
    #[arg(long, default_value = "1")]
    pub idle_frames: usize,

    /// Include the last frame's draw calls in the summary
    #[arg(long)]
    pub draw_log: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// Headless run configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Script to play; an empty script when absent.
    pub script: Option<PathBuf>,
    /// Canvas configuration file; defaults when absent.
    pub canvas_config: Option<PathBuf>,
    /// Clipboard image fixture.
    pub clipboard_image: Option<PathBuf>,
    /// Clipboard text.
    pub clipboard_text: Option<String>,
    /// Empty frames appended to the script.
    pub idle_frames: usize,
    /// Whether the summary carries the last frame's draw calls.
    pub print_draw_log: bool,
    /// Whether logs are JSON lines.
    pub log_json: bool,
}

impl From<CliArgs> for HeadlessConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            script: args.script,
            canvas_config: args.canvas_config,
            clipboard_image: args.clipboard_image,
            clipboard_text: args.clipboard_text,
            idle_frames: args.idle_frames,
            print_draw_log: args.draw_log,
            log_json: args.log_json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["scrawl-headless"]);
        let config = HeadlessConfig::from(args);
        assert!(config.script.is_none());
        assert_eq!(config.idle_frames, 1);
        assert!(!config.print_draw_log);
    }

    #[test]
    fn test_cli_flags() {
        let args = CliArgs::parse_from([
            "scrawl-headless",
            "--script",
            "session.json",
            "--clipboard-text",
            "hello",
            "--idle-frames",
            "3",
            "--draw-log",
        ]);
        let config = HeadlessConfig::from(args);
        assert_eq!(config.script, Some(PathBuf::from("session.json")));
        assert_eq!(config.clipboard_text.as_deref(), Some("hello"));
        assert_eq!(config.idle_frames, 3);
        assert!(config.print_draw_log);
    }
}
