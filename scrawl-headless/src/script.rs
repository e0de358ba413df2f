//! Scripted input: a JSON list of frames replayed against the canvas.
//!
//! ```json
//! {
//!   "frames": [
//!     { "pointer": [120.0, 80.0], "events": [{ "type": "Paste" }] },
//!     { "events": [{ "type": "KeyPressed", "data": { "key": { "key": "Tab" } } }] },
//!     { "overlay": { "pointer": true } }
//!   ]
//! }
//! ```

use std::path::Path;

use scrawl_core::FrameInput;
use serde::{Deserialize, Serialize};

use crate::error::HeadlessError;

/// Which input the simulated GUI overlay captures during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayCapture {
    /// Pointer input is swallowed.
    #[serde(default)]
    pub pointer: bool,
    /// Keyboard and text input is swallowed.
    #[serde(default)]
    pub keyboard: bool,
}

/// One scripted frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptFrame {
    /// Pointer and events for the frame.
    #[serde(flatten)]
    pub input: FrameInput,
    /// Overlay capture for the frame.
    #[serde(default)]
    pub overlay: OverlayCapture,
}

/// A full script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Frames in playback order.
    #[serde(default)]
    pub frames: Vec<ScriptFrame>,
}

impl Script {
    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::Io`] if the file cannot be read and
    /// [`HeadlessError::Parse`] if it is not a valid script.
    pub fn load(path: &Path) -> Result<Self, HeadlessError> {
        let json = std::fs::read_to_string(path).map_err(|source| HeadlessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script: Self = serde_json::from_str(&json).map_err(|source| HeadlessError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded {} frames from {}", script.frames.len(), path.display());
        Ok(script)
    }

    /// Append `count` frames with no input.
    pub fn pad_idle(&mut self, count: usize) {
        self.frames
            .extend(std::iter::repeat_with(ScriptFrame::default).take(count));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use scrawl_core::EventKind;

    use super::*;

    #[test]
    fn test_parse_frames() {
        let json = r#"{
            "frames": [
                { "pointer": [1.0, 2.0], "events": [{ "type": "Paste" }] },
                { "overlay": { "keyboard": true } },
                {}
            ]
        }"#;
        let script: Script = serde_json::from_str(json).expect("should parse");

        assert_eq!(script.frames.len(), 3);
        assert_eq!(script.frames[0].input.pointer, Some(Vec2::new(1.0, 2.0)));
        assert_eq!(script.frames[0].input.events, vec![EventKind::Paste]);
        assert!(script.frames[1].overlay.keyboard);
        assert!(!script.frames[1].overlay.pointer);
        assert_eq!(script.frames[2], ScriptFrame::default());
    }

    #[test]
    fn test_pad_idle() {
        let mut script = Script::default();
        script.pad_idle(3);
        assert_eq!(script.frames.len(), 3);
        assert!(script.frames.iter().all(|f| f.input.events.is_empty()));
    }
}
