//! Script playback.

use anyhow::Context;
use scrawl_core::{Canvas, CanvasConfig, ElementId, FrameStats, HistoryController, Tool};
use serde::Serialize;

use crate::clipboard::MemoryClipboard;
use crate::error::HeadlessError;
use crate::renderer::{DrawCommand, RecordingRenderer};
use crate::script::Script;
use crate::HeadlessConfig;

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Per-frame counters.
    pub frames: Vec<FrameStats>,
    /// Live elements after the last frame.
    pub elements: usize,
    /// Selection after the last frame.
    pub selection: Vec<ElementId>,
    /// Active tool after the last frame.
    pub tool: Tool,
    /// Whether debug outlines are on.
    pub debug_mode: bool,
    /// Checkpoints on the undo stack, current state included.
    pub undo_depth: usize,
    /// Textures uploaded during the run.
    pub textures_loaded: u64,
    /// Draw calls of the last frame, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_log: Option<Vec<DrawCommand>>,
}

/// Load everything `config` points at and play the script.
///
/// # Errors
///
/// Returns an error if the script, canvas config or clipboard image cannot
/// be loaded.
pub fn run(config: &HeadlessConfig) -> anyhow::Result<RunSummary> {
    let mut script = match &config.script {
        Some(path) => Script::load(path)
            .with_context(|| format!("loading script {}", path.display()))?,
        None => Script::default(),
    };
    script.pad_idle(config.idle_frames);

    let canvas_config = match &config.canvas_config {
        Some(path) => load_canvas_config(path)
            .with_context(|| format!("loading canvas config {}", path.display()))?,
        None => CanvasConfig::default(),
    };

    let mut clipboard = MemoryClipboard::new();
    if let Some(path) = &config.clipboard_image {
        clipboard = clipboard
            .with_image_file(path)
            .context("seeding clipboard")?;
    }
    if let Some(text) = &config.clipboard_text {
        clipboard = clipboard.with_text(text.clone());
    }

    Ok(play(
        &script,
        canvas_config,
        &mut clipboard,
        config.print_draw_log,
    ))
}

/// Replay `script` on a fresh canvas.
pub fn play(
    script: &Script,
    canvas_config: CanvasConfig,
    clipboard: &mut MemoryClipboard,
    keep_draw_log: bool,
) -> RunSummary {
    let mut canvas = Canvas::new(canvas_config);
    let mut renderer = RecordingRenderer::new();
    let mut frames = Vec::with_capacity(script.frames.len());
    let mut last_frame = Vec::new();

    for frame in &script.frames {
        canvas.set_overlay_capture(frame.overlay.pointer, frame.overlay.keyboard);
        let stats = canvas.frame(frame.input.clone(), clipboard, &mut renderer);
        frames.push(stats);
        last_frame = renderer.take_frame();
    }

    tracing::info!(
        "Played {} frames, {} elements remain",
        frames.len(),
        canvas.store().len()
    );

    RunSummary {
        frames,
        elements: canvas.store().len(),
        selection: canvas.selection().ids().to_vec(),
        tool: canvas.tool(),
        debug_mode: canvas.debug_mode(),
        undo_depth: canvas.history().map_or(0, HistoryController::undo_depth),
        textures_loaded: renderer.textures_loaded(),
        draw_log: keep_draw_log.then_some(last_frame),
    }
}

fn load_canvas_config(path: &std::path::Path) -> Result<CanvasConfig, HeadlessError> {
    let json = std::fs::read_to_string(path).map_err(|source| HeadlessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| HeadlessError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
