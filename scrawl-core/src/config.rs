//! Canvas configuration: default styles and interaction thresholds.

use serde::{Deserialize, Serialize};

use crate::element::Color;
use crate::event::Tool;

/// Tunables for element styling and input handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Stroke thickness for new lines and arrows.
    pub stroke_thickness: f32,
    /// Stroke color for new lines and arrows.
    pub stroke_color: Color,
    /// Fill color of arrowheads.
    pub arrow_head_color: Color,
    /// Font size for new text.
    pub text_size: f32,
    /// Glyph spacing for new text.
    pub text_spacing: f32,
    /// Color for new text.
    pub text_color: Color,
    /// Extra margin around elements when hit testing.
    pub hit_slop: f32,
    /// Shorter drawn lines are discarded on release.
    pub min_line_length: f32,
    /// Outline thickness for focused elements.
    pub focus_outline_thickness: f32,
    /// Outline color for focused elements.
    pub focus_outline_color: Color,
    /// Outline thickness for unfocused elements in debug mode.
    pub debug_outline_thickness: f32,
    /// Outline color for unfocused elements in debug mode.
    pub debug_outline_color: Color,
    /// Whether debug outlines start enabled.
    pub debug_mode: bool,
    /// Tool active at startup.
    pub initial_tool: Tool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            stroke_thickness: 5.0,
            stroke_color: Color::BLACK,
            arrow_head_color: Color::ORANGE,
            text_size: 20.0,
            text_spacing: 1.0,
            text_color: Color::DARK_GRAY,
            hit_slop: 2.0,
            min_line_length: 2.0,
            focus_outline_thickness: 2.0,
            focus_outline_color: Color::BLUE,
            debug_outline_thickness: 1.0,
            debug_outline_color: Color::RED,
            debug_mode: false,
            initial_tool: Tool::Select,
        }
    }
}
