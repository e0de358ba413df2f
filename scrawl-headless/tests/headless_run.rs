//! Headless Run Tests
//!
//! Plays script files from disk through `run`:
//! - Image paste seeded from a PNG fixture
//! - Text on the clipboard blocks image paste
//! - Draw log reporting
//! - Load failures surface as errors

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use scrawl_core::Tool;
use scrawl_headless::{run, DrawCommand, HeadlessConfig, Script};
use tempfile::TempDir;

fn write_script(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("script.json");
    std::fs::write(&path, json).expect("should write script");
    path
}

fn write_png(dir: &Path) -> PathBuf {
    let path = dir.join("fixture.png");
    let image = RgbaImage::from_pixel(5, 3, Rgba([10, 20, 30, 255]));
    image.save(&path).expect("should save png");
    path
}

const PASTE_SCRIPT: &str = r#"{
    "frames": [
        { "pointer": [40.0, 60.0], "events": [{ "type": "Paste" }] }
    ]
}"#;

#[test]
fn test_paste_from_png_fixture() {
    let dir = TempDir::new().expect("should create temp dir");
    let config = HeadlessConfig {
        script: Some(write_script(dir.path(), PASTE_SCRIPT)),
        clipboard_image: Some(write_png(dir.path())),
        idle_frames: 1,
        print_draw_log: true,
        ..HeadlessConfig::default()
    };

    let summary = run(&config).expect("run should succeed");

    assert_eq!(summary.frames.len(), 2);
    assert_eq!(summary.elements, 1);
    assert_eq!(summary.selection.len(), 1);
    assert_eq!(summary.tool, Tool::Select);
    assert_eq!(summary.textures_loaded, 1);
    assert_eq!(summary.undo_depth, 2);

    let log = summary.draw_log.expect("draw log requested");
    assert!(log.iter().any(|command| matches!(
        command,
        DrawCommand::Texture { origin, .. } if origin.x == 40.0 && origin.y == 60.0
    )));
}

#[test]
fn test_clipboard_text_blocks_paste() {
    let dir = TempDir::new().expect("should create temp dir");
    let config = HeadlessConfig {
        script: Some(write_script(dir.path(), PASTE_SCRIPT)),
        clipboard_image: Some(write_png(dir.path())),
        clipboard_text: Some("not an image".to_string()),
        ..HeadlessConfig::default()
    };

    let summary = run(&config).expect("run should succeed");

    assert_eq!(summary.elements, 0);
    assert_eq!(summary.textures_loaded, 0);
    assert!(summary.draw_log.is_none());
}

#[test]
fn test_toggle_debug_from_keyboard() {
    let dir = TempDir::new().expect("should create temp dir");
    let script = r#"{
        "frames": [
            { "events": [{ "type": "KeyPressed", "data": { "key": { "key": "Tab" } } }] },
            {
                "overlay": { "keyboard": true },
                "events": [{ "type": "KeyPressed", "data": { "key": { "key": "Tab" } } }]
            }
        ]
    }"#;
    let config = HeadlessConfig {
        script: Some(write_script(dir.path(), script)),
        ..HeadlessConfig::default()
    };

    let summary = run(&config).expect("run should succeed");

    // The second Tab is swallowed by the overlay.
    assert!(summary.debug_mode);
}

#[test]
fn test_empty_run_without_script() {
    let summary = run(&HeadlessConfig::default()).expect("run should succeed");
    assert!(summary.frames.is_empty());
    assert_eq!(summary.elements, 0);
    assert_eq!(summary.undo_depth, 1);
}

#[test]
fn test_missing_script_is_an_error() {
    let dir = TempDir::new().expect("should create temp dir");
    let config = HeadlessConfig {
        script: Some(dir.path().join("missing.json")),
        ..HeadlessConfig::default()
    };
    let err = run(&config).expect_err("missing script should fail");
    assert!(err.to_string().contains("loading script"));
}

#[test]
fn test_malformed_script_is_an_error() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_script(dir.path(), r#"{ "frames": [ { "events": [{ "type": "Bogus" }] } ] }"#);
    assert!(Script::load(&path).is_err());

    let config = HeadlessConfig {
        script: Some(path),
        ..HeadlessConfig::default()
    };
    assert!(run(&config).is_err());
}

#[test]
fn test_unreadable_image_is_an_error() {
    let dir = TempDir::new().expect("should create temp dir");
    let bogus = dir.path().join("bogus.png");
    std::fs::write(&bogus, b"not a png").expect("should write");
    let config = HeadlessConfig {
        clipboard_image: Some(bogus),
        ..HeadlessConfig::default()
    };
    assert!(run(&config).is_err());
}
