//! Canvas Integration Tests
//!
//! Drives whole frames through `Canvas` with a fake clipboard and renderer:
//! - Clipboard paste (image, text, empty, broken)
//! - Undo/redo across frames
//! - Deferred destruction
//! - Drawing tools and grouping

use glam::{Affine2, Vec2};
use image::RgbaImage;
use scrawl_core::{
    Canvas, CanvasConfig, Clipboard, ClipboardImage, Color, Element, ElementId, ElementKind,
    EventKind, FrameInput, ImageSpec, Key, KeyModifiers, PointerButton, Rect, Renderer, TextBlock,
    TextureHandle, Tool, Transform,
};

#[derive(Debug, Default)]
struct FakeClipboard {
    image: Option<ClipboardImage>,
    text: bool,
}

impl Clipboard for FakeClipboard {
    fn has_image(&self) -> bool {
        self.image.is_some()
    }

    fn has_text(&self) -> bool {
        self.text
    }

    fn get_image(&mut self) -> Option<ClipboardImage> {
        self.image.clone()
    }
}

#[derive(Debug, Default)]
struct CountingRenderer {
    uploads: Vec<RgbaImage>,
    textures_drawn: usize,
    lines: usize,
    triangles: usize,
    texts: Vec<String>,
}

impl Renderer for CountingRenderer {
    fn load_texture(&mut self, image: &RgbaImage) -> TextureHandle {
        self.uploads.push(image.clone());
        TextureHandle(self.uploads.len() as u64)
    }

    fn draw_line(&mut self, _begin: Vec2, _end: Vec2, _thickness: f32, _color: Color) {
        self.lines += 1;
    }

    fn draw_triangle(&mut self, _points: [Vec2; 3], _color: Color) {
        self.triangles += 1;
    }

    fn draw_texture(&mut self, _texture: TextureHandle, _transform: &Affine2, _tint: Color) {
        self.textures_drawn += 1;
    }

    fn draw_text(&mut self, text: &str, _transform: &Affine2, _size: f32, _spacing: f32, _color: Color) {
        self.texts.push(text.to_string());
    }

    fn draw_rect_outline(&mut self, _rect: Rect, _thickness: f32, _color: Color) {}
}

/// A canvas plus its host services.
struct Host {
    canvas: Canvas,
    clipboard: FakeClipboard,
    renderer: CountingRenderer,
}

impl Host {
    fn new() -> Self {
        Self {
            canvas: Canvas::new(CanvasConfig::default()),
            clipboard: FakeClipboard::default(),
            renderer: CountingRenderer::default(),
        }
    }

    fn frame(&mut self, events: Vec<EventKind>) -> scrawl_core::FrameStats {
        let input = FrameInput {
            pointer: None,
            events,
        };
        self.canvas
            .frame(input, &mut self.clipboard, &mut self.renderer)
    }

    fn idle(&mut self, frames: usize) {
        for _ in 0..frames {
            self.frame(Vec::new());
        }
    }
}

fn rgb_image(width: u32, height: u32) -> ClipboardImage {
    ClipboardImage {
        bytes: vec![128; (width * height * 3) as usize],
        spec: ImageSpec::rgb(width, height),
    }
}

fn ctrl(c: char) -> EventKind {
    EventKind::KeyPressed {
        key: Key::Character(c),
        modifiers: KeyModifiers {
            ctrl: true,
            ..KeyModifiers::default()
        },
    }
}

fn press(x: f32, y: f32) -> EventKind {
    EventKind::PointerPressed {
        position: Vec2::new(x, y),
        button: PointerButton::Left,
        modifiers: KeyModifiers::default(),
    }
}

fn moved(x: f32, y: f32) -> EventKind {
    EventKind::PointerMoved {
        position: Vec2::new(x, y),
    }
}

fn release(x: f32, y: f32) -> EventKind {
    EventKind::PointerReleased {
        position: Vec2::new(x, y),
        button: PointerButton::Left,
    }
}

// ============================================================================
// Paste
// ============================================================================

#[test]
fn test_paste_image_end_to_end() {
    let mut host = Host::new();
    host.clipboard.image = Some(rgb_image(3, 2));
    host.canvas.enqueue(EventKind::SelectTool { tool: Tool::DrawLine });
    host.idle(1);

    let input = FrameInput {
        pointer: Some(Vec2::new(50.0, 70.0)),
        events: vec![ctrl('v')],
    };
    let stats = host
        .canvas
        .frame(input, &mut host.clipboard, &mut host.renderer);
    assert_eq!(stats.commands, 1);
    assert_eq!(stats.deferred, 3);
    assert_eq!(host.canvas.store().len(), 1);

    let upload = &host.renderer.uploads[0];
    assert_eq!(upload.as_raw().len(), 3 * 2 * 4);
    assert!(upload.as_raw().chunks(4).all(|px| px[3] == 255));

    // Follow-up commands run in the next frame.
    host.idle(1);
    let id = host.canvas.store().draw_order()[0];
    assert_eq!(host.canvas.selection().ids(), &[id]);
    assert_eq!(host.canvas.tool(), Tool::Select);
    assert_eq!(host.canvas.history().map(|h| h.undo_depth()), Some(2));

    let element = host.canvas.store().get(id).expect("pasted image");
    assert_eq!(element.transform.translation, Vec2::new(50.0, 70.0));
    assert!(host.renderer.textures_drawn > 0);
}

#[test]
fn test_paste_with_text_on_clipboard_does_nothing() {
    let mut host = Host::new();
    host.clipboard.image = Some(rgb_image(2, 2));
    host.clipboard.text = true;

    let stats = host.frame(vec![EventKind::Paste]);
    assert_eq!(stats.handled, 0);
    assert_eq!(stats.deferred, 0);
    assert!(host.canvas.store().is_empty());
    assert!(host.renderer.uploads.is_empty());
}

#[test]
fn test_paste_with_empty_clipboard_does_nothing() {
    let mut host = Host::new();
    let stats = host.frame(vec![EventKind::Paste]);
    assert_eq!(stats.handled, 0);
    assert!(host.canvas.store().is_empty());
}

#[test]
fn test_paste_with_truncated_image_does_nothing() {
    let mut host = Host::new();
    let mut image = rgb_image(4, 4);
    image.bytes.truncate(10);
    host.clipboard.image = Some(image);

    let stats = host.frame(vec![EventKind::Paste]);
    assert_eq!(stats.handled, 0);
    assert!(host.canvas.store().is_empty());
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_undo_and_redo_paste() {
    let mut host = Host::new();
    host.clipboard.image = Some(rgb_image(1, 1));
    host.frame(vec![EventKind::Paste]);
    host.idle(1);
    assert_eq!(host.canvas.store().len(), 1);

    host.frame(vec![ctrl('z')]);
    assert!(host.canvas.store().is_empty());
    assert!(host.canvas.selection().is_empty());

    host.frame(vec![ctrl('y')]);
    assert_eq!(host.canvas.store().len(), 1);
    assert_eq!(host.canvas.selection().len(), 1);
}

#[test]
fn test_undo_at_baseline_is_unhandled() {
    let mut host = Host::new();
    let stats = host.frame(vec![EventKind::Undo, EventKind::Redo]);
    assert_eq!(stats.handled, 0);
}

#[test]
fn test_delete_then_undo_restores() {
    let mut host = Host::new();
    host.clipboard.image = Some(rgb_image(10, 10));
    host.frame(vec![EventKind::Paste]);
    host.idle(1);
    let id = host.canvas.store().draw_order()[0];

    let stats = host.frame(vec![EventKind::KeyPressed {
        key: Key::Delete,
        modifiers: KeyModifiers::default(),
    }]);
    assert_eq!(stats.destroyed, 1);
    assert!(!host.canvas.store().contains(id));

    host.idle(1);
    host.frame(vec![EventKind::Undo]);
    assert!(host.canvas.store().contains(id));
}

fn add_label(host: &mut Host, at: Vec2) -> ElementId {
    let element = Element::new(ElementKind::Text(TextBlock {
        content: "label".to_string(),
        size: 20.0,
        spacing: 1.0,
        color: Color::DARK_GRAY,
    }))
    .with_transform(Transform::at(at));
    host.canvas
        .store_mut()
        .insert(element, None)
        .expect("should insert")
}

#[test]
fn test_snapshots_in_one_frame_coalesce() {
    let mut host = Host::new();
    host.idle(1);
    let id = add_label(&mut host, Vec2::new(100.0, 100.0));

    host.frame(vec![
        EventKind::MakeSnapshot,
        EventKind::SelectElement { id },
        EventKind::MakeSnapshot,
    ]);

    // Baseline plus one checkpoint; selecting does not change the store.
    assert_eq!(host.canvas.history().map(|h| h.undo_depth()), Some(2));
    assert_eq!(host.canvas.selection().ids(), &[id]);
}

#[test]
fn test_snapshots_around_a_change_both_stack() {
    let mut host = Host::new();
    host.idle(1);
    let id = add_label(&mut host, Vec2::new(100.0, 100.0));

    host.frame(vec![
        EventKind::MakeSnapshot,
        press(105.0, 105.0),
        moved(125.0, 105.0),
        release(125.0, 105.0),
        EventKind::MakeSnapshot,
    ]);

    // The release queues a third request, which folds into the second.
    assert_eq!(host.canvas.history().map(|h| h.undo_depth()), Some(3));
    let element = host.canvas.store().get(id).expect("label exists");
    assert_eq!(element.transform.translation, Vec2::new(120.0, 100.0));

    host.frame(vec![ctrl('z')]);
    let element = host.canvas.store().get(id).expect("label exists");
    assert_eq!(element.transform.translation, Vec2::new(100.0, 100.0));
}

// ============================================================================
// Destruction
// ============================================================================

#[test]
fn test_destruction_survives_until_sweep() {
    let mut host = Host::new();
    let id = host
        .canvas
        .store_mut()
        .create(ElementKind::Group, None)
        .expect("should create");

    assert!(host.canvas.store_mut().schedule_destruction(id));
    assert!(!host.canvas.store_mut().schedule_destruction(id));
    assert!(host.canvas.store().get(id).is_some());

    let stats = host.frame(Vec::new());
    assert_eq!(stats.destroyed, 1);
    assert!(host.canvas.store().get(id).is_none());

    let stats = host.frame(Vec::new());
    assert_eq!(stats.destroyed, 0);
}

// ============================================================================
// Tools
// ============================================================================

#[test]
fn test_draw_arrow_then_select_and_move() {
    let mut host = Host::new();
    host.frame(vec![EventKind::KeyPressed {
        key: Key::Character('3'),
        modifiers: KeyModifiers::default(),
    }]);
    assert_eq!(host.canvas.tool(), Tool::DrawArrow);

    host.frame(vec![press(0.0, 0.0), moved(50.0, 0.0), release(100.0, 0.0)]);
    host.idle(1);
    assert_eq!(host.canvas.tool(), Tool::Select);
    assert_eq!(host.canvas.store().len(), 1);
    assert_eq!(host.renderer.triangles, 2);

    let id = host.canvas.store().draw_order()[0];
    host.frame(vec![press(50.0, 1.0), moved(60.0, 11.0), release(60.0, 11.0)]);
    let element = host.canvas.store().get(id).expect("arrow exists");
    assert_eq!(element.transform.translation, Vec2::new(10.0, 10.0));
}

#[test]
fn test_click_to_add_text() {
    let mut host = Host::new();
    host.canvas.enqueue(EventKind::SelectTool { tool: Tool::DrawText });
    host.idle(1);
    host.frame(vec![press(20.0, 20.0)]);
    host.frame(vec![EventKind::TextInput {
        text: "hello".to_string(),
    }]);
    host.frame(vec![EventKind::KeyPressed {
        key: Key::Enter,
        modifiers: KeyModifiers::default(),
    }]);
    host.idle(1);

    assert_eq!(host.canvas.tool(), Tool::Select);
    assert_eq!(host.renderer.texts.last().map(String::as_str), Some("hello"));
    assert_eq!(host.canvas.history().map(|h| h.undo_depth()), Some(2));
}

#[test]
fn test_group_selection_moves_together() {
    let mut host = Host::new();
    host.canvas.enqueue(EventKind::SelectTool { tool: Tool::DrawLine });
    host.idle(1);
    host.frame(vec![press(0.0, 0.0), release(40.0, 0.0)]);
    host.idle(1);
    host.frame(vec![EventKind::SelectTool { tool: Tool::DrawLine }]);
    host.frame(vec![press(0.0, 100.0), release(40.0, 100.0)]);
    host.idle(1);

    host.frame(vec![
        press(20.0, 0.0),
        EventKind::PointerPressed {
            position: Vec2::new(20.0, 100.0),
            button: PointerButton::Left,
            modifiers: KeyModifiers {
                shift: true,
                ..KeyModifiers::default()
            },
        },
        release(20.0, 100.0),
        ctrl('g'),
    ]);
    host.idle(1);

    assert_eq!(host.canvas.store().len(), 3);
    let group = host.canvas.selection().ids()[0];
    let children = host
        .canvas
        .store()
        .get(group)
        .map(|g| g.children().to_vec())
        .expect("group exists");
    assert_eq!(children.len(), 2);

    // Children inherit the group's transform.
    host.frame(vec![press(20.0, 0.0), moved(20.0, 30.0), release(20.0, 30.0)]);
    let child = host.canvas.store().get(children[1]).expect("child exists");
    let begin = child
        .line()
        .map(|l| l.world_begin(&child.world))
        .expect("child is a line");
    assert_eq!(begin, Vec2::new(0.0, 130.0));
}
