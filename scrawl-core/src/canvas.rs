//! The canvas and its frame loop.
//!
//! ```text
//! input events ──► dispatch ──► queue drain (one pass) ──► transforms
//!                                                             │
//!      destruction sweep ◄── render (back to front) ◄── draw-order resort
//! ```
//!
//! Commands queued while the input is dispatched are drained in the same
//! frame. Commands queued during the drain wait for the next frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::controller::{default_stack, Controller, HistoryController, OverlayController};
use crate::dispatch::ListenerStack;
use crate::element::{Color, Element, ElementKind, Rect};
use crate::event::{Event, EventKind, Tool};
use crate::platform::{Clipboard, Renderer};
use crate::state::{CanvasContext, CanvasState, Selection};
use crate::store::ElementStore;

/// Host input for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// World-space pointer position; `None` keeps the previous one.
    #[serde(default)]
    pub pointer: Option<Vec2>,
    /// Raw input in arrival order.
    #[serde(default)]
    pub events: Vec<EventKind>,
}

/// Counters describing one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Input events dispatched.
    pub input_events: usize,
    /// Queued commands drained.
    pub commands: usize,
    /// Input events and commands some controller handled.
    pub handled: usize,
    /// Commands queued during the drain, left for the next frame.
    pub deferred: usize,
    /// Swaps made restoring draw order.
    pub resort_swaps: usize,
    /// Elements drawn.
    pub drawn: usize,
    /// Elements removed by the sweep.
    pub destroyed: usize,
}

/// A diagramming canvas: document state plus its controllers.
#[derive(Debug)]
pub struct Canvas {
    state: CanvasState,
    controllers: ListenerStack<Controller>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas and record the baseline checkpoint.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        let mut canvas = Self {
            state: CanvasState::new(config),
            controllers: default_stack(),
        };
        if let Some(history) = history_of(&mut canvas.controllers) {
            history.checkpoint(&canvas.state);
        }
        canvas
    }

    /// Run one full frame and render it.
    pub fn frame(
        &mut self,
        input: FrameInput,
        clipboard: &mut dyn Clipboard,
        renderer: &mut dyn Renderer,
    ) -> FrameStats {
        let mut stats = self.update(input, clipboard, renderer);
        stats.drawn = self.render(renderer);
        stats.destroyed = self.end_frame();
        tracing::debug!("Frame stats: {stats:?}");
        stats
    }

    /// Dispatch input, drain one queue pass, propagate transforms and
    /// restore draw order.
    pub fn update(
        &mut self,
        input: FrameInput,
        clipboard: &mut dyn Clipboard,
        renderer: &mut dyn Renderer,
    ) -> FrameStats {
        let mut stats = FrameStats {
            frame: self.state.frame,
            input_events: input.events.len(),
            ..FrameStats::default()
        };
        if let Some(pointer) = input.pointer {
            self.state.pointer = pointer;
        }

        for kind in input.events {
            if self.dispatch(kind, clipboard, renderer) {
                stats.handled += 1;
            }
        }

        let pass = self.state.queue.take_pass();
        stats.commands = pass.len();
        for command in pass {
            if self.dispatch(command, clipboard, renderer) {
                stats.handled += 1;
            }
        }
        stats.deferred = self.state.queue.len();

        self.state.store.update_transforms();
        stats.resort_swaps = self.state.store.resort();
        stats
    }

    /// Offer a single event to the controller stack. Returns whether a
    /// controller handled it.
    pub fn dispatch(
        &mut self,
        kind: EventKind,
        clipboard: &mut dyn Clipboard,
        renderer: &mut dyn Renderer,
    ) -> bool {
        if let Some(position) = kind.pointer_position() {
            self.state.pointer = position;
        }
        let mut event = Event::new(kind);
        let mut ctx = CanvasContext {
            state: &mut self.state,
            clipboard,
            renderer,
        };
        self.controllers
            .dispatch(&mut event, |controller, event| controller.on_event(event, &mut ctx));

        if !event.handled {
            tracing::debug!("Unhandled {:?}", event.event_type());
        }
        event.handled
    }

    /// Draw every live element back to front, with focus and debug
    /// outlines. Returns the number of elements drawn.
    pub fn render(&self, renderer: &mut dyn Renderer) -> usize {
        let store = &self.state.store;
        let mut drawn = 0;

        for element in store.iter() {
            if store.is_pending_destruction(element.id) {
                continue;
            }
            if draw_element(element, renderer) {
                drawn += 1;
            }
            if let Some((thickness, color)) = self.outline_style(element) {
                if let Some(bounds) = store.bounds(element.id) {
                    renderer.draw_rect_outline(bounds.expand(thickness), thickness, color);
                }
            }
        }
        drawn
    }

    fn outline_style(&self, element: &Element) -> Option<(f32, Color)> {
        let config = &self.state.config;
        if element.is_focused() {
            Some((config.focus_outline_thickness, config.focus_outline_color))
        } else if self.state.view.debug_mode && element.focus.is_some() {
            Some((config.debug_outline_thickness, config.debug_outline_color))
        } else {
            None
        }
    }

    /// Sweep destroyed elements and advance the frame counter. Returns the
    /// number of elements removed.
    pub fn end_frame(&mut self) -> usize {
        let destroyed = self.state.store.flush_destroyed();
        self.state.selection.retain_live(&self.state.store);
        self.state.frame += 1;
        destroyed
    }

    /// Set which input the GUI overlay captures this frame.
    pub fn set_overlay_capture(&mut self, wants_pointer: bool, wants_keyboard: bool) {
        for controller in self.controllers.iter_mut() {
            if let Controller::Overlay(overlay) = controller {
                *overlay = OverlayController {
                    wants_pointer,
                    wants_keyboard,
                };
            }
        }
    }

    /// Queue a command for the next drain pass.
    pub fn enqueue(&mut self, command: EventKind) {
        self.state.queue.push(command);
    }

    /// The undo history.
    #[must_use]
    pub fn history(&self) -> Option<&HistoryController> {
        self.controllers.iter().find_map(|c| match c {
            Controller::History(history) => Some(history),
            _ => None,
        })
    }

    /// Full canvas state.
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Element storage.
    #[must_use]
    pub fn store(&self) -> &ElementStore {
        &self.state.store
    }

    /// Mutable element storage, for hosts that build documents directly.
    pub fn store_mut(&mut self) -> &mut ElementStore {
        &mut self.state.store
    }

    /// Focused elements.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    /// The active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.state.view.tool
    }

    /// Whether debug outlines are drawn.
    #[must_use]
    pub fn debug_mode(&self) -> bool {
        self.state.view.debug_mode
    }

    /// Number of the frame in progress.
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.state.frame
    }
}

fn history_of(controllers: &mut ListenerStack<Controller>) -> Option<&mut HistoryController> {
    controllers.iter_mut().find_map(|c| match c {
        Controller::History(history) => Some(history),
        _ => None,
    })
}

/// Issue the draw calls for one element. Returns `false` for kinds that
/// draw nothing.
fn draw_element(element: &Element, renderer: &mut dyn Renderer) -> bool {
    let world = &element.world;
    match &element.kind {
        ElementKind::Image(image) => {
            renderer.draw_texture(image.texture, world, Color::WHITE);
        }
        ElementKind::Line(line) => {
            renderer.draw_line(
                line.world_begin(world),
                line.world_end(world),
                line.thickness,
                line.color,
            );
        }
        ElementKind::Arrow(arrow) => {
            let line = &arrow.line;
            renderer.draw_line(
                line.world_begin(world),
                line.world_end(world),
                line.thickness,
                line.color,
            );
            renderer.draw_triangle(arrow.head(world), arrow.head_color);
        }
        ElementKind::Text(text) => {
            renderer.draw_text(&text.content, world, text.size, text.spacing, text.color);
        }
        ElementKind::Group => return false,
    }
    true
}

/// Bounds of everything drawn, for hosts fitting the view.
#[must_use]
pub fn content_bounds(store: &ElementStore) -> Option<Rect> {
    store
        .iter()
        .filter(|e| e.is_root() && !store.is_pending_destruction(e.id))
        .filter_map(|e| store.bounds(e.id))
        .reduce(|a, b| a.union(&b))
}
