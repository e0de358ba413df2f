//! # Scrawl Core
//!
//! Document and scene core for a 2D diagramming canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     scrawl-core                     │
//! ├─────────────────────────────────────────────────────┤
//! │  Element Store        │  Event Pipeline             │
//! │  - Elements by id     │  - Listener stack           │
//! │  - Deferred destroy   │  - Command queue            │
//! │  - Snapshots          │  - Controllers              │
//! ├─────────────────────────────────────────────────────┤
//! │  Transform Hierarchy  │  History                    │
//! │  - World transforms   │  - Checkpoints              │
//! │  - Draw order paths   │  - Undo / redo              │
//! └─────────────────────────────────────────────────────┘
//!        ▲ Clipboard                      ▼ Renderer
//! ```
//!
//! Rendering, clipboard access and windowing belong to the host, which
//! plugs in through the [`Renderer`] and [`Clipboard`] traits and drives
//! [`Canvas::frame`] once per frame.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod event;
pub mod hierarchy;
pub mod pixels;
pub mod platform;
pub mod queue;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

pub use canvas::{content_bounds, Canvas, FrameInput, FrameStats};
pub use config::CanvasConfig;
pub use controller::{Checkpoint, Controller, HistoryController};
pub use dispatch::{EventDispatcher, ListenerPriority, ListenerStack};
pub use element::{
    Arrow, Color, Element, ElementId, ElementKind, Focusable, Hierarchy, ImageData, LineSegment,
    Rect, TextBlock, TextureHandle, Transform,
};
pub use error::{CanvasError, CanvasResult, Capability};
pub use event::{Event, EventKind, EventType, Key, KeyModifiers, PointerButton, Tool};
pub use hierarchy::{compare, insertion_sort_by, IndexHierarchy};
pub use pixels::normalize_rgba;
pub use platform::{Clipboard, ClipboardImage, EmptyClipboard, ImageSpec, Renderer};
pub use queue::CommandQueue;
pub use state::{CanvasContext, CanvasState, Selection, ViewState};
pub use store::{DestroyHook, ElementStore, StoreSnapshot};

/// Scrawl core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
