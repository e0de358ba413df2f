//! Error types for canvas operations.

use std::fmt;

use thiserror::Error;

use crate::ElementId;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// A capability an element may or may not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Participates in the parent/child tree.
    Hierarchy,
    /// Produces draw calls.
    Drawable,
    /// Carries editable text.
    Text,
    /// Carries a line segment (lines and arrows).
    Line,
    /// Can be focused by the selection.
    Focusable,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hierarchy => "hierarchy",
            Self::Drawable => "drawable",
            Self::Text => "text",
            Self::Line => "line",
            Self::Focusable => "focusable",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in canvas operations.
///
/// Store errors signal caller misuse (a violated tree invariant or a missing
/// capability). Image errors are environmental and only ever cause a paste to
/// be skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    /// Element not found in the store.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// An element with this id is already stored.
    #[error("Element {0} is already in the store")]
    DuplicateElement(ElementId),

    /// The element lacks a capability the operation requires.
    #[error("Element {id} lacks the {capability} capability")]
    MissingCapability {
        /// The offending element.
        id: ElementId,
        /// The capability that was required.
        capability: Capability,
    },

    /// The child already has a parent; parents are assigned at most once.
    #[error("Element {child} already has parent {parent}")]
    AlreadyParented {
        /// The child that was being attached.
        child: ElementId,
        /// Its existing parent.
        parent: ElementId,
    },

    /// Attaching would make a node its own ancestor.
    #[error("Attaching {child} under {parent} would create a cycle")]
    HierarchyCycle {
        /// The requested parent.
        parent: ElementId,
        /// The requested child.
        child: ElementId,
    },

    /// Clipboard pixel data could not be decoded.
    #[error("Invalid image data: {0}")]
    InvalidImage(String),
}
