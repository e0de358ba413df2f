//! Canvas elements - the visual objects owned by the store.
//!
//! An [`Element`] is a fixed record: identity, local transform, draw-order
//! path key, and a closed [`ElementKind`]. The optional capabilities
//! (hierarchy membership, focus) are plain `Option` fields, so "has/get
//! component" is a field check rather than a dynamic query.

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Capability;
use crate::hierarchy::IndexHierarchy;

/// Smallest extent of a line's bounding box, so thin or axis-aligned
/// segments remain hittable.
pub const MIN_HIT_EXTENT: f32 = 5.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Selection blue.
    pub const BLUE: Self = Self::rgb(0, 121, 241);
    /// Debug red.
    pub const RED: Self = Self::rgb(230, 41, 55);
    /// Default arrowhead orange.
    pub const ORANGE: Self = Self::rgb(255, 161, 0);
    /// Default text gray.
    pub const DARK_GRAY: Self = Self::rgb(80, 80, 80);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Smallest rectangle containing all `points`, or `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |rect, p| Self {
                min: rect.min.min(*p),
                max: rect.max.max(*p),
            },
        ))
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether the point lies inside (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow every side by `amount`.
    #[must_use]
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Grow the rectangle around its center until both sides reach `extent`.
    #[must_use]
    pub fn with_min_extent(&self, extent: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        let half = Vec2::new(self.width().max(extent), self.height().max(extent)) * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounding box of this rectangle after an affine transform.
    #[must_use]
    pub fn transformed(&self, affine: &Affine2) -> Self {
        let corners = [
            affine.transform_point2(self.min),
            affine.transform_point2(Vec2::new(self.max.x, self.min.y)),
            affine.transform_point2(self.max),
            affine.transform_point2(Vec2::new(self.min.x, self.max.y)),
        ];
        Self::from_points(&corners).unwrap_or(*self)
    }
}

/// Local transform of an element relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Offset from the parent origin.
    pub translation: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Per-axis scale factor.
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform {
    /// Identity transform translated to `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            translation: position,
            ..Self::default()
        }
    }

    /// Affine matrix applying scale, then rotation, then translation.
    #[must_use]
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.translation)
    }
}

/// Opaque handle to a texture uploaded through the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// A bitmap image placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Uploaded texture.
    pub texture: TextureHandle,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageData {
    /// Size in canvas units before scaling.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Image dimensions fit in f32
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// A straight segment in the element's local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Start point, local.
    pub begin: Vec2,
    /// End point, local.
    pub end: Vec2,
    /// Stroke thickness.
    pub thickness: f32,
    /// Stroke color.
    pub color: Color,
}

impl LineSegment {
    /// Start point after applying `world`.
    #[must_use]
    pub fn world_begin(&self, world: &Affine2) -> Vec2 {
        world.transform_point2(self.begin)
    }

    /// End point after applying `world`.
    #[must_use]
    pub fn world_end(&self, world: &Affine2) -> Vec2 {
        world.transform_point2(self.end)
    }

    /// Length in local units.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.begin.distance(self.end)
    }
}

/// A line with a triangular head at its end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    /// The shaft.
    pub line: LineSegment,
    /// Fill color of the head.
    pub head_color: Color,
}

impl Arrow {
    /// Length of the head along the shaft.
    #[must_use]
    pub fn head_size(&self) -> f32 {
        30.0 * self.line.thickness / 5.0
    }

    /// World-space triangle of the arrowhead, tip last.
    #[must_use]
    pub fn head(&self, world: &Affine2) -> [Vec2; 3] {
        let begin = self.line.world_begin(world);
        let end = self.line.world_end(world);
        let direction = end - begin;
        let rotation = Vec2::from_angle(direction.y.atan2(direction.x));

        let size = self.head_size();
        // Head pointing along +x with its tip at the origin.
        let tips = [
            Vec2::new(-size, -size / 3.0),
            Vec2::new(-size, size / 3.0),
            Vec2::ZERO,
        ];
        tips.map(|tip| rotation.rotate(tip) + end)
    }
}

/// A text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// The text.
    pub content: String,
    /// Font size in canvas units.
    pub size: f32,
    /// Extra spacing between glyphs.
    pub spacing: f32,
    /// Fill color.
    pub color: Color,
}

impl TextBlock {
    /// Approximate layout box; exact metrics belong to the renderer.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Character counts fit in f32
    pub fn approximate_size(&self) -> Vec2 {
        let glyphs = self.content.chars().count().max(1) as f32;
        Vec2::new(
            glyphs * self.size * 0.5 + (glyphs - 1.0) * self.spacing,
            self.size,
        )
    }
}

/// The closed set of element kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    /// A pasted bitmap.
    Image(ImageData),
    /// A plain line.
    Line(LineSegment),
    /// A line with an arrowhead.
    Arrow(Arrow),
    /// A text label.
    Text(TextBlock),
    /// An invisible container for grouping children.
    Group,
}

impl ElementKind {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Line(_) => "line",
            Self::Arrow(_) => "arrow",
            Self::Text(_) => "text",
            Self::Group => "group",
        }
    }
}

/// Parent/child links of an element in the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    /// Parent, set at most once.
    pub parent: Option<ElementId>,
    /// Children in insertion order.
    pub children: Vec<ElementId>,
    /// Next sibling-insertion index handed to a new child.
    pub next_child_index: u32,
}

/// Focus state for selectable elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Focusable {
    /// Whether the element is part of the current selection.
    pub focused: bool,
}

/// A canvas element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Transform relative to the parent.
    pub transform: Transform,
    /// Transform to canvas space, written by the hierarchy pass.
    pub world: Affine2,
    /// Draw-order path key.
    pub index: IndexHierarchy,
    /// Tree membership, when the element takes part in the hierarchy.
    pub hierarchy: Option<Hierarchy>,
    /// Focus state, when the element can be selected.
    pub focus: Option<Focusable>,
}

impl Element {
    /// Create a detached element with hierarchy and focus capabilities.
    ///
    /// The store assigns the path key when the element is inserted.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform::default(),
            world: Affine2::IDENTITY,
            index: IndexHierarchy::default(),
            hierarchy: Some(Hierarchy::default()),
            focus: Some(Focusable::default()),
        }
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.world = transform.to_affine();
        self
    }

    /// Drop the hierarchy capability; the element stays a lone root.
    #[must_use]
    pub fn without_hierarchy(mut self) -> Self {
        self.hierarchy = None;
        self
    }

    /// Drop the focus capability; the element can no longer be selected.
    #[must_use]
    pub fn without_focus(mut self) -> Self {
        self.focus = None;
        self
    }

    /// Parent id, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<ElementId> {
        self.hierarchy.as_ref().and_then(|h| h.parent)
    }

    /// Children in insertion order; empty without the hierarchy capability.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        self.hierarchy
            .as_ref()
            .map_or(&[][..], |h| h.children.as_slice())
    }

    /// Whether the element has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Whether the element carries `capability`.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Hierarchy => self.hierarchy.is_some(),
            Capability::Focusable => self.focus.is_some(),
            Capability::Drawable => !matches!(self.kind, ElementKind::Group),
            Capability::Text => matches!(self.kind, ElementKind::Text(_)),
            Capability::Line => matches!(self.kind, ElementKind::Line(_) | ElementKind::Arrow(_)),
        }
    }

    /// Whether the element is currently focused.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focus.is_some_and(|f| f.focused)
    }

    /// The text block, for text elements.
    #[must_use]
    pub fn text(&self) -> Option<&TextBlock> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Mutable text block, for text elements.
    pub fn text_mut(&mut self) -> Option<&mut TextBlock> {
        match &mut self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The line segment, for lines and arrows.
    #[must_use]
    pub fn line(&self) -> Option<&LineSegment> {
        match &self.kind {
            ElementKind::Line(line) | ElementKind::Arrow(Arrow { line, .. }) => Some(line),
            _ => None,
        }
    }

    /// Mutable line segment, for lines and arrows.
    pub fn line_mut(&mut self) -> Option<&mut LineSegment> {
        match &mut self.kind {
            ElementKind::Line(line) | ElementKind::Arrow(Arrow { line, .. }) => Some(line),
            _ => None,
        }
    }

    /// Bounds in local space; groups have none of their own.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Rect> {
        match &self.kind {
            ElementKind::Image(image) => Some(Rect::from_min_size(Vec2::ZERO, image.size())),
            ElementKind::Line(line) | ElementKind::Arrow(Arrow { line, .. }) => {
                Rect::from_points(&[line.begin, line.end])
            }
            ElementKind::Text(text) => Some(Rect::from_min_size(Vec2::ZERO, text.approximate_size())),
            ElementKind::Group => None,
        }
    }

    /// Bounds in canvas space using the last computed world transform.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Rect> {
        let bounds = self.local_bounds()?.transformed(&self.world);
        Some(match self.kind {
            ElementKind::Line(_) | ElementKind::Arrow(_) => bounds.with_min_extent(MIN_HIT_EXTENT),
            _ => bounds,
        })
    }
}
