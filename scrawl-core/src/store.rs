//! Element storage with deferred destruction.
//!
//! [`ElementStore`] is the only owner of [`Element`]s. Everything else refers
//! to elements by [`ElementId`] and goes through the store to read or mutate
//! them. Destruction is two-phase: [`ElementStore::schedule_destruction`]
//! runs destroy hooks and marks the element, and the end-of-frame
//! [`ElementStore::flush_destroyed`] sweep removes it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementKind, Hierarchy, Rect};
use crate::error::{Capability, CanvasError, CanvasResult};
use crate::hierarchy::IndexHierarchy;

/// Callback run once when an element is scheduled for destruction.
pub type DestroyHook = Box<dyn FnMut(&Element)>;

/// Owner of every element on the canvas.
pub struct ElementStore {
    pub(crate) elements: HashMap<ElementId, Element>,
    /// Ids in draw order, back to front.
    pub(crate) draw_order: Vec<ElementId>,
    next_root_index: u32,
    pending_destruction: Vec<ElementId>,
    pending_lookup: HashSet<ElementId>,
    destroy_hooks: HashMap<ElementId, Vec<DestroyHook>>,
    revision: u64,
}

impl fmt::Debug for ElementStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementStore")
            .field("elements", &self.elements.len())
            .field("pending_destruction", &self.pending_destruction)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured store contents for undo/redo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Live elements in draw order.
    pub elements: Vec<Element>,
    /// Root counter at capture time.
    pub next_root_index: u32,
}

impl StoreSnapshot {
    /// Number of captured elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            draw_order: Vec::new(),
            next_root_index: 0,
            pending_destruction: Vec::new(),
            pending_lookup: HashSet::new(),
            destroy_hooks: HashMap::new(),
            revision: 0,
        }
    }

    /// Create an element of `kind`, as a root or as the last child of
    /// `parent`.
    ///
    /// # Errors
    ///
    /// See [`ElementStore::insert`].
    pub fn create(
        &mut self,
        kind: ElementKind,
        parent: Option<ElementId>,
    ) -> CanvasResult<ElementId> {
        self.insert(Element::new(kind), parent)
    }

    /// Take ownership of `element`, as a root or as the last child of
    /// `parent`, and assign its draw-order path.
    ///
    /// Parent and child links carried by `element` are discarded; the store
    /// owns the tree.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DuplicateElement`] if the id is already stored,
    /// [`CanvasError::ElementNotFound`] if `parent` is unknown and
    /// [`CanvasError::MissingCapability`] if a parent is given but either side
    /// lacks the hierarchy capability.
    pub fn insert(
        &mut self,
        mut element: Element,
        parent: Option<ElementId>,
    ) -> CanvasResult<ElementId> {
        let id = element.id;
        if self.elements.contains_key(&id) {
            return Err(invariant(CanvasError::DuplicateElement(id)));
        }
        if let Some(links) = element.hierarchy.as_mut() {
            *links = Hierarchy::default();
        }

        match parent {
            Some(parent_id) => {
                if element.hierarchy.is_none() {
                    return Err(invariant(CanvasError::MissingCapability {
                        id,
                        capability: Capability::Hierarchy,
                    }));
                }
                let parent = self
                    .elements
                    .get_mut(&parent_id)
                    .ok_or_else(|| invariant(CanvasError::ElementNotFound(parent_id)))?;
                let parent_world = parent.world;
                let parent_index = parent.index.clone();
                let links = parent.hierarchy.as_mut().ok_or_else(|| {
                    invariant(CanvasError::MissingCapability {
                        id: parent_id,
                        capability: Capability::Hierarchy,
                    })
                })?;

                element.index = parent_index.child(links.next_child_index);
                links.next_child_index += 1;
                links.children.push(id);

                if let Some(own) = element.hierarchy.as_mut() {
                    own.parent = Some(parent_id);
                }
                element.update(Some(parent_world));
            }
            None => {
                element.index = IndexHierarchy::root(self.next_root_index);
                self.next_root_index += 1;
                element.update(None);
            }
        }

        tracing::debug!(
            "Created {} element {id} at {:?}",
            element.kind.name(),
            element.index.as_slice()
        );
        self.elements.insert(id, element);
        self.draw_order.push(id);
        self.revision += 1;
        Ok(id)
    }

    /// Attach the root `child` under `parent`.
    ///
    /// The child becomes the parent's last child and its whole subtree gets
    /// new path keys.
    ///
    /// # Errors
    ///
    /// - [`CanvasError::ElementNotFound`] if either id is unknown
    /// - [`CanvasError::MissingCapability`] if either lacks the hierarchy
    ///   capability
    /// - [`CanvasError::AlreadyParented`] if `child` already has a parent
    /// - [`CanvasError::HierarchyCycle`] if `parent` is `child` or lies inside
    ///   its subtree
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> CanvasResult<()> {
        let parent_element = self.require(parent).map_err(invariant)?;
        let child_element = self.require(child).map_err(invariant)?;

        for (id, element) in [(parent, parent_element), (child, child_element)] {
            if element.hierarchy.is_none() {
                return Err(invariant(CanvasError::MissingCapability {
                    id,
                    capability: Capability::Hierarchy,
                }));
            }
        }
        if let Some(existing) = child_element.parent() {
            return Err(invariant(CanvasError::AlreadyParented {
                child,
                parent: existing,
            }));
        }
        if self.ancestors_inclusive(parent).any(|id| id == child) {
            return Err(invariant(CanvasError::HierarchyCycle { parent, child }));
        }

        let parent_index = parent_element.index.clone();
        let sibling_index = {
            let Some(links) = self
                .elements
                .get_mut(&parent)
                .and_then(|e| e.hierarchy.as_mut())
            else {
                return Err(CanvasError::ElementNotFound(parent));
            };
            let index = links.next_child_index;
            links.next_child_index += 1;
            links.children.push(child);
            index
        };

        if let Some(element) = self.elements.get_mut(&child) {
            if let Some(links) = element.hierarchy.as_mut() {
                links.parent = Some(parent);
            }
        }
        self.reindex_subtree(child, parent_index.child(sibling_index));
        self.revision += 1;

        tracing::debug!("Attached {child} under {parent}");
        Ok(())
    }

    fn reindex_subtree(&mut self, id: ElementId, index: IndexHierarchy) {
        let Some(element) = self.elements.get_mut(&id) else {
            return;
        };
        element.index = index.clone();
        let children = element.children().to_vec();

        for child in children {
            let sibling_index = self
                .elements
                .get(&child)
                .and_then(|c| c.index.as_slice().last().copied())
                .unwrap_or_default();
            self.reindex_subtree(child, index.child(sibling_index));
        }
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors_inclusive(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(
            self.elements.contains_key(&id).then_some(id),
            move |current| self.elements.get(current).and_then(Element::parent),
        )
    }

    /// The topmost ancestor of `id` (itself for roots).
    #[must_use]
    pub fn root_of(&self, id: ElementId) -> Option<ElementId> {
        self.ancestors_inclusive(id).last()
    }

    /// `id` and every descendant, parents before children.
    #[must_use]
    pub fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(element) = self.elements.get(&current) else {
                continue;
            };
            out.push(current);
            stack.extend(element.children().iter().rev().copied());
        }
        out
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get an element, or fail with [`CanvasError::ElementNotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn require(&self, id: ElementId) -> CanvasResult<&Element> {
        self.elements
            .get(&id)
            .ok_or(CanvasError::ElementNotFound(id))
    }

    /// Get a mutable reference to an element by ID.
    ///
    /// Counts as a mutation for snapshot coalescing.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let element = self.elements.get_mut(&id)?;
        self.revision += 1;
        Some(element)
    }

    /// Whether the element exists (pending destruction included).
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Number of stored elements (pending destruction included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Ids back to front.
    #[must_use]
    pub fn draw_order(&self) -> &[ElementId] {
        &self.draw_order
    }

    /// Elements back to front.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.draw_order
            .iter()
            .filter_map(|id| self.elements.get(id))
    }

    /// Monotonic mutation counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Set the focus flag. Returns `false` if the element is unknown or not
    /// focusable.
    ///
    /// Focus is view state and does not count as a mutation.
    pub fn set_focused(&mut self, id: ElementId, focused: bool) -> bool {
        match self.elements.get_mut(&id).and_then(|e| e.focus.as_mut()) {
            Some(focus) => {
                focus.focused = focused;
                true
            }
            None => false,
        }
    }

    /// Canvas-space bounds; groups cover the union of their children.
    #[must_use]
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        let element = self.elements.get(&id)?;
        match element.kind {
            ElementKind::Group => element
                .children()
                .iter()
                .filter_map(|child| self.bounds(*child))
                .reduce(|a, b| a.union(&b)),
            _ => element.world_bounds(),
        }
    }

    /// Topmost focusable element under `point`, ignoring elements pending
    /// destruction.
    #[must_use]
    pub fn hit_test(&self, point: Vec2, slop: f32) -> Option<ElementId> {
        self.draw_order.iter().rev().copied().find(|id| {
            !self.is_pending_destruction(*id)
                && self.elements.get(id).is_some_and(|e| e.focus.is_some())
                && self
                    .bounds(*id)
                    .is_some_and(|b| b.expand(slop).contains(point))
        })
    }

    /// Register a hook run once when `id` is scheduled for destruction.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn on_destroy(&mut self, id: ElementId, hook: DestroyHook) -> CanvasResult<()> {
        self.require(id)?;
        self.destroy_hooks.entry(id).or_default().push(hook);
        Ok(())
    }

    /// Run destroy hooks for `id` and its subtree, then defer removal to
    /// [`ElementStore::flush_destroyed`].
    ///
    /// Returns `false` without side effects if the element is unknown or
    /// already scheduled.
    pub fn schedule_destruction(&mut self, id: ElementId) -> bool {
        if !self.contains(id) || self.is_pending_destruction(id) {
            tracing::debug!("Ignoring destruction of unknown or scheduled element {id}");
            return false;
        }

        for target in self.subtree(id) {
            if self.is_pending_destruction(target) {
                continue;
            }
            if let (Some(mut hooks), Some(element)) =
                (self.destroy_hooks.remove(&target), self.elements.get(&target))
            {
                for hook in &mut hooks {
                    hook(element);
                }
            }
            self.pending_destruction.push(target);
            self.pending_lookup.insert(target);
        }
        self.revision += 1;

        tracing::debug!("Scheduled {id} for destruction");
        true
    }

    /// Whether `id` awaits the end-of-frame sweep.
    #[must_use]
    pub fn is_pending_destruction(&self, id: ElementId) -> bool {
        self.pending_lookup.contains(&id)
    }

    /// Ids awaiting the sweep, in scheduling order.
    #[must_use]
    pub fn pending_destruction(&self) -> &[ElementId] {
        &self.pending_destruction
    }

    /// Remove every scheduled element and unlink it from its parent.
    ///
    /// Returns the number of elements removed.
    pub fn flush_destroyed(&mut self) -> usize {
        if self.pending_destruction.is_empty() {
            return 0;
        }
        self.pending_destruction.clear();
        let doomed = std::mem::take(&mut self.pending_lookup);

        let mut removed = 0;
        for id in &doomed {
            let Some(element) = self.elements.remove(id) else {
                continue;
            };
            removed += 1;
            self.destroy_hooks.remove(id);

            if let Some(parent) = element.parent().filter(|p| !doomed.contains(p)) {
                if let Some(links) = self
                    .elements
                    .get_mut(&parent)
                    .and_then(|p| p.hierarchy.as_mut())
                {
                    links.children.retain(|c| c != id);
                }
            }
        }
        self.draw_order.retain(|id| !doomed.contains(id));

        tracing::debug!("Destroyed {removed} elements");
        removed
    }

    /// Capture every live element; pending destruction is left out.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let elements = self
            .iter()
            .filter(|e| !self.is_pending_destruction(e.id))
            .map(|e| {
                let mut element = e.clone();
                if let Some(links) = element.hierarchy.as_mut() {
                    links
                        .children
                        .retain(|c| !self.is_pending_destruction(*c));
                }
                element
            })
            .collect();

        StoreSnapshot {
            elements,
            next_root_index: self.next_root_index,
        }
    }

    /// Replace the store contents with `snapshot`.
    ///
    /// Pending destruction is cleared. Hooks survive for ids that still
    /// exist.
    pub fn restore(&mut self, snapshot: &StoreSnapshot) {
        self.draw_order = snapshot.elements.iter().map(|e| e.id).collect();
        self.elements = snapshot
            .elements
            .iter()
            .map(|e| (e.id, e.clone()))
            .collect();
        self.next_root_index = snapshot.next_root_index;
        self.pending_destruction.clear();
        self.pending_lookup.clear();
        let elements = &self.elements;
        self.destroy_hooks.retain(|id, _| elements.contains_key(id));
        self.revision += 1;
    }

    /// Children links of `id`, when it has the hierarchy capability.
    #[must_use]
    pub fn hierarchy(&self, id: ElementId) -> Option<&Hierarchy> {
        self.elements.get(&id)?.hierarchy.as_ref()
    }
}

fn invariant(err: CanvasError) -> CanvasError {
    tracing::error!("Store invariant violated: {err}");
    err
}
