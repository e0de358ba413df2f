//! # Transform Hierarchy
//!
//! World transforms and draw order for the element tree.
//!
//! Every element carries an [`IndexHierarchy`]: the sibling-insertion indices
//! on the path from its root down to itself. Ordering paths
//! lexicographically, with a strict prefix first, yields a total order in
//! which every ancestor precedes its descendants and siblings keep insertion
//! order. That order is the painter's order: later entries draw on top.
//!
//! ```text
//! [0]        root A
//! [0, 0]       child of A
//! [0, 0, 0]      grandchild
//! [0, 1]       second child of A
//! [1]        root B
//! ```
//!
//! Topology changes by a handful of nodes per frame at most, so the draw
//! list stays nearly sorted and is re-sorted with a stable insertion sort.

use std::cmp::Ordering;

use glam::Affine2;
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::store::ElementStore;

/// Path of sibling-insertion indices from the root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexHierarchy(Vec<u32>);

impl IndexHierarchy {
    /// Path of a root inserted at `index`.
    #[must_use]
    pub fn root(index: u32) -> Self {
        Self(vec![index])
    }

    /// Path of this node's child inserted at `index`.
    #[must_use]
    pub fn child(&self, index: u32) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// The raw indices.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Number of levels below the root (roots have depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Whether `self` is a strict prefix of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl From<Vec<u32>> for IndexHierarchy {
    fn from(path: Vec<u32>) -> Self {
        Self(path)
    }
}

impl PartialOrd for IndexHierarchy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexHierarchy {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

/// Draw-order comparison of two paths.
///
/// Indices are compared position by position and the first mismatch
/// decides. When one path is a prefix of the other, the shorter one (the
/// ancestor) sorts first.
#[must_use]
pub fn compare(a: &IndexHierarchy, b: &IndexHierarchy) -> Ordering {
    for (lhs, rhs) in a.0.iter().zip(&b.0) {
        if lhs != rhs {
            return lhs.cmp(rhs);
        }
    }
    a.0.len().cmp(&b.0.len())
}

/// Stable in-place insertion sort.
///
/// Linear on input that is already nearly sorted. Returns the number of
/// swaps performed.
pub fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut swaps = 0;
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
            swaps += 1;
        }
    }
    swaps
}

impl Element {
    /// Recompute the world transform from the parent's world transform.
    ///
    /// Roots pass `None` and end up with their local transform.
    pub fn update(&mut self, parent_world: Option<Affine2>) {
        let local = self.transform.to_affine();
        self.world = match parent_world {
            Some(parent) => parent * local,
            None => local,
        };
    }
}

impl ElementStore {
    /// Propagate transforms top-down from every root.
    ///
    /// A node's world transform depends only on the local transforms of its
    /// ancestors and itself, so sibling update order cannot leak between
    /// siblings.
    pub fn update_transforms(&mut self) {
        let roots: Vec<ElementId> = self
            .draw_order
            .iter()
            .copied()
            .filter(|id| self.elements.get(id).is_some_and(Element::is_root))
            .collect();

        for root in roots {
            self.update_subtree(root, None);
        }
    }

    fn update_subtree(&mut self, id: ElementId, parent_world: Option<Affine2>) {
        let Some(element) = self.elements.get_mut(&id) else {
            return;
        };
        element.update(parent_world);
        let world = element.world;
        let children = element.children().to_vec();

        for child in children {
            self.update_subtree(child, Some(world));
        }
    }

    /// Restore draw order after topology changes.
    ///
    /// Returns the number of swaps, which stays small when only a few
    /// elements changed since the last resort.
    pub fn resort(&mut self) -> usize {
        let elements = &self.elements;
        let swaps = insertion_sort_by(&mut self.draw_order, |a, b| {
            match (elements.get(a), elements.get(b)) {
                (Some(a), Some(b)) => compare(&a.index, &b.index),
                (a, b) => a.is_some().cmp(&b.is_some()),
            }
        });
        if swaps > 0 {
            tracing::debug!("Draw order resorted with {swaps} swaps");
        }
        swaps
    }
}
