//! Host surface abstraction.
//!
//! The engine never touches a rendering surface directly. Everything it needs
//! from the outside world (box geometry, natural content sizes, height and
//! offset writes, class and attribute toggles) goes through [`HostSurface`].
//! A browser embedder backs the trait with real DOM calls; [`MemoryHost`]
//! backs it with a plain node tree for headless layout and tests.
//!
//! Reads are assumed cheap-but-not-free (a bounding box read can force a
//! reflow on real surfaces), so the engine batches reads per pass and guards
//! every write.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{NodeId, Rect};

// =============================================================================
// Host Surface Trait
// =============================================================================

/// The mutable surface the engine lays out against.
///
/// Node handles are opaque; the host owns their meaning. All coordinates are
/// px with the viewport top as origin. Implementations are expected to be
/// well-formed (a returned child belongs to its parent); the engine degrades
/// silently rather than validating.
pub trait HostSurface {
    /// Parent of a node, `None` at the tree root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Immediate children of a node, in display order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Natural (content-fitted) height of a node's subtree, ignoring any
    /// height previously written to the node itself.
    fn natural_height(&self, node: NodeId) -> f64;

    /// Current bounding box of a node in viewport coordinates.
    fn bounds(&self, node: NodeId) -> Rect;

    /// Current viewport height.
    fn viewport_height(&self) -> f64;

    /// Write a rendered height to a node.
    fn set_height(&mut self, node: NodeId, px: f64);

    /// Write a vertical offset (within the parent container) to a node.
    fn set_top(&mut self, node: NodeId, px: f64);

    /// Add or remove a class on a node.
    fn set_class(&mut self, node: NodeId, class: &str, on: bool);

    /// Test whether a node currently carries a class.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Write an attribute on a node.
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);
}

// =============================================================================
// Memory Host
// =============================================================================

/// In-memory node tree implementing [`HostSurface`].
///
/// Natural heights are either declared per node or derived as the sum of the
/// children's effective heights, so a written child height is visible to its
/// ancestors' measurements the way it would be on a live surface.
///
/// Beyond the trait, the host records every height write, which lets tests
/// assert that redundant writes were skipped.
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<MemNode>,
    viewport_height: f64,
    height_writes: usize,
}

#[derive(Debug, Default)]
struct MemNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Declared natural height; `None` derives from children.
    natural: Option<f64>,
    /// Distance from the viewport top (for bounding boxes).
    top: f64,
    /// Height written through the surface, if any.
    height: Option<f64>,
    /// Offset written through the surface, if any.
    offset: Option<f64>,
    classes: BTreeSet<String>,
    attrs: BTreeMap<String, String>,
}

impl MemoryHost {
    /// Create an empty host with the given viewport height.
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Append a node, optionally under a parent. Returns its handle.
    pub fn node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(MemNode {
            parent,
            ..MemNode::default()
        });
        if let Some(p) = parent {
            self.nodes[p.0 as usize].children.push(id);
        }
        id
    }

    /// Declare a node's natural height (content size independent of writes).
    pub fn set_natural_height(&mut self, node: NodeId, px: f64) {
        self.nodes[node.0 as usize].natural = Some(px);
    }

    /// Position a node's top edge in viewport coordinates.
    pub fn place(&mut self, node: NodeId, top: f64) {
        self.nodes[node.0 as usize].top = top;
    }

    /// Change the viewport height (simulates a window resize).
    pub fn set_viewport_height(&mut self, px: f64) {
        self.viewport_height = px;
    }

    /// Height last written to a node, if any.
    pub fn applied_height(&self, node: NodeId) -> Option<f64> {
        self.nodes[node.0 as usize].height
    }

    /// Offset last written to a node, if any.
    pub fn applied_top(&self, node: NodeId) -> Option<f64> {
        self.nodes[node.0 as usize].offset
    }

    /// Attribute value last written to a node, if any.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0 as usize].attrs.get(name).map(String::as_str)
    }

    /// Total number of height writes the engine has issued.
    pub fn height_writes(&self) -> usize {
        self.height_writes
    }

    /// A node's height as the surface would render it: an applied height
    /// wins, otherwise the natural height.
    fn effective_height(&self, node: NodeId) -> f64 {
        self.nodes[node.0 as usize]
            .height
            .unwrap_or_else(|| self.natural_height(node))
    }
}

impl HostSurface for MemoryHost {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0 as usize].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0 as usize].children.clone()
    }

    fn natural_height(&self, node: NodeId) -> f64 {
        let n = &self.nodes[node.0 as usize];
        match n.natural {
            Some(px) => px,
            None => n
                .children
                .clone()
                .into_iter()
                .map(|child| self.effective_height(child))
                .sum(),
        }
    }

    fn bounds(&self, node: NodeId) -> Rect {
        Rect::new(self.nodes[node.0 as usize].top, self.effective_height(node))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn set_height(&mut self, node: NodeId, px: f64) {
        self.height_writes += 1;
        self.nodes[node.0 as usize].height = Some(px);
    }

    fn set_top(&mut self, node: NodeId, px: f64) {
        self.nodes[node.0 as usize].offset = Some(px);
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        let classes = &mut self.nodes[node.0 as usize].classes;
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0 as usize].classes.contains(class)
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0 as usize]
            .attrs
            .insert(name.to_string(), value.to_string());
    }
}

// =============================================================================
// Tests
// =============================================================================
