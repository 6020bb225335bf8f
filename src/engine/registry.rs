//! Accordion Registry - Arena storage and handle resolution.
//!
//! Owns every accordion and fold in the process:
//! - Append-only arenas (handles are slots, slots are never reclaimed)
//! - Explicit `NodeId → mark` map for DOM-to-instance lookups, instead of
//!   stashing indices on host nodes
//! - Ancestor-walk lookups used by event delegation and nesting detection
//! - The deferred snap-release queue drained on the host's next tick
//!
//! All layout mutation happens through registry methods; see the sibling
//! modules for the propagation algorithm itself.

use std::collections::HashMap;

use crate::host::HostSurface;
use crate::types::{AccordionId, FoldId, NodeId};

use super::accordion::Accordion;
use super::fold::Fold;

/// What a marked host node resolves to.
#[derive(Debug, Clone, Copy)]
enum Mark {
    Accordion(AccordionId),
    Fold(FoldId),
}

/// Arena and lookup service for all accordions and folds.
///
/// One registry per UI surface, owned by the embedder and driven from its
/// single UI thread. The arenas only grow; a handle handed out once stays
/// valid for the registry's lifetime.
#[derive(Default)]
pub struct Registry {
    pub(crate) accordions: Vec<Accordion>,
    pub(crate) folds: Vec<Fold>,
    marks: HashMap<NodeId, Mark>,
    pub(crate) pending_snap: Vec<AccordionId>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Handle Resolution
    // =========================================================================

    /// Resolve an accordion handle to its instance.
    pub fn resolve(&self, id: AccordionId) -> &Accordion {
        &self.accordions[id.0]
    }

    /// Resolve a fold handle to its instance.
    pub fn resolve_fold(&self, id: FoldId) -> &Fold {
        &self.folds[id.0]
    }

    /// Number of registered accordions.
    pub fn len(&self) -> usize {
        self.accordions.len()
    }

    /// Whether no accordion has been mounted yet.
    pub fn is_empty(&self) -> bool {
        self.accordions.is_empty()
    }

    /// Handles of all accordions with no parent, in mount order.
    ///
    /// Roots are the resize-refresh entry points; everything below them is
    /// reached by cascading.
    pub fn roots(&self) -> Vec<AccordionId> {
        (0..self.accordions.len())
            .map(AccordionId)
            .filter(|id| self.accordions[id.0].parent.is_none())
            .collect()
    }

    // =========================================================================
    // Marks & Ancestor Lookups
    // =========================================================================

    pub(crate) fn mark_accordion(&mut self, node: NodeId, id: AccordionId) {
        self.marks.insert(node, Mark::Accordion(id));
    }

    pub(crate) fn mark_fold(&mut self, node: NodeId, id: FoldId) {
        self.marks.insert(node, Mark::Fold(id));
    }

    /// Nearest enclosing accordion for an arbitrary host node.
    ///
    /// Walks the node and its ancestors, testing each against the mark map.
    /// Returns `None` when the chain carries no accordion mark.
    pub fn nearest_accordion<H: HostSurface>(&self, host: &H, node: NodeId) -> Option<AccordionId> {
        let mut cursor = Some(node);
        while let Some(n) = cursor {
            if let Some(Mark::Accordion(id)) = self.marks.get(&n) {
                return Some(*id);
            }
            cursor = host.parent(n);
        }
        None
    }

    /// Nearest enclosing fold for an arbitrary host node.
    pub fn nearest_fold<H: HostSurface>(&self, host: &H, node: NodeId) -> Option<FoldId> {
        let mut cursor = Some(node);
        while let Some(n) = cursor {
            if let Some(Mark::Fold(id)) = self.marks.get(&n) {
                return Some(*id);
            }
            cursor = host.parent(n);
        }
        None
    }

    // =========================================================================
    // Deferred Snap Release
    // =========================================================================

    /// Remove the snap class from every container queued by a snapped
    /// refresh.
    ///
    /// Call on the tick after the refresh so the suppressed pass has been
    /// committed before transitions come back.
    pub fn release_snap<H: HostSurface>(&mut self, host: &mut H) {
        for id in std::mem::take(&mut self.pending_snap) {
            let acc = &self.accordions[id.0];
            if let Some(snap) = acc.options.snap_class.as_deref() {
                host.set_class(acc.el, snap, false);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
