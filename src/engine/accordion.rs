//! Accordion - An ordered column of folds and the propagation engine.
//!
//! The algorithm that keeps the tree consistent lives here. A height delta
//! enters at one fold (`update_fold`) or at one accordion (`update`) and
//! flows sideways through later siblings and upward through ancestor
//! accordions, but only through *open* hosting folds: a delta inside a
//! closed fold affects no visible space, so it terminates there and is
//! reconciled later by the deferred refresh.
//!
//! Root accordions own the edge-visibility check: when the container bottom
//! is (or is about to come) inside the viewport, height changes are worth
//! animating; when it is already below the viewport and stays there, the
//! animation marker is dropped so off-screen transitions cost nothing.
//!
//! Every pass runs synchronously inside the triggering call, so transiently
//! inconsistent intermediate states are never observable from outside.

use log::{debug, trace};
use spark_signals::Signal;

use crate::host::HostSurface;
use crate::types::{AccordionId, FoldFlags, FoldId, NodeId, Options};

use super::registry::Registry;

/// An ordered column of folds, possibly nested inside another accordion's
/// fold.
///
/// `parent` and `parent_fold` are jointly `None` (root) or jointly `Some`
/// (nested); both are back-references into the registry arenas, never owners.
pub struct Accordion {
    /// Container node.
    pub el: NodeId,
    /// Child folds in host order, fixed at mount.
    pub folds: Vec<FoldId>,
    /// Container height (px); the sum of fold heights once layout settles.
    pub height: f64,
    /// Enclosing accordion, when nested.
    pub parent: Option<AccordionId>,
    /// The parent's fold hosting this accordion, when nested.
    pub parent_fold: Option<FoldId>,
    /// Accordions nested inside this accordion's folds, in mount order.
    pub child_accordions: Vec<AccordionId>,
    /// Reactive mirror of the edge class, for collaborators. Meaningful on
    /// roots; nested accordions inherit their ancestors' visibility.
    pub edge_visible: Signal<bool>,
    /// Per-instance configuration.
    pub options: Options,
}

impl Registry {
    // =========================================================================
    // Full Recomputation
    // =========================================================================

    /// Recompute one accordion's layout from scratch: walk folds in order,
    /// fit each, assign offsets, then route the resulting height delta
    /// upward through an open hosting fold, or into the edge check on roots.
    /// A closed hosting fold terminates the pass.
    pub fn update<H: HostSurface>(&mut self, host: &mut H, id: AccordionId) {
        let fold_ids = self.accordions[id.0].folds.clone();
        let mut offset = 0.0;
        for fid in fold_ids {
            self.commit_fold_y(host, fid, offset);
            self.fit(host, fid);
            offset += self.folds[fid.0].height;
        }

        let diff = offset - self.accordions[id.0].height;
        trace!("accordion {} update: height {}px, diff {}px", id.0, offset, diff);

        let parent_fold = self.accordions[id.0].parent_fold;
        match parent_fold {
            Some(pf) if self.folds[pf.0].is_open() => self.update_fold(host, pf, diff),
            Some(_) => {}
            None => self.edge_check(host, id, diff),
        }

        self.commit_accordion_height(host, id, offset);
    }

    // =========================================================================
    // Delta Propagation
    // =========================================================================

    /// Apply a height delta originating at `id` to everything after it and
    /// above it: later siblings shift by the delta, the fold and its
    /// container absorb it, and it bubbles through the parent's hosting fold
    /// while that fold is open. Exactly one visit per ancestor level,
    /// stopping at the first root or first closed hosting fold.
    ///
    /// Sibling shifts and the local commits both land before the recursion,
    /// so each parent observes a fully consistent child.
    pub fn update_fold<H: HostSurface>(&mut self, host: &mut H, id: FoldId, offset: f64) {
        trace!("fold {} delta {}px", id.0, offset);
        let aid = self.folds[id.0].accordion;

        let mut cursor = self.folds[id.0].next;
        while let Some(fid) = cursor {
            let y = self.folds[fid.0].y + offset;
            self.commit_fold_y(host, fid, y);
            cursor = self.folds[fid.0].next;
        }

        if self.accordions[aid.0].parent_fold.is_none() {
            self.edge_check(host, aid, offset);
        }

        let fold_height = self.folds[id.0].height + offset;
        self.commit_fold_height(host, id, fold_height);
        let height = self.accordions[aid.0].height + offset;
        self.commit_accordion_height(host, aid, height);

        if let Some(pf) = self.accordions[aid.0].parent_fold {
            if self.folds[pf.0].is_open() {
                self.update_fold(host, pf, offset);
            }
        }
    }

    /// Commit an accordion height to its container. Zero and unchanged
    /// values are skipped.
    pub(crate) fn commit_accordion_height<H: HostSurface>(
        &mut self,
        host: &mut H,
        id: AccordionId,
        px: f64,
    ) {
        let acc = &mut self.accordions[id.0];
        if px == 0.0 || px == acc.height {
            return;
        }
        acc.height = px;
        host.set_height(acc.el, px);
    }

    // =========================================================================
    // Edge Visibility
    // =========================================================================

    /// Decide whether height changes on a root container are worth
    /// animating, given a prospective delta of `offset`.
    ///
    /// The marker stays on while the container bottom is inside the viewport,
    /// or while the delta would bring it inside; it drops only when the
    /// bottom already sits below the viewport and the delta keeps it there.
    pub fn edge_check<H: HostSurface>(&self, host: &mut H, id: AccordionId, offset: f64) {
        let acc = &self.accordions[id.0];
        let Some(edge_class) = acc.options.edge_class.as_deref() else {
            return;
        };

        let bottom = host.bounds(acc.el).bottom();
        let viewport = host.viewport_height();
        let visible = bottom <= viewport || bottom + offset <= viewport;

        host.set_class(acc.el, edge_class, visible);
        if acc.edge_visible.get() != visible {
            acc.edge_visible.set(visible);
        }
    }

    /// Host-fired after a container height transition finishes.
    ///
    /// Only meaningful on roots: when the just-finished animation pushed the
    /// container bottom below the viewport, the edge marker comes off so the
    /// next change skips animation.
    pub fn transition_ended<H: HostSurface>(&self, host: &mut H, id: AccordionId) {
        let acc = &self.accordions[id.0];
        if acc.parent.is_some() {
            return;
        }
        let Some(edge_class) = acc.options.edge_class.as_deref() else {
            return;
        };

        if host.bounds(acc.el).bottom() > host.viewport_height() {
            host.set_class(acc.el, edge_class, false);
            if acc.edge_visible.get() {
                acc.edge_visible.set(false);
            }
        }
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Full re-layout for external triggers (viewport resize, content that
    /// changed size without a toggle).
    ///
    /// With `allow_snap`, the snap class suppresses transitions for this pass
    /// and its removal is queued for [`Registry::release_snap`]. Child
    /// accordions under open folds are refreshed recursively; children under
    /// closed folds are deferred until that fold next opens.
    pub fn refresh<H: HostSurface>(&mut self, host: &mut H, id: AccordionId, allow_snap: bool) {
        debug!("accordion {} refresh (snap: {})", id.0, allow_snap);

        if allow_snap {
            let el = self.accordions[id.0].el;
            if let Some(snap) = self.accordions[id.0].options.snap_class.clone() {
                host.set_class(el, &snap, true);
                self.pending_snap.push(id);
            }
        }

        self.update(host, id);

        let fold_ids = self.accordions[id.0].folds.clone();
        for fid in fold_ids {
            if self.folds[fid.0].child_accordions.is_empty() {
                continue;
            }
            if self.folds[fid.0].is_open() {
                let children = self.folds[fid.0].child_accordions.clone();
                for child in children {
                    self.refresh(host, child, allow_snap);
                }
            } else {
                self.folds[fid.0].flags.insert(FoldFlags::NEEDS_REFRESH);
            }
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Whether any fold's cached height has drifted from its natural fitted
    /// height, checked recursively through child accordions.
    pub fn wrong_size<H: HostSurface>(&self, host: &H, id: AccordionId) -> bool {
        let acc = &self.accordions[id.0];
        for &fid in &acc.folds {
            if self.fitted_height(host, fid) != self.folds[fid.0].height {
                return true;
            }
        }
        acc.child_accordions
            .iter()
            .any(|&child| self.wrong_size(host, child))
    }

    /// Top-most accordion above `id` (itself, when not nested).
    pub fn root(&self, id: AccordionId) -> AccordionId {
        let mut cursor = id;
        while let Some(parent) = self.accordions[cursor.0].parent {
            cursor = parent;
        }
        cursor
    }
}

// =============================================================================
// Tests
// =============================================================================
