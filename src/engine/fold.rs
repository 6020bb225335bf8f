//! Fold - One collapsible region and its fitted height.
//!
//! A fold owns its open state, its rendered height, and its vertical offset
//! within the owning accordion. Opening and closing are the deformation
//! events that seed the propagation pass; everything else in the engine is
//! bookkeeping around the deltas they produce.
//!
//! Collaborators observe a fold through `open_signal` (reactive mirror of the
//! state bit) and through the open/closed classes written to the host.

use log::debug;
use spark_signals::Signal;

use crate::host::HostSurface;
use crate::types::{AccordionId, FoldFlags, FoldId, NodeId};

use super::registry::Registry;

/// One collapsible unit inside an accordion.
///
/// The host-facing shape is fixed at mount: the fold box `el` holds a heading
/// (always visible, defines the closed height) and a content region (occupies
/// space only while open). Siblings form a doubly linked list matching host
/// child order.
pub struct Fold {
    /// Owning accordion.
    pub accordion: AccordionId,
    /// The fold box.
    pub el: NodeId,
    /// First child: always-visible heading.
    pub heading: NodeId,
    /// Second child: content region, laid out only while open.
    pub content: NodeId,
    /// Vertical offset (px) within the owning container; equals the summed
    /// heights of all preceding siblings.
    pub y: f64,
    /// Rendered box height (px): heading height while closed, heading plus
    /// content height while open.
    pub height: f64,
    /// State bits.
    pub flags: FoldFlags,
    /// Reactive mirror of the open bit, for collaborators.
    pub open_signal: Signal<bool>,
    /// Previous sibling in host order.
    pub prev: Option<FoldId>,
    /// Next sibling in host order.
    pub next: Option<FoldId>,
    /// Accordions nested directly inside this fold's content.
    pub child_accordions: Vec<AccordionId>,
}

impl Fold {
    /// Whether the fold is currently expanded.
    pub fn is_open(&self) -> bool {
        self.flags.contains(FoldFlags::OPEN)
    }
}

impl Registry {
    // =========================================================================
    // Fitting
    // =========================================================================

    /// Natural height of a fold in its current state: heading height, plus
    /// content height while open. Pure measurement, nothing committed.
    pub(crate) fn fitted_height<H: HostSurface>(&self, host: &H, id: FoldId) -> f64 {
        let fold = &self.folds[id.0];
        let heading = host.natural_height(fold.heading);
        if fold.is_open() {
            heading + host.natural_height(fold.content)
        } else {
            heading
        }
    }

    /// Recompute a fold's height from its current content size and commit it
    /// through the conditional write.
    pub(crate) fn fit<H: HostSurface>(&mut self, host: &mut H, id: FoldId) {
        let px = self.fitted_height(host, id);
        self.commit_fold_height(host, id, px);
    }

    // =========================================================================
    // Guarded Writes
    // =========================================================================

    /// Commit a fold height. Zero and unchanged values are skipped, so the
    /// host sees a write only when the rendered box actually changes.
    pub(crate) fn commit_fold_height<H: HostSurface>(&mut self, host: &mut H, id: FoldId, px: f64) {
        let fold = &mut self.folds[id.0];
        if px == 0.0 || px == fold.height {
            return;
        }
        fold.height = px;
        host.set_height(fold.el, px);
    }

    /// Commit a fold offset. Unchanged values are skipped.
    pub(crate) fn commit_fold_y<H: HostSurface>(&mut self, host: &mut H, id: FoldId, px: f64) {
        let fold = &mut self.folds[id.0];
        if px == fold.y {
            return;
        }
        fold.y = px;
        host.set_top(fold.el, px);
    }

    // =========================================================================
    // Toggling
    // =========================================================================

    /// Expand a fold. No-op when already open.
    ///
    /// Children that changed while the fold was hidden are reconciled first,
    /// while the fold is still closed, so their deltas terminate here and the
    /// open delta is computed from fresh natural sizes in one clean pass.
    pub fn open<H: HostSurface>(&mut self, host: &mut H, id: FoldId) {
        if self.folds[id.0].is_open() {
            return;
        }

        if self.folds[id.0].flags.contains(FoldFlags::NEEDS_REFRESH) {
            self.folds[id.0].flags.remove(FoldFlags::NEEDS_REFRESH);
            let children = self.folds[id.0].child_accordions.clone();
            for child in children {
                self.refresh(host, child, false);
            }
        }

        self.folds[id.0].flags.insert(FoldFlags::OPEN);
        self.folds[id.0].open_signal.set(true);
        self.apply_fold_state(host, id, true);

        let delta = self.fitted_height(host, id) - self.folds[id.0].height;
        debug!("fold {} opening, delta {}px", id.0, delta);
        self.update_fold(host, id, delta);
    }

    /// Collapse a fold back to its heading height. No-op when already closed.
    pub fn close<H: HostSurface>(&mut self, host: &mut H, id: FoldId) {
        if !self.folds[id.0].is_open() {
            return;
        }

        self.folds[id.0].flags.remove(FoldFlags::OPEN);
        self.folds[id.0].open_signal.set(false);
        self.apply_fold_state(host, id, false);

        let delta = self.fitted_height(host, id) - self.folds[id.0].height;
        debug!("fold {} closing, delta {}px", id.0, delta);
        self.update_fold(host, id, delta);
    }

    /// Flip a fold between open and closed.
    pub fn toggle<H: HostSurface>(&mut self, host: &mut H, id: FoldId) {
        if self.folds[id.0].is_open() {
            self.close(host, id);
        } else {
            self.open(host, id);
        }
    }

    /// Write the state classes and ARIA attributes for a fold.
    pub(crate) fn apply_fold_state<H: HostSurface>(&self, host: &mut H, id: FoldId, open: bool) {
        let fold = &self.folds[id.0];
        let opts = &self.accordions[fold.accordion.0].options;
        host.set_class(fold.el, &opts.open_class, open);
        host.set_class(fold.el, &opts.close_class, !open);
        if !opts.no_aria {
            host.set_attr(fold.heading, "aria-expanded", if open { "true" } else { "false" });
            host.set_attr(fold.content, "aria-hidden", if open { "false" } else { "true" });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::host::{HostSurface, MemoryHost};
    use crate::types::{AccordionId, Options};

    use super::super::registry::Registry;

    /// Container with three closed folds: heading 40px, content 200px each.
    fn fixture() -> (MemoryHost, Registry, AccordionId) {
        let mut host = MemoryHost::new(800.0);
        let container = host.node(None);
        for _ in 0..3 {
            let fold = host.node(Some(container));
            let heading = host.node(Some(fold));
            host.set_natural_height(heading, 40.0);
            let content = host.node(Some(fold));
            host.set_natural_height(content, 200.0);
        }
        let mut registry = Registry::new();
        let id = registry.mount(&mut host, container, Options::default());
        (host, registry, id)
    }

    #[test]
    fn test_closed_column_heights() {
        let (_host, registry, id) = fixture();
        let acc = registry.resolve(id);
        assert_eq!(acc.height, 120.0);
        for (i, &fid) in acc.folds.iter().enumerate() {
            let fold = registry.resolve_fold(fid);
            assert_eq!(fold.height, 40.0);
            assert_eq!(fold.y, 40.0 * i as f64);
            assert!(!fold.is_open());
        }
    }

    #[test]
    fn test_open_second_fold() {
        let (mut host, mut registry, id) = fixture();
        let folds = registry.resolve(id).folds.clone();

        registry.open(&mut host, folds[1]);

        assert_eq!(registry.resolve_fold(folds[1]).height, 240.0);
        assert_eq!(registry.resolve_fold(folds[1]).y, 40.0);
        assert_eq!(registry.resolve_fold(folds[2]).y, 280.0);
        assert_eq!(registry.resolve(id).height, 320.0);
        assert_eq!(host.applied_height(registry.resolve(id).el), Some(320.0));
    }

    #[test]
    fn test_close_restores_column() {
        let (mut host, mut registry, id) = fixture();
        let folds = registry.resolve(id).folds.clone();

        registry.open(&mut host, folds[1]);
        registry.close(&mut host, folds[1]);

        assert_eq!(registry.resolve_fold(folds[1]).height, 40.0);
        assert_eq!(registry.resolve_fold(folds[2]).y, 80.0);
        assert_eq!(registry.resolve(id).height, 120.0);
    }

    #[test]
    fn test_toggle_round_trip() {
        let (mut host, mut registry, id) = fixture();
        let fid = registry.resolve(id).folds[0];

        registry.toggle(&mut host, fid);
        assert!(registry.resolve_fold(fid).is_open());
        registry.toggle(&mut host, fid);
        assert!(!registry.resolve_fold(fid).is_open());
    }

    #[test]
    fn test_open_is_idempotent() {
        let (mut host, mut registry, id) = fixture();
        let fid = registry.resolve(id).folds[0];

        registry.open(&mut host, fid);
        let height = registry.resolve(id).height;
        registry.open(&mut host, fid);
        assert_eq!(registry.resolve(id).height, height);
    }

    #[test]
    fn test_open_signal_mirrors_state() {
        let (mut host, mut registry, id) = fixture();
        let fid = registry.resolve(id).folds[0];
        let signal = registry.resolve_fold(fid).open_signal.clone();

        assert!(!signal.get());
        registry.open(&mut host, fid);
        assert!(signal.get());
        registry.close(&mut host, fid);
        assert!(!signal.get());
    }

    #[test]
    fn test_state_classes_and_aria() {
        let (mut host, mut registry, id) = fixture();
        let fid = registry.resolve(id).folds[0];
        let fold_el = registry.resolve_fold(fid).el;
        let heading = registry.resolve_fold(fid).heading;
        let content = registry.resolve_fold(fid).content;

        assert!(host.has_class(fold_el, "closed"));
        assert_eq!(host.attr(heading, "aria-expanded"), Some("false"));

        registry.open(&mut host, fid);
        assert!(host.has_class(fold_el, "open"));
        assert!(!host.has_class(fold_el, "closed"));
        assert_eq!(host.attr(heading, "aria-expanded"), Some("true"));
        assert_eq!(host.attr(content, "aria-hidden"), Some("false"));
    }

    #[test]
    fn test_no_aria_suppresses_attributes() {
        let mut host = MemoryHost::new(800.0);
        let container = host.node(None);
        let fold = host.node(Some(container));
        let heading = host.node(Some(fold));
        host.set_natural_height(heading, 40.0);
        let content = host.node(Some(fold));
        host.set_natural_height(content, 100.0);

        let mut registry = Registry::new();
        let options = Options {
            no_aria: true,
            ..Options::default()
        };
        let id = registry.mount(&mut host, container, options);
        let fid = registry.resolve(id).folds[0];

        registry.open(&mut host, fid);
        assert_eq!(host.attr(heading, "aria-expanded"), None);
        assert_eq!(host.attr(content, "aria-hidden"), None);
    }
}
