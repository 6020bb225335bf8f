//! Mount - Construction of accordions from host containers.
//!
//! One accordion per container, one fold per container child, built at call
//! time. A fold box is expected to hold a heading (first child) and a content
//! region (second child); children without that pair are skipped rather than
//! rejected. Nesting is discovered once, by walking the container's host
//! ancestors for a fold mark left by an enclosing mount, so mount outer
//! containers before inner ones.

use log::debug;
use spark_signals::signal;

use crate::host::HostSurface;
use crate::types::{AccordionId, FoldFlags, FoldId, NodeId, Options};

use super::accordion::Accordion;
use super::fold::Fold;
use super::registry::Registry;

impl Registry {
    /// Build an accordion over `container` and lay it out.
    ///
    /// Folds whose box carries `open_class` start open, so markup can
    /// declare pre-expanded state. Returns the accordion's handle; a
    /// container with no usable children mounts to an empty column of
    /// height 0.
    pub fn mount<H: HostSurface>(
        &mut self,
        host: &mut H,
        container: NodeId,
        options: Options,
    ) -> AccordionId {
        let id = AccordionId(self.accordions.len());

        // Nesting: the nearest fold mark above this container, if any.
        let parent_fold = self.nearest_fold(host, container);
        let parent = parent_fold.map(|pf| self.folds[pf.0].accordion);

        let mut fold_ids: Vec<FoldId> = Vec::new();
        for el in host.children(container) {
            let boxed = host.children(el);
            let (Some(&heading), Some(&content)) = (boxed.first(), boxed.get(1)) else {
                debug!("skipping fold box without heading/content pair");
                continue;
            };

            let fid = FoldId(self.folds.len());
            let open = host.has_class(el, &options.open_class);
            let prev = fold_ids.last().copied();
            if let Some(p) = prev {
                self.folds[p.0].next = Some(fid);
            }
            self.folds.push(Fold {
                accordion: id,
                el,
                heading,
                content,
                y: 0.0,
                height: 0.0,
                flags: if open { FoldFlags::OPEN } else { FoldFlags::NONE },
                open_signal: signal(open),
                prev,
                next: None,
                child_accordions: Vec::new(),
            });
            self.mark_fold(el, fid);
            fold_ids.push(fid);
        }

        self.accordions.push(Accordion {
            el: container,
            folds: fold_ids,
            height: 0.0,
            parent,
            parent_fold,
            child_accordions: Vec::new(),
            edge_visible: signal(false),
            options,
        });
        self.mark_accordion(container, id);

        if let Some(pf) = parent_fold {
            let pa = self.folds[pf.0].accordion;
            self.accordions[pa.0].child_accordions.push(id);
            self.folds[pf.0].child_accordions.push(id);
        }

        // Reflect the initial fold states before the first layout pass.
        for fid in self.accordions[id.0].folds.clone() {
            let open = self.folds[fid.0].is_open();
            self.apply_fold_state(host, fid, open);
        }

        debug!(
            "mounted accordion {} with {} fold(s){}",
            id.0,
            self.accordions[id.0].folds.len(),
            if parent.is_some() { " (nested)" } else { "" },
        );

        self.update(host, id);
        id
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::host::{HostSurface, MemoryHost};
    use crate::types::{NodeId, Options};

    use super::super::registry::Registry;

    fn fold_box(host: &mut MemoryHost, container: NodeId, heading_px: f64, content_px: f64) -> NodeId {
        let fold = host.node(Some(container));
        let heading = host.node(Some(fold));
        host.set_natural_height(heading, heading_px);
        let content = host.node(Some(fold));
        host.set_natural_height(content, content_px);
        fold
    }

    #[test]
    fn test_mount_assigns_slots_in_order() {
        let mut host = MemoryHost::new(800.0);
        let first = host.node(None);
        fold_box(&mut host, first, 40.0, 200.0);
        let second = host.node(None);
        fold_box(&mut host, second, 40.0, 200.0);

        let mut registry = Registry::new();
        let a = registry.mount(&mut host, first, Options::default());
        let b = registry.mount(&mut host, second, Options::default());

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.roots(), vec![a, b]);
    }

    #[test]
    fn test_sibling_links_match_child_order() {
        let mut host = MemoryHost::new(800.0);
        let container = host.node(None);
        for _ in 0..3 {
            fold_box(&mut host, container, 40.0, 200.0);
        }

        let mut registry = Registry::new();
        let id = registry.mount(&mut host, container, Options::default());
        let folds = registry.resolve(id).folds.clone();

        assert_eq!(registry.resolve_fold(folds[0]).prev, None);
        assert_eq!(registry.resolve_fold(folds[0]).next, Some(folds[1]));
        assert_eq!(registry.resolve_fold(folds[1]).prev, Some(folds[0]));
        assert_eq!(registry.resolve_fold(folds[1]).next, Some(folds[2]));
        assert_eq!(registry.resolve_fold(folds[2]).next, None);
    }

    #[test]
    fn test_nesting_detected_from_ancestor_marks() {
        let mut host = MemoryHost::new(800.0);
        let outer = host.node(None);
        let fold = fold_box(&mut host, outer, 40.0, 0.0);
        let content = host.children(fold)[1];
        let inner = host.node(Some(content));
        fold_box(&mut host, inner, 50.0, 250.0);

        let mut registry = Registry::new();
        let a = registry.mount(&mut host, outer, Options::default());
        let b = registry.mount(&mut host, inner, Options::default());

        let hosting_fold = registry.resolve(a).folds[0];
        assert_eq!(registry.resolve(b).parent, Some(a));
        assert_eq!(registry.resolve(b).parent_fold, Some(hosting_fold));
        assert_eq!(registry.resolve(a).child_accordions, vec![b]);
        assert_eq!(registry.resolve_fold(hosting_fold).child_accordions, vec![b]);

        // Roots exclude the nested accordion.
        assert_eq!(registry.roots(), vec![a]);
    }

    #[test]
    fn test_parent_links_jointly_absent_on_roots() {
        let mut host = MemoryHost::new(800.0);
        let container = host.node(None);
        fold_box(&mut host, container, 40.0, 200.0);

        let mut registry = Registry::new();
        let id = registry.mount(&mut host, container, Options::default());
        assert!(registry.resolve(id).parent.is_none());
        assert!(registry.resolve(id).parent_fold.is_none());
    }

    #[test]
    fn test_pre_opened_fold_from_markup() {
        let mut host = MemoryHost::new(800.0);
        let container = host.node(None);
        let fold = fold_box(&mut host, container, 40.0, 200.0);
        fold_box(&mut host, container, 40.0, 200.0);
        host.set_class(fold, "open", true);

        let mut registry = Registry::new();
        let id = registry.mount(&mut host, container, Options::default());
        let folds = registry.resolve(id).folds.clone();

        assert!(registry.resolve_fold(folds[0]).is_open());
        assert_eq!(registry.resolve_fold(folds[0]).height, 240.0);
        assert_eq!(registry.resolve_fold(folds[1]).y, 240.0);
        assert_eq!(registry.resolve(id).height, 280.0);
        assert!(registry.resolve_fold(folds[0]).open_signal.get());
    }

    #[test]
    fn test_malformed_children_are_skipped() {
        let mut host = MemoryHost::new(800.0);
        let container = host.node(None);
        fold_box(&mut host, container, 40.0, 200.0);
        // A stray child with no heading/content pair.
        let stray = host.node(Some(container));
        host.set_natural_height(stray, 15.0);

        let mut registry = Registry::new();
        let id = registry.mount(&mut host, container, Options::default());

        assert_eq!(registry.resolve(id).folds.len(), 1);
        assert_eq!(registry.resolve(id).height, 40.0);
    }

    #[test]
    fn test_marks_resolve_from_descendants() {
        let mut host = MemoryHost::new(800.0);
        let container = host.node(None);
        let fold = fold_box(&mut host, container, 40.0, 200.0);
        let content = host.children(fold)[1];
        let deep = host.node(Some(content));

        let mut registry = Registry::new();
        let id = registry.mount(&mut host, container, Options::default());
        let fid = registry.resolve(id).folds[0];

        assert_eq!(registry.nearest_accordion(&host, deep), Some(id));
        assert_eq!(registry.nearest_fold(&host, deep), Some(fid));
        // The container sits above the fold mark.
        assert_eq!(registry.nearest_fold(&host, container), None);
    }
}
