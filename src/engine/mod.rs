//! Accordion Engine - Registry, entities, and the propagation algorithm.
//!
//! The engine manages the core data structures:
//! - Registry: arena storage, handle resolution, ancestor lookups
//! - Accordion: an ordered column of folds and its container height
//! - Fold: one collapsible region and its offset within the column
//!
//! # Architecture
//!
//! Accordions and folds are NOT reference-counted objects. They are slots in
//! two append-only arenas, linked by typed index handles:
//!
//! ```text
//! accordions[0]  (root,     folds=[0,1,2],  parent=None)
//! accordions[1]  (nested,   folds=[3],      parent=0, parent_fold=1)
//! folds[0..3]    (doubly linked siblings of accordion 0)
//! folds[3]       (only fold of accordion 1)
//! ```
//!
//! Handles never dangle (slots are never reclaimed), cross-references never
//! cycle (they are indices, not owners), and every mutation goes through the
//! registry so the borrow story stays trivial.
//!
//! A height change enters at one fold and flows in a single synchronous pass:
//!
//! ```text
//! toggle → update_fold → shift later siblings
//!                      → commit fold + container heights
//!                      → bubble delta through open ancestor folds
//!                        (roots run the edge-visibility check instead)
//! ```

mod accordion;
mod fold;
mod mount;
mod registry;

pub use accordion::Accordion;
pub use fold::Fold;
pub use registry::Registry;
