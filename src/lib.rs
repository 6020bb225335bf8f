//! # concertina
//!
//! Nested accordion layout engine for UI hosts.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! the collaborator-facing reactive state (fold open bits, edge visibility).
//!
//! ## Architecture
//!
//! Accordions and folds live in a single registry arena; components are
//! typed index handles into that arena rather than objects. The propagation
//! engine applies a height delta where it originates and walks it sideways
//! and upward in one synchronous pass:
//!
//! ```text
//! Fold toggle → update_fold → siblings shift → ancestors absorb the delta
//!                                              (roots run the edge check)
//!
//! Viewport resize → ResizeCoordinator → snapped root refresh → open descendants
//! ```
//!
//! The rendering surface is injected behind [`host::HostSurface`]; the
//! engine only ever reads geometry and writes heights, offsets, classes, and
//! attributes through it. [`host::MemoryHost`] backs the trait with a plain
//! node tree for tests and headless embedders.
//!
//! ## Modules
//!
//! - [`types`] - Handles, geometry, fold flags, per-accordion options
//! - [`host`] - Host surface trait and the in-memory reference host
//! - [`engine`] - Registry, entities, and the propagation algorithm
//! - [`resize`] - Viewport-resize coalescing and root refresh fan-out

pub mod engine;
pub mod host;
pub mod resize;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{Accordion, Fold, Registry};

pub use host::{HostSurface, MemoryHost};

pub use resize::{ResizeCoordinator, ResizeRate, refresh_roots};
