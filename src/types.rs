//! Core types for concertina.
//!
//! These types define the foundation that everything builds on.
//! They flow between the host surface, the registry, and the propagation engine.

// =============================================================================
// Handles
// =============================================================================

/// Opaque handle for a host node.
///
/// Minted by the embedder; the engine never interprets the value, it only
/// passes it back to the host surface. Using integers for exact comparison
/// and cheap map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a node handle from a raw host value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Handle for an accordion in the registry.
///
/// The value is the accordion's registry slot: handles are allocation indices
/// and the registry is append-only, so a handle never dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccordionId(pub(crate) usize);

impl AccordionId {
    /// Registry slot this handle resolves to.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle for a fold in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoldId(pub(crate) usize);

impl FoldId {
    /// Registry slot this handle resolves to.
    pub const fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Vertical extent of a box in viewport coordinates (px).
///
/// Only the vertical axis matters to the engine: folds stack in a column and
/// visibility is decided against the viewport's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Distance from the viewport top to the box top.
    pub top: f64,
    /// Rendered height of the box.
    pub height: f64,
}

impl Rect {
    /// Create a rect from a top offset and a height.
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Distance from the viewport top to the box bottom.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

// =============================================================================
// Fold Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Fold state as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `FoldFlags::OPEN | FoldFlags::NEEDS_REFRESH`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FoldFlags: u8 {
        const NONE = 0;
        /// The fold is expanded and its content occupies layout space.
        const OPEN = 1 << 0;
        /// Child accordions changed while this fold was closed; refresh
        /// them when the fold next opens.
        const NEEDS_REFRESH = 1 << 1;
    }
}

// =============================================================================
// Options
// =============================================================================

/// Per-accordion configuration.
///
/// All classes are written through the host surface; collaborators style the
/// transitions off them. `None` for a class disables that behavior entirely.
#[derive(Debug, Clone)]
pub struct Options {
    /// Class toggled by the edge-visibility check on root containers.
    /// `None` disables edge checking (every height change may animate).
    pub edge_class: Option<String>,
    /// Class applied for one transition-suppressed layout pass during a
    /// snapped refresh. `None` disables snapping.
    pub snap_class: Option<String>,
    /// Class reflecting an expanded fold. Also read at mount time so markup
    /// can declare folds pre-opened.
    pub open_class: String,
    /// Class reflecting a collapsed fold.
    pub close_class: String,
    /// Suppress `aria-expanded`/`aria-hidden` writes.
    pub no_aria: bool,
    /// Recorded for the keyboard collaborator; the core wires no keys itself.
    pub no_keys: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            edge_class: Some("edge-visible".to_string()),
            snap_class: Some("snap".to_string()),
            open_class: "open".to_string(),
            close_class: "closed".to_string(),
            no_aria: false,
            no_keys: false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bottom() {
        let rect = Rect::new(100.0, 50.0);
        assert_eq!(rect.bottom(), 150.0);
    }

    #[test]
    fn test_fold_flags_combine() {
        let mut flags = FoldFlags::OPEN;
        assert!(flags.contains(FoldFlags::OPEN));
        assert!(!flags.contains(FoldFlags::NEEDS_REFRESH));

        flags.insert(FoldFlags::NEEDS_REFRESH);
        assert!(flags.contains(FoldFlags::OPEN | FoldFlags::NEEDS_REFRESH));

        flags.remove(FoldFlags::OPEN);
        assert!(!flags.contains(FoldFlags::OPEN));
        assert!(flags.contains(FoldFlags::NEEDS_REFRESH));
    }

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.edge_class.as_deref(), Some("edge-visible"));
        assert_eq!(options.snap_class.as_deref(), Some("snap"));
        assert_eq!(options.open_class, "open");
        assert_eq!(options.close_class, "closed");
        assert!(!options.no_aria);
        assert!(!options.no_keys);
    }
}
