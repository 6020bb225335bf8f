//! Resize Coordinator - Viewport-resize coalescing and root refresh fan-out.
//!
//! Resize storms would otherwise trigger a full re-layout per event. The
//! coordinator turns them into either one refresh per event (`Immediate`) or
//! one refresh per burst (`Debounced`): each event pushes the deadline out,
//! and the pass runs once the quiet period elapses.
//!
//! Time is passed in explicitly, so coalescing is testable without firing
//! real host events: the embedder calls [`ResizeCoordinator::on_resize`]
//! from its resize listener and [`ResizeCoordinator::tick`] from its frame
//! loop, both with the current instant.
//!
//! A fired pass refreshes only root accordions (nested ones are reached by
//! the refresh cascade) and runs snapped, so bulk geometry changes land
//! without visible transition jumps.

use std::time::{Duration, Instant};

use log::debug;

use crate::engine::Registry;
use crate::host::HostSurface;

// =============================================================================
// Resize Rate
// =============================================================================

/// How viewport-resize events map to refresh passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeRate {
    /// Resize events are ignored entirely.
    Off,
    /// Every event triggers a refresh pass on the spot.
    Immediate,
    /// Bursts coalesce into one pass after a quiet period.
    Debounced(Duration),
}

impl ResizeRate {
    /// Interpret a raw delay: zero refreshes per event, anything else
    /// coalesces.
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::Immediate
        } else {
            Self::Debounced(Duration::from_millis(ms))
        }
    }
}

// =============================================================================
// Resize Coordinator
// =============================================================================

/// Stateful debouncer between the host's resize events and the registry.
///
/// Starts `Off`; install handling with [`ResizeCoordinator::set_rate`].
#[derive(Debug)]
pub struct ResizeCoordinator {
    rate: ResizeRate,
    deadline: Option<Instant>,
}

impl Default for ResizeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeCoordinator {
    /// Create a coordinator with resize handling off.
    pub fn new() -> Self {
        Self {
            rate: ResizeRate::Off,
            deadline: None,
        }
    }

    /// Current rate.
    pub fn rate(&self) -> ResizeRate {
        self.rate
    }

    /// (Re)install resize handling. Switching to `Off` also drops any
    /// pending deadline.
    pub fn set_rate(&mut self, rate: ResizeRate) {
        self.rate = rate;
        if rate == ResizeRate::Off {
            self.deadline = None;
        }
    }

    /// Record a resize event at `now`.
    ///
    /// Returns whether a refresh pass should run immediately. Under
    /// `Debounced`, the pending deadline is pushed out instead.
    pub fn note_resize(&mut self, now: Instant) -> bool {
        match self.rate {
            ResizeRate::Off => false,
            ResizeRate::Immediate => true,
            ResizeRate::Debounced(delay) => {
                self.deadline = Some(now + delay);
                false
            }
        }
    }

    /// Check the pending deadline at `now`; true once per elapsed burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a burst is waiting for its quiet period.
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop a pending burst without refreshing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Resize-listener entry point: record the event and, under
    /// `Immediate`, run the refresh pass. Returns whether a pass ran.
    pub fn on_resize<H: HostSurface>(
        &mut self,
        registry: &mut Registry,
        host: &mut H,
        now: Instant,
    ) -> bool {
        if self.note_resize(now) {
            refresh_roots(registry, host);
            return true;
        }
        false
    }

    /// Frame-loop entry point: run the coalesced refresh pass once its
    /// quiet period has elapsed. Returns whether a pass ran.
    pub fn tick<H: HostSurface>(
        &mut self,
        registry: &mut Registry,
        host: &mut H,
        now: Instant,
    ) -> bool {
        if self.poll(now) {
            refresh_roots(registry, host);
            return true;
        }
        false
    }
}

/// Snapped refresh of every root accordion; descendants cascade from there.
pub fn refresh_roots<H: HostSurface>(registry: &mut Registry, host: &mut H) {
    let roots = registry.roots();
    debug!("refreshing {} root accordion(s) after resize", roots.len());
    for id in roots {
        registry.refresh(host, id, true);
    }
}

// =============================================================================
// Tests
// =============================================================================
