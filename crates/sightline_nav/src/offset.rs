//! Offset calculator
//!
//! Computes the effective top boundary used by every other component: the
//! caller-supplied base offset (e.g. a fixed app bar), plus the height of the
//! sticky overlay when it is displayed, plus a small safety buffer.
//!
//! The buffer keeps a section's top edge from landing exactly on the
//! activation line after a programmatic scroll, which would otherwise make the
//! visibility detector flicker between neighbours.
//!
//! Recompute on mount, on viewport resize, and whenever the sticky overlay is
//! shown or hidden. Display toggles do not produce resize notifications, so
//! callers have to trigger that last one explicitly.

use serde::{Deserialize, Serialize};
use sightline_core::ElementLookup;

/// Default safety buffer in pixels
pub const DEFAULT_BUFFER: f32 = 10.0;

/// Configuration for the top boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetConfig {
    /// Caller-supplied distance from the container top (default: 0)
    pub base_offset: f32,
    /// Safety margin added to every computation (default: 10)
    pub buffer: f32,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            base_offset: 0.0,
            buffer: DEFAULT_BUFFER,
        }
    }
}

impl OffsetConfig {
    /// Config with a fixed base offset and the default buffer
    pub fn with_base(base_offset: f32) -> Self {
        Self {
            base_offset,
            ..Default::default()
        }
    }
}

/// The derived top boundary distance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub base_offset: f32,
    pub sticky_height: f32,
    pub buffer: f32,
}

impl ScrollOffset {
    /// `base_offset + sticky_height + buffer`, never negative
    pub fn total(&self) -> f32 {
        (self.base_offset + self.sticky_height + self.buffer).max(0.0)
    }
}

/// Keeps the current `ScrollOffset` and recomputes it on demand
#[derive(Debug, Clone)]
pub struct OffsetCalculator {
    config: OffsetConfig,
    current: ScrollOffset,
}

impl OffsetCalculator {
    pub fn new(config: OffsetConfig) -> Self {
        let current = Self::compute(config.base_offset, config.buffer, None);
        Self { config, current }
    }

    /// Pure computation from raw inputs.
    ///
    /// A hidden sticky element (`None`) contributes zero, as do heights that
    /// are negative or not finite (measurement races).
    pub fn compute(base_offset: f32, buffer: f32, sticky_height: Option<f32>) -> ScrollOffset {
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };

        let sticky_height = sticky_height
            .filter(|h| h.is_finite())
            .map(|h| h.max(0.0))
            .unwrap_or(0.0);

        ScrollOffset {
            base_offset: finite_or(base_offset, 0.0),
            sticky_height,
            buffer: finite_or(buffer, DEFAULT_BUFFER).max(0.0),
        }
    }

    /// Re-measure the sticky overlay. Returns true if `total` changed.
    pub fn recompute<L: ElementLookup + ?Sized>(&mut self, lookup: &L) -> bool {
        let sticky = if lookup.is_ready() {
            lookup.sticky_height()
        } else {
            None
        };
        let next = Self::compute(self.config.base_offset, self.config.buffer, sticky);
        let changed = next.total() != self.current.total();
        if changed {
            tracing::debug!(
                "OffsetCalculator: total {} -> {} (base={}, sticky={})",
                self.current.total(),
                next.total(),
                next.base_offset,
                next.sticky_height
            );
        }
        self.current = next;
        changed
    }

    /// Change the base offset and recompute. Returns true if `total` changed.
    pub fn set_base_offset<L: ElementLookup + ?Sized>(&mut self, base_offset: f32, lookup: &L) -> bool {
        self.config.base_offset = base_offset;
        self.recompute(lookup)
    }

    pub fn current(&self) -> ScrollOffset {
        self.current
    }

    pub fn total(&self) -> f32 {
        self.current.total()
    }

    pub fn config(&self) -> &OffsetConfig {
        &self.config
    }
}

impl Default for OffsetCalculator {
    fn default() -> Self {
        Self::new(OffsetConfig::default())
    }
}
