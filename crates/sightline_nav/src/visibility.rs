//! Visibility detector
//!
//! Decides which section is "active" from intersection batches against an
//! activation band inside the scroll container:
//!
//! ```text
//! ┌──────────── container ────────────┐
//! │  offset.total                     │
//! ├─────────── activation line ───────┤ ← band top
//! │                                   │
//! │          activation band          │
//! │                                   │
//! ├───────────────────────────────────┤ ← band bottom
//! │  bottom_fraction × viewport       │
//! └───────────────────────────────────┘
//! ```
//!
//! Batches come either from a host's native intersection observer (using the
//! `RootMargin` exposed by the current `Subscription`) or from `sample`, which
//! synthesizes a batch from element geometry on every scroll event.
//!
//! Whole batches are discarded while the container is scrolling
//! programmatically; the detector deliberately loses that information rather
//! than override the animation's destination. Once the animation is
//! released, `evaluate_settled` resamples with that destination preferred, so
//! sections that cannot reach the activation line still become active.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use sightline_core::{NavError, NavHost, Rect, SectionId};

use crate::registry::SectionRegistry;

/// Default share of the viewport, measured from the bottom, that is outside
/// the activation band
pub const DEFAULT_BOTTOM_FRACTION: f32 = 0.4;

/// Configuration for active-section detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Fraction of the viewport height excluded at the bottom (0.0-1.0,
    /// default: 0.4)
    pub bottom_fraction: f32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            bottom_fraction: DEFAULT_BOTTOM_FRACTION,
        }
    }
}

// ============================================================================
// Band and observer parameters
// ============================================================================

/// Vertical zone of the container, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationBand {
    /// The activation line
    pub top: f32,
    pub bottom: f32,
}

impl ActivationBand {
    pub fn new(offset_total: f32, viewport_height: f32, bottom_fraction: f32) -> Self {
        let fraction = bottom_fraction.clamp(0.0, 1.0);
        Self {
            top: offset_total,
            bottom: viewport_height.max(0.0) * (1.0 - fraction),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top
    }
}

/// Observer root margin equivalent to an `ActivationBand`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    /// Pixels trimmed from the top of the root (the offset total)
    pub top_px: f32,
    /// Fraction of the root height trimmed from the bottom
    pub bottom_fraction: f32,
}

impl RootMargin {
    /// CSS-style margin string (`top right bottom left`)
    pub fn to_css(&self) -> String {
        format!(
            "-{}px 0px -{}% 0px",
            self.top_px,
            (self.bottom_fraction * 100.0).round()
        )
    }
}

/// One section's intersection state relative to the container viewport
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub id: SectionId,
    /// Section bounds in viewport coordinates (0 = container top edge)
    pub bounds: Rect,
    pub is_intersecting: bool,
}

/// The set of sections currently observed, and with which margin
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Bumped on every re-subscription
    pub generation: u64,
    pub root_margin: RootMargin,
    targets: FxHashSet<SectionId>,
    /// Targets in document order
    order: Vec<SectionId>,
}

impl Subscription {
    pub fn is_observing(&self, id: &SectionId) -> bool {
        self.targets.contains(id)
    }

    pub fn targets(&self) -> &[SectionId] {
        &self.order
    }
}

/// Where a programmatic scroll came to rest
#[derive(Debug, Clone, PartialEq)]
pub struct SettledTarget {
    pub id: SectionId,
    /// False when the container's scroll range kept the section from
    /// reaching the activation line
    pub reached_line: bool,
}

/// Outcome of evaluating one batch
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Batch discarded: the container is scrolling programmatically
    Suppressed,
    /// Nothing qualifies; the active section is left as it is
    NoCandidate,
    /// This section should become active
    Candidate(SectionId),
}

// ============================================================================
// Detector
// ============================================================================

/// Maintains the observation subscription and picks the active section
#[derive(Debug, Clone, Default)]
pub struct VisibilityDetector {
    config: VisibilityConfig,
    subscription: Option<Subscription>,
    /// Inputs the current subscription was built from
    subscribed_with: Option<(u64, f32)>,
    generation: u64,
}

impl VisibilityDetector {
    pub fn new(config: VisibilityConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// (Re-)subscribe if the section list identity or the offset changed.
    ///
    /// Sections with no resolvable element are logged and left out. Returns
    /// true if a new subscription was made.
    pub fn observe<H: NavHost + ?Sized>(
        &mut self,
        sections: &SectionRegistry,
        offset_total: f32,
        host: &H,
    ) -> bool {
        let inputs = (sections.generation(), offset_total);
        if self.subscription.is_some() && self.subscribed_with == Some(inputs) {
            return false;
        }

        if !host.is_ready() {
            NavError::EnvironmentUnavailable("visibility detection deferred").log();
            self.unobserve();
            return false;
        }

        let mut targets = FxHashSet::default();
        let mut order = Vec::with_capacity(sections.len());
        for id in sections.ids() {
            if host.section_rect(id).is_none() {
                NavError::missing_section(id).log();
                continue;
            }
            targets.insert(id.clone());
            order.push(id.clone());
        }

        self.generation += 1;
        self.subscription = Some(Subscription {
            generation: self.generation,
            root_margin: RootMargin {
                top_px: offset_total,
                bottom_fraction: self.config.bottom_fraction,
            },
            targets,
            order,
        });
        self.subscribed_with = Some(inputs);

        tracing::debug!(
            "VisibilityDetector: observing {} of {} sections (generation {}, offset {})",
            self.subscription.as_ref().map_or(0, |s| s.order.len()),
            sections.len(),
            self.generation,
            offset_total
        );
        true
    }

    /// Stop observing everything
    pub fn unobserve(&mut self) {
        self.subscription = None;
        self.subscribed_with = None;
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    pub fn band(&self, offset_total: f32, viewport_height: f32) -> ActivationBand {
        ActivationBand::new(offset_total, viewport_height, self.config.bottom_fraction)
    }

    /// Synthesize a full batch from element geometry, in document order.
    ///
    /// Also reconciles the subscription with what is mounted: sections whose
    /// element disappeared stop being observed and come back once they
    /// resolve again. Either change starts a new subscription generation.
    pub fn sample<H: NavHost + ?Sized>(
        &mut self,
        sections: &SectionRegistry,
        offset_total: f32,
        host: &H,
    ) -> SmallVec<[IntersectionEntry; 8]> {
        if !host.is_ready() {
            return SmallVec::new();
        }
        let band = self.band(offset_total, host.viewport_height());
        let Some(subscription) = self.subscription.as_mut() else {
            return SmallVec::new();
        };

        let scroll_top = host.scroll_top();
        let mut batch = SmallVec::new();
        let mut order = Vec::with_capacity(sections.len());
        for id in sections.ids() {
            match host.section_rect(id) {
                Some(rect) => {
                    if !subscription.is_observing(id) {
                        tracing::debug!("VisibilityDetector: `{}` mounted, observing", id);
                    }
                    let bounds = rect.offset(0.0, -scroll_top);
                    batch.push(IntersectionEntry {
                        id: id.clone(),
                        bounds,
                        is_intersecting: bounds.overlaps_band(band.top, band.bottom),
                    });
                    order.push(id.clone());
                }
                None if subscription.is_observing(id) => {
                    NavError::missing_section(id).log();
                }
                None => {}
            }
        }

        if order != subscription.order {
            self.generation += 1;
            subscription.generation = self.generation;
            subscription.targets = order.iter().cloned().collect();
            subscription.order = order;
            tracing::debug!(
                "VisibilityDetector: now observing {} of {} sections (generation {})",
                subscription.order.len(),
                sections.len(),
                self.generation
            );
        }
        batch
    }

    /// Pick the active section from one batch.
    ///
    /// `activation_line` is the band top (the offset total).
    pub fn evaluate(
        &self,
        batch: &[IntersectionEntry],
        activation_line: f32,
        scrolling_programmatically: bool,
    ) -> Detection {
        if scrolling_programmatically {
            tracing::trace!(
                "VisibilityDetector: discarding batch of {} during programmatic scroll",
                batch.len()
            );
            return Detection::Suppressed;
        }

        let Some(subscription) = &self.subscription else {
            return Detection::NoCandidate;
        };

        let mut candidates: SmallVec<[&IntersectionEntry; 8]> = batch
            .iter()
            .filter(|entry| {
                let observed = subscription.is_observing(&entry.id);
                if !observed {
                    tracing::debug!("VisibilityDetector: stale entry for `{}`", entry.id);
                }
                observed && entry.is_intersecting
            })
            .collect();

        // At/below the line first, then by ascending top
        candidates.sort_by(|a, b| {
            let a_above = a.bounds.top() < activation_line;
            let b_above = b.bounds.top() < activation_line;
            a_above
                .cmp(&b_above)
                .then(a.bounds.top().total_cmp(&b.bounds.top()))
        });
        candidates.retain(|entry| entry.bounds.bottom() >= activation_line);

        match candidates.first() {
            Some(entry) => Detection::Candidate(entry.id.clone()),
            None => Detection::NoCandidate,
        }
    }

    /// Pick the active section right after a programmatic scroll came to rest.
    ///
    /// The animation's destination wins if it is observed and either
    /// intersects the band or could not be scrolled to the activation line
    /// (first/last sections shorter than the leftover distance). Otherwise
    /// this is a plain `evaluate`.
    pub fn evaluate_settled(
        &self,
        batch: &[IntersectionEntry],
        activation_line: f32,
        settled: &SettledTarget,
    ) -> Detection {
        let observed = self
            .subscription
            .as_ref()
            .is_some_and(|s| s.is_observing(&settled.id));
        let entry = batch.iter().find(|entry| entry.id == settled.id);

        if let (true, Some(entry)) = (observed, entry) {
            if entry.is_intersecting || !settled.reached_line {
                tracing::trace!(
                    "VisibilityDetector: settled on `{}` (reached line: {})",
                    settled.id,
                    settled.reached_line
                );
                return Detection::Candidate(settled.id.clone());
            }
        }
        self.evaluate(batch, activation_line, false)
    }
}
