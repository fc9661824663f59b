//! Scroll animator
//!
//! Animates the container's scroll position so a target section's top edge
//! lands on the activation line, stepping once per animation frame with an
//! ease-out quintic curve.
//!
//! # Re-entrancy flag
//!
//! Starting an animation raises a "scrolling programmatically" flag that the
//! visibility detector checks before acting on any batch. The flag outlives
//! the last frame by a short grace period so that intersection callbacks
//! still queued from the final frame are discarded too.
//!
//! # Supersession
//!
//! Only one animation is live at a time. A new `animate_to` abandons the
//! current one (its queued frames become no-ops because their token no longer
//! matches) and starts from the container's *live* position, never from the
//! old target. The flag is owned by the newest token, so a grace release from
//! an abandoned animation cannot lower it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sightline_animation::{Easing, Interpolate};
use sightline_core::{NavError, NavHost, ScrollContainer, SectionId};

/// Default animation duration in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 600;
/// Default delay between the final frame and clearing the re-entrancy flag
pub const DEFAULT_GRACE_MS: u64 = 100;

/// How the container moves to its target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollBehavior {
    /// Eased multi-frame animation
    #[default]
    Smooth,
    /// Jump on the first frame (reduced motion)
    Instant,
}

/// Configuration for programmatic scrolling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Animation length in milliseconds (default: 600)
    pub duration_ms: u64,
    /// Re-entrancy grace period in milliseconds (default: 100)
    pub grace_ms: u64,
    /// Easing curve (default: ease-out quintic)
    pub easing: Easing,
    pub behavior: ScrollBehavior,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            grace_ms: DEFAULT_GRACE_MS,
            easing: Easing::EaseOutQuint,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

impl AnimatorConfig {
    /// Config for users who prefer reduced motion
    pub fn instant() -> Self {
        Self {
            behavior: ScrollBehavior::Instant,
            ..Default::default()
        }
    }

    /// Smooth scrolling with a custom duration
    pub fn with_duration_ms(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            ..Default::default()
        }
    }

    /// Effective duration after applying the behavior
    pub fn duration(&self) -> Duration {
        match self.behavior {
            ScrollBehavior::Smooth => Duration::from_millis(self.duration_ms),
            ScrollBehavior::Instant => Duration::ZERO,
        }
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

// ============================================================================
// Animation state
// ============================================================================

/// Identity of one `animate_to` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationToken(u64);

/// One in-flight programmatic scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub token: AnimationToken,
    pub start_position: f32,
    pub target_position: f32,
    pub start_time: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl ScrollAnimation {
    /// Linear progress at `now`, in `[0, 1]`
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_time);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Scroll position at `now`
    pub fn position_at(&self, now: Duration) -> f32 {
        let eased = self.easing.apply(self.progress(now));
        self.start_position.lerp(&self.target_position, eased)
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// What happened on one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The frame belonged to an abandoned animation; nothing was touched
    Stale,
    /// Moved to this position; request another frame
    Running(f32),
    /// Snapped to the exact target; schedule the grace release
    Finished(f32),
}

/// Drives at most one `ScrollAnimation`
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    config: AnimatorConfig,
    next_token: u64,
    current: Option<ScrollAnimation>,
    /// Owner of the re-entrancy flag, if raised
    guard: Option<AnimationToken>,
}

impl ScrollAnimator {
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Resolve a section and animate to it.
    ///
    /// An unresolvable section performs no scroll and leaves any in-flight
    /// animation untouched.
    pub fn animate_to_section<H: NavHost + ?Sized>(
        &mut self,
        host: &H,
        id: &SectionId,
        offset_total: f32,
        now: Duration,
    ) -> Result<AnimationToken, NavError> {
        if !host.is_ready() {
            return Err(NavError::EnvironmentUnavailable("cannot measure scroll target"));
        }
        let rect = host
            .section_rect(id)
            .ok_or_else(|| NavError::missing_section(id))?;
        Ok(self.animate_to(host, rect.top(), offset_total, now))
    }

    /// Start animating so that content offset `element_top` ends up
    /// `offset_total` below the container's top edge.
    ///
    /// The target is clamped to `[0, max_scroll_top]` when the container
    /// reports its range.
    pub fn animate_to<C: ScrollContainer + ?Sized>(
        &mut self,
        container: &C,
        element_top: f32,
        offset_total: f32,
        now: Duration,
    ) -> AnimationToken {
        if let Some(previous) = &self.current {
            tracing::debug!(
                "ScrollAnimator: superseding animation to {}",
                previous.target_position
            );
        }

        let mut target = (element_top - offset_total).max(0.0);
        if let Some(max) = container.max_scroll_top() {
            target = target.min(max.max(0.0));
        }

        self.next_token += 1;
        let token = AnimationToken(self.next_token);
        let animation = ScrollAnimation {
            token,
            start_position: container.scroll_top(),
            target_position: target,
            start_time: now,
            duration: self.config.duration(),
            easing: self.config.easing,
        };

        tracing::debug!(
            "ScrollAnimator: {} -> {} over {:?}",
            animation.start_position,
            animation.target_position,
            animation.duration
        );

        self.current = Some(animation);
        self.guard = Some(token);
        token
    }

    /// Advance the animation identified by `token` to `now`
    pub fn step<C: ScrollContainer + ?Sized>(
        &mut self,
        token: AnimationToken,
        now: Duration,
        container: &mut C,
    ) -> FrameOutcome {
        let Some(animation) = self.current.filter(|a| a.token == token) else {
            tracing::trace!("ScrollAnimator: dropping frame for stale token {:?}", token);
            return FrameOutcome::Stale;
        };

        if animation.is_complete(now) {
            container.set_scroll_top(animation.target_position);
            self.current = None;
            return FrameOutcome::Finished(animation.target_position);
        }

        let position = animation.position_at(now);
        tracing::trace!("ScrollAnimator: frame at {}", position);
        container.set_scroll_top(position);
        FrameOutcome::Running(position)
    }

    /// Lower the re-entrancy flag after the grace period of `token`.
    ///
    /// Ignored if a newer animation owns the flag. Returns whether the flag
    /// was cleared.
    pub fn release(&mut self, token: AnimationToken) -> bool {
        if self.guard == Some(token) && self.current.is_none() {
            self.guard = None;
            tracing::debug!("ScrollAnimator: programmatic scroll settled");
            true
        } else {
            false
        }
    }

    /// Abandon any animation and lower the flag immediately
    pub fn cancel(&mut self) {
        if self.current.take().is_some() {
            tracing::debug!("ScrollAnimator: cancelled");
        }
        self.guard = None;
    }

    /// Whether an animation is between its first and last frame
    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }

    /// The re-entrancy flag (in flight or within the grace period)
    pub fn is_scrolling_programmatically(&self) -> bool {
        self.guard.is_some()
    }

    pub fn current(&self) -> Option<&ScrollAnimation> {
        self.current.as_ref()
    }

    pub fn grace(&self) -> Duration {
        self.config.grace()
    }
}
