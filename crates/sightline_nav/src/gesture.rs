//! Swipe gesture recognizer
//!
//! Tracks one touch at a time and turns it into a directional swipe:
//!
//! ```text
//!          touch_start             touch_end
//!   Idle ──────────────▶ Tracking ───────────▶ Releasing ──▶ Idle
//!    ▲                      │                   (feedback
//!    └──── touch_cancel ────┘                    eases to rest)
//! ```
//!
//! While tracking, the item being dragged gets damped, capped translation
//! along the dominant axis plus a fade. That feedback is purely visual; only
//! the raw displacement at touch end decides whether a swipe commits.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sightline_animation::{Easing, Interpolate};
use sightline_core::{Point, TouchPoint};

/// Default minimum raw displacement (exclusive) for a swipe to commit
pub const DEFAULT_THRESHOLD: f32 = 50.0;
/// Default factor applied to displacement for visual feedback
pub const DEFAULT_DAMPING: f32 = 0.5;
/// Default cap on visual translation
pub const DEFAULT_MAX_TRANSLATION: f32 = 100.0;
/// Default translation at which feedback is fully transparent
pub const DEFAULT_FADE_DIVISOR: f32 = 200.0;

/// A swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    fn index(self) -> usize {
        match self {
            SwipeDirection::Up => 0,
            SwipeDirection::Down => 1,
            SwipeDirection::Left => 2,
            SwipeDirection::Right => 3,
        }
    }
}

/// Which directions are allowed to commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for SwipeDirections {
    fn default() -> Self {
        Self::ALL
    }
}

impl SwipeDirections {
    pub const ALL: SwipeDirections = SwipeDirections {
        up: true,
        down: true,
        left: true,
        right: true,
    };

    pub const NONE: SwipeDirections = SwipeDirections {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub fn allows(&self, direction: SwipeDirection) -> bool {
        match direction {
            SwipeDirection::Up => self.up,
            SwipeDirection::Down => self.down,
            SwipeDirection::Left => self.left,
            SwipeDirection::Right => self.right,
        }
    }
}

/// Configuration for swipe recognition and feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Raw displacement that must be exceeded to commit (default: 50)
    pub threshold: f32,
    /// Feedback damping factor (default: 0.5)
    pub damping: f32,
    /// Maximum feedback translation (default: 100)
    pub max_translation: f32,
    /// Translation at which opacity reaches 0 (default: 200)
    pub fade_divisor: f32,
    /// Delay before a committed swipe fires, in milliseconds (default: 50)
    pub commit_delay_ms: u64,
    /// Length of the return-to-rest animation in milliseconds (default: 200)
    pub release_duration_ms: u64,
    /// Curve for the return-to-rest animation
    pub release_easing: Easing,
    pub directions: SwipeDirections,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            damping: DEFAULT_DAMPING,
            max_translation: DEFAULT_MAX_TRANSLATION,
            fade_divisor: DEFAULT_FADE_DIVISOR,
            commit_delay_ms: 50,
            release_duration_ms: 200,
            release_easing: Easing::EaseOutCubic,
            directions: SwipeDirections::ALL,
        }
    }
}

impl GestureConfig {
    /// Drawer dismissed by swiping down
    pub fn dismiss_down() -> Self {
        Self {
            directions: SwipeDirections {
                down: true,
                ..SwipeDirections::NONE
            },
            ..Default::default()
        }
    }

    /// Side drawer dismissed by swiping left
    pub fn dismiss_left() -> Self {
        Self {
            directions: SwipeDirections {
                left: true,
                ..SwipeDirections::NONE
            },
            ..Default::default()
        }
    }

    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    pub fn release_duration(&self) -> Duration {
        Duration::from_millis(self.release_duration_ms)
    }
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Tracking,
    /// Feedback animating back to rest
    Releasing,
}

/// One in-progress touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub start_point: Point,
    pub current_point: Point,
    /// Direction of the dominant axis, once the touch has moved
    pub direction: Option<SwipeDirection>,
}

impl GestureState {
    /// Raw displacement along the dominant axis
    pub fn dominant_displacement(&self) -> f32 {
        let (dx, dy) = self.current_point.delta_from(self.start_point);
        if dx.abs() > dy.abs() {
            dx.abs()
        } else {
            dy.abs()
        }
    }
}

/// Presentational transform for the dragged element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFeedback {
    pub translate_x: f32,
    pub translate_y: f32,
    pub opacity: f32,
    /// A return-to-rest transition is running
    pub transitioning: bool,
}

impl GestureFeedback {
    /// No translation, fully opaque, no transition
    pub const REST: GestureFeedback = GestureFeedback {
        translate_x: 0.0,
        translate_y: 0.0,
        opacity: 1.0,
        transitioning: false,
    };

    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }
}

impl Default for GestureFeedback {
    fn default() -> Self {
        Self::REST
    }
}

#[derive(Debug, Clone, Copy)]
struct Release {
    from: GestureFeedback,
    start: Duration,
}

type SwipeHandler = Arc<dyn Fn(SwipeDirection) + Send + Sync>;

// ============================================================================
// Recognizer
// ============================================================================

pub struct GestureRecognizer {
    config: GestureConfig,
    phase: GesturePhase,
    state: Option<GestureState>,
    feedback: GestureFeedback,
    release: Option<Release>,
    /// Committed swipe and when it fires
    pending_commit: Option<(SwipeDirection, Duration)>,
    handlers: [Option<SwipeHandler>; 4],
}

impl std::fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("feedback", &self.feedback)
            .field("pending_commit", &self.pending_commit)
            .finish()
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: GesturePhase::Idle,
            state: None,
            feedback: GestureFeedback::REST,
            release: None,
            pending_commit: None,
            handlers: [None, None, None, None],
        }
    }

    /// Handler fired when a swipe in `direction` commits
    pub fn on_swipe<F>(mut self, direction: SwipeDirection, handler: F) -> Self
    where
        F: Fn(SwipeDirection) + Send + Sync + 'static,
    {
        self.handlers[direction.index()] = Some(Arc::new(handler));
        self
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn state(&self) -> Option<&GestureState> {
        self.state.as_ref()
    }

    pub fn feedback(&self) -> GestureFeedback {
        self.feedback
    }

    pub fn touch_start(&mut self, touch: TouchPoint) {
        self.release = None;
        self.feedback = GestureFeedback::REST;
        self.state = Some(GestureState {
            start_point: touch.position,
            current_point: touch.position,
            direction: None,
        });
        self.phase = GesturePhase::Tracking;
    }

    /// Update feedback for the new touch position
    pub fn touch_move(&mut self, touch: TouchPoint) -> GestureFeedback {
        if self.phase != GesturePhase::Tracking {
            return self.feedback;
        }
        let Some(state) = self.state.as_mut() else {
            return self.feedback;
        };

        state.current_point = touch.position;
        let (dx, dy) = state.current_point.delta_from(state.start_point);
        let limit = self.config.max_translation.max(0.0);

        let (translate_x, translate_y) = if dx.abs() > dy.abs() {
            state.direction = Some(if dx < 0.0 {
                SwipeDirection::Left
            } else {
                SwipeDirection::Right
            });
            ((dx * self.config.damping).clamp(-limit, limit), 0.0)
        } else if dy != 0.0 {
            state.direction = Some(if dy < 0.0 {
                SwipeDirection::Up
            } else {
                SwipeDirection::Down
            });
            (0.0, (dy * self.config.damping).clamp(-limit, limit))
        } else {
            state.direction = None;
            (0.0, 0.0)
        };

        let translation = translate_x.abs().max(translate_y.abs());
        let opacity = if self.config.fade_divisor > 0.0 {
            (1.0 - translation / self.config.fade_divisor).max(0.0)
        } else {
            1.0
        };

        self.feedback = GestureFeedback {
            translate_x,
            translate_y,
            opacity,
            transitioning: false,
        };
        self.feedback
    }

    /// Finish the touch. Returns the direction that will commit, if any.
    ///
    /// The commit fires from `tick` once the commit delay has passed;
    /// feedback eases back to rest either way.
    pub fn touch_end(&mut self, now: Duration) -> Option<SwipeDirection> {
        if self.phase != GesturePhase::Tracking {
            return None;
        }
        let state = self.state.take()?;

        let committed = state.direction.filter(|direction| {
            state.dominant_displacement() > self.config.threshold
                && self.config.directions.allows(*direction)
        });

        if let Some(direction) = committed {
            tracing::debug!(
                "GestureRecognizer: swipe {:?} ({}px)",
                direction,
                state.dominant_displacement()
            );
            self.pending_commit = Some((direction, now + self.config.commit_delay()));
        }

        self.phase = GesturePhase::Releasing;
        self.feedback.transitioning = true;
        self.release = Some(Release {
            from: self.feedback,
            start: now,
        });
        committed
    }

    /// Abandon the touch without committing
    pub fn touch_cancel(&mut self) {
        if self.phase == GesturePhase::Tracking {
            tracing::trace!("GestureRecognizer: touch cancelled");
        }
        self.state = None;
        self.release = None;
        self.feedback = GestureFeedback::REST;
        self.phase = GesturePhase::Idle;
    }

    /// Advance the release animation and fire a due commit.
    ///
    /// Returns the direction that fired on this tick.
    pub fn tick(&mut self, now: Duration) -> Option<SwipeDirection> {
        let fired = match self.pending_commit {
            Some((direction, at)) if at <= now => {
                self.pending_commit = None;
                if let Some(handler) = &self.handlers[direction.index()] {
                    handler(direction);
                }
                Some(direction)
            }
            _ => None,
        };

        if let Some(release) = self.release {
            let duration = self.config.release_duration();
            let elapsed = now.saturating_sub(release.start);
            if duration.is_zero() || elapsed >= duration {
                self.settle();
            } else {
                let t = self
                    .config
                    .release_easing
                    .apply(elapsed.as_secs_f32() / duration.as_secs_f32());
                let from = Point::new(release.from.translate_x, release.from.translate_y);
                let position = from.lerp(&Point::ZERO, t);
                self.feedback = GestureFeedback {
                    translate_x: position.x,
                    translate_y: position.y,
                    opacity: release.from.opacity.lerp(&1.0, t),
                    transitioning: true,
                };
            }
        }

        fired
    }

    /// Whether `tick` has work to do on the next frame
    pub fn needs_frame(&self) -> bool {
        self.release.is_some()
    }

    /// When the pending commit fires
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending_commit.map(|(_, at)| at)
    }

    /// Drop all state, including a pending commit
    pub fn reset(&mut self) {
        self.pending_commit = None;
        self.touch_cancel();
    }

    fn settle(&mut self) {
        self.release = None;
        self.state = None;
        self.feedback = GestureFeedback::REST;
        self.phase = GesturePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn swipe(recognizer: &mut GestureRecognizer, dx: f32, dy: f32) -> Option<SwipeDirection> {
        recognizer.touch_start(TouchPoint::new(100.0, 100.0));
        recognizer.touch_move(TouchPoint::new(100.0 + dx, 100.0 + dy));
        recognizer.touch_end(ms(0))
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut recognizer = GestureRecognizer::default();
        assert_eq!(swipe(&mut recognizer, 0.0, 49.0), None);
        recognizer.reset();
        assert_eq!(swipe(&mut recognizer, 0.0, 50.0), None);
        recognizer.reset();
        assert_eq!(swipe(&mut recognizer, 0.0, 51.0), Some(SwipeDirection::Down));
    }

    #[test]
    fn test_commit_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut recognizer = GestureRecognizer::new(GestureConfig::dismiss_down())
            .on_swipe(SwipeDirection::Down, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        swipe(&mut recognizer, 0.0, 80.0);
        assert_eq!(recognizer.next_deadline(), Some(ms(50)));
        assert_eq!(recognizer.tick(ms(40)), None);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(recognizer.tick(ms(50)), Some(SwipeDirection::Down));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(recognizer.tick(ms(60)), None);
    }

    #[test]
    fn test_disabled_direction_does_not_commit() {
        let mut recognizer = GestureRecognizer::new(GestureConfig::dismiss_down());
        assert_eq!(swipe(&mut recognizer, 0.0, -120.0), None);
        assert_eq!(swipe(&mut recognizer, 120.0, 0.0), None);
    }

    #[test]
    fn test_feedback_damped_and_capped() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.touch_start(TouchPoint::new(0.0, 0.0));

        let feedback = recognizer.touch_move(TouchPoint::new(10.0, 60.0));
        assert_eq!(feedback.translate_x, 0.0);
        assert_eq!(feedback.translate_y, 30.0);
        assert!((feedback.opacity - 0.85).abs() < 1e-6);

        let feedback = recognizer.touch_move(TouchPoint::new(-300.0, 20.0));
        assert_eq!(feedback.translate_x, -100.0);
        assert_eq!(feedback.translate_y, 0.0);
        assert!((feedback.opacity - 0.5).abs() < 1e-6);
        assert_eq!(
            recognizer.state().and_then(|s| s.direction),
            Some(SwipeDirection::Left)
        );
    }

    #[test]
    fn test_release_returns_exactly_to_rest() {
        let mut recognizer = GestureRecognizer::default();
        swipe(&mut recognizer, 0.0, 51.0);
        assert_eq!(recognizer.phase(), GesturePhase::Releasing);
        assert!(recognizer.feedback().transitioning);

        recognizer.tick(ms(100));
        let mid = recognizer.feedback();
        assert!(mid.translate_y > 0.0 && mid.translate_y < 25.5);
        assert!(recognizer.needs_frame());

        recognizer.tick(ms(200));
        assert!(recognizer.feedback().is_rest());
        assert_eq!(recognizer.feedback().translate_x, 0.0);
        assert_eq!(recognizer.feedback().translate_y, 0.0);
        assert_eq!(recognizer.feedback().opacity, 1.0);
        assert_eq!(recognizer.phase(), GesturePhase::Idle);
        assert!(!recognizer.needs_frame());
    }

    #[test]
    fn test_uncommitted_swipe_also_releases() {
        let mut recognizer = GestureRecognizer::default();
        assert_eq!(swipe(&mut recognizer, 0.0, 49.0), None);
        assert_eq!(recognizer.phase(), GesturePhase::Releasing);
        recognizer.tick(ms(250));
        assert!(recognizer.feedback().is_rest());
    }

    #[test]
    fn test_cancel_resets_without_commit() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.touch_start(TouchPoint::new(0.0, 0.0));
        recognizer.touch_move(TouchPoint::new(0.0, 150.0));
        recognizer.touch_cancel();
        assert_eq!(recognizer.phase(), GesturePhase::Idle);
        assert!(recognizer.feedback().is_rest());
        assert_eq!(recognizer.touch_end(ms(0)), None);
        assert_eq!(recognizer.next_deadline(), None);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut recognizer = GestureRecognizer::default();
        let feedback = recognizer.touch_move(TouchPoint::new(0.0, 150.0));
        assert!(feedback.is_rest());
    }
}
