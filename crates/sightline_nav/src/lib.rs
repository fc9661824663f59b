//! Sightline Navigation
//!
//! A headless scroll-spy navigation engine. Given an ordered list of content
//! sections inside a scroll container, it keeps a nav list in sync with the
//! reading position and lets the user jump around:
//!
//! - **Offset Calculator**: Effective top boundary (base offset, sticky
//!   overlay, safety buffer)
//! - **Visibility Detector**: Picks the active section from intersection
//!   batches or sampled geometry
//! - **Scroll Animator**: Eased scroll-to-section with a re-entrancy guard
//! - **Indicator Positioner**: Active-indicator bar geometry
//! - **Keyboard Navigator**: Roving focus, Home/End, type-ahead
//! - **Gesture Recognizer**: Swipe-to-dismiss with damped feedback
//! - **Navigation Coordinator**: Owns all of the above and exposes
//!   observables for the renderer
//!
//! The renderer stays in charge of drawing. It implements
//! [`sightline_core::NavHost`] so the engine can measure elements and drive
//! the container's scroll position, and it forwards input events plus a
//! monotonic timestamp.
//!
//! # Example
//!
//! ```ignore
//! use sightline_nav::prelude::*;
//!
//! let sections = vec![
//!     SectionDescriptor::new("intro", "Introduction"),
//!     SectionDescriptor::new("pricing", "Pricing"),
//! ];
//! let mut nav = NavigationCoordinator::new(my_host, sections, NavConfig::with_base_offset(64.0));
//! nav.mount();
//!
//! nav.indicator(Presentation::Sidebar).subscribe(|geometry| {
//!     // move the indicator bar
//! });
//! ```

pub mod animator;
pub mod config;
pub mod coordinator;
pub mod gesture;
pub mod indicator;
pub mod keyboard;
pub mod offset;
pub mod registry;
pub mod state;
pub mod visibility;

#[cfg(test)]
mod test_host;

pub use animator::{
    AnimationToken, AnimatorConfig, FrameOutcome, ScrollAnimation, ScrollAnimator, ScrollBehavior,
};
pub use config::NavConfig;
pub use coordinator::NavigationCoordinator;
pub use gesture::{
    GestureConfig, GestureFeedback, GesturePhase, GestureRecognizer, GestureState,
    SwipeDirection, SwipeDirections,
};
pub use indicator::{IndicatorGeometry, IndicatorPositioner};
pub use keyboard::{
    AriaRole, ItemProps, KeyAction, KeyboardConfig, KeyboardNavigator, KeyboardState, Labeled,
};
pub use offset::{OffsetCalculator, OffsetConfig, ScrollOffset};
pub use registry::SectionRegistry;
pub use state::{ActiveSectionState, Writer};
pub use visibility::{
    ActivationBand, Detection, IntersectionEntry, RootMargin, SettledTarget, Subscription,
    VisibilityConfig, VisibilityDetector,
};

/// Commonly used types for hosts
pub mod prelude {
    pub use crate::config::NavConfig;
    pub use crate::coordinator::NavigationCoordinator;
    pub use crate::gesture::{GestureFeedback, SwipeDirection};
    pub use crate::indicator::IndicatorGeometry;
    pub use crate::keyboard::{ItemProps, KeyAction};
    pub use crate::visibility::IntersectionEntry;
    pub use sightline_core::{
        ElementLookup, Key, KeyEvent, NavHost, Presentation, Rect, ScrollContainer,
        SectionDescriptor, SectionId, TouchPoint,
    };
}
