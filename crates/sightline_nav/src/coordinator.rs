//! Navigation coordinator
//!
//! Owns every component and routes host events between them:
//!
//! ```text
//!  host events                                          outputs
//!  ───────────                                          ───────
//!  on_scroll ─────────┐
//!  on_intersections ──┼─▶ VisibilityDetector ──┐
//!                     │     (suppressed while  │
//!                     │      animating)        ▼
//!  navigate ──▶ ScrollAnimator ──▶ guard ─▶ ActiveSectionState ──▶ active_section()
//!                     │                        │
//!  on_resize ─────────┼─▶ OffsetCalculator     ├─▶ IndicatorPositioner ─▶ indicator(p)
//!  on_sticky_… ───────┘                        └─▶ KeyboardNavigator focus sync
//!  on_key ────▶ KeyboardNavigator ──▶ navigate / close_overlay
//!  on_touch_* ─▶ GestureRecognizer ──▶ gesture_feedback(), close_overlay
//!  tick(now) ──▶ FrameScheduler (animation frames, grace release)
//! ```
//!
//! Everything is single-threaded and cooperative. The host calls `tick` once
//! per animation frame while `needs_tick` is true and passes a monotonic
//! `now` to every time-dependent entry point.
//!
//! # Example
//!
//! ```ignore
//! let mut nav = NavigationCoordinator::new(host, sections, NavConfig::with_base_offset(64.0));
//! nav.mount();
//!
//! nav.active_section().subscribe(|id| println!("now reading {:?}", id));
//!
//! nav.navigate(&"pricing".into(), now);
//! while nav.needs_tick() {
//!     nav.tick(next_frame_time());
//! }
//! ```

use std::time::Duration;

use sightline_animation::FrameScheduler;
use sightline_core::{
    KeyEvent, NavError, NavHost, Observable, Presentation, SectionDescriptor, SectionId,
    TouchPoint,
};

use crate::animator::{AnimationToken, FrameOutcome, ScrollAnimation, ScrollAnimator};
use crate::config::NavConfig;
use crate::gesture::{GestureFeedback, GestureRecognizer, SwipeDirection};
use crate::indicator::{IndicatorGeometry, IndicatorPositioner};
use crate::keyboard::{ItemProps, KeyAction, KeyboardNavigator};
use crate::offset::OffsetCalculator;
use crate::registry::SectionRegistry;
use crate::state::{ActiveSectionState, Writer};
use crate::visibility::{
    Detection, IntersectionEntry, SettledTarget, Subscription, VisibilityDetector,
};

/// Work queued on the frame scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Frame(AnimationToken),
    ReleaseGuard(AnimationToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    /// Waiting for the host to become ready
    Pending,
    Mounted,
    Disposed,
}

/// Per-presentation nav list state
#[derive(Debug)]
struct NavList {
    keyboard: KeyboardNavigator<SectionDescriptor>,
    indicator: IndicatorPositioner,
    geometry: Observable<IndicatorGeometry>,
}

impl NavList {
    fn new(presentation: Presentation, keyboard: KeyboardNavigator<SectionDescriptor>) -> Self {
        let orientation = keyboard.config().orientation;
        Self {
            keyboard,
            indicator: IndicatorPositioner::new(presentation, orientation),
            geometry: Observable::new(IndicatorGeometry::default()),
        }
    }
}

pub struct NavigationCoordinator<H: NavHost> {
    host: H,
    config: NavConfig,
    lifecycle: Lifecycle,
    sections: SectionRegistry,
    offset: OffsetCalculator,
    detector: VisibilityDetector,
    animator: ScrollAnimator,
    /// Section the newest `navigate` is scrolling to
    destination: Option<(AnimationToken, SectionId)>,
    scheduler: FrameScheduler<Task>,
    active: ActiveSectionState,
    sidebar: NavList,
    compact: NavList,
    gesture: GestureRecognizer,
    gesture_feedback: Observable<GestureFeedback>,
    overlay_open: Observable<bool>,
    compact_mode: bool,
}

impl<H: NavHost + std::fmt::Debug> std::fmt::Debug for NavigationCoordinator<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationCoordinator")
            .field("host", &self.host)
            .field("lifecycle", &self.lifecycle)
            .field("sections", &self.sections.len())
            .field("active", &self.active.get())
            .field("scheduler", &self.scheduler)
            .field("compact_mode", &self.compact_mode)
            .finish()
    }
}

impl<H: NavHost> NavigationCoordinator<H> {
    /// Build a coordinator. Nothing touches the host until `mount`.
    pub fn new(
        host: H,
        sections: impl IntoIterator<Item = SectionDescriptor>,
        config: NavConfig,
    ) -> Self {
        let sections = SectionRegistry::from_descriptors(sections);
        let items: Vec<SectionDescriptor> = sections.descriptors().cloned().collect();

        Self {
            host,
            lifecycle: Lifecycle::Pending,
            offset: OffsetCalculator::new(config.offset),
            detector: VisibilityDetector::new(config.visibility),
            animator: ScrollAnimator::new(config.animator),
            destination: None,
            scheduler: FrameScheduler::new(),
            active: ActiveSectionState::new(config.externally_controlled),
            sidebar: NavList::new(
                Presentation::Sidebar,
                KeyboardNavigator::new(config.keyboard, items.clone()),
            ),
            compact: NavList::new(
                Presentation::Compact,
                KeyboardNavigator::new(config.compact_keyboard, items),
            ),
            gesture: GestureRecognizer::new(config.gesture),
            gesture_feedback: Observable::new(GestureFeedback::REST),
            overlay_open: Observable::new(false),
            compact_mode: false,
            sections,
            config,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Measure, subscribe and pick the initial active section.
    ///
    /// If the host is not ready yet the mount is deferred and retried on
    /// every `tick`. Returns whether the coordinator is mounted afterwards.
    pub fn mount(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Mounted => return true,
            Lifecycle::Disposed => {
                NavError::StaleReference {
                    what: "mount after dispose",
                }
                .log();
                return false;
            }
            Lifecycle::Pending => {}
        }

        if !self.host.is_ready() {
            NavError::EnvironmentUnavailable("mount deferred until host is ready").log();
            return false;
        }

        self.lifecycle = Lifecycle::Mounted;
        self.offset.recompute(&self.host);
        self.detector
            .observe(&self.sections, self.offset.total(), &self.host);
        tracing::debug!(
            "NavigationCoordinator: mounted {} sections (offset {})",
            self.sections.len(),
            self.offset.total()
        );

        self.refresh_active();
        self.refresh_indicators();
        true
    }

    /// Cancel everything. Every entry point is a no-op afterwards.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.scheduler.clear();
        self.animator.cancel();
        self.destination = None;
        self.detector.unobserve();
        self.sidebar.keyboard.reset_type_ahead();
        self.compact.keyboard.reset_type_ahead();
        self.gesture.reset();
        self.gesture_feedback.set(GestureFeedback::REST);
        self.lifecycle = Lifecycle::Disposed;
        tracing::debug!("NavigationCoordinator: disposed");
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    fn guard(&self, entry: &'static str) -> bool {
        if self.lifecycle == Lifecycle::Disposed {
            NavError::StaleReference { what: entry }.log();
            return false;
        }
        true
    }

    // ========================================================================
    // Frames and timers
    // ========================================================================

    /// Run due animation frames and timers
    pub fn tick(&mut self, now: Duration) {
        if !self.guard("tick after dispose") {
            return;
        }
        if self.lifecycle == Lifecycle::Pending && !self.mount() {
            return;
        }

        for scheduled in self.scheduler.drain_due(now) {
            match scheduled.task {
                Task::Frame(token) => self.run_frame(token, now),
                Task::ReleaseGuard(token) => {
                    if self.animator.release(token) {
                        self.refresh_settled(token);
                    } else {
                        NavError::StaleReference {
                            what: "grace release of superseded animation",
                        }
                        .log();
                    }
                }
            }
        }

        self.sidebar.keyboard.expire(now);
        self.compact.keyboard.expire(now);

        if let Some(direction) = self.gesture.tick(now) {
            self.on_swipe(direction);
        }
        self.gesture_feedback.set(self.gesture.feedback());
    }

    fn run_frame(&mut self, token: AnimationToken, now: Duration) {
        match self.animator.step(token, now, &mut self.host) {
            FrameOutcome::Stale => NavError::StaleReference {
                what: "frame of superseded animation",
            }
            .log(),
            FrameOutcome::Running(_) => {
                self.scheduler.request_frame(Task::Frame(token));
            }
            FrameOutcome::Finished(_) => {
                self.scheduler
                    .set_timeout(now, self.animator.grace(), Task::ReleaseGuard(token));
            }
        }
    }

    /// Whether the host should keep calling `tick`
    pub fn needs_tick(&self) -> bool {
        match self.lifecycle {
            Lifecycle::Disposed => false,
            Lifecycle::Pending => true,
            Lifecycle::Mounted => {
                self.scheduler.has_pending()
                    || self.gesture.needs_frame()
                    || self.gesture.next_deadline().is_some()
            }
        }
    }

    /// Earliest timer deadline, for hosts that sleep between frames
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.scheduler.next_deadline(),
            self.gesture.next_deadline(),
            self.sidebar.keyboard.type_ahead_deadline(),
            self.compact.keyboard.type_ahead_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Scroll to a section. Returns whether a scroll was started.
    ///
    /// Navigating to the section that is already active with no animation in
    /// flight does nothing. In externally-controlled mode the active section
    /// changes immediately; otherwise the detector picks it up once the
    /// scroll settles.
    pub fn navigate(&mut self, id: &SectionId, now: Duration) -> bool {
        if !self.guard("navigate after dispose") {
            return false;
        }
        if !self.sections.contains(id) {
            NavError::UnknownSection(id.clone()).log();
            return false;
        }
        if self.active.is(id) && !self.animator.is_animating() {
            tracing::trace!("NavigationCoordinator: `{}` already active", id);
            return false;
        }

        let token = match self
            .animator
            .animate_to_section(&self.host, id, self.offset.total(), now)
        {
            Ok(token) => token,
            Err(err) => {
                err.log();
                return false;
            }
        };
        self.scheduler.request_frame(Task::Frame(token));
        self.destination = Some((token, id.clone()));

        if self.active.write(Writer::Command, id.clone()) {
            self.on_active_changed();
        }
        true
    }

    /// Same as `navigate`
    pub fn activate(&mut self, id: &SectionId, now: Duration) -> bool {
        self.navigate(id, now)
    }

    /// Switch between detector-driven and caller-driven active section
    pub fn set_controlled(&mut self, controlled: bool) {
        if !self.guard("set_controlled after dispose") {
            return;
        }
        self.active.set_controlled(controlled);
        if !controlled {
            self.refresh_active();
        }
    }

    // ========================================================================
    // Scroll, intersection and layout events
    // ========================================================================

    /// User or programmatic scroll event: re-evaluate from geometry
    pub fn on_scroll(&mut self) {
        if self.guard("on_scroll after dispose") {
            self.refresh_active();
        }
    }

    /// A batch from a host-native intersection observer
    pub fn on_intersections(&mut self, batch: &[IntersectionEntry]) {
        if self.guard("on_intersections after dispose") && self.is_mounted() {
            self.apply_batch(batch);
        }
    }

    /// The viewport changed size: the offset and the band both move
    pub fn on_resize(&mut self) {
        if self.guard("on_resize after dispose") {
            self.recompute_offset();
            self.refresh_active();
            self.refresh_indicators();
        }
    }

    /// The sticky overlay was shown or hidden
    pub fn on_sticky_visibility_changed(&mut self) {
        if self.guard("on_sticky_visibility_changed after dispose") {
            self.recompute_offset();
        }
    }

    pub fn set_base_offset(&mut self, base_offset: f32) {
        if !self.guard("set_base_offset after dispose") {
            return;
        }
        if self.offset.set_base_offset(base_offset, &self.host) && self.is_mounted() {
            self.resubscribe();
        }
    }

    /// Replace the section list (added, removed, reordered or retitled)
    pub fn set_sections(&mut self, sections: impl IntoIterator<Item = SectionDescriptor>) {
        if !self.guard("set_sections after dispose") {
            return;
        }
        if !self.sections.replace(sections) {
            return;
        }

        let items: Vec<SectionDescriptor> = self.sections.descriptors().cloned().collect();
        self.sidebar.keyboard.set_items(items.clone());
        self.compact.keyboard.set_items(items);

        let removed = self
            .active
            .get()
            .is_some_and(|id| !self.sections.contains(&id));
        if removed && self.active.clear() {
            tracing::debug!("NavigationCoordinator: active section left the list");
        }

        if self.is_mounted() {
            self.detector
                .observe(&self.sections, self.offset.total(), &self.host);
            self.refresh_active();
        }
        self.on_active_changed();
    }

    fn recompute_offset(&mut self) {
        if self.offset.recompute(&self.host) && self.is_mounted() {
            self.resubscribe();
        }
    }

    fn resubscribe(&mut self) {
        self.detector
            .observe(&self.sections, self.offset.total(), &self.host);
        self.refresh_active();
    }

    fn refresh_active(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let batch = self
            .detector
            .sample(&self.sections, self.offset.total(), &self.host);
        self.apply_batch(&batch);
    }

    /// Resample once the animation `token` released its guard, preferring
    /// the section it was scrolling to
    fn refresh_settled(&mut self, token: AnimationToken) {
        let destination = self
            .destination
            .take()
            .filter(|(current, _)| *current == token)
            .map(|(_, id)| id);
        let Some(id) = destination else {
            self.refresh_active();
            return;
        };
        if !self.is_mounted() {
            return;
        }

        let total = self.offset.total();
        let batch = self.detector.sample(&self.sections, total, &self.host);
        // Top or bottom of the content kept the section off the line
        let reached_line = self
            .host
            .section_rect(&id)
            .is_some_and(|rect| (self.host.scroll_top() - (rect.top() - total)).abs() < 0.5);
        if !reached_line {
            tracing::debug!("NavigationCoordinator: `{}` settled short of the line", id);
        }

        let detection = self
            .detector
            .evaluate_settled(&batch, total, &SettledTarget { id, reached_line });
        self.write_detection(detection);
    }

    fn apply_batch(&mut self, batch: &[IntersectionEntry]) {
        let detection = self.detector.evaluate(
            batch,
            self.offset.total(),
            self.animator.is_scrolling_programmatically(),
        );
        self.write_detection(detection);
    }

    fn write_detection(&mut self, detection: Detection) {
        if let Detection::Candidate(id) = detection {
            if self.active.write(Writer::Detector, id) {
                self.on_active_changed();
            }
        }
    }

    fn on_active_changed(&mut self) {
        if let Some(index) = self
            .active
            .get()
            .and_then(|id| self.sections.index_of(&id))
        {
            self.sidebar.keyboard.set_index(index);
            self.compact.keyboard.set_index(index);
        }
        self.refresh_indicators();
    }

    /// Recompute the indicator of whichever list is on screen and hide the
    /// other one
    fn refresh_indicators(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let active = self.active.get();
        let shown = [
            (&mut self.sidebar, !self.compact_mode),
            (&mut self.compact, self.compact_mode && self.overlay_open.get()),
        ];
        for (list, visible) in shown {
            if visible {
                let geometry = list
                    .indicator
                    .recompute(&self.host, &self.sections, active.as_ref());
                list.geometry.set(geometry);
            } else {
                list.geometry.update(|geometry| geometry.opacity = 0.0);
            }
        }
    }

    // ========================================================================
    // Presentations
    // ========================================================================

    /// Switch between the persistent sidebar and the compact overlay
    pub fn set_compact(&mut self, compact: bool) {
        if !self.guard("set_compact after dispose") || self.compact_mode == compact {
            return;
        }
        tracing::debug!("NavigationCoordinator: compact = {}", compact);
        self.compact_mode = compact;
        if !compact {
            self.overlay_open.set(false);
            self.gesture.reset();
            self.gesture_feedback.set(GestureFeedback::REST);
        }
        self.refresh_indicators();
    }

    pub fn is_compact(&self) -> bool {
        self.compact_mode
    }

    /// Show the compact overlay. Ignored outside compact mode.
    pub fn open_overlay(&mut self) {
        if !self.guard("open_overlay after dispose") || !self.compact_mode {
            return;
        }
        if self.overlay_open.set(true) {
            self.refresh_indicators();
        }
    }

    pub fn close_overlay(&mut self) {
        if !self.guard("close_overlay after dispose") {
            return;
        }
        if self.overlay_open.set(false) {
            self.gesture.reset();
            self.gesture_feedback.set(GestureFeedback::REST);
            self.refresh_indicators();
        }
    }

    // ========================================================================
    // Keyboard and touch
    // ========================================================================

    /// Key-down on a nav list. The host should prevent the key's default
    /// action when the result `is_handled()`.
    pub fn on_key(&mut self, presentation: Presentation, event: KeyEvent, now: Duration) -> KeyAction {
        if !self.guard("on_key after dispose") {
            return KeyAction::Ignored;
        }

        let action = self.list_mut(presentation).keyboard.handle_key(event, now);
        match action {
            KeyAction::Activated(index) => {
                if let Some(id) = self.sections.get_index(index).map(|d| d.id.clone()) {
                    self.navigate(&id, now);
                }
                if presentation == Presentation::Compact {
                    self.close_overlay();
                }
            }
            KeyAction::Escaped if presentation == Presentation::Compact => {
                self.close_overlay();
            }
            _ => {}
        }
        action
    }

    pub fn on_touch_start(&mut self, touch: TouchPoint) {
        if self.guard("on_touch_start after dispose") && self.accepts_touch() {
            self.gesture.touch_start(touch);
            self.gesture_feedback.set(self.gesture.feedback());
        }
    }

    pub fn on_touch_move(&mut self, touch: TouchPoint) {
        if self.guard("on_touch_move after dispose") && self.accepts_touch() {
            let feedback = self.gesture.touch_move(touch);
            self.gesture_feedback.set(feedback);
        }
    }

    /// Returns the swipe that will commit, if any
    pub fn on_touch_end(&mut self, now: Duration) -> Option<SwipeDirection> {
        if !self.guard("on_touch_end after dispose") {
            return None;
        }
        let committed = self.gesture.touch_end(now);
        self.gesture_feedback.set(self.gesture.feedback());
        committed
    }

    pub fn on_touch_cancel(&mut self) {
        if self.guard("on_touch_cancel after dispose") {
            self.gesture.touch_cancel();
            self.gesture_feedback.set(GestureFeedback::REST);
        }
    }

    fn accepts_touch(&self) -> bool {
        self.compact_mode && self.overlay_open.get()
    }

    fn on_swipe(&mut self, direction: SwipeDirection) {
        tracing::debug!("NavigationCoordinator: swipe {:?} dismisses overlay", direction);
        self.close_overlay();
    }

    fn list(&self, presentation: Presentation) -> &NavList {
        match presentation {
            Presentation::Sidebar => &self.sidebar,
            Presentation::Compact => &self.compact,
        }
    }

    fn list_mut(&mut self, presentation: Presentation) -> &mut NavList {
        match presentation {
            Presentation::Sidebar => &mut self.sidebar,
            Presentation::Compact => &mut self.compact,
        }
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    pub fn active_section(&self) -> &Observable<Option<SectionId>> {
        self.active.observable()
    }

    pub fn indicator(&self, presentation: Presentation) -> &Observable<IndicatorGeometry> {
        &self.list(presentation).geometry
    }

    pub fn overlay_open(&self) -> &Observable<bool> {
        &self.overlay_open
    }

    pub fn gesture_feedback(&self) -> &Observable<GestureFeedback> {
        &self.gesture_feedback
    }

    pub fn item_props(&self, presentation: Presentation, index: usize) -> ItemProps {
        self.list(presentation).keyboard.item_props(index)
    }

    pub fn focused_index(&self, presentation: Presentation) -> usize {
        self.list(presentation).keyboard.index()
    }

    /// Observer parameters for hosts with a native intersection observer
    pub fn subscription(&self) -> Option<&Subscription> {
        self.detector.subscription()
    }

    pub fn offset_total(&self) -> f32 {
        self.offset.total()
    }

    pub fn animation(&self) -> Option<&ScrollAnimation> {
        self.animator.current()
    }

    pub fn is_scrolling_programmatically(&self) -> bool {
        self.animator.is_scrolling_programmatically()
    }

    pub fn sections(&self) -> &SectionRegistry {
        &self.sections
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access for layout changes; follow up with the matching
    /// `on_*` notification
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
