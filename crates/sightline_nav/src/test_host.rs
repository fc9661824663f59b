//! In-memory `NavHost` for tests
//!
//! Lays sections out top to bottom in a container with a fixed viewport and
//! clamps scroll writes to the content range, the way a real scroll container
//! does.

use rustc_hash::FxHashMap;
use sightline_core::{
    ElementLookup, Presentation, Rect, ScrollContainer, SectionDescriptor, SectionId,
};

pub(crate) const VIEWPORT_HEIGHT: f32 = 600.0;
pub(crate) const NAV_ITEM_HEIGHT: f32 = 32.0;
pub(crate) const NAV_ITEM_GAP: f32 = 8.0;

#[derive(Debug, Clone)]
pub(crate) struct MockHost {
    descriptors: Vec<SectionDescriptor>,
    section_rects: FxHashMap<SectionId, Rect>,
    nav_rects: FxHashMap<(Presentation, SectionId), Rect>,
    scroll_top: f32,
    viewport_height: f32,
    content_height: f32,
    sticky: Option<f32>,
    ready: bool,
    /// Number of `set_scroll_top` calls
    pub(crate) scroll_writes: usize,
}

impl MockHost {
    /// Sections of equal height stacked from y = 0, with nav items of
    /// `NAV_ITEM_HEIGHT` separated by `NAV_ITEM_GAP` in both presentations
    pub(crate) fn uniform(ids: &[&str], section_height: f32) -> Self {
        let mut host = Self {
            descriptors: Vec::new(),
            section_rects: FxHashMap::default(),
            nav_rects: FxHashMap::default(),
            scroll_top: 0.0,
            viewport_height: VIEWPORT_HEIGHT,
            content_height: 0.0,
            sticky: None,
            ready: true,
            scroll_writes: 0,
        };

        for (i, id) in ids.iter().enumerate() {
            let section_id = SectionId::from(*id);
            let name: &str = id;
            let mut chars = name.chars();
            let title: String = chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default();
            host.descriptors
                .push(SectionDescriptor::new(section_id.clone(), title));
            host.section_rects.insert(
                section_id.clone(),
                Rect::new(0.0, i as f32 * section_height, 800.0, section_height),
            );
            let item_y = i as f32 * (NAV_ITEM_HEIGHT + NAV_ITEM_GAP);
            for presentation in [Presentation::Sidebar, Presentation::Compact] {
                host.nav_rects.insert(
                    (presentation, section_id.clone()),
                    Rect::new(0.0, item_y, 200.0, NAV_ITEM_HEIGHT),
                );
            }
        }
        host.content_height = ids.len() as f32 * section_height;
        host
    }

    pub(crate) fn descriptors(&self) -> Vec<SectionDescriptor> {
        self.descriptors.clone()
    }

    /// Unmount a section's element (and its nav items) without touching the
    /// descriptor list
    pub(crate) fn remove_section(&mut self, id: &str) {
        let id = SectionId::from(id);
        self.section_rects.remove(&id);
        self.nav_rects.remove(&(Presentation::Sidebar, id.clone()));
        self.nav_rects.remove(&(Presentation::Compact, id));
    }

    pub(crate) fn remove_nav_item(&mut self, presentation: Presentation, id: &str) {
        self.nav_rects.remove(&(presentation, SectionId::from(id)));
    }

    pub(crate) fn set_sticky(&mut self, height: Option<f32>) {
        self.sticky = height;
    }

    pub(crate) fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub(crate) fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    /// Move the scroll position as a user would (not counted as an engine write)
    pub(crate) fn user_scroll_to(&mut self, value: f32) {
        self.scroll_top = self.clamp(value);
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    fn clamp(&self, value: f32) -> f32 {
        value.clamp(0.0, self.max_scroll())
    }
}

impl ScrollContainer for MockHost {
    fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, value: f32) {
        self.scroll_writes += 1;
        self.scroll_top = self.clamp(value);
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn max_scroll_top(&self) -> Option<f32> {
        Some(self.max_scroll())
    }
}

impl ElementLookup for MockHost {
    fn section_rect(&self, id: &SectionId) -> Option<Rect> {
        self.section_rects.get(id).copied()
    }

    fn nav_item_rect(&self, presentation: Presentation, id: &SectionId) -> Option<Rect> {
        self.nav_rects.get(&(presentation, id.clone())).copied()
    }

    fn sticky_height(&self) -> Option<f32> {
        self.sticky
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
