//! Host collaborator traits
//!
//! The engine never touches a document or widget tree directly. A renderer
//! implements these traits to expose the scroll container and the geometry
//! of the elements it mounted; the engine only ever reads geometry and writes
//! the container's scroll position.
//!
//! ```text
//! Renderer (owns elements)
//!     ↓ implements ScrollContainer + ElementLookup
//! NavHost
//!     ↓ borrowed by
//! NavigationCoordinator (owns all navigation state)
//!     ↓ observables
//! Renderer re-renders active item / indicator
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Stable identifier of a navigable section
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What the renderer tells the engine about one section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub title: String,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// The two ways a navigation list can be presented
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presentation {
    /// Persistent list beside the content
    #[default]
    Sidebar,
    /// Overlay/drawer list shown on narrow viewports
    Compact,
}

/// The scrollable viewport that hosts the sections
pub trait ScrollContainer {
    /// Current vertical scroll position
    fn scroll_top(&self) -> f32;

    /// Set the vertical scroll position
    ///
    /// Hosts clamp to their own scroll range; the engine reads the value back
    /// through `scroll_top` rather than assuming its write stuck.
    fn set_scroll_top(&mut self, value: f32);

    /// Visible height of the container
    fn viewport_height(&self) -> f32;

    /// Largest reachable scroll position, if the host knows it
    fn max_scroll_top(&self) -> Option<f32> {
        None
    }
}

/// Element geometry lookup provided by the renderer
pub trait ElementLookup {
    /// Bounds of a section in the container's content coordinates
    /// (`y` is the offset from the top of the scrollable content)
    fn section_rect(&self, id: &SectionId) -> Option<Rect>;

    /// Bounds of the nav item linking to `id` in the given presentation
    fn nav_item_rect(&self, presentation: Presentation, id: &SectionId) -> Option<Rect>;

    /// Rendered height of the sticky overlay, or `None` when it is hidden or
    /// absent
    fn sticky_height(&self) -> Option<f32> {
        None
    }

    /// Whether geometry can be measured at all (false while headless or
    /// before the first layout)
    fn is_ready(&self) -> bool {
        true
    }
}

/// Everything the engine needs from its host
pub trait NavHost: ScrollContainer + ElementLookup {}

impl<T: ScrollContainer + ElementLookup> NavHost for T {}
