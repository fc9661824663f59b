//! Engine configuration
//!
//! `NavConfig` bundles every component's settings. All parts implement
//! `Default` with the documented constants and deserialize with missing
//! fields filled from those defaults, so a host config file only needs the
//! values it overrides:
//!
//! ```toml
//! [offset]
//! base_offset = 64.0
//!
//! [animator]
//! behavior = "Instant"
//!
//! [gesture]
//! threshold = 80.0
//! ```

use serde::{Deserialize, Serialize};

use crate::animator::AnimatorConfig;
use crate::gesture::GestureConfig;
use crate::keyboard::KeyboardConfig;
use crate::offset::OffsetConfig;
use crate::visibility::VisibilityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub offset: OffsetConfig,
    pub visibility: VisibilityConfig,
    pub animator: AnimatorConfig,
    /// Persistent sidebar list (wraps by default)
    pub keyboard: KeyboardConfig,
    /// Compact overlay list (no wrap, Escape closes)
    pub compact_keyboard: KeyboardConfig,
    /// Swipe-to-dismiss for the compact overlay
    pub gesture: GestureConfig,
    /// Start in externally-controlled mode
    pub externally_controlled: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            offset: OffsetConfig::default(),
            visibility: VisibilityConfig::default(),
            animator: AnimatorConfig::default(),
            keyboard: KeyboardConfig::default(),
            compact_keyboard: KeyboardConfig::overlay(),
            gesture: GestureConfig::dismiss_down(),
            externally_controlled: false,
        }
    }
}

impl NavConfig {
    /// Defaults with a fixed top offset (e.g. an app bar)
    pub fn with_base_offset(base_offset: f32) -> Self {
        Self {
            offset: OffsetConfig::with_base(base_offset),
            ..Default::default()
        }
    }

    /// Defaults with every animation replaced by an instant jump
    pub fn reduced_motion() -> Self {
        Self {
            animator: AnimatorConfig::instant(),
            ..Default::default()
        }
    }
}
