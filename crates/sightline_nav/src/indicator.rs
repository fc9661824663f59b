//! Active indicator positioner
//!
//! Computes where the active-indicator bar sits relative to the nav list
//! track. Geometry is expressed along the list's main axis (top/height for a
//! vertical sidebar, left/width for a horizontal tab strip) relative to the
//! first item's leading edge.
//!
//! When nothing is active, or the active item cannot be located, the bar
//! fades out in place: opacity drops to 0 but the last position is kept so a
//! renderer can fade instead of jumping.

use sightline_core::{ElementLookup, NavError, Orientation, Presentation, Rect, SectionId};
use smallvec::SmallVec;

use crate::registry::SectionRegistry;

/// Visual state of the active indicator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorGeometry {
    /// Distance from the first item's leading edge to the last item's
    /// trailing edge
    pub track_height: f32,
    /// Active item's leading edge relative to the first item's
    pub active_top: f32,
    /// Active item's extent along the main axis
    pub active_height: f32,
    /// 1.0 when an active item is located, 0.0 otherwise
    pub opacity: f32,
}

impl IndicatorGeometry {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Recomputes `IndicatorGeometry` for one presentation's nav list
#[derive(Debug, Clone)]
pub struct IndicatorPositioner {
    presentation: Presentation,
    orientation: Orientation,
    last: IndicatorGeometry,
}

impl IndicatorPositioner {
    pub fn new(presentation: Presentation, orientation: Orientation) -> Self {
        Self {
            presentation,
            orientation,
            last: IndicatorGeometry::default(),
        }
    }

    pub fn geometry(&self) -> IndicatorGeometry {
        self.last
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Pure computation from resolved item rects in list order
    pub fn compute(
        items: &[(SectionId, Rect)],
        active: Option<&SectionId>,
        orientation: Orientation,
        previous: IndicatorGeometry,
    ) -> IndicatorGeometry {
        let (Some((_, first)), Some((_, last))) = (items.first(), items.last()) else {
            return IndicatorGeometry {
                track_height: 0.0,
                opacity: 0.0,
                ..previous
            };
        };

        let origin = orientation.leading(first);
        let track_height =
            (orientation.trailing(last) - origin).max(orientation.extent(first));

        let active_rect = active.and_then(|id| {
            items
                .iter()
                .find(|(item_id, _)| item_id == id)
                .map(|(_, rect)| rect)
        });

        match active_rect {
            Some(rect) => IndicatorGeometry {
                track_height,
                active_top: orientation.leading(rect) - origin,
                active_height: orientation.extent(rect),
                opacity: 1.0,
            },
            None => IndicatorGeometry {
                track_height,
                opacity: 0.0,
                ..previous
            },
        }
    }

    /// Measure the nav items through the host and recompute.
    ///
    /// Items without a resolvable element are left out of the track.
    pub fn recompute<L: ElementLookup + ?Sized>(
        &mut self,
        lookup: &L,
        sections: &SectionRegistry,
        active: Option<&SectionId>,
    ) -> IndicatorGeometry {
        let items: SmallVec<[(SectionId, Rect); 16]> = if lookup.is_ready() {
            sections
                .ids()
                .filter_map(|id| match lookup.nav_item_rect(self.presentation, id) {
                    Some(rect) => Some((id.clone(), rect)),
                    None => {
                        NavError::missing_nav_item(id).log();
                        None
                    }
                })
                .collect()
        } else {
            SmallVec::new()
        };

        self.last = Self::compute(&items, active, self.orientation, self.last);
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::{MockHost, NAV_ITEM_GAP, NAV_ITEM_HEIGHT};

    fn column(heights: &[f32], gap: f32) -> Vec<(SectionId, Rect)> {
        let mut y = 0.0;
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let rect = Rect::new(0.0, y, 100.0, *h);
                y += h + gap;
                (SectionId::from(format!("s{}", i)), rect)
            })
            .collect()
    }

    #[test]
    fn test_equal_items_with_gap() {
        let (h, g) = (30.0, 6.0);
        let items = column(&[h, h, h], g);
        let geo = IndicatorPositioner::compute(
            &items,
            Some(&"s1".into()),
            Orientation::Vertical,
            IndicatorGeometry::default(),
        );
        assert_eq!(geo.active_top, h + g);
        assert_eq!(geo.active_height, h);
        assert_eq!(geo.track_height, 3.0 * h + 2.0 * g);
        assert_eq!(geo.opacity, 1.0);
    }

    #[test]
    fn test_empty_list() {
        let geo = IndicatorPositioner::compute(
            &[],
            Some(&"s0".into()),
            Orientation::Vertical,
            IndicatorGeometry::default(),
        );
        assert_eq!(geo.track_height, 0.0);
        assert_eq!(geo.opacity, 0.0);
    }

    #[test]
    fn test_single_item_track_is_its_height() {
        let items = column(&[40.0], 0.0);
        let geo = IndicatorPositioner::compute(
            &items,
            None,
            Orientation::Vertical,
            IndicatorGeometry::default(),
        );
        assert_eq!(geo.track_height, 40.0);
        assert!(!geo.is_visible());
    }

    #[test]
    fn test_fade_keeps_previous_position() {
        let items = column(&[30.0, 30.0, 30.0], 10.0);
        let shown = IndicatorPositioner::compute(
            &items,
            Some(&"s2".into()),
            Orientation::Vertical,
            IndicatorGeometry::default(),
        );
        let hidden = IndicatorPositioner::compute(&items, None, Orientation::Vertical, shown);
        assert_eq!(hidden.opacity, 0.0);
        assert_eq!(hidden.active_top, shown.active_top);
        assert_eq!(hidden.active_height, shown.active_height);
    }

    #[test]
    fn test_horizontal_uses_x_axis() {
        let items = vec![
            (SectionId::from("a"), Rect::new(0.0, 0.0, 50.0, 20.0)),
            (SectionId::from("b"), Rect::new(60.0, 0.0, 80.0, 20.0)),
        ];
        let geo = IndicatorPositioner::compute(
            &items,
            Some(&"b".into()),
            Orientation::Horizontal,
            IndicatorGeometry::default(),
        );
        assert_eq!(geo.active_top, 60.0);
        assert_eq!(geo.active_height, 80.0);
        assert_eq!(geo.track_height, 140.0);
    }

    #[test]
    fn test_recompute_through_host() {
        let mut host = MockHost::uniform(&["a", "b", "c"], 400.0);
        let registry = SectionRegistry::from_descriptors(host.descriptors());
        let mut positioner = IndicatorPositioner::new(Presentation::Sidebar, Orientation::Vertical);

        let geo = positioner.recompute(&host, &registry, Some(&"b".into()));
        assert_eq!(geo.active_top, NAV_ITEM_HEIGHT + NAV_ITEM_GAP);
        assert!(geo.is_visible());

        // Active item unmounted: indicator hides
        host.remove_nav_item(Presentation::Sidebar, "b");
        let geo = positioner.recompute(&host, &registry, Some(&"b".into()));
        assert!(!geo.is_visible());
        assert_eq!(geo.active_top, NAV_ITEM_HEIGHT + NAV_ITEM_GAP);
    }
}
