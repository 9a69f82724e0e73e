//! Placement of the floating picker panel next to its anchor input.
//!
//! Anchor rectangles come from `getBoundingClientRect` and are therefore
//! viewport-relative. Overflow is decided in viewport space; the scroll
//! offset is only added when producing the final page-relative position,
//! because the panel is absolutely positioned in page coordinates.

use glam::DVec2;
use serde::Serialize;

/// Vertical gap between the anchor and the panel, in CSS pixels.
pub const GAP: f64 = 5.0;
/// Distance kept from the right viewport edge when clamping, in CSS pixels.
pub const MARGIN: f64 = 10.0;

/// An axis-aligned box in CSS pixels, edges measured from the viewport origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    /// Builds a rect from its top-left corner and size.
    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        Self {
            top: origin.y,
            bottom: origin.y + size.y,
            left: origin.x,
            right: origin.x + size.x,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Top-left corner.
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.left, self.top)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width(), self.height())
    }
}

/// Page-relative top-left offset for the panel. Both fields are >= 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PanelPosition {
    pub top: f64,
    pub left: f64,
}

impl PanelPosition {
    /// The `top` and `left` style values, e.g. `("135px", "200px")`.
    pub fn to_css(self) -> (String, String) {
        (format!("{}px", self.top), format!("{}px", self.left))
    }
}

/// Spacing used when placing the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Distance between anchor edge and panel edge.
    pub gap: f64,
    /// Distance kept from the right viewport edge when the panel is pulled left.
    pub margin: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            gap: GAP,
            margin: MARGIN,
        }
    }
}

impl Placement {
    /// Computes the panel's page-relative top-left corner.
    ///
    /// - `panel`: panel width (x) and height (y).
    /// - `anchor`: viewport-relative bounding box of the anchor element.
    /// - `viewport`: viewport width (x) and height (y).
    /// - `scroll`: page scroll offset.
    ///
    /// The panel opens below the anchor; it flips above when its bottom
    /// would pass the viewport bottom, and is pulled left when its right
    /// edge would pass the viewport right edge. The result is floored at 0
    /// on both axes after those adjustments, so a panel larger than the
    /// viewport ends up pinned at the page origin.
    pub fn position(
        &self,
        panel: DVec2,
        anchor: Rect,
        viewport: DVec2,
        scroll: DVec2,
    ) -> PanelPosition {
        let mut top = anchor.bottom + scroll.y + self.gap;
        let mut left = anchor.left + scroll.x;

        if anchor.bottom + panel.y > viewport.y {
            top = anchor.top + scroll.y - panel.y - self.gap;
        }

        if anchor.left + panel.x > viewport.x {
            left = viewport.x - panel.x - self.margin + scroll.x;
        }

        PanelPosition {
            top: top.max(0.0),
            left: left.max(0.0),
        }
    }
}

/// [`Placement::position`] with the default gap (5) and margin (10).
pub fn calculate_position(
    panel: DVec2,
    anchor: Rect,
    viewport: DVec2,
    scroll: DVec2,
) -> PanelPosition {
    Placement::default().position(panel, anchor, viewport, scroll)
}
