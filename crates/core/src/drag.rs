//! Pointer-drag mapping for the saturation/value surface and the hue track.
//!
//! Pointer positions and control rects are both viewport-relative (client
//! coordinates and `getBoundingClientRect`). Positions are clamped to the
//! control bounds before being mapped, so a drag that leaves the control
//! pins the value at the nearest edge.

use glam::DVec2;
use serde::Serialize;
use tracing::debug;

use crate::color::Hsv;
use crate::geometry::Rect;

/// The two draggable controls of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// 2D surface: x = saturation, y = value (top = 100).
    Saturation,
    /// Horizontal track: x = hue.
    Hue,
}

impl Control {
    /// Parses the control's DOM name, `"saturation"` or `"hue"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "saturation" => Some(Control::Saturation),
            "hue" => Some(Control::Hue),
            _ => None,
        }
    }
}

/// Current bounding rects of both controls, read by the DOM layer per event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlRects {
    pub saturation: Rect,
    pub hue: Rect,
}

impl ControlRects {
    pub fn rect(&self, control: Control) -> Rect {
        match control {
            Control::Saturation => self.saturation,
            Control::Hue => self.hue,
        }
    }
}

/// Cursor offset inside the saturation surface, in percent of its size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CursorPosition {
    pub left: f64,
    pub top: f64,
}

fn usable(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

/// Maps a pointer on the saturation surface to `(s, v)` percentages.
///
/// Returns `None` when the surface has no area.
pub fn map_saturation(pointer: DVec2, surface: Rect) -> Option<(f64, f64)> {
    let size = surface.size();
    if !usable(size.x) || !usable(size.y) {
        return None;
    }
    let local = (pointer - surface.origin()).clamp(DVec2::ZERO, size);
    let s = local.x / size.x * 100.0;
    let v = 100.0 - local.y / size.y * 100.0;
    Some((s, v))
}

/// Maps a pointer x on the hue track to a hue in degrees.
///
/// The right end of the track maps to exactly 360. `Picker` stores that as
/// 0 and keeps the thumb at the end of the track.
/// Returns `None` when the track has no width.
pub fn map_hue(pointer_x: f64, track: Rect) -> Option<f64> {
    let width = track.width();
    if !usable(width) {
        return None;
    }
    let x = (pointer_x - track.left).clamp(0.0, width);
    Some(x / width * 360.0)
}

/// Applies one mapping for `control`, returning the updated color.
///
/// Only `s`/`v` change for the surface and only `h` for the track.
pub fn apply(control: Control, pointer: DVec2, rects: &ControlRects, hsv: Hsv) -> Option<Hsv> {
    match control {
        Control::Saturation => {
            map_saturation(pointer, rects.saturation).map(|(s, v)| Hsv { s, v, ..hsv })
        }
        Control::Hue => map_hue(pointer.x, rects.hue).map(|h| Hsv { h, ..hsv }),
    }
}

/// Where the surface cursor sits for `hsv`.
pub fn saturation_cursor(hsv: Hsv) -> CursorPosition {
    CursorPosition {
        left: hsv.s.clamp(0.0, 100.0),
        top: (100.0 - hsv.v).clamp(0.0, 100.0),
    }
}

/// Where the hue thumb sits for `hsv`, in percent of the track width.
pub fn hue_cursor(hsv: Hsv) -> f64 {
    (hsv.h / 360.0 * 100.0).clamp(0.0, 100.0)
}

/// Which control, if any, is being dragged.
///
/// One record for both controls: a pointer-up anywhere ends whichever
/// drag is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragTarget {
    #[default]
    None,
    Saturation,
    Hue,
}

impl DragTarget {
    pub fn control(self) -> Option<Control> {
        match self {
            DragTarget::None => None,
            DragTarget::Saturation => Some(Control::Saturation),
            DragTarget::Hue => Some(Control::Hue),
        }
    }

    pub fn is_dragging(self) -> bool {
        self != DragTarget::None
    }
}

impl From<Control> for DragTarget {
    fn from(control: Control) -> Self {
        match control {
            Control::Saturation => DragTarget::Saturation,
            Control::Hue => DragTarget::Hue,
        }
    }
}

/// Drag state machine: idle until a pointer-down on a control, then every
/// move re-applies the mapping until a pointer-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    target: DragTarget,
}

impl DragState {
    pub fn target(&self) -> DragTarget {
        self.target
    }

    /// Starts dragging `control` and applies the first mapping immediately.
    pub fn pointer_down(
        &mut self,
        control: Control,
        pointer: DVec2,
        rects: &ControlRects,
        hsv: Hsv,
    ) -> Option<Hsv> {
        self.target = control.into();
        debug!(?control, "drag started");
        apply(control, pointer, rects, hsv)
    }

    /// Re-applies the mapping for the active control. Idle moves are ignored.
    pub fn pointer_move(&self, pointer: DVec2, rects: &ControlRects, hsv: Hsv) -> Option<Hsv> {
        let control = self.target.control()?;
        apply(control, pointer, rects, hsv)
    }

    /// Ends any drag. Returns whether one was active.
    pub fn pointer_up(&mut self) -> bool {
        let was = self.target.is_dragging();
        if was {
            debug!(drag = ?self.target, "drag ended");
        }
        self.target = DragTarget::None;
        was
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Rect {
        Rect::from_origin_size(DVec2::new(10.0, 20.0), DVec2::new(200.0, 100.0))
    }

    fn track() -> Rect {
        Rect::from_origin_size(DVec2::new(10.0, 130.0), DVec2::new(180.0, 12.0))
    }

    fn rects() -> ControlRects {
        ControlRects {
            saturation: surface(),
            hue: track(),
        }
    }

    #[test]
    fn control_names() {
        assert_eq!(Control::from_name("hue"), Some(Control::Hue));
        assert_eq!(Control::from_name("saturation"), Some(Control::Saturation));
        assert_eq!(Control::from_name("alpha"), None);
    }

    #[test]
    fn saturation_center_maps_to_fifty_fifty() {
        let (s, v) = map_saturation(DVec2::new(110.0, 70.0), surface()).unwrap();
        assert_eq!(s, 50.0);
        assert_eq!(v, 50.0);
    }

    #[test]
    fn saturation_corners() {
        let top_left = map_saturation(DVec2::new(10.0, 20.0), surface()).unwrap();
        assert_eq!(top_left, (0.0, 100.0));
        let bottom_right = map_saturation(DVec2::new(210.0, 120.0), surface()).unwrap();
        assert_eq!(bottom_right, (100.0, 0.0));
    }

    #[test]
    fn saturation_clamps_outside_pointer() {
        let (s, v) = map_saturation(DVec2::new(-500.0, 900.0), surface()).unwrap();
        assert_eq!((s, v), (0.0, 0.0));
        let (s, v) = map_saturation(DVec2::new(900.0, -500.0), surface()).unwrap();
        assert_eq!((s, v), (100.0, 100.0));
    }

    #[test]
    fn zero_area_controls_do_not_map() {
        let flat = Rect::from_origin_size(DVec2::ZERO, DVec2::new(200.0, 0.0));
        assert!(map_saturation(DVec2::new(5.0, 5.0), flat).is_none());
        let thin = Rect::from_origin_size(DVec2::ZERO, DVec2::new(0.0, 10.0));
        assert!(map_hue(5.0, thin).is_none());
    }

    #[test]
    fn hue_track_maps_across_full_range() {
        assert_eq!(map_hue(10.0, track()), Some(0.0));
        assert_eq!(map_hue(100.0, track()), Some(180.0));
        assert_eq!(map_hue(190.0, track()), Some(360.0));
        assert_eq!(map_hue(1000.0, track()), Some(360.0));
        assert_eq!(map_hue(-1000.0, track()), Some(0.0));
    }

    #[test]
    fn apply_only_touches_its_own_components() {
        let start = Hsv {
            h: 200.0,
            s: 10.0,
            v: 20.0,
        };
        let sat = apply(Control::Saturation, DVec2::new(110.0, 70.0), &rects(), start).unwrap();
        assert_eq!(sat.h, 200.0);
        assert_eq!((sat.s, sat.v), (50.0, 50.0));

        let hue = apply(Control::Hue, DVec2::new(100.0, 0.0), &rects(), start).unwrap();
        assert_eq!(hue.h, 180.0);
        assert_eq!((hue.s, hue.v), (10.0, 20.0));
    }

    #[test]
    fn cursor_positions_follow_color() {
        let hsv = Hsv {
            h: 90.0,
            s: 25.0,
            v: 75.0,
        };
        assert_eq!(saturation_cursor(hsv), CursorPosition { left: 25.0, top: 25.0 });
        assert_eq!(hue_cursor(hsv), 25.0);
        assert_eq!(hue_cursor(Hsv { h: 360.0, ..hsv }), 100.0);
    }

    #[test]
    fn state_machine_down_move_up() {
        let mut drag = DragState::default();
        let hsv = Hsv::default();
        assert!(drag.pointer_move(DVec2::new(110.0, 70.0), &rects(), hsv).is_none());

        let after_down = drag
            .pointer_down(Control::Saturation, DVec2::new(110.0, 70.0), &rects(), hsv)
            .unwrap();
        assert_eq!(drag.target(), DragTarget::Saturation);
        assert_eq!(after_down.s, 50.0);

        let after_move = drag
            .pointer_move(DVec2::new(210.0, 20.0), &rects(), after_down)
            .unwrap();
        assert_eq!((after_move.s, after_move.v), (100.0, 100.0));

        assert!(drag.pointer_up());
        assert_eq!(drag.target(), DragTarget::None);
        assert!(!drag.pointer_up());
        assert!(drag
            .pointer_move(DVec2::new(10.0, 20.0), &rects(), after_move)
            .is_none());
    }

    #[test]
    fn move_outside_control_while_dragging_still_maps() {
        let mut drag = DragState::default();
        drag.pointer_down(Control::Hue, DVec2::new(100.0, 135.0), &rects(), Hsv::default());
        let far = drag
            .pointer_move(DVec2::new(5000.0, -300.0), &rects(), Hsv::default())
            .unwrap();
        assert_eq!(far.h, 360.0);
    }
}
