//! Live picker state and the view it derives.
//!
//! HSV is the only stored color. Every change (drag, typed field, eyedropper,
//! recent swatch) produces a new HSV, and hex, RGB, HSL and both cursor
//! positions are re-derived from it in [`Picker::view`]. Committed changes
//! also produce a [`HostUpdate`] for the input element the picker replaces.

use glam::DVec2;
use serde::Serialize;
use tracing::debug;

use crate::color::{
    hex_to_rgb, hsv_to_hsl, hsv_to_rgb, normalize_hue, rgb_to_hsv, Hsl, Hsv, Rgb,
};
use crate::config::PickerConfig;
use crate::drag::{
    hue_cursor, saturation_cursor, Control, ControlRects, CursorPosition, DragState, DragTarget,
};
use crate::error::PickerError;
use crate::eyedropper::{CaptureService, Eyedropper};
use crate::format::{apply_edit, ColorFormat, FormatField};
use crate::recent::RecentColors;

/// Notification the host input should dispatch after a committed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostEvent {
    /// The value is changing (`input` event).
    Input,
    /// The value was committed (`change` event).
    Change,
}

/// New value for the host input and the events to fire on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostUpdate {
    pub hex: String,
    pub events: [HostEvent; 2],
}

impl HostUpdate {
    fn new(hex: String) -> Self {
        Self {
            hex,
            events: [HostEvent::Input, HostEvent::Change],
        }
    }
}

/// Text to show in one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldText {
    pub field: FormatField,
    pub text: String,
}

/// Everything the DOM layer needs to render the picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerView {
    pub hex: String,
    pub rgb: Rgb,
    pub hsv: Hsv,
    pub hsl: Hsl,
    pub format: ColorFormat,
    /// Surface cursor offset, percent of the surface size.
    pub saturation_cursor: CursorPosition,
    /// Hue thumb offset, percent of the track width.
    pub hue_cursor: f64,
    /// Backdrop of the saturation surface: the current hue at full s and v.
    pub surface_hex: String,
    /// Visible fields, minus the one being typed into.
    pub fields: Vec<FieldText>,
}

/// Result of a committed change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerUpdate {
    pub view: PickerView,
    pub host: HostUpdate,
}

/// One open picker panel.
#[derive(Debug, Clone)]
pub struct Picker {
    hsv: Hsv,
    format: ColorFormat,
    focused: Option<FormatField>,
    drag: DragState,
    /// A hue drag reached the right end of the track. The stored hue is 0
    /// but the thumb stays at 100%.
    hue_at_end: bool,
    eyedropper: Eyedropper,
}

impl Picker {
    /// Opens the picker on the host input's current value.
    ///
    /// A missing or malformed value falls back to `config.default_color`.
    pub fn open(host_value: Option<&str>, config: &PickerConfig) -> Self {
        let rgb = host_value
            .and_then(|v| Rgb::from_hex(v.trim()).ok())
            .unwrap_or_else(|| hex_to_rgb(&config.default_color));
        debug!(color = %rgb.to_hex(), "picker opened");
        Self::with_hsv(rgb_to_hsv(rgb))
    }

    pub fn with_hsv(hsv: Hsv) -> Self {
        Self {
            hsv: Hsv {
                h: normalize_hue(hsv.h),
                ..hsv
            },
            format: ColorFormat::default(),
            focused: None,
            drag: DragState::default(),
            hue_at_end: false,
            eyedropper: Eyedropper::default(),
        }
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn rgb(&self) -> Rgb {
        hsv_to_rgb(self.hsv)
    }

    pub fn hex(&self) -> String {
        self.rgb().to_hex()
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    pub fn drag_target(&self) -> DragTarget {
        self.drag.target()
    }

    pub fn is_picking(&self) -> bool {
        self.eyedropper.is_picking()
    }

    /// Derives every representation and cursor position from the HSV state.
    pub fn view(&self) -> PickerView {
        let rgb = self.rgb();
        let hsl = hsv_to_hsl(self.hsv);
        let surface = hsv_to_rgb(Hsv {
            h: self.hsv.h,
            s: 100.0,
            v: 100.0,
        });
        let fields = self
            .format
            .fields()
            .iter()
            .filter(|f| Some(**f) != self.focused)
            .map(|&field| FieldText {
                field,
                text: field.text(rgb, hsl),
            })
            .collect();
        PickerView {
            hex: rgb.to_hex(),
            rgb,
            hsv: self.hsv,
            hsl,
            format: self.format,
            saturation_cursor: saturation_cursor(self.hsv),
            hue_cursor: if self.hue_at_end {
                100.0
            } else {
                hue_cursor(self.hsv)
            },
            surface_hex: surface.to_hex(),
            fields,
        }
    }

    fn commit(&mut self, hsv: Hsv) -> PickerUpdate {
        self.commit_with_thumb(hsv, false)
    }

    /// Commits a drag result. The hue track's right end maps to 360, which
    /// is stored as 0 with the thumb kept at the end; a surface drag leaves
    /// the thumb where it was.
    fn commit_drag(&mut self, control: Control, hsv: Hsv) -> PickerUpdate {
        let hue_at_end = match control {
            Control::Hue => hsv.h >= 360.0,
            Control::Saturation => self.hue_at_end,
        };
        self.commit_with_thumb(hsv, hue_at_end)
    }

    fn commit_with_thumb(&mut self, hsv: Hsv, hue_at_end: bool) -> PickerUpdate {
        self.hsv = Hsv {
            h: normalize_hue(hsv.h),
            ..hsv
        };
        self.hue_at_end = hue_at_end;
        let view = self.view();
        let host = HostUpdate::new(view.hex.clone());
        PickerUpdate { view, host }
    }

    /// Replaces the color outright.
    pub fn set_hsv(&mut self, hsv: Hsv) -> PickerUpdate {
        self.commit(hsv)
    }

    /// Sets the color from a hex string. Malformed hex leaves the color alone.
    pub fn set_hex(&mut self, hex: &str) -> Result<PickerUpdate, PickerError> {
        let rgb = Rgb::from_hex(hex.trim())?;
        Ok(self.commit(rgb_to_hsv(rgb)))
    }

    /// Pointer pressed on `control`: starts a drag and applies it once.
    pub fn pointer_down(
        &mut self,
        control: Control,
        pointer: DVec2,
        rects: &ControlRects,
    ) -> Option<PickerUpdate> {
        let hsv = self.drag.pointer_down(control, pointer, rects, self.hsv)?;
        Some(self.commit_drag(control, hsv))
    }

    /// Pointer moved anywhere on the page. Only applies while dragging.
    pub fn pointer_move(&mut self, pointer: DVec2, rects: &ControlRects) -> Option<PickerUpdate> {
        let control = self.drag.target().control()?;
        let hsv = self.drag.pointer_move(pointer, rects, self.hsv)?;
        Some(self.commit_drag(control, hsv))
    }

    /// Pointer released anywhere on the page. Ends either drag.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.pointer_up()
    }

    /// Records which field has keyboard focus; that field is left out of
    /// [`PickerView::fields`] so re-rendering never moves its caret.
    pub fn focus_field(&mut self, field: Option<FormatField>) {
        self.focused = field;
    }

    pub fn focused_field(&self) -> Option<FormatField> {
        self.focused
    }

    /// Applies text typed into `field`.
    ///
    /// Incomplete or unparsable text is ignored (`None`); the color only
    /// changes once the field holds something valid.
    pub fn edit_field(&mut self, field: FormatField, text: &str) -> Option<PickerUpdate> {
        match apply_edit(field, text, self.hsv) {
            Ok(hsv) => Some(self.commit(hsv)),
            Err(e) => {
                debug!(error = %e, field = field.name(), "ignoring field edit");
                None
            }
        }
    }

    /// Switches to the next text format and returns it.
    pub fn toggle_format(&mut self) -> ColorFormat {
        self.format = self.format.next();
        if self.focused.is_some_and(|f| f.format() != self.format) {
            self.focused = None;
        }
        self.format
    }

    pub fn start_eyedropper(&mut self) {
        self.eyedropper.start();
    }

    /// Handles a `keydown` key name. Escape cancels an eyedropper pick.
    /// Returns whether the key was consumed.
    pub fn key_down(&mut self, key: &str) -> bool {
        key == "Escape" && self.eyedropper.cancel()
    }

    /// Completes an eyedropper pick at a viewport point.
    pub fn finish_eyedropper(
        &mut self,
        service: &dyn CaptureService,
        point: DVec2,
        device_pixel_ratio: f64,
    ) -> Option<PickerUpdate> {
        let hex = self.eyedropper.pick(service, point, device_pixel_ratio)?;
        self.set_hex(&hex).ok()
    }

    /// Applies a swatch clicked in the recent-colors row.
    pub fn select_recent(&mut self, hex: &str) -> Result<PickerUpdate, PickerError> {
        self.set_hex(hex)
    }

    /// Closes the panel: the final color goes to the recent list and is
    /// returned for the host input.
    pub fn close(self, recent: &mut RecentColors) -> String {
        let hex = self.hex();
        recent.add(&hex);
        debug!(color = %hex, "picker closed");
        hex
    }
}
