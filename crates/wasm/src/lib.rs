#![deny(unsafe_code)]
//! Browser bindings for the swatch color picker.
//!
//! A `ColorPicker` owns one open panel bound to a host `<input>`. Every
//! committed change is written back to the host input, which then fires
//! `input` and `change`; the page re-renders from [`ColorPicker::view`].

mod dom;
mod storage;

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use swatch_core::{
    CaptureService, Control, FormatField, Frame, Picker, PickerConfig, PickerError, PickerUpdate,
    Placement, RecentColors,
};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, HtmlElement, HtmlInputElement, ImageData, KeyboardEvent, MouseEvent,
    PointerEvent,
};

pub use storage::LocalStorageStore;

fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Document-level `pointermove`/`pointerup` listeners for one drag.
/// Dropping the session removes them.
struct DragSession {
    _listeners: [EventListener; 2],
}

/// A screenshot handed over by the page as `ImageData`.
struct ImageCapture<'a>(&'a ImageData);

impl CaptureService for ImageCapture<'_> {
    fn capture(&self) -> Result<Frame, PickerError> {
        Frame::new(self.0.width(), self.0.height(), self.0.data().0)
    }
}

thread_local! {
    static RECENT: RefCell<Option<Rc<RefCell<RecentColors>>>> = RefCell::new(None);
}

/// The page's one recent-colors list, read from `localStorage` on first use.
///
/// Later pickers share it, so it outlives a storage that cannot be read
/// or written.
fn shared_recent(config: &PickerConfig) -> Rc<RefCell<RecentColors>> {
    RECENT.with(|slot| {
        let mut slot = slot.borrow_mut();
        let recent = slot.get_or_insert_with(|| {
            let recent = match LocalStorageStore::open() {
                Ok(store) => {
                    RecentColors::load(&store, &config.storage_key, config.recent_capacity)
                }
                Err(e) => {
                    warn!(error = %e, "recent colors unavailable");
                    RecentColors::new(config.recent_capacity)
                }
            };
            Rc::new(RefCell::new(recent))
        });
        Rc::clone(recent)
    })
}

#[wasm_bindgen]
pub struct ColorPicker {
    picker: Rc<RefCell<Picker>>,
    recent: Rc<RefCell<RecentColors>>,
    config: PickerConfig,
    host: HtmlInputElement,
    drag: Rc<RefCell<Option<DragSession>>>,
    escape: Rc<RefCell<Option<EventListener>>>,
}

impl ColorPicker {
    fn publish(&self, update: Option<PickerUpdate>) -> Result<bool, JsValue> {
        match update {
            Some(update) => {
                dom::write_host(&self.host, &update.host)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[wasm_bindgen]
impl ColorPicker {
    /// Opens a picker on `host`'s current value.
    ///
    /// `settings` is an optional JSON object (see `PickerConfig::from_json`);
    /// unparsable JSON falls back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlInputElement, settings: Option<String>) -> ColorPicker {
        let config = match settings.as_deref().map(serde_json::from_str::<serde_json::Value>) {
            Some(Ok(value)) => PickerConfig::from_json(&value),
            Some(Err(e)) => {
                warn!(error = %e, "ignoring malformed picker settings");
                PickerConfig::default()
            }
            None => PickerConfig::default(),
        };
        let picker = Picker::open(Some(&host.value()), &config);
        ColorPicker {
            picker: Rc::new(RefCell::new(picker)),
            recent: shared_recent(&config),
            config,
            host,
            drag: Rc::new(RefCell::new(None)),
            escape: Rc::new(RefCell::new(None)),
        }
    }

    /// Current color as `"#rrggbb"`.
    pub fn hex(&self) -> String {
        self.picker.borrow().hex()
    }

    /// The full derived view as JSON.
    pub fn view(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.picker.borrow().view()).map_err(js_err)
    }

    /// Places `panel` below (or above) `anchor`, keeping it inside the viewport.
    pub fn position(&self, panel: &HtmlElement, anchor: &Element) -> Result<(), JsValue> {
        dom::place_panel(panel, anchor, &self.config.placement).map(|_| ())
    }

    /// Pointer pressed on the `"saturation"` or `"hue"` control.
    ///
    /// Applies the press immediately and follows the pointer on the whole
    /// document until it is released, even outside the control.
    #[wasm_bindgen(js_name = startDrag)]
    pub fn start_drag(
        &self,
        control: &str,
        event: &PointerEvent,
        saturation: Element,
        hue: Element,
    ) -> Result<(), JsValue> {
        let control = Control::from_name(control)
            .ok_or_else(|| JsValue::from_str(&format!("unknown control: {control}")))?;
        let rects = dom::control_rects(&saturation, &hue);
        let update = self
            .picker
            .borrow_mut()
            .pointer_down(control, dom::client_point(event), &rects);
        self.publish(update)?;
        event.prevent_default();

        let document = dom::document()?;

        let picker = Rc::clone(&self.picker);
        let host = self.host.clone();
        let on_move = EventListener::new(&document, "pointermove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rects = dom::control_rects(&saturation, &hue);
            let update = picker
                .borrow_mut()
                .pointer_move(dom::client_point(event), &rects);
            if let Some(update) = update {
                if let Err(e) = dom::write_host(&host, &update.host) {
                    warn!(error = ?e, "could not update host input");
                }
            }
        });

        let picker = Rc::clone(&self.picker);
        let slot = Rc::clone(&self.drag);
        let on_up = EventListener::new(&document, "pointerup", move |_event: &Event| {
            picker.borrow_mut().pointer_up();
            // The listener running now belongs to the session; release it
            // after this dispatch returns.
            if let Some(session) = slot.borrow_mut().take() {
                Timeout::new(0, move || drop(session)).forget();
            }
        });

        *self.drag.borrow_mut() = Some(DragSession {
            _listeners: [on_move, on_up],
        });
        Ok(())
    }

    /// Marks the field named `name` as focused, or clears focus with `None`.
    #[wasm_bindgen(js_name = focusField)]
    pub fn focus_field(&self, name: Option<String>) {
        let field = name.as_deref().and_then(FormatField::from_name);
        self.picker.borrow_mut().focus_field(field);
    }

    /// Text typed into the field named `name`. Returns whether it applied.
    #[wasm_bindgen(js_name = editField)]
    pub fn edit_field(&self, name: &str, text: &str) -> Result<bool, JsValue> {
        let field = FormatField::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown field: {name}")))?;
        let update = self.picker.borrow_mut().edit_field(field, text);
        self.publish(update)
    }

    /// Cycles hex → rgb → hsl and returns the new format's name.
    #[wasm_bindgen(js_name = toggleFormat)]
    pub fn toggle_format(&self) -> String {
        self.picker.borrow_mut().toggle_format().name().to_string()
    }

    #[wasm_bindgen(js_name = selectRecent)]
    pub fn select_recent(&self, hex: &str) -> Result<(), JsValue> {
        let update = self.picker.borrow_mut().select_recent(hex).map_err(js_err)?;
        self.publish(Some(update)).map(|_| ())
    }

    /// Starts an eyedropper pick. Escape on the document cancels it until
    /// the pick finishes.
    #[wasm_bindgen(js_name = startEyedropper)]
    pub fn start_eyedropper(&self) -> Result<(), JsValue> {
        self.picker.borrow_mut().start_eyedropper();
        let document = dom::document()?;
        let picker = Rc::clone(&self.picker);
        let slot = Rc::clone(&self.escape);
        let listener = EventListener::new(&document, "keydown", move |event: &Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if picker.borrow_mut().key_down(&event.key()) {
                event.prevent_default();
                if let Some(listener) = slot.borrow_mut().take() {
                    Timeout::new(0, move || drop(listener)).forget();
                }
            }
        });
        *self.escape.borrow_mut() = Some(listener);
        Ok(())
    }

    /// Forwards a `keydown` key. Returns whether the picker consumed it.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: &str) -> bool {
        let consumed = self.picker.borrow_mut().key_down(key);
        if consumed {
            self.escape.borrow_mut().take();
        }
        consumed
    }

    /// Completes an eyedropper pick from a viewport screenshot.
    ///
    /// `(x, y)` is the click in CSS pixels; `dpr` is `devicePixelRatio`.
    /// Returns the picked hex, or `None` when nothing was picked.
    #[wasm_bindgen(js_name = finishEyedropper)]
    pub fn finish_eyedropper(
        &self,
        screenshot: &ImageData,
        x: f64,
        y: f64,
        dpr: f64,
    ) -> Result<Option<String>, JsValue> {
        let update = self.picker.borrow_mut().finish_eyedropper(
            &ImageCapture(screenshot),
            glam::DVec2::new(x, y),
            dpr,
        );
        self.escape.borrow_mut().take();
        let hex = update.as_ref().map(|u| u.host.hex.clone());
        self.publish(update)?;
        Ok(hex)
    }

    /// Recent colors as a JSON array, most recent first.
    #[wasm_bindgen(js_name = recentColors)]
    pub fn recent_colors(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.recent.borrow().list()).map_err(js_err)
    }

    /// Closes the panel, records the final color as recent and returns it.
    pub fn close(self) -> String {
        self.drag.borrow_mut().take();
        self.escape.borrow_mut().take();
        let picker = self.picker.borrow().clone();
        let hex = picker.close(&mut self.recent.borrow_mut());
        match LocalStorageStore::open() {
            Ok(mut store) => {
                self.recent.borrow().save(&mut store, &self.config.storage_key);
            }
            Err(e) => warn!(error = %e, "recent colors kept in memory only"),
        }
        hex
    }
}

/// Places `panel` next to `anchor` with the default gap and margin.
#[wasm_bindgen(js_name = positionPicker)]
pub fn position_picker(panel: &HtmlElement, anchor: &Element) -> Result<(), JsValue> {
    dom::place_panel(panel, anchor, &Placement::default()).map(|_| ())
}

/// Color of `image` under the CSS-pixel point `(x, y)`, or `None` if the
/// image is malformed or the point is off it.
#[wasm_bindgen(js_name = sampleImageData)]
pub fn sample_image_data(image: &ImageData, x: f64, y: f64, dpr: f64) -> Option<String> {
    match ImageCapture(image).capture() {
        Ok(frame) => frame.sample_hex(glam::DVec2::new(x, y), dpr),
        Err(e) => {
            warn!(error = %e, "unusable image data");
            None
        }
    }
}
