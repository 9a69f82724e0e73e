//! Layout reads from the DOM and writes back to it.

use glam::DVec2;
use swatch_core::{ControlRects, HostEvent, HostUpdate, PanelPosition, Placement, Rect};
use wasm_bindgen::JsValue;
use web_sys::{
    Document, Element, Event, EventInit, HtmlElement, HtmlInputElement, MouseEvent, Window,
};

pub(crate) fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

pub(crate) fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

/// Viewport-relative bounding box of `el`.
pub(crate) fn client_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect {
        top: r.top(),
        bottom: r.bottom(),
        left: r.left(),
        right: r.right(),
    }
}

pub(crate) fn control_rects(saturation: &Element, hue: &Element) -> ControlRects {
    ControlRects {
        saturation: client_rect(saturation),
        hue: client_rect(hue),
    }
}

pub(crate) fn client_point(event: &MouseEvent) -> DVec2 {
    DVec2::new(event.client_x() as f64, event.client_y() as f64)
}

fn viewport(window: &Window) -> Result<DVec2, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(DVec2::new(width, height))
}

fn scroll(window: &Window) -> Result<DVec2, JsValue> {
    Ok(DVec2::new(window.scroll_x()?, window.scroll_y()?))
}

/// Positions `panel` next to `anchor` and writes its `top`/`left` styles.
pub(crate) fn place_panel(
    panel: &HtmlElement,
    anchor: &Element,
    placement: &Placement,
) -> Result<PanelPosition, JsValue> {
    let window = window()?;
    let size = DVec2::new(panel.offset_width() as f64, panel.offset_height() as f64);
    let position = placement.position(
        size,
        client_rect(anchor),
        viewport(&window)?,
        scroll(&window)?,
    );
    let (top, left) = position.to_css();
    let style = panel.style();
    style.set_property("top", &top)?;
    style.set_property("left", &left)?;
    Ok(position)
}

pub(crate) fn event_name(event: HostEvent) -> &'static str {
    match event {
        HostEvent::Input => "input",
        HostEvent::Change => "change",
    }
}

/// Sets the host input's value and fires its bubbling `input` and `change`.
pub(crate) fn write_host(input: &HtmlInputElement, update: &HostUpdate) -> Result<(), JsValue> {
    input.set_value(&update.hex);
    for event in update.events {
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict(event_name(event), &init)?;
        input.dispatch_event(&event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_events_use_dom_names() {
        assert_eq!(event_name(HostEvent::Input), "input");
        assert_eq!(event_name(HostEvent::Change), "change");
    }
}
