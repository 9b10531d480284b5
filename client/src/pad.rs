use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlInputElement, ImageData, PointerEvent, ResizeObserver, Window,
};

use formpad_core::config::{PadConfig, StrokeStyle};
use formpad_core::layout::ResizePlan;
use formpad_core::signature::{Segment, SignatureState};

use crate::dom::{event_to_point, get_element};

pub struct PadWidget {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    output: HtmlInputElement,
    style: StrokeStyle,
    sig: SignatureState<ImageData>,
}

pub fn wire_pad(window: &Window, document: &Document, config: PadConfig) -> Result<(), JsValue> {
    let canvas: HtmlCanvasElement = get_element(document, &config.canvas)?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let output: HtmlInputElement = get_element(document, &config.output)?;
    let clear_button: HtmlButtonElement = get_element(document, &config.clear_button)?;

    // Pointer events are the one authoritative input family; this keeps the
    // browser from turning a stroke into a scroll gesture.
    let _ = canvas.style().set_property("touch-action", "none");

    let widget = Rc::new(RefCell::new(PadWidget {
        canvas: canvas.clone(),
        ctx,
        output: output.clone(),
        style: config.stroke.clone(),
        sig: SignatureState::new(),
    }));

    {
        let mut pad = widget.borrow_mut();
        resize_canvas(window, &mut pad, false);
    }

    {
        let resize_window = window.clone();
        let resize_pad = widget.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let mut pad = resize_pad.borrow_mut();
            resize_canvas(&resize_window, &mut pad, true);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    // The observer fires when the container gets a real layout box, which is
    // how a pad inside a collapsed panel picks up its size on reveal.
    if let Some(parent) = canvas.parent_element() {
        let observe_window = window.clone();
        let observe_pad = widget.clone();
        let onobserve = Closure::<dyn FnMut(js_sys::Array)>::new(move |_: js_sys::Array| {
            let mut pad = observe_pad.borrow_mut();
            resize_canvas(&observe_window, &mut pad, true);
        });
        let observer = ResizeObserver::new(onobserve.as_ref().unchecked_ref())?;
        observer.observe(&parent);
        onobserve.forget();
    }

    {
        let down_pad = widget.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            event.prevent_default();
            let _ = down_canvas.set_pointer_capture(event.pointer_id());
            let mut pad = down_pad.borrow_mut();
            let point = event_to_point(&down_canvas, &event);
            let snapshot = capture_bitmap(&pad);
            pad.sig.begin_stroke(point, snapshot);
            // A tap with no movement still leaves visible ink.
            pad.ctx.begin_path();
            let _ = pad.ctx.arc(
                point.x,
                point.y,
                pad.style.width / 2.0,
                0.0,
                std::f64::consts::PI * 2.0,
            );
            pad.ctx.fill();
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_pad = widget.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut pad = move_pad.borrow_mut();
            if !pad.sig.is_drawing() {
                return;
            }
            event.prevent_default();
            let point = event_to_point(&move_canvas, &event);
            if let Some(segment) = pad.sig.extend_stroke(point) {
                draw_segment(&pad.ctx, segment);
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    for kind in ["pointerup", "pointercancel", "pointerleave"] {
        let up_pad = widget.clone();
        let onup = Closure::<dyn FnMut(PointerEvent)>::new(move |_: PointerEvent| {
            let mut pad = up_pad.borrow_mut();
            if !pad.sig.is_drawing() {
                return;
            }
            pad.sig.end_stroke();
            let payload = serialize(&pad);
            pad.output.set_value(&payload);
        });
        canvas.add_event_listener_with_callback(kind, onup.as_ref().unchecked_ref())?;
        onup.forget();
    }

    {
        let clear_pad = widget.clone();
        let onclear = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut pad = clear_pad.borrow_mut();
            pad.sig.clear();
            clear_bitmap(&pad);
            pad.output.set_value("");
        });
        clear_button.add_event_listener_with_callback("click", onclear.as_ref().unchecked_ref())?;
        onclear.forget();
    }

    if let Some(id) = &config.undo_button {
        match get_element::<HtmlButtonElement>(document, id) {
            Ok(undo_button) => {
                let undo_pad = widget.clone();
                let onundo = Closure::<dyn FnMut(Event)>::new(move |_| {
                    let mut pad = undo_pad.borrow_mut();
                    if let Some(snapshot) = pad.sig.undo() {
                        clear_bitmap(&pad);
                        let _ = pad.ctx.put_image_data(&snapshot, 0.0, 0.0);
                        let payload = serialize(&pad);
                        pad.output.set_value(&payload);
                    }
                });
                undo_button
                    .add_event_listener_with_callback("click", onundo.as_ref().unchecked_ref())?;
                onundo.forget();
            }
            Err(_) => {
                web_sys::console::warn_1(
                    &format!("Signature undo control missing: {id}, undo disabled").into(),
                );
            }
        }
    }

    // Serialization has to run synchronously before the request is built, so
    // it hangs off the host form's submit event.
    if let Some(form) = output.form() {
        let submit_pad = widget.clone();
        let submit_output = output.clone();
        let onsubmit = Closure::<dyn FnMut(Event)>::new(move |_| {
            let pad = submit_pad.borrow();
            submit_output.set_value(&serialize(&pad));
        });
        form.add_event_listener_with_callback("submit", onsubmit.as_ref().unchecked_ref())?;
        onsubmit.forget();
    }

    Ok(())
}

/// Recomputes the backing store from the container's layout box, keeping the
/// already-drawn raster when `preserve` is set. Unchanged dimensions return
/// early, leaving the bitmap untouched.
pub fn resize_canvas(window: &Window, pad: &mut PadWidget, preserve: bool) {
    let container = pad
        .canvas
        .parent_element()
        .map(|parent| parent.get_bounding_client_rect());
    let (width, height) = container
        .map(|rect| (rect.width(), rect.height()))
        .unwrap_or((0.0, 0.0));
    let plan = ResizePlan::compute(width, height, window.device_pixel_ratio());

    if plan.backing_width == pad.canvas.width() && plan.backing_height == pad.canvas.height() {
        // Same backing store: leave the bitmap byte-identical, but make sure
        // the context carries the stroke parameters (a fresh canvas starts at
        // the default 300x150 without ever having been styled).
        apply_stroke_style(&pad.ctx, &pad.style, plan.ratio);
        return;
    }

    let snapshot = if preserve { capture_bitmap(pad) } else { None };

    let style = pad.canvas.style();
    let _ = style.set_property("width", &format!("{}px", plan.css_width));
    let _ = style.set_property("height", &format!("{}px", plan.css_height));
    pad.canvas.set_width(plan.backing_width);
    pad.canvas.set_height(plan.backing_height);

    if let Some(snapshot) = snapshot {
        // Pasted at origin in device pixels; content is not rescaled.
        let _ = pad.ctx.put_image_data(&snapshot, 0.0, 0.0);
    }

    // Resizing the backing store resets all context state.
    apply_stroke_style(&pad.ctx, &pad.style, plan.ratio);

    // No stroke tracking spans a resize; treat it as a missed pointer-up.
    pad.sig.end_stroke();
}

fn apply_stroke_style(ctx: &CanvasRenderingContext2d, style: &StrokeStyle, ratio: f64) {
    let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
    ctx.set_line_width(style.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_stroke_style_str(&style.color);
    ctx.set_fill_style_str(&style.color);
}

fn draw_segment(ctx: &CanvasRenderingContext2d, segment: Segment) {
    ctx.begin_path();
    ctx.move_to(segment.from.x, segment.from.y);
    ctx.line_to(segment.to.x, segment.to.y);
    ctx.stroke();
}

/// Raw-pixel copy of the whole backing store. A tainted or zero-size bitmap
/// yields `None` and the caller degrades (no snapshot, drawing continues).
fn capture_bitmap(pad: &PadWidget) -> Option<ImageData> {
    let width = pad.canvas.width();
    let height = pad.canvas.height();
    if width == 0 || height == 0 {
        return None;
    }
    pad.ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .ok()
}

fn clear_bitmap(pad: &PadWidget) {
    pad.ctx.clear_rect(
        0.0,
        0.0,
        pad.canvas.width() as f64,
        pad.canvas.height() as f64,
    );
}

/// Empty string until a stroke has been committed since the last clear;
/// afterwards the bitmap as a base64 PNG data URI.
pub fn serialize(pad: &PadWidget) -> String {
    if !pad.sig.has_ink() {
        return String::new();
    }
    pad.canvas
        .to_data_url_with_type("image/png")
        .unwrap_or_default()
}
