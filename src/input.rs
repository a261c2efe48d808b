use crate::constants::{WHEEL_LINE_PIXELS, WHEEL_PAGE_PIXELS, WHEEL_ZOOM_PER_PIXEL};
use tree_core::HandSample;
use web_sys as web;

/// Latest pointer state over the canvas, in canvas UV space.
#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub u: f32,
    pub v: f32,
    pub down: bool,
}

/// Where the hand sample currently comes from. An external tracker always
/// wins over the pointer fallback once it has reported.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum HandSource {
    #[default]
    Pointer,
    Tracker,
}

#[derive(Default, Clone, Copy)]
pub struct HandState {
    pub sample: HandSample,
    pub source: HandSource,
}

impl HandState {
    pub fn from_tracker(&mut self, x: f32, y: f32, detected: bool) {
        self.source = HandSource::Tracker;
        self.sample = HandSample::new(x, y, detected);
    }

    /// Feed the pointer fallback; ignored once a tracker is driving.
    pub fn from_pointer(&mut self, pointer: &PointerState, requires_press: bool) {
        if self.source == HandSource::Tracker {
            return;
        }
        self.sample = pointer_hand_sample(pointer, requires_press);
    }
}

// ---------------- Pointer helpers ----------------
#[inline]
pub fn pointer_canvas_uv(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> [f32; 2] {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    uv_from_css(x_css, y_css, rect.width() as f32, rect.height() as f32)
}

/// Normalize CSS pixel coordinates against the element size; a collapsed
/// element maps everything to the centre.
#[inline]
pub fn uv_from_css(x_css: f32, y_css: f32, w: f32, h: f32) -> [f32; 2] {
    if w > 0.0 && h > 0.0 {
        let u = (x_css / w).clamp(0.0, 1.0);
        let v = (y_css / h).clamp(0.0, 1.0);
        [u, v]
    } else {
        [0.5, 0.5]
    }
}

/// Pointer as a hand sample. Both use image coordinates (v grows downward),
/// so the pointer maps straight through.
#[inline]
pub fn pointer_hand_sample(pointer: &PointerState, requires_press: bool) -> HandSample {
    let detected = pointer.down || !requires_press;
    HandSample::new(pointer.u, pointer.v, detected)
}

// ---------------- Wheel helpers ----------------
/// Orbit distance after one wheel event. Scrolling down (positive delta)
/// pulls the camera back. `delta_mode` follows `WheelEvent.deltaMode`.
#[inline]
pub fn zoomed_distance(current: f32, delta_y: f64, delta_mode: u32) -> f32 {
    let pixels = match delta_mode {
        1 => delta_y as f32 * WHEEL_LINE_PIXELS,
        2 => delta_y as f32 * WHEEL_PAGE_PIXELS,
        _ => delta_y as f32,
    };
    if !pixels.is_finite() {
        return current;
    }
    current + pixels * WHEEL_ZOOM_PER_PIXEL
}
