use crate::constants::POINTER_REQUIRES_PRESS;
use crate::frame::FrameContext;
use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer fallback for the hand tracker: pressing and dragging over the
/// canvas steers the orbit camera.
pub fn wire_pointer_handlers(canvas: &web::HtmlCanvasElement, ctx: Rc<RefCell<FrameContext>>) {
    wire_pointermove(canvas, ctx.clone());
    wire_pointerdown(canvas, ctx.clone());
    wire_pointerup(ctx.clone());
    wire_wheel(canvas, ctx);
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, ctx: Rc<RefCell<FrameContext>>) {
    let canvas = canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let [u, v] = input::pointer_canvas_uv(&ev, &canvas);
        let mut c = ctx.borrow_mut();
        c.pointer.u = u;
        c.pointer.v = v;
        c.refresh_pointer_hand(POINTER_REQUIRES_PRESS);
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerdown(canvas: &web::HtmlCanvasElement, ctx: Rc<RefCell<FrameContext>>) {
    let canvas_for_listener = canvas.clone();
    let canvas = canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let [u, v] = input::pointer_canvas_uv(&ev, &canvas);
        {
            let mut c = ctx.borrow_mut();
            c.pointer = input::PointerState { u, v, down: true };
            c.refresh_pointer_hand(POINTER_REQUIRES_PRESS);
        }
        _ = canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(ctx: Rc<RefCell<FrameContext>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        let mut c = ctx.borrow_mut();
        c.pointer.down = false;
        c.refresh_pointer_hand(POINTER_REQUIRES_PRESS);
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_wheel(canvas: &web::HtmlCanvasElement, ctx: Rc<RefCell<FrameContext>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let mut c = ctx.borrow_mut();
        let next = input::zoomed_distance(c.scene.orbit().distance(), ev.delta_y(), ev.delta_mode());
        c.set_distance(next);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
